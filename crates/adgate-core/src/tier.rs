use std::fmt;

/// SLA tier classification for a tenant.
///
/// Gold and Silver are exempt from the bronze reserve throttle; a tenant's
/// tier also weights its effective priority in the scheduler (see
/// `adgate-scheduler`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    /// The scheduler's tier weight: higher weight divides urgency down to a
    /// lower (hotter) priority number.
    pub fn weight(self) -> u32 {
        match self {
            Tier::Gold => 3,
            Tier::Silver => 2,
            Tier::Bronze => 1,
        }
    }

    /// The string form used in shared-store keys (`client:{tenant}:tier`).
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
        }
    }

    /// Parses the shared-store string form. Unrecognized values are not an
    /// error at this layer; callers default to `Bronze` the same way
    /// `get_client_tier` does when a tier key is absent.
    pub fn parse(s: &str) -> Option<Tier> {
        match s {
            "gold" => Some(Tier::Gold),
            "silver" => Some(Tier::Silver),
            "bronze" => Some(Tier::Bronze),
            _ => None,
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Bronze
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_match_sla_ordering() {
        assert!(Tier::Gold.weight() > Tier::Silver.weight());
        assert!(Tier::Silver.weight() > Tier::Bronze.weight());
    }

    #[test]
    fn default_is_bronze() {
        assert_eq!(Tier::default(), Tier::Bronze);
    }

    #[test]
    fn round_trips_through_str() {
        for tier in [Tier::Gold, Tier::Silver, Tier::Bronze] {
            assert_eq!(Tier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(Tier::parse("platinum"), None);
    }
}
