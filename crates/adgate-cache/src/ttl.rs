use std::time::Duration;

/// Per-service TTLs for the shared tier, matching
/// `original_source/core/cache.py::TTL_BY_SERVICE`. Reporting data churns
/// fastest; customer metadata barely changes within a day.
pub fn ttl_for_service(service: &str) -> Duration {
    let seconds = match service {
        "reporting" => 300,
        "campaign" => 1800,
        "keyword" => 900,
        "budget" => 3600,
        "customer" => 86_400,
        _ => 300,
    };
    Duration::from_secs(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_services_match_the_documented_table() {
        assert_eq!(ttl_for_service("reporting"), Duration::from_secs(300));
        assert_eq!(ttl_for_service("campaign"), Duration::from_secs(1800));
        assert_eq!(ttl_for_service("keyword"), Duration::from_secs(900));
        assert_eq!(ttl_for_service("budget"), Duration::from_secs(3600));
        assert_eq!(ttl_for_service("customer"), Duration::from_secs(86_400));
    }

    #[test]
    fn unknown_service_falls_back_to_the_default() {
        assert_eq!(ttl_for_service("anything-else"), Duration::from_secs(300));
    }
}
