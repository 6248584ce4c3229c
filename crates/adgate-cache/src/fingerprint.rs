/// Builds the cache key for one request, matching
/// `original_source/core/cache.py::CacheManager.build_cache_key`:
/// `client:{tenant}:{op}:` followed by the request's parameters as
/// `k=v` pairs, sorted by key and joined with `:` — so parameter order at
/// the call site never affects the key.
pub fn fingerprint(tenant: &str, op: &str, params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    let mut key = format!("client:{tenant}:{op}:");
    key.push_str(&pairs.join(":"));
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_params_regardless_of_call_order() {
        let a = fingerprint("acme", "reporting", &[("start", "2026-01-01"), ("end", "2026-01-31")]);
        let b = fingerprint("acme", "reporting", &[("end", "2026-01-31"), ("start", "2026-01-01")]);
        assert_eq!(a, b);
        assert_eq!(a, "client:acme:reporting:end=2026-01-31:start=2026-01-01");
    }

    #[test]
    fn distinguishes_tenants_and_operations() {
        let a = fingerprint("acme", "campaign", &[("id", "1")]);
        let b = fingerprint("other", "campaign", &[("id", "1")]);
        let c = fingerprint("acme", "keyword", &[("id", "1")]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
