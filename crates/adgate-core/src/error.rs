//! The error taxonomy shared by every component of the admission pipeline.
//!
//! A closed set of kinds, each with a stable code, an HTTP status, and a
//! `retryable` bit. The retry wrapper in `adgate-pipeline` and the (external,
//! out of scope) HTTP surface are both driven purely by these two fields; no
//! component interprets upstream error strings directly outside
//! [`map_upstream`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The kind of failure, independent of where it originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Authentication,
    Authorization,
    Quota,
    RateLimit,
    Validation,
    NotFound,
    Conflict,
    Timeout,
    CircuitBreaker,
    ExternalApi,
    Internal,
}

impl ErrorKind {
    /// The HTTP status this kind maps to when surfaced over the (external)
    /// HTTP interface.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::Authentication => 401,
            ErrorKind::Authorization => 403,
            ErrorKind::Quota => 429,
            ErrorKind::RateLimit => 429,
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Timeout => 504,
            ErrorKind::CircuitBreaker => 503,
            ErrorKind::ExternalApi => 502,
            ErrorKind::Internal => 500,
        }
    }

    /// Whether this kind is retryable *in general* — a property of the kind
    /// itself, independent of the narrower eligibility rule the Operation
    /// Pipeline's retry wrapper applies (see `adgate-pipeline::retry`, which
    /// additionally restricts retrying to `RateLimit`/`ExternalApi`).
    pub fn default_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Quota | ErrorKind::RateLimit | ErrorKind::Timeout | ErrorKind::CircuitBreaker
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::Quota => "quota",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Timeout => "timeout",
            ErrorKind::CircuitBreaker => "circuit_breaker",
            ErrorKind::ExternalApi => "external_api",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// A typed error carrying a stable code, message, HTTP status, retryable
/// bit, and optional structured details.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
    pub details: BTreeMap<String, Value>,
}

impl Error {
    fn new(kind: ErrorKind, code: &'static str, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            retryable,
            details: BTreeMap::new(),
        }
    }

    /// Attaches a structured detail field, builder-style.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, "AUTH_FAILED", message, false)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, "PERMISSION_DENIED", message, false)
    }

    pub fn quota(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Quota, "QUOTA_EXCEEDED", message, true)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimit, "RATE_LIMIT_EXCEEDED", message, true)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, "VALIDATION_ERROR", message, false)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, "NOT_FOUND", message, false)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, "CONFLICT", message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, "TIMEOUT", message, true)
    }

    pub fn circuit_breaker(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CircuitBreaker, "CIRCUIT_BREAKER_OPEN", message, true)
    }

    pub fn external_api(message: impl Into<String>, retryable: bool) -> Self {
        Self::new(ErrorKind::ExternalApi, "EXTERNAL_API_ERROR", message, retryable)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, "INTERNAL_ERROR", message, false)
    }

    /// Maps an upstream error code (as reported by the injected
    /// `UpstreamApi` capability) to the taxonomy above.
    ///
    /// Unknown codes fall back to `ExternalApi` with `retryable=false`,
    /// matching `original_source/core/errors.py::map_google_ads_exception`'s
    /// `GOOGLE_ADS_ERROR_MAP.get(error_code, ExternalAPIError)` default.
    pub fn map_upstream(upstream_code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match upstream_code {
            "AUTHENTICATION_ERROR" => Self::authentication(message),
            "AUTHORIZATION_ERROR" => Self::authorization(message),
            "QUOTA_ERROR" | "RESOURCE_EXHAUSTED" => Self::quota(message),
            "RATE_LIMIT_ERROR" => Self::rate_limit(message),
            "INVALID_ARGUMENT" => Self::validation(message),
            "NOT_FOUND" => Self::not_found(message),
            "ALREADY_EXISTS" => Self::conflict(message),
            "DEADLINE_EXCEEDED" => Self::timeout(message),
            "INTERNAL_ERROR" => Self::internal(message),
            "UNAVAILABLE" => Self::external_api(message, true)
                .with_detail("upstream_code", upstream_code.to_string()),
            other => Self::external_api(message, false).with_detail("upstream_code", other.to_string()),
        }
    }

    /// The wire shape for the (external) HTTP surface:
    /// `{category, code, message, retryable, details?}`.
    pub fn to_wire(&self) -> ErrorWire<'_> {
        ErrorWire {
            category: self.kind,
            code: self.code,
            message: &self.message,
            retryable: self.retryable,
            details: if self.details.is_empty() {
                None
            } else {
                Some(&self.details)
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorWire<'a> {
    pub category: ErrorKind,
    pub code: &'a str,
    pub message: &'a str,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a BTreeMap<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_documented_kinds() {
        let cases: &[(&str, ErrorKind, bool)] = &[
            ("AUTHENTICATION_ERROR", ErrorKind::Authentication, false),
            ("AUTHORIZATION_ERROR", ErrorKind::Authorization, false),
            ("QUOTA_ERROR", ErrorKind::Quota, true),
            ("RESOURCE_EXHAUSTED", ErrorKind::Quota, true),
            ("RATE_LIMIT_ERROR", ErrorKind::RateLimit, true),
            ("INVALID_ARGUMENT", ErrorKind::Validation, false),
            ("NOT_FOUND", ErrorKind::NotFound, false),
            ("ALREADY_EXISTS", ErrorKind::Conflict, false),
            ("DEADLINE_EXCEEDED", ErrorKind::Timeout, true),
            ("INTERNAL_ERROR", ErrorKind::Internal, false),
            ("UNAVAILABLE", ErrorKind::ExternalApi, true),
        ];
        for (code, kind, retryable) in cases {
            let err = Error::map_upstream(code, "boom");
            assert_eq!(err.kind, *kind, "code {code}");
            assert_eq!(err.retryable, *retryable, "code {code}");
        }
    }

    #[test]
    fn unknown_code_defaults_to_external_api_non_retryable() {
        let err = Error::map_upstream("SOMETHING_NEW", "boom");
        assert_eq!(err.kind, ErrorKind::ExternalApi);
        assert!(!err.retryable);
        assert_eq!(err.code, "EXTERNAL_API_ERROR");
    }

    #[test]
    fn http_status_matches_taxonomy() {
        assert_eq!(Error::quota("x").http_status(), 429);
        assert_eq!(Error::timeout("x").http_status(), 504);
        assert_eq!(Error::circuit_breaker("x").http_status(), 503);
        assert_eq!(Error::external_api("x", false).http_status(), 502);
    }

    #[test]
    fn wire_shape_omits_empty_details() {
        let err = Error::validation("bad field");
        let wire = err.to_wire();
        assert!(wire.details.is_none());
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("details").is_none());
    }
}
