use serde::{Deserialize, Serialize};

/// Unified error type for all Mail-in-a-Box API operations.
///
/// Variants carry the context needed to report the failure without
/// re-deriving it at the call site. All variants are serializable for
/// structured error reporting.
///
/// # Local vs. remote failures
///
/// [`Validation`](Self::Validation) and [`Format`](Self::Format) are raised
/// before any network traffic happens. Everything else describes a failed
/// round trip: transport problems ([`Network`](Self::Network),
/// [`Timeout`](Self::Timeout)), a non-200 status ([`Http`](Self::Http)), an
/// unreadable body ([`Decode`](Self::Decode)), or a 200 response whose body
/// does not carry the expected success marker
/// ([`UnexpectedResponse`](Self::UnexpectedResponse)).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum Error {
    /// An input failed validation before any request was made.
    Validation {
        /// Name of the offending parameter (e.g. `"qname"`).
        field: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection
    /// refused, broken transfer, etc.).
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The server answered with a non-200 status.
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text, empty if the server sent none.
        body: String,
    },

    /// Failed to parse a response body.
    Decode {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize an entity for output rendering.
    Serialization {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The server answered 200 but the body does not start with the
    /// expected success marker.
    UnexpectedResponse {
        /// The body that was received instead.
        body: String,
    },

    /// An unrecognized output format token.
    Format {
        /// The token that was not recognized.
        token: String,
    },
}

impl Error {
    /// Whether the error reflects expected conditions (bad user input, a
    /// denied request) rather than an infrastructure failure. Used to pick
    /// the log level: `warn` when `true`, `error` otherwise.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Format { .. } | Self::Http { .. }
        )
    }

    /// Shortcut for a [`Validation`](Self::Validation) error.
    pub(crate) fn validation(field: &str, detail: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, detail } => {
                write!(f, "invalid '{field}': {detail}")
            }
            Self::Network { detail } => {
                write!(f, "network error: {detail}")
            }
            Self::Timeout { detail } => {
                write!(f, "request timeout: {detail}")
            }
            Self::Http { status, body } => {
                if body.is_empty() {
                    write!(f, "response error ({status})")
                } else {
                    write!(f, "response error ({status}): {body}")
                }
            }
            Self::Decode { detail } => {
                write!(f, "decode error: {detail}")
            }
            Self::Serialization { detail } => {
                write!(f, "serialization error: {detail}")
            }
            Self::UnexpectedResponse { body } => {
                write!(f, "unexpected response body: {body}")
            }
            Self::Format { token } => {
                write!(f, "'{token}' is not a supported output format")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_validation() {
        let e = Error::validation("qname", "'qname' seems to be invalid");
        assert_eq!(
            e.to_string(),
            "invalid 'qname': 'qname' seems to be invalid"
        );
    }

    #[test]
    fn display_network() {
        let e = Error::Network {
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "network error: connection refused");
    }

    #[test]
    fn display_timeout() {
        let e = Error::Timeout {
            detail: "30s elapsed".to_string(),
        };
        assert_eq!(e.to_string(), "request timeout: 30s elapsed");
    }

    #[test]
    fn display_http_with_body() {
        let e = Error::Http {
            status: 503,
            body: "No Gateway".to_string(),
        };
        assert_eq!(e.to_string(), "response error (503): No Gateway");
    }

    #[test]
    fn display_http_without_body() {
        let e = Error::Http {
            status: 503,
            body: String::new(),
        };
        assert_eq!(e.to_string(), "response error (503)");
    }

    #[test]
    fn display_decode() {
        let e = Error::Decode {
            detail: "expected value at line 1".to_string(),
        };
        assert_eq!(e.to_string(), "decode error: expected value at line 1");
    }

    #[test]
    fn display_unexpected_response() {
        let e = Error::UnexpectedResponse {
            body: "nothing to do".to_string(),
        };
        assert_eq!(e.to_string(), "unexpected response body: nothing to do");
    }

    #[test]
    fn display_format() {
        let e = Error::Format {
            token: "xml".to_string(),
        };
        assert_eq!(e.to_string(), "'xml' is not a supported output format");
    }

    #[test]
    fn expected_errors() {
        assert!(Error::validation("url", "bad").is_expected());
        assert!(Error::Format {
            token: "xml".into()
        }
        .is_expected());
        assert!(Error::Http {
            status: 403,
            body: String::new()
        }
        .is_expected());
        assert!(!Error::Network {
            detail: "down".into()
        }
        .is_expected());
        assert!(!Error::Decode {
            detail: "bad json".into()
        }
        .is_expected());
    }

    #[test]
    fn serialize_json_round_trip() {
        let e = Error::Http {
            status: 404,
            body: "Not Found".to_string(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"Http\""));
        assert!(json.contains("\"status\":404"));

        let back: Error = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), e.to_string());
    }

    #[test]
    fn deserialize_all_variants() {
        let variants: Vec<Error> = vec![
            Error::Validation {
                field: "qname".into(),
                detail: "bad".into(),
            },
            Error::Network { detail: "d".into() },
            Error::Timeout { detail: "d".into() },
            Error::Http {
                status: 500,
                body: "oops".into(),
            },
            Error::Decode { detail: "d".into() },
            Error::Serialization { detail: "d".into() },
            Error::UnexpectedResponse { body: "b".into() },
            Error::Format {
                token: "xml".into(),
            },
        ];

        for v in &variants {
            let json = serde_json::to_string(v).unwrap();
            let back: Error = serde_json::from_str(&json).unwrap();
            assert_eq!(back.to_string(), v.to_string());
        }
    }
}
