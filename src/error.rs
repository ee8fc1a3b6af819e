//! Error taxonomy shared by the fetch, cache and config layers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmogError {
    /// Required input missing or unusable. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// Upstream answered with a non-success status, or with a payload we
    /// cannot use (undecodable JSON, empty match list).
    #[error("OpenWeather error{}: {}", status_suffix(.status), .message)]
    Upstream { status: Option<u16>, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    /// Cache store unreachable or entry corrupt. Never fatal to a request.
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Config error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status={s})")).unwrap_or_default()
}

impl SmogError {
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        SmogError::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        SmogError::Upstream {
            status: None,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SmogError {
    fn from(e: serde_json::Error) -> Self {
        SmogError::Cache(format!("corrupt entry: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_includes_status() {
        let err = SmogError::upstream_status(401, "Invalid API key");
        assert_eq!(err.to_string(), "OpenWeather error (status=401): Invalid API key");

        let err = SmogError::malformed("empty pollution list");
        assert_eq!(err.to_string(), "OpenWeather error: empty pollution list");
    }

    #[test]
    fn test_json_errors_become_cache_errors() {
        let parse: Result<u8, _> = serde_json::from_str("not json");
        let err: SmogError = parse.unwrap_err().into();
        assert!(matches!(err, SmogError::Cache(_)));
    }
}
