// ── Core error types ──
//
// User-facing errors from lorascope-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly. The
// `From<lorascope_api::Error>` impl translates transport-layer errors
// into messages a dashboard can show as-is.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Backend errors ───────────────────────────────────────────────
    /// The backend answered with a non-2xx status. `message` is the
    /// backend's own `detail` text when it sent one.
    #[error("{message}")]
    Backend { message: String, status: u16 },

    #[error("Unexpected response from backend: {message}")]
    InvalidResponse { message: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Unknown route: {path}")]
    UnknownRoute { path: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Status code reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lorascope_api::Error> for CoreError {
    fn from(err: lorascope_api::Error) -> Self {
        match err {
            lorascope_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::InvalidResponse {
                        message: e.to_string(),
                    }
                }
            }
            lorascope_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            lorascope_api::Error::Tls(message) | lorascope_api::Error::InvalidToken(message) => {
                CoreError::Config { message }
            }
            lorascope_api::Error::Backend { status, detail } => CoreError::Backend {
                message: detail,
                status,
            },
            lorascope_api::Error::Deserialization { message, .. } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detail_is_the_whole_message() {
        let err: CoreError = lorascope_api::Error::Backend {
            status: 400,
            detail: "Dados insuficientes".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Dados insuficientes");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn bad_url_maps_to_config() {
        let parse_err = url::Url::parse("::nope").err();
        let Some(parse_err) = parse_err else {
            panic!("expected a parse error");
        };
        let err: CoreError = lorascope_api::Error::InvalidUrl(parse_err).into();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
