// ── Core error types ──
//
// User-facing errors from credmgr-core. Consumers never see reqwest
// errors or raw JSON failures; the `From<credmgr_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::model::EntityKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Server error key (e.g. `idexists`, `idnull`).
        key: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Attach entity context to a bare 404 coming back from the server.
    pub(crate) fn with_entity(self, kind: EntityKind, identifier: &str) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                entity_type: kind.to_string(),
                identifier: identifier.to_owned(),
            },
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<credmgr_api::Error> for CoreError {
    fn from(err: credmgr_api::Error) -> Self {
        match err {
            credmgr_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            credmgr_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        key: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            credmgr_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            credmgr_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            credmgr_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            credmgr_api::Error::Api {
                status,
                message,
                error_key,
            } => CoreError::Api {
                message,
                key: error_key,
                status: Some(status),
            },
            credmgr_api::Error::InvalidHeader { name, value } => {
                CoreError::Internal(format!("Server sent invalid `{name}` header: {value:?}"))
            }
            credmgr_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            credmgr_api::Error::Serialization(message) => {
                CoreError::Internal(format!("Serialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_404_becomes_not_found_with_entity_context() {
        let err: CoreError = credmgr_api::Error::Api {
            status: 404,
            message: "Not Found".into(),
            error_key: Some("idnotfound".into()),
        }
        .into();
        let err = err.with_entity(EntityKind::Credential, "5");
        assert_eq!(err.to_string(), "credential not found: 5");
    }

    #[test]
    fn api_error_keeps_key_and_status() {
        let err: CoreError = credmgr_api::Error::Api {
            status: 400,
            message: "A new credential cannot already have an ID".into(),
            error_key: Some("idexists".into()),
        }
        .into();
        assert!(matches!(
            err,
            CoreError::Api { ref key, status: Some(400), .. } if key.as_deref() == Some("idexists")
        ));
    }

    #[test]
    fn with_entity_leaves_other_errors_alone() {
        let err = CoreError::ValidationFailed {
            message: "x".into(),
        }
        .with_entity(EntityKind::ServiceProvider, "1");
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }
}
