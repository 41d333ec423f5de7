use thiserror::Error;

/// Top-level error type for the `credmgr-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, structured API errors, and payload (de)serialization.
/// `credmgr-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected or bearer token refused (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response, decoded from the server's problem document when present.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Machine-readable key such as `idexists` or `idnotfound`.
        error_key: Option<String>,
    },

    /// A response header was present but could not be interpreted.
    #[error("Invalid `{name}` header: {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request body could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Returns `true` if this error indicates the token is missing or expired.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 502 || *status == 503 || *status == 504,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the API error key, if available.
    pub fn error_key(&self) -> Option<&str> {
        match self {
            Self::Api { error_key, .. } => error_key.as_deref(),
            _ => None,
        }
    }
}
