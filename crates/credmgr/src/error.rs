//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use credmgr_config::ConfigError;
use credmgr_core::{CoreError, EntityKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(credmgr::connection_failed),
        help(
            "Check that the server is running and accessible.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(credmgr::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(credmgr::auth_failed),
        help(
            "Verify the token or login credentials for profile '{profile}'.\n\
             Run: credmgr config set-secret --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(credmgr::no_credentials),
        help(
            "Configure credentials with: credmgr config init\n\
             Or set the CREDMGR_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(credmgr::not_found),
        help("Run: credmgr {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(credmgr::api_error))]
    ApiError {
        message: String,
        key: Option<String>,
        status: Option<u16>,
    },

    #[error("Internal error: {0}")]
    #[diagnostic(code(credmgr::internal))]
    Internal(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(credmgr::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(credmgr::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: credmgr config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(credmgr::no_config),
        help(
            "Create one with: credmgr config init\n\
             Expected at: {path}\n\
             Or pass --server for a one-off request."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(credmgr::config))]
    Config(Box<figment::Error>),

    #[error("Configuration error: {message}")]
    #[diagnostic(code(credmgr::config))]
    ConfigFile { message: String },

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(credmgr::keyring),
        help("No usable system keyring? Store the secret in the config file or an env var instead.")
    )]
    Keyring(#[from] keyring::Error),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(credmgr::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(credmgr::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(credmgr::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::Timeout { url } => CliError::Timeout { url },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let list_command = entity_type
                    .parse::<EntityKind>()
                    .map_or_else(|_| "--help".into(), |kind| format!("{} list", kind.resource_path()));
                CliError::NotFound {
                    resource_type: entity_type,
                    identifier,
                    list_command,
                }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api {
                message,
                key,
                status,
            } => CliError::ApiError {
                message,
                key,
                status,
            },

            CoreError::Config { message } => CliError::ConfigFile { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: credmgr config profiles)".into(),
            },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Keyring(err) => CliError::Keyring(err),
            ConfigError::Io(err) => CliError::Io(err),
            ConfigError::Serialization(err) => CliError::ConfigFile {
                message: err.to_string(),
            },
        }
    }
}
