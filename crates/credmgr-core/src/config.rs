// ── Runtime connection configuration ──
//
// These types describe *how* to reach the credential server. They carry
// credential data and connection tuning, but never touch disk. The CLI
// builds a `ClientConfig` and hands it to `StoreRegistry::connect`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the server.
#[derive(Debug, Clone, Default)]
pub enum AuthCredentials {
    /// Anonymous access (servers with security disabled).
    #[default]
    None,
    /// Pre-issued JWT sent as `Authorization: Bearer`.
    Bearer(SecretString),
    /// Username/password exchanged once for a bearer token.
    Login {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for credmgr_api::TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to one server.
///
/// Built by the CLI; core never reads config files.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root (e.g. `https://creds.example.com`); `/api/` is appended.
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            auth: AuthCredentials::None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> credmgr_api::TransportConfig {
        credmgr_api::TransportConfig {
            tls: (&self.tls).into(),
            timeout: self.timeout,
        }
    }
}
