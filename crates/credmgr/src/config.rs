//! CLI configuration: thin wrapper around `credmgr_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--server, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use credmgr_config::ConfigError;
use credmgr_core::{AuthCredentials, ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use credmgr_config::{
    Config, Defaults, Profile, SecretKind, config_path, load_config, load_config_or_default,
    save_config, store_secret,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build the `ClientConfig` for a command run.
///
/// With a matching profile, flags override profile values. Without one,
/// `--server` alone is enough: auth comes from `--token` or is anonymous.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => return resolve_profile(profile, name, global, &cfg.defaults),
        Err(ConfigError::UnknownProfile { name }) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            });
        }
        Err(_) => {}
    }

    let url_str = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let mut client = ClientConfig::new(parse_server(url_str)?);
    client.auth = global
        .token
        .as_ref()
        .map_or(AuthCredentials::None, |t| {
            AuthCredentials::Bearer(SecretString::from(t.clone()))
        });
    if global.insecure || cfg.defaults.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    client.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    Ok(client)
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// Flags are folded into a copy of the profile before the shared
/// resolution runs; `--token` replaces the profile's auth entirely.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<ClientConfig, CliError> {
    let mut effective = profile.clone();
    if let Some(ref server) = global.server {
        effective.server.clone_from(server);
    }
    if global.insecure {
        effective.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        effective.timeout = Some(timeout);
    }
    if global.token.is_some() {
        effective.auth_mode = "none".into();
    }

    let mut client = credmgr_config::profile_to_client_config(&effective, profile_name, defaults)?;
    if let Some(ref token) = global.token {
        client.auth = AuthCredentials::Bearer(SecretString::from(token.clone()));
    }
    Ok(client)
}

fn parse_server(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["credmgr"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "profiles"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn login_config() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                server: "https://creds.example.com".into(),
                auth_mode: "login".into(),
                timeout: Some(10),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile_values() {
        let opts = global(&["--server", "http://localhost:9000", "-k", "--timeout", "3", "--token", "t"]);
        let client = build_client_config(&opts, &login_config()).unwrap();

        assert_eq!(client.url.as_str(), "http://localhost:9000/");
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(client.timeout, Duration::from_secs(3));
        // --token wins even though the login profile has no credentials
        assert!(matches!(client.auth, AuthCredentials::Bearer(_)));
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let mut cfg = login_config();
        if let Some(profile) = cfg.profiles.get_mut("default") {
            profile.auth_mode = "none".into();
        }
        let client = build_client_config(&global(&[]), &cfg).unwrap();

        assert_eq!(client.url.host_str(), Some("creds.example.com"));
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert!(matches!(client.auth, AuthCredentials::None));
    }

    #[test]
    fn explicit_unknown_profile_is_an_error() {
        let err = build_client_config(&global(&["--profile", "nope"]), &login_config()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "nope"));
    }

    #[test]
    fn missing_profile_without_server_points_at_config() {
        let err = build_client_config(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
