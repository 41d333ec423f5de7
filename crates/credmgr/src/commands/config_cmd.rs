//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, SecretKind};
use crate::error::CliError;
use crate::output::{self, MASK};

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with every stored secret replaced by the mask.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

/// TOML-style listing of an already redacted config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "page_size = {}", cfg.defaults.page_size);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        let _ = writeln!(out, "auth_mode = \"{}\"", p.auth_mode);
        let optional = [
            ("token", p.token.clone()),
            ("token_env", p.token_env.clone()),
            ("username", p.username.clone()),
            ("password", p.password.clone()),
            ("ca_cert", p.ca_cert.as_ref().map(|c| c.display().to_string())),
        ];
        for (key, value) in optional
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
        {
            let _ = writeln!(out, "{key} = \"{value}\"");
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

fn save(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Store a secret in the keyring, or hand it back for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_secret_storage(
    profile_name: &str,
    kind: SecretKind,
    secret: String,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {}?", kind.as_str()))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_secret(profile_name, kind, &secret)?;
        eprintln!("   ✓ {} stored in system keyring", kind.as_str());
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    CliError::ProfileNotFound {
        name,
        available: config::available_profiles(cfg),
    }
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            value.parse::<url::Url>().map_err(|_| CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL: {value}"),
            })?;
            profile.server = value;
        }
        "auth_mode" | "auth-mode" => {
            if !matches!(value.as_str(), "none" | "token" | "login") {
                return Err(CliError::Validation {
                    field: "auth_mode".into(),
                    reason: "must be 'none', 'token', or 'login'".into(),
                });
            }
            profile.auth_mode = value;
        }
        "token_env" | "token-env" => profile.token_env = Some(value),
        "username" => profile.username = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: server, auth_mode, \
                     token_env, username, ca_cert, insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;
            save(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: credmgr config init");
                return Ok(());
            }
            let mut names: Vec<_> = cfg.profiles.keys().collect();
            names.sort();
            for name in names {
                let marker = if name == default { " *" } else { "" };
                println!("{name}{marker}");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            save(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }

        ConfigCommand::SetSecret => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg
                .profiles
                .get(&profile_name)
                .ok_or_else(|| profile_not_found(profile_name.clone(), &cfg))?;

            let kind = match profile.auth_mode.as_str() {
                "token" => SecretKind::Token,
                "login" => SecretKind::Password,
                other => {
                    return Err(CliError::Validation {
                        field: "auth_mode".into(),
                        reason: format!("profile '{profile_name}' uses auth mode '{other}', which has no secret"),
                    });
                }
            };

            let secret = util::prompt_secret(&format!("{}: ", kind.as_str()))?;
            config::store_secret(&profile_name, kind, &secret)?;
            output::success(
                global,
                &format!("{} stored in system keyring for profile '{profile_name}'", kind.as_str()),
            );
            Ok(())
        }
    }
}

/// Interactive wizard writing a fresh config with one profile.
fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("credmgr configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let server: String = Input::new()
        .with_prompt("Server URL")
        .default("http://localhost:8080".into())
        .validate_with(|input: &String| {
            input
                .parse::<url::Url>()
                .map(|_| ())
                .map_err(|e| format!("invalid URL: {e}"))
        })
        .interact_text()
        .map_err(prompt_err)?;

    let auth_choices = &["Bearer token", "Username/Password login", "No authentication"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        server,
        ..Profile::default()
    };

    match auth_selection {
        0 => {
            let token = util::prompt_secret("Token: ")?;
            profile.auth_mode = "token".into();
            profile.token = prompt_secret_storage(&profile_name, SecretKind::Token, token)?;
        }
        1 => {
            let username: String = Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(prompt_err)?;
            let password = util::prompt_secret("Password: ")?;
            profile.auth_mode = "login".into();
            profile.username = Some(username);
            profile.password =
                prompt_secret_storage(&profile_name, SecretKind::Password, password)?;
        }
        _ => profile.auth_mode = "none".into(),
    }

    // Keep other profiles if a config already exists
    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    save(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: credmgr credentials list");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn show_never_prints_secrets() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                server: "https://creds.example.com".into(),
                token: Some("s3cret-token".into()),
                password: Some("s3cret-pass".into()),
                username: Some("admin".into()),
                ..Profile::default()
            },
        );

        let shown = redacted(&cfg);
        let text = format_config(&shown);
        assert!(!text.contains("s3cret"));
        assert!(text.contains("token = \"****\""));
        assert!(text.contains("username = \"admin\""));

        let json = serde_json::to_string(&shown).unwrap();
        assert!(!json.contains("s3cret"));
    }

    #[test]
    fn set_validates_known_keys() {
        let mut profile = Profile::default();
        set_profile_key(&mut profile, "auth-mode", "login".into()).unwrap();
        set_profile_key(&mut profile, "timeout", "5".into()).unwrap();
        assert_eq!(profile.auth_mode, "login");
        assert_eq!(profile.timeout, Some(5));

        assert!(set_profile_key(&mut profile, "auth_mode", "oauth".into()).is_err());
        assert!(set_profile_key(&mut profile, "server", "not a url".into()).is_err());
        assert!(set_profile_key(&mut profile, "color", "red".into()).is_err());
    }
}
