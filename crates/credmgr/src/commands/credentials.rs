//! Credential rows, detail view, and flag mapping.

use std::path::Path;

use tabled::Tabled;

use credmgr_core::{Credential, EntityId, IdentityProvider, ServiceProvider};

use super::entity::{EntityView, FieldArgs};
use super::util;
use crate::cli::CredentialFields;
use crate::error::CliError;
use crate::output::{self, MASK};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct CredentialRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Profile")]
    profile: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Identity Provider")]
    identity_provider: String,
}

fn provider_label(idp: &IdentityProvider) -> String {
    match (&idp.name, &idp.id) {
        (Some(name), _) => name.clone(),
        (None, Some(id)) => id.to_string(),
        (None, None) => "-".into(),
    }
}

fn masked(password: Option<&str>) -> String {
    password.map_or_else(|| "-".into(), |_| MASK.into())
}

impl EntityView for Credential {
    type Row = CredentialRow;
    const LABEL: &'static str = "credential";

    fn row(&self) -> CredentialRow {
        CredentialRow {
            id: self.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            profile: output::or_dash(self.profile.as_deref()),
            username: output::or_dash(self.username.as_deref()),
            password: masked(self.password.as_deref()),
            enabled: self
                .enabled
                .map_or_else(|| "-".into(), |e| if e { "yes" } else { "no" }.into()),
            identity_provider: self
                .identity_provider
                .as_ref()
                .map_or_else(|| "-".into(), provider_label),
        }
    }

    fn detail(&self) -> String {
        let service_providers = match self.service_providers.as_deref() {
            None | Some([]) => "-".into(),
            Some(sps) => sps
                .iter()
                .map(|sp| {
                    sp.name
                        .clone()
                        .or_else(|| sp.id.as_ref().map(ToString::to_string))
                        .unwrap_or_else(|| "?".into())
                })
                .collect::<Vec<_>>()
                .join(", "),
        };
        output::detail_lines(&[
            ("ID", self.id.as_ref().map_or_else(|| "-".into(), ToString::to_string)),
            ("Profile", output::or_dash(self.profile.as_deref())),
            ("Enabled", self.enabled.map_or_else(|| "-".into(), |e| e.to_string())),
            ("Username", output::or_dash(self.username.as_deref())),
            ("Password", masked(self.password.as_deref())),
            (
                "Identity Provider",
                self.identity_provider
                    .as_ref()
                    .map_or_else(|| "-".into(), provider_label),
            ),
            ("Service Providers", service_providers),
        ])
    }

    fn patch_base(id: EntityId) -> Self {
        Self::reference(id)
    }
}

impl FieldArgs<Credential> for CredentialFields {
    fn from_file(&self) -> Option<&Path> {
        self.from_file.as_deref()
    }

    fn apply(self, record: &mut Credential) -> Result<(), CliError> {
        if let Some(profile) = self.profile_name {
            record.profile = Some(profile);
        }
        if let Some(username) = self.username {
            record.username = Some(username);
        }
        if self.ask_password {
            record.password = Some(util::prompt_secret("Credential password: ")?);
        } else if let Some(password) = self.password {
            record.password = Some(password);
        }
        if let Some(enabled) = self.enabled {
            record.enabled = Some(enabled);
        }
        if let Some(idp) = self.identity_provider {
            record.identity_provider = Some(IdentityProvider::reference(idp.as_str()));
        }
        if !self.service_provider.is_empty() {
            record.service_providers = Some(
                self.service_provider
                    .iter()
                    .map(|id| ServiceProvider::reference(id.as_str()))
                    .collect(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields() -> CredentialFields {
        CredentialFields {
            from_file: None,
            profile_name: None,
            username: None,
            password: None,
            ask_password: false,
            enabled: None,
            identity_provider: None,
            service_provider: Vec::new(),
        }
    }

    #[test]
    fn row_masks_password() {
        let cred = Credential {
            id: Some(EntityId::from(3_i64)),
            username: Some("alice".into()),
            password: Some("hunter2".into()),
            ..Credential::default()
        };
        let row = cred.row();
        assert_eq!(row.password, MASK);
        assert!(!cred.detail().contains("hunter2"));
    }

    #[test]
    fn flags_overlay_only_given_fields() {
        let mut cred = Credential {
            profile: Some("p1".into()),
            username: Some("alice".into()),
            ..Credential::default()
        };
        let args = CredentialFields {
            username: Some("bob".into()),
            identity_provider: Some("7".into()),
            service_provider: vec!["1".into(), "okta-sp".into()],
            ..fields()
        };
        args.apply(&mut cred).unwrap();

        assert_eq!(cred.profile.as_deref(), Some("p1"));
        assert_eq!(cred.username.as_deref(), Some("bob"));
        assert_eq!(
            cred.identity_provider.unwrap().id,
            Some(EntityId::Numeric(7))
        );
        let sps = cred.service_providers.unwrap();
        assert_eq!(sps[1].id, Some(EntityId::Key("okta-sp".into())));
    }

    #[test]
    fn debug_masks_password_flag() {
        let args = CredentialFields {
            password: Some("hunter2".into()),
            ..fields()
        };
        let printed = format!("{args:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("****"));
    }

    #[test]
    fn patch_base_carries_only_the_id() {
        let base = Credential::patch_base(EntityId::from(4_i64));
        assert_eq!(
            serde_json::to_value(&base).unwrap(),
            serde_json::json!({ "id": 4 })
        );
    }
}
