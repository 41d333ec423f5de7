// ── Credential ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EntityId, EntityKind, IdentityProvider, Record, ServiceProvider};

/// A login profile bound to one identity provider and used by any number
/// of service providers.
///
/// `Debug` redacts the password; everything else prints as-is.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_provider: Option<IdentityProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_providers: Option<Vec<ServiceProvider>>,
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            id: None,
            profile: None,
            enabled: Some(false),
            username: None,
            password: None,
            identity_provider: None,
            service_providers: None,
        }
    }
}

impl Credential {
    /// Shallow reference (`{"id": ...}`) for linking from another record.
    pub fn reference(id: impl Into<EntityId>) -> Self {
        Self {
            id: Some(id.into()),
            enabled: None,
            ..Self::default()
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("profile", &self.profile)
            .field("enabled", &self.enabled)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("identity_provider", &self.identity_provider)
            .field("service_providers", &self.service_providers)
            .finish()
    }
}

impl Record for Credential {
    const KIND: EntityKind = EntityKind::Credential;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_is_disabled_and_otherwise_empty() {
        let cred = Credential::default();
        assert_eq!(cred.enabled, Some(false));
        assert_eq!(serde_json::to_value(&cred).unwrap(), json!({ "enabled": false }));
    }

    #[test]
    fn deserializes_camel_case_with_relations() {
        let cred: Credential = serde_json::from_value(json!({
            "id": 5,
            "profile": "p1",
            "enabled": true,
            "username": "u",
            "password": "pw",
            "identityProvider": { "id": 2, "name": "okta" },
            "serviceProviders": [{ "id": 3, "name": "jira" }]
        }))
        .unwrap();

        assert_eq!(cred.id, Some(EntityId::Numeric(5)));
        assert_eq!(
            cred.identity_provider.as_ref().unwrap().name.as_deref(),
            Some("okta")
        );
        assert_eq!(cred.service_providers.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn debug_redacts_password() {
        let cred = Credential {
            password: Some("hunter2".into()),
            ..Credential::default()
        };
        let debug = format!("{cred:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("****"));
    }

    #[test]
    fn reference_serializes_id_only() {
        assert_eq!(
            serde_json::to_value(Credential::reference(9_i64)).unwrap(),
            json!({ "id": 9 })
        );
    }
}
