// ── Service provider ──

use serde::{Deserialize, Serialize};

use super::{Credential, EntityId, EntityKind, Record};

/// An application that consumes a credential.
///
/// The server owns the relation from this side: `credential` is the
/// credential the provider is linked to, and a credential's
/// `serviceProviders` is the inverse view of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Box<Credential>>,
}

impl ServiceProvider {
    pub fn reference(id: impl Into<EntityId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

impl Record for ServiceProvider {
    const KIND: EntityKind = EntityKind::ServiceProvider;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
