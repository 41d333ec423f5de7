// ── Identity provider ──

use serde::{Deserialize, Serialize};

use super::{EntityId, EntityKind, Record};

/// An identity provider that credentials authenticate against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl IdentityProvider {
    pub fn reference(id: impl Into<EntityId>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }
}

impl Record for IdentityProvider {
    const KIND: EntityKind = EntityKind::IdentityProvider;

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
