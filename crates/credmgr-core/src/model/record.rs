// ── Record abstraction ──
//
// Everything the generic store needs to know about a record type: where
// it lives on the server, what it is called in action names, and how to
// read its identifier.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::EntityId;

/// The three managed record types.
///
/// Parses from the entity name (`identityProvider`), the resource path
/// (`identity-providers`), or the singular kebab form (`identity-provider`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum EntityKind {
    #[strum(to_string = "credential", serialize = "credentials")]
    Credential,
    #[strum(
        to_string = "identityProvider",
        serialize = "identity-providers",
        serialize = "identity-provider"
    )]
    IdentityProvider,
    #[strum(
        to_string = "serviceProvider",
        serialize = "service-providers",
        serialize = "service-provider"
    )]
    ServiceProvider,
}

impl EntityKind {
    /// Path segment under `/api/`.
    pub fn resource_path(self) -> &'static str {
        match self {
            Self::Credential => "credentials",
            Self::IdentityProvider => "identity-providers",
            Self::ServiceProvider => "service-providers",
        }
    }

    /// Camel-case name used as the action-name prefix.
    pub fn entity_name(self) -> &'static str {
        self.into()
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.entity_name())
    }
}

/// A record type managed by an [`EntityStore`](crate::store::EntityStore).
///
/// `Default` is the type's documented empty value: what `reset()` and a
/// successful delete leave in the focused slot.
pub trait Record:
    Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;

    fn id(&self) -> Option<&EntityId>;

    fn set_id(&mut self, id: EntityId);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn kinds_parse_from_every_spelling() {
        for (raw, kind) in [
            ("credential", EntityKind::Credential),
            ("credentials", EntityKind::Credential),
            ("identityProvider", EntityKind::IdentityProvider),
            ("identity-providers", EntityKind::IdentityProvider),
            ("identity-provider", EntityKind::IdentityProvider),
            ("serviceProvider", EntityKind::ServiceProvider),
            ("service-providers", EntityKind::ServiceProvider),
        ] {
            assert_eq!(raw.parse::<EntityKind>().unwrap(), kind, "{raw}");
        }
        assert!("users".parse::<EntityKind>().is_err());
    }

    #[test]
    fn display_is_entity_name() {
        assert_eq!(EntityKind::IdentityProvider.to_string(), "identityProvider");
        assert_eq!(EntityKind::ServiceProvider.entity_name(), "serviceProvider");
    }

    #[test]
    fn resource_paths_are_distinct() {
        let paths: Vec<_> = EntityKind::iter().map(EntityKind::resource_path).collect();
        assert_eq!(
            paths,
            vec!["credentials", "identity-providers", "service-providers"]
        );
    }
}
