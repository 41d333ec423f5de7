// ── Store actions ──

use strum::{Display, EnumIter, IntoStaticStr};

use crate::model::EntityKind;

/// Every operation an entity store performs.
///
/// Combined with the entity name this yields the action name recorded on
/// each tracing span, e.g. `identityProvider/fetch_entity_list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    FetchEntityList,
    SearchEntity,
    FetchEntity,
    CreateEntity,
    UpdateEntity,
    PartialUpdateEntity,
    DeleteEntity,
    Reset,
}

impl Action {
    /// Mutations toggle `updating`; reads toggle `loading`.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Self::CreateEntity | Self::UpdateEntity | Self::PartialUpdateEntity | Self::DeleteEntity
        )
    }

    /// `<entityName>/<action>`.
    pub fn qualified(self, kind: EntityKind) -> String {
        format!("{}/{self}", kind.entity_name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn action_names_are_unique_across_kinds() {
        let names: HashSet<String> = EntityKind::iter()
            .flat_map(|kind| Action::iter().map(move |a| a.qualified(kind)))
            .collect();
        assert_eq!(names.len(), EntityKind::iter().count() * Action::iter().count());
        assert!(names.contains("identityProvider/fetch_entity_list"));
        assert!(names.contains("credential/partial_update_entity"));
    }

    #[test]
    fn only_mutations_are_writes() {
        let writes: Vec<_> = Action::iter().filter(|a| a.is_write()).collect();
        assert_eq!(
            writes,
            vec![
                Action::CreateEntity,
                Action::UpdateEntity,
                Action::PartialUpdateEntity,
                Action::DeleteEntity
            ]
        );
    }
}
