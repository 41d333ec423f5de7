// ── Entity store state ──

use credmgr_api::PageLinks;
use serde::Serialize;

use crate::model::{EntityKind, Record};

/// Observable state of one entity store.
///
/// `loading` covers list/search/get, `updating` covers writes. Both are
/// false whenever no request is in flight. `update_success` is a one-shot
/// signal: set by a successful write, cleared when the next request starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState<R> {
    pub loading: bool,
    pub error_message: Option<String>,
    pub entities: Vec<R>,
    pub entity: R,
    pub updating: bool,
    pub total_items: u64,
    pub update_success: bool,
    pub links: PageLinks,
}

impl<R: Default> Default for EntityState<R> {
    fn default() -> Self {
        Self {
            loading: false,
            error_message: None,
            entities: Vec::new(),
            entity: R::default(),
            updating: false,
            total_items: 0,
            update_success: false,
            links: PageLinks::default(),
        }
    }
}

impl<R> EntityState<R> {
    /// Whether any request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.updating
    }
}

/// Kind-agnostic view of a store's flags, for callers that hold an
/// [`EntityKind`] rather than a concrete record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub kind: EntityKind,
    pub loading: bool,
    pub updating: bool,
    pub update_success: bool,
    pub error_message: Option<String>,
    pub total_items: u64,
    pub loaded: usize,
}

impl StoreSummary {
    pub(crate) fn of<R: Record>(state: &EntityState<R>) -> Self {
        Self {
            kind: R::KIND,
            loading: state.loading,
            updating: state.updating,
            update_success: state.update_success,
            error_message: state.error_message.clone(),
            total_items: state.total_items,
            loaded: state.entities.len(),
        }
    }
}
