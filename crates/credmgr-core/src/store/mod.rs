// ── Entity stores ──
//
// One generic store per record type, plus the registry that owns them.

mod action;
mod entity_store;
mod registry;
mod state;

pub use action::Action;
pub use entity_store::EntityStore;
pub use registry::StoreRegistry;
pub use state::{EntityState, StoreSummary};
