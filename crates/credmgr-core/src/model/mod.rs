// ── Domain records ──
//
// Wire-shaped records for the three managed types. Every optional field
// is skipped when `None`, so typed writes never send explicit nulls.

mod credential;
mod entity_id;
mod identity_provider;
mod record;
mod service_provider;

pub use credential::Credential;
pub use entity_id::EntityId;
pub use identity_provider::IdentityProvider;
pub use record::{EntityKind, Record};
pub use service_provider::ServiceProvider;
