// credmgr-core: Entity stores between credmgr-api and consumers (CLI).

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ClientConfig, TlsVerification};
pub use error::CoreError;
pub use store::{Action, EntityState, EntityStore, StoreRegistry, StoreSummary};
pub use stream::{EntityStateStream, EntityWatchStream};

pub use model::{Credential, EntityId, EntityKind, IdentityProvider, Record, ServiceProvider};

// Request-shaping types consumers pass straight through.
pub use credmgr_api::{ListQuery, PageLinks};
