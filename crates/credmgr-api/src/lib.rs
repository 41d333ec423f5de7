// credmgr-api: Async Rust client for the credential management REST API

pub mod auth;
pub mod body;
pub mod client;
pub mod error;
pub mod pagination;
pub mod query;
pub mod transport;

pub use body::strip_nulls;
pub use client::{ApiClient, Listing};
pub use error::Error;
pub use pagination::PageLinks;
pub use query::ListQuery;
pub use transport::{TlsMode, TransportConfig};
