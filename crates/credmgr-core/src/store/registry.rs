// ── Store registry ──
//
// Owns one store per entity kind over a shared API client. Built once
// at startup and handed to whatever drives the stores.

use std::sync::Arc;

use credmgr_api::{ApiClient, ListQuery};
use secrecy::ExposeSecret;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use super::{EntityStore, StoreSummary};
use crate::config::{AuthCredentials, ClientConfig};
use crate::error::CoreError;
use crate::model::{Credential, EntityKind, IdentityProvider, ServiceProvider};

/// The three entity stores, sharing one authenticated client.
pub struct StoreRegistry {
    api: Arc<ApiClient>,
    credentials: EntityStore<Credential>,
    identity_providers: EntityStore<IdentityProvider>,
    service_providers: EntityStore<ServiceProvider>,
}

impl StoreRegistry {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            credentials: EntityStore::new(Arc::clone(&api)),
            identity_providers: EntityStore::new(Arc::clone(&api)),
            service_providers: EntityStore::new(Arc::clone(&api)),
            api,
        }
    }

    /// Build the HTTP client from `config` and authenticate it.
    ///
    /// `Login` credentials are exchanged for a bearer token up front, so
    /// a bad password fails here rather than on the first store call.
    pub async fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.url.as_str(), &config.transport())?;
        debug!(url = %api.base_url(), "api client ready");

        match &config.auth {
            AuthCredentials::None => {}
            AuthCredentials::Bearer(token) => {
                if token.expose_secret().is_empty() {
                    return Err(CoreError::Config {
                        message: "bearer token is empty".into(),
                    });
                }
                api.set_token(token.clone());
            }
            AuthCredentials::Login { username, password } => {
                api.authenticate(username, password).await?;
                info!(%username, "authenticated");
            }
        }

        Ok(Self::new(Arc::new(api)))
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    // ── Typed accessors ──────────────────────────────────────────────

    pub fn credentials(&self) -> &EntityStore<Credential> {
        &self.credentials
    }

    pub fn identity_providers(&self) -> &EntityStore<IdentityProvider> {
        &self.identity_providers
    }

    pub fn service_providers(&self) -> &EntityStore<ServiceProvider> {
        &self.service_providers
    }

    // ── Kind-keyed access ────────────────────────────────────────────

    pub fn summary(&self, kind: EntityKind) -> StoreSummary {
        match kind {
            EntityKind::Credential => self.credentials.summary(),
            EntityKind::IdentityProvider => self.identity_providers.summary(),
            EntityKind::ServiceProvider => self.service_providers.summary(),
        }
    }

    pub fn summaries(&self) -> Vec<StoreSummary> {
        EntityKind::iter().map(|kind| self.summary(kind)).collect()
    }

    /// Re-list one kind with default paging. Typically called after a write
    /// to a related kind, since stores never refresh each other.
    pub async fn refresh(&self, kind: EntityKind) -> Result<u64, CoreError> {
        let query = ListQuery::default();
        match kind {
            EntityKind::Credential => self.credentials.list(&query).await,
            EntityKind::IdentityProvider => self.identity_providers.list(&query).await,
            EntityKind::ServiceProvider => self.service_providers.list(&query).await,
        }
    }

    pub fn reset_all(&self) {
        self.credentials.reset();
        self.identity_providers.reset();
        self.service_providers.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use credmgr_api::TransportConfig;

    use super::*;

    fn registry() -> StoreRegistry {
        let api = ApiClient::new("http://localhost:8080", &TransportConfig::default()).unwrap();
        StoreRegistry::new(Arc::new(api))
    }

    #[test]
    fn summary_is_looked_up_by_name() {
        let registry = registry();
        let kind: EntityKind = "identity-providers".parse().unwrap();
        let summary = registry.summary(kind);
        assert_eq!(summary.kind, EntityKind::IdentityProvider);
        assert!(!summary.loading);
        assert_eq!(summary.total_items, 0);
    }

    #[test]
    fn summaries_cover_every_kind() {
        let kinds: Vec<_> = registry().summaries().into_iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Credential,
                EntityKind::IdentityProvider,
                EntityKind::ServiceProvider
            ]
        );
    }

    #[test]
    fn reset_all_restores_defaults() {
        let registry = registry();
        registry.reset_all();
        assert_eq!(registry.credentials().snapshot().entity, Credential::default());
    }
}
