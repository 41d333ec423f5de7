// ── Generic entity store ──
//
// One list plus one focused record per entity type, kept in a watch
// channel. Every operation walks the same three transitions: begin
// (clear error and success, raise the in-flight flag), then either
// success (lower the flag, apply the result) or failure (lower the flag,
// record the message, touch nothing else).

use std::sync::Arc;

use credmgr_api::{ApiClient, ListQuery, Listing};
use tokio::sync::watch;
use tracing::{Instrument, Span, debug, info_span, warn};

use super::action::Action;
use super::state::{EntityState, StoreSummary};
use crate::error::CoreError;
use crate::model::{EntityId, EntityKind, Record};
use crate::stream::EntityStateStream;

/// Client-side cache and request driver for one record type.
pub struct EntityStore<R: Record> {
    api: Arc<ApiClient>,
    state: watch::Sender<EntityState<R>>,
}

impl<R: Record> EntityStore<R> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(EntityState::default());
        Self { api, state }
    }

    pub fn kind(&self) -> EntityKind {
        R::KIND
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Clone of the current state.
    pub fn snapshot(&self) -> EntityState<R> {
        self.state.borrow().clone()
    }

    /// Subscribe to every state transition from now on.
    pub fn subscribe(&self) -> EntityStateStream<R> {
        EntityStateStream::new(self.state.subscribe())
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary::of(&*self.state.borrow())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch one page of records into `entities`.
    pub async fn list(&self, query: &ListQuery) -> Result<u64, CoreError> {
        let action = Action::FetchEntityList;
        async {
            self.begin(action);
            let result = self
                .api
                .list::<R>(R::KIND.resource_path(), query)
                .await
                .map_err(CoreError::from);
            self.finish(action, result, apply_listing)
                .map(|listing| listing.total_count)
        }
        .instrument(Self::span(action))
        .await
    }

    /// Run a full-text search; results land in `entities` like a list.
    pub async fn search(&self, text: &str, query: &ListQuery) -> Result<u64, CoreError> {
        let action = Action::SearchEntity;
        async {
            self.begin(action);
            let result = self
                .api
                .search::<R>(R::KIND.resource_path(), text, query)
                .await
                .map_err(CoreError::from);
            self.finish(action, result, apply_listing)
                .map(|listing| listing.total_count)
        }
        .instrument(Self::span(action))
        .await
    }

    /// Fetch one record into `entity`.
    pub async fn get(&self, id: &EntityId) -> Result<R, CoreError> {
        let action = Action::FetchEntity;
        async {
            self.begin(action);
            let id = id.to_string();
            let result = self
                .api
                .get::<R>(R::KIND.resource_path(), &id)
                .await
                .map_err(|e| CoreError::from(e).with_entity(R::KIND, &id));
            self.finish(action, result, |state, record: &R| {
                state.entity = record.clone();
            })
        }
        .instrument(Self::span(action))
        .await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Create a record; the server assigns its id.
    pub async fn create(&self, record: &R) -> Result<R, CoreError> {
        let action = Action::CreateEntity;
        let saved = async {
            self.begin(action);
            let result = self
                .api
                .create::<R, R>(R::KIND.resource_path(), record)
                .await
                .map_err(CoreError::from);
            self.finish(action, result, |state, saved: &R| {
                state.entity = saved.clone();
            })
        }
        .instrument(Self::span(action))
        .await?;

        self.refresh_after_write().await;
        Ok(saved)
    }

    /// Replace a record (`PUT`). The record must carry its id.
    pub async fn update(&self, record: &R) -> Result<R, CoreError> {
        let action = Action::UpdateEntity;
        let saved = async {
            self.begin(action);
            let result = match Self::require_id(record) {
                Ok(id) => self
                    .api
                    .update::<R, R>(R::KIND.resource_path(), &id, record)
                    .await
                    .map_err(|e| CoreError::from(e).with_entity(R::KIND, &id)),
                Err(err) => Err(err),
            };
            self.finish(action, result, |state, saved: &R| {
                state.entity = saved.clone();
            })
        }
        .instrument(Self::span(action))
        .await?;

        self.refresh_after_write().await;
        Ok(saved)
    }

    /// Merge-patch a record (`PATCH`). Only the fields that are set are
    /// sent; the record must carry its id.
    pub async fn partial_update(&self, record: &R) -> Result<R, CoreError> {
        let action = Action::PartialUpdateEntity;
        let saved = async {
            self.begin(action);
            let result = match Self::require_id(record) {
                Ok(id) => self
                    .api
                    .partial_update::<R, R>(R::KIND.resource_path(), &id, record)
                    .await
                    .map_err(|e| CoreError::from(e).with_entity(R::KIND, &id)),
                Err(err) => Err(err),
            };
            self.finish(action, result, |state, saved: &R| {
                state.entity = saved.clone();
            })
        }
        .instrument(Self::span(action))
        .await?;

        self.refresh_after_write().await;
        Ok(saved)
    }

    /// Delete a record and clear the focused slot.
    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let action = Action::DeleteEntity;
        async {
            self.begin(action);
            let id = id.to_string();
            let result = self
                .api
                .delete(R::KIND.resource_path(), &id)
                .await
                .map_err(|e| CoreError::from(e).with_entity(R::KIND, &id));
            self.finish(action, result, |state, _: &()| {
                // Back to the type default; a Credential reads `enabled: false`
                state.entity = R::default();
            })
        }
        .instrument(Self::span(action))
        .await?;

        self.refresh_after_write().await;
        Ok(())
    }

    /// Restore `entity` to the type default. Flags and the list are kept.
    pub fn reset(&self) {
        let _span = Self::span(Action::Reset).entered();
        self.state.send_modify(|state| state.entity = R::default());
        debug!("entity reset");
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn span(action: Action) -> Span {
        info_span!("store", action = %action.qualified(R::KIND))
    }

    fn begin(&self, action: Action) {
        self.state.send_modify(|state| {
            state.error_message = None;
            state.update_success = false;
            if action.is_write() {
                state.updating = true;
            } else {
                state.loading = true;
            }
        });
    }

    fn finish<T>(
        &self,
        action: Action,
        result: Result<T, CoreError>,
        apply: impl FnOnce(&mut EntityState<R>, &T),
    ) -> Result<T, CoreError> {
        match result {
            Ok(value) => {
                self.state.send_modify(|state| {
                    if action.is_write() {
                        state.updating = false;
                        apply(state, &value);
                        // The follow-up list starts in the same transition,
                        // so it does not swallow the success signal.
                        state.update_success = true;
                        state.loading = true;
                    } else {
                        state.loading = false;
                        apply(state, &value);
                    }
                });
                debug!("succeeded");
                Ok(value)
            }
            Err(err) => {
                self.state.send_modify(|state| {
                    if action.is_write() {
                        state.updating = false;
                    } else {
                        state.loading = false;
                    }
                    state.error_message = Some(err.to_string());
                });
                debug!(error = %err, "failed");
                Err(err)
            }
        }
    }

    /// Re-list with default paging after a successful write. A failure is
    /// recorded in state but never fails the write that triggered it.
    async fn refresh_after_write(&self) {
        let action = Action::FetchEntityList;
        async {
            let result = self
                .api
                .list::<R>(R::KIND.resource_path(), &ListQuery::default())
                .await
                .map_err(CoreError::from);
            if let Err(err) = self.finish(action, result, apply_listing) {
                warn!(error = %err, "refresh after write failed");
            }
        }
        .instrument(Self::span(action))
        .await;
    }

    fn require_id(record: &R) -> Result<String, CoreError> {
        record
            .id()
            .map(ToString::to_string)
            .ok_or_else(|| CoreError::ValidationFailed {
                message: format!("{} has no id; it must be created first", R::KIND),
            })
    }
}

fn apply_listing<R: Clone>(state: &mut EntityState<R>, listing: &Listing<R>) {
    state.entities.clone_from(&listing.items);
    state.total_items = listing.total_count;
    state.links = listing.links;
}
