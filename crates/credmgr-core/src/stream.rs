// ── Reactive state streams ──
//
// Subscription type for consuming store transitions.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Record;
use crate::store::EntityState;

/// A subscription to one entity store.
///
/// Provides both point-in-time snapshot access and change notification via
/// `changed()` or by converting to a `Stream`. Like any `watch` receiver it
/// coalesces: a slow reader sees the latest state, not every intermediate one.
pub struct EntityStateStream<R: Record> {
    current: EntityState<R>,
    receiver: watch::Receiver<EntityState<R>>,
}

impl<R: Record> EntityStateStream<R> {
    pub(crate) fn new(mut receiver: watch::Receiver<EntityState<R>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// State captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &EntityState<R> {
        &self.current
    }

    /// Latest state (may have changed since creation).
    pub fn latest(&self) -> EntityState<R> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next transition, returning the new state.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<EntityState<R>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The first item is the state at the time of conversion.
    pub fn into_stream(self) -> EntityWatchStream<R> {
        EntityWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct EntityWatchStream<R: Record> {
    inner: WatchStream<EntityState<R>>,
}

impl<R: Record> Stream for EntityWatchStream<R> {
    type Item = EntityState<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
