//! The lifecycle event pipeline.
//!
//! Every terminal state change an entry goes through — creation, update,
//! deletion, eviction, expiration — produces a [`CacheEvent`] that is
//! delivered synchronously to every subscriber, in subscription order, from
//! inside the engine's exclusion domain. This is what gives observers the
//! same serial ordering the engine itself observed.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::SystemTime;

use parking_lot::Mutex;

/// The kind of lifecycle transition a [`CacheEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEventKind {
    /// A new key was inserted via `Create`.
    ItemAdded,
    /// An existing key's value or expiry was replaced via `Update`.
    ItemUpdated,
    /// A key was removed via `Delete` (including deletes of an
    /// already-expired entry — see [`crate::CacheEngine::delete`]).
    ItemRemoved,
    /// A key was evicted to make room for a `Create` that would have
    /// exceeded capacity.
    ItemEvicted,
    /// A key was found expired on access and removed before the access
    /// could observe it.
    ItemExpired,
}

/// A single reported lifecycle transition.
///
/// `value` is populated for `ItemAdded`/`ItemUpdated` and empty otherwise.
/// `reason` is populated for `ItemEvicted` and always contains the
/// substrings `"LFU"` and `"frequency"`. `timestamp` is wall-clock time,
/// taken at the moment the event was constructed — not the monotonic clock
/// the engine uses for TTL comparisons.
#[derive(Debug, Clone)]
pub struct CacheEvent<V> {
    pub kind: CacheEventKind,
    pub key: String,
    pub value: Option<V>,
    pub reason: Option<String>,
    pub timestamp: SystemTime,
}

/// The literal eviction reason mandated by the cache's eviction contract:
/// it must contain the substrings `"LFU"` and `"frequency"`.
pub const EVICTION_REASON: &str = "LFU: lowest frequency bucket, oldest entry";

impl<V> CacheEvent<V> {
    pub(crate) fn added(key: String, value: V) -> Self {
        Self {
            kind: CacheEventKind::ItemAdded,
            key,
            value: Some(value),
            reason: None,
            timestamp: SystemTime::now(),
        }
    }

    pub(crate) fn updated(key: String, value: V) -> Self {
        Self {
            kind: CacheEventKind::ItemUpdated,
            key,
            value: Some(value),
            reason: None,
            timestamp: SystemTime::now(),
        }
    }

    pub(crate) fn removed(key: String) -> Self {
        Self {
            kind: CacheEventKind::ItemRemoved,
            key,
            value: None,
            reason: None,
            timestamp: SystemTime::now(),
        }
    }

    pub(crate) fn evicted(key: String) -> Self {
        Self {
            kind: CacheEventKind::ItemEvicted,
            key,
            value: None,
            reason: Some(EVICTION_REASON.to_string()),
            timestamp: SystemTime::now(),
        }
    }

    pub(crate) fn expired(key: String) -> Self {
        Self {
            kind: CacheEventKind::ItemExpired,
            key,
            value: None,
            reason: None,
            timestamp: SystemTime::now(),
        }
    }
}

type Subscriber<V> = Box<dyn Fn(&CacheEvent<V>) + Send + Sync>;

/// A synchronous, multi-subscriber notifier of [`CacheEvent`]s.
///
/// The subscriber list is guarded by its own lock, independent of the
/// engine's state lock, so handlers can be registered at any time —
/// including while other threads are mid-operation on the cache. Delivery
/// itself, however, always happens while the publishing operation still
/// holds the engine's state lock, which is what guarantees subscribers see
/// events in the exact order the underlying operations were serialized.
pub struct EventBus<V> {
    subscribers: Mutex<Vec<Subscriber<V>>>,
}

impl<V> EventBus<V> {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new subscriber. Returns nothing to unregister by design:
    /// the engine does not support unsubscribing mid-flight.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&CacheEvent<V>) + Send + Sync + 'static,
    {
        self.subscribers.lock().push(Box::new(handler));
    }

    /// Returns the number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub(crate) fn publish(&self, event: CacheEvent<V>) {
        let subscribers = self.subscribers.lock();
        for subscriber in subscribers.iter() {
            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber(&event)));
            if outcome.is_err() {
                tracing::warn!(
                    key = %event.key,
                    kind = ?event.kind,
                    "cache event subscriber panicked; delivery continues for remaining subscribers"
                );
            }
        }
    }
}

impl<V> fmt::Debug for EventBus<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<V> Default for EventBus<V> {
    fn default() -> Self {
        Self::new()
    }
}
