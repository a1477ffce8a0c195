//! The public cache surface: `Create`, `Read`, `Update`, `Delete`.
//!
//! Every operation takes the same single [`parking_lot::Mutex`] over the
//! engine's entire state — key index, frequency index, and per-entry
//! frequency/expiry fields — for the duration of its work, including
//! eviction and event emission. This is the "single exclusion domain" the
//! cache's concurrency model is built on: it is what lets event delivery
//! order match the serial order operations were actually applied in.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::bucket::{FrequencyBucket, FrequencyIndex};
use crate::clock::{Clock, SystemClock};
use crate::entry::Entry;
use crate::error::CacheError;
use crate::event::{CacheEvent, EventBus};
use crate::slab::{Handle, Slab};

/// Returns `true` if `key` is non-empty and contains at least one
/// non-whitespace character.
fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

struct State<V> {
    entries: Slab<Entry<V>>,
    frequencies: FrequencyIndex<V>,
    keys: hashbrown::HashMap<String, Handle<Entry<V>>>,
}

impl<V> State<V> {
    fn new() -> Self {
        Self {
            entries: Slab::new(),
            frequencies: FrequencyIndex::new(),
            keys: hashbrown::HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    /// Detaches `handle` from its current bucket, collapsing the bucket if
    /// it becomes empty. Returns the anchor bucket a *new* bucket for this
    /// entry's next frequency should be linked after.
    fn detach_from_bucket(&mut self, handle: Handle<Entry<V>>) -> Option<Handle<FrequencyBucket<V>>> {
        let bucket = self.entries[handle].bucket;
        let prev_entry = self.entries[handle].prev;
        let next_entry = self.entries[handle].next;

        match prev_entry {
            Some(p) => self.entries[p].next = next_entry,
            None => self.frequencies.buckets[bucket].head = next_entry,
        }
        match next_entry {
            Some(n) => self.entries[n].prev = prev_entry,
            None => self.frequencies.buckets[bucket].tail = prev_entry,
        }

        if self.frequencies.buckets[bucket].is_empty() {
            self.frequencies.collapse_empty(bucket)
        } else {
            Some(bucket)
        }
    }

    fn attach_to_bucket_tail(&mut self, handle: Handle<Entry<V>>, bucket: Handle<FrequencyBucket<V>>) {
        let old_tail = self.frequencies.buckets[bucket].tail;
        self.entries[handle].prev = old_tail;
        self.entries[handle].next = None;
        self.entries[handle].bucket = bucket;
        match old_tail {
            Some(t) => self.entries[t].next = Some(handle),
            None => self.frequencies.buckets[bucket].head = Some(handle),
        }
        self.frequencies.buckets[bucket].tail = Some(handle);
    }

    /// Inserts a brand new entry at frequency 1 and returns its handle.
    fn insert_fresh(&mut self, key: String, value: V, now: Instant, expires_at: Option<Instant>) -> Handle<Entry<V>> {
        let bucket = self.frequencies.get_or_create_after(None, 1);
        let placeholder_bucket = bucket;
        let handle = self
            .entries
            .insert(Entry::new(key.clone(), value, now, expires_at, placeholder_bucket));
        self.attach_to_bucket_tail(handle, bucket);
        self.keys.insert(key, handle);
        handle
    }

    /// Moves `handle` from its current frequency bucket to `frequency + 1`
    /// (or, if saturated, keeps it in place but still refreshes its
    /// recency-within-bucket position by re-appending to the tail).
    fn promote(&mut self, handle: Handle<Entry<V>>) {
        let old_frequency = self.entries[handle].frequency;
        let new_frequency = old_frequency.saturating_add(1);
        self.entries[handle].frequency = new_frequency;

        if new_frequency == old_frequency {
            // Saturated: stays in the same bucket, just moves to its tail.
            let bucket = self.entries[handle].bucket;
            self.detach_from_bucket(handle);
            self.attach_to_bucket_tail(handle, bucket);
            return;
        }

        let anchor = self.detach_from_bucket(handle);
        let bucket = self.frequencies.get_or_create_after(anchor, new_frequency);
        self.attach_to_bucket_tail(handle, bucket);
    }

    /// Fully removes `handle`: unlinks it from its bucket, drops it from the
    /// key index and entry slab, and returns its key.
    fn remove_entry(&mut self, handle: Handle<Entry<V>>) -> String {
        self.detach_from_bucket(handle);
        let entry = self.entries.remove(handle);
        self.keys.remove(&entry.key);
        entry.key
    }

    /// Evicts the head of the minimum-frequency bucket. The caller must have
    /// already verified the cache is at capacity, so a non-empty bucket is
    /// guaranteed to exist (invariant I4).
    fn evict_victim(&mut self) -> String {
        let min_bucket = self
            .frequencies
            .min_bucket()
            .expect("evict_victim called while cache was not at capacity");
        let victim = self.frequencies.buckets[min_bucket]
            .head
            .expect("frequency buckets are never left empty");
        self.remove_entry(victim)
    }
}

/// A thread-safe, capacity-bounded key/value cache with approximate-LFU
/// eviction, lazy TTL expiration, and a synchronous lifecycle event bus.
///
/// # Examples
///
/// ```
/// use freqcache::CacheEngine;
/// use std::num::NonZeroUsize;
///
/// let cache: CacheEngine<i32> = CacheEngine::new(NonZeroUsize::new(2).unwrap());
/// assert!(cache.create("a", 1, None));
/// assert!(cache.create("b", 2, None));
/// assert_eq!(cache.read("a"), Some(1));
///
/// // "b" is now the only entry at frequency 1; it is evicted to make room.
/// assert!(cache.create("c", 3, None));
/// assert_eq!(cache.read("b"), None);
/// ```
pub struct CacheEngine<V> {
    capacity: NonZeroUsize,
    clock: Arc<dyn Clock>,
    events: EventBus<V>,
    state: Mutex<State<V>>,
}

impl<V> CacheEngine<V>
where
    V: Clone,
{
    /// Creates a new cache bounded to `capacity` entries, using the real
    /// system clock for TTL evaluation.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Creates a new cache from a raw `usize` capacity, failing with
    /// [`CacheError::InvalidCapacity`] if it is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, CacheError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity)?;
        Ok(Self::new(capacity))
    }

    /// Creates a new cache using a custom [`Clock`], e.g. a
    /// [`crate::clock::ManualClock`] for deterministic TTL tests.
    pub fn with_clock(capacity: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            capacity,
            clock,
            events: EventBus::new(),
            state: Mutex::new(State::new()),
        }
    }

    /// The configured maximum number of entries.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// The current number of entries in the key index. May include entries
    /// that have not yet been lazily expired.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Returns `true` if the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The event bus other code can subscribe to for lifecycle events.
    pub fn events(&self) -> &EventBus<V> {
        &self.events
    }

    fn expiry_for(&self, now: Instant, ttl_seconds: Option<u64>) -> Option<Instant> {
        ttl_seconds.map(|secs| {
            if secs == 0 {
                now
            } else {
                now + Duration::from_secs(secs)
            }
        })
    }

    /// Inserts `key` with `value` if it is not already present.
    ///
    /// Returns `false` without emitting an event if `key` is invalid
    /// (empty/whitespace) or already present. If the cache is at capacity,
    /// the least-frequency, oldest entry is evicted first and an
    /// `ItemEvicted` event is emitted before the new entry's `ItemAdded`.
    ///
    /// `ttl_seconds`: `None` means the entry never expires. `Some(0)` means
    /// it is already expired on the very next access. `Some(n)` for `n > 0`
    /// means it expires `n` seconds from now.
    pub fn create(&self, key: impl Into<String>, value: V, ttl_seconds: Option<u64>) -> bool {
        let key = key.into();
        if !is_valid_key(&key) {
            return false;
        }

        let mut state = self.state.lock();
        if state.keys.contains_key(&key) {
            return false;
        }

        if state.len() == self.capacity.get() {
            let victim_key = state.evict_victim();
            self.events.publish(CacheEvent::evicted(victim_key));
        }

        let now = self.clock.now();
        let expires_at = self.expiry_for(now, ttl_seconds);
        state.insert_fresh(key.clone(), value.clone(), now, expires_at);
        self.events.publish(CacheEvent::added(key, value));
        true
    }

    /// Returns the value for `key`, or `None` if it is invalid, absent, or
    /// has expired (in which case it is removed and an `ItemExpired` event
    /// is emitted). A successful read increments the entry's frequency and
    /// promotes it to the next frequency bucket.
    pub fn read(&self, key: &str) -> Option<V> {
        if !is_valid_key(key) {
            return None;
        }

        let mut state = self.state.lock();
        let handle = *state.keys.get(key)?;

        let now = self.clock.now();
        if state.entries[handle].is_expired_at(now) {
            let removed_key = state.remove_entry(handle);
            self.events.publish(CacheEvent::expired(removed_key));
            return None;
        }

        state.promote(handle);
        Some(state.entries[handle].value.clone())
    }

    /// Replaces the value (and, optionally, the expiry) of an existing key.
    ///
    /// Returns `false` without emitting an event if `key` is invalid or
    /// absent. If the entry is found expired, it is removed, an
    /// `ItemExpired` event is emitted, and `false` is returned — the update
    /// does not resurrect an expired entry. Frequency and bucket position
    /// are left untouched by a successful update.
    ///
    /// `ttl_seconds` follows `create`'s convention, with one addition:
    /// passing `None` preserves the entry's current expiry instead of
    /// clearing it.
    pub fn update(&self, key: &str, value: V, ttl_seconds: Option<u64>) -> bool {
        if !is_valid_key(key) {
            return false;
        }

        let mut state = self.state.lock();
        let Some(&handle) = state.keys.get(key) else {
            return false;
        };

        let now = self.clock.now();
        if state.entries[handle].is_expired_at(now) {
            let removed_key = state.remove_entry(handle);
            self.events.publish(CacheEvent::expired(removed_key));
            return false;
        }

        state.entries[handle].value = value.clone();
        if let Some(ttl_seconds) = ttl_seconds {
            state.entries[handle].expires_at = self.expiry_for(now, Some(ttl_seconds));
        }

        self.events.publish(CacheEvent::updated(key.to_string(), value));
        true
    }

    /// Removes `key` unconditionally.
    ///
    /// Returns `false` without emitting an event if `key` is invalid or
    /// absent. Always emits `ItemRemoved`, even if the entry had already
    /// expired — deleting is the caller's explicit intent, which takes
    /// precedence over the entry's lazily-observed expiry.
    pub fn delete(&self, key: &str) -> bool {
        if !is_valid_key(key) {
            return false;
        }

        let mut state = self.state.lock();
        let Some(&handle) = state.keys.get(key) else {
            return false;
        };

        state.remove_entry(handle);
        self.events.publish(CacheEvent::removed(key.to_string()));
        true
    }
}

impl<V> std::fmt::Debug for CacheEngine<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEngine")
            .field("capacity", &self.capacity)
            .field("len", &self.state.lock().len())
            .finish()
    }
}
