//! A thread-safe, in-memory key/value cache with approximate-LFU eviction,
//! optional per-entry time-to-live, and a synchronous lifecycle event bus.
//!
//! # What this crate is for
//!
//! [`CacheEngine`] gives you O(1) Create/Read/Update/Delete, O(1) eviction
//! decisions under a frequency ordering, lazy TTL expiration that never
//! returns an expired value, and an [`EventBus`] that reports every
//! terminal state change (added, updated, removed, evicted, expired) in the
//! exact order the operations that produced them were serialized.
//!
//! It does not implement a wire protocol, a request-verb dispatcher, or
//! process bootstrapping (logging/config) for a server around it — those
//! are left to the caller, by design.
//!
//! # How eviction works
//!
//! Entries are grouped into buckets by access frequency. `Create` starts an
//! entry at frequency 1; a successful `Read` bumps its frequency and moves
//! it to the next bucket. When the cache is full, `Create` evicts the
//! oldest entry in the *lowest* frequency bucket — classic O(1)
//! approximate-LFU, with insertion age as the only tie-breaker.
//!
//! ```
//! use freqcache::CacheEngine;
//! use std::num::NonZeroUsize;
//!
//! let cache: CacheEngine<&str> = CacheEngine::new(NonZeroUsize::new(3).unwrap());
//! cache.create("a", "alpha", None);
//! cache.create("b", "beta", None);
//! cache.create("c", "gamma", None);
//!
//! // "a" becomes more frequently used than "b" or "c".
//! cache.read("a");
//! cache.read("a");
//!
//! // Capacity is full, so inserting "d" evicts "b" (oldest at frequency 1).
//! cache.create("d", "delta", None);
//! assert_eq!(cache.read("b"), None);
//! assert_eq!(cache.read("a"), Some("alpha"));
//! ```
//!
//! # TTL
//!
//! Expiration is lazy: nothing sweeps the cache in the background. A `Read`
//! or `Update` that finds an entry past its expiry removes it on the spot
//! and reports `ItemExpired` instead of returning the stale value.
//!
//! ```
//! use freqcache::CacheEngine;
//! use freqcache::clock::ManualClock;
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let cache: CacheEngine<i32> =
//!     CacheEngine::with_clock(NonZeroUsize::new(10).unwrap(), clock.clone());
//!
//! cache.create("session", 1, Some(60)); // expires in 60 seconds
//! assert_eq!(cache.read("session"), Some(1));
//!
//! clock.advance(Duration::from_secs(61));
//! assert_eq!(cache.read("session"), None);
//! ```
//!
//! # Subscribing to events
//!
//! ```
//! use freqcache::CacheEngine;
//! use std::num::NonZeroUsize;
//! use std::sync::{Arc, Mutex};
//!
//! let cache: CacheEngine<i32> = CacheEngine::new(NonZeroUsize::new(2).unwrap());
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_in_handler = Arc::clone(&seen);
//! cache.events().subscribe(move |event| {
//!     seen_in_handler.lock().unwrap().push(event.kind);
//! });
//!
//! cache.create("a", 1, None);
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! ```
//!
//! # Thread safety
//!
//! `CacheEngine` is `Send + Sync` (for `V: Send + Sync`) and is designed to
//! be wrapped in an `Arc` and shared across threads without any external
//! locking: every operation, including eviction and event delivery, takes
//! the engine's own internal mutex for its full duration.
//!
//! # Modules
//!
//! - [`CacheEngine`]: the Create/Read/Update/Delete surface.
//! - [`event`]: `CacheEvent`, `CacheEventKind`, and `EventBus`.
//! - [`clock`]: the injectable `Clock` trait, `SystemClock`, and `ManualClock`.
//! - [`error`]: `CacheError`, raised only by invalid construction.
//!
//! The entry record, frequency buckets, and the slab arena that backs them
//! are internal implementation details, not part of the public API.

mod bucket;
pub mod clock;
mod entry;
pub mod error;
pub mod event;
mod slab;

mod engine;

pub use engine::CacheEngine;
pub use error::CacheError;
pub use event::{CacheEvent, CacheEventKind, EventBus};
