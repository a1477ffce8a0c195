//! Error types raised by cache construction.
//!
//! Runtime operations (`create`/`read`/`update`/`delete`) never fail with an
//! error: outcomes are encoded as `bool`/`Option<V>` return values, per the
//! engine's propagation policy. Only constructing a cache with an invalid
//! capacity is a programmer error worth raising.

/// Errors raised by [`crate::CacheEngine`] construction.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// `capacity` was zero. A cache that can hold nothing is not useful and
    /// would make every `Create` evict the entry it just inserted.
    #[error("cache capacity must be at least 1")]
    InvalidCapacity,
}
