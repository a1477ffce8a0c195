//! Frequency buckets and the ascending `FrequencyIndex`.
//!
//! A [`FrequencyBucket`] groups every entry currently sharing one frequency
//! count, oldest-first. Buckets themselves form a doubly linked list kept in
//! strictly ascending frequency order with no empty bucket ever left behind
//! (invariant I4), so the minimum-frequency bucket is always reachable in
//! O(1) via `FrequencyIndex::min_bucket`.

use crate::entry::Entry;
use crate::slab::{Handle, Slab};

/// A group of entries that currently share one access frequency.
pub(crate) struct FrequencyBucket<V> {
    pub frequency: u64,
    pub head: Option<Handle<Entry<V>>>,
    pub tail: Option<Handle<Entry<V>>>,
    pub prev_bucket: Option<Handle<FrequencyBucket<V>>>,
    pub next_bucket: Option<Handle<FrequencyBucket<V>>>,
}

impl<V> FrequencyBucket<V> {
    pub fn new(frequency: u64) -> Self {
        Self {
            frequency,
            head: None,
            tail: None,
            prev_bucket: None,
            next_bucket: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// The ascending-by-frequency doubly linked list of buckets, plus an O(1)
/// frequency-to-bucket lookup used to decide "create a new bucket" versus
/// "append to the one that already exists".
pub(crate) struct FrequencyIndex<V> {
    pub buckets: Slab<FrequencyBucket<V>>,
    by_frequency: hashbrown::HashMap<u64, Handle<FrequencyBucket<V>>>,
    min: Option<Handle<FrequencyBucket<V>>>,
}

impl<V> FrequencyIndex<V> {
    pub fn new() -> Self {
        Self {
            buckets: Slab::new(),
            by_frequency: hashbrown::HashMap::new(),
            min: None,
        }
    }

    /// The bucket with the smallest frequency currently present, if any.
    pub fn min_bucket(&self) -> Option<Handle<FrequencyBucket<V>>> {
        self.min
    }

    pub fn frequency_of(&self, bucket: Handle<FrequencyBucket<V>>) -> u64 {
        self.buckets[bucket].frequency
    }

    pub fn bucket_for_frequency(&self, frequency: u64) -> Option<Handle<FrequencyBucket<V>>> {
        self.by_frequency.get(&frequency).copied()
    }

    /// Returns the bucket for `frequency`, creating and linking it
    /// immediately after `anchor` if it doesn't exist yet. `anchor = None`
    /// means "insert as the new head of the whole list".
    pub fn get_or_create_after(
        &mut self,
        anchor: Option<Handle<FrequencyBucket<V>>>,
        frequency: u64,
    ) -> Handle<FrequencyBucket<V>> {
        if let Some(existing) = self.by_frequency.get(&frequency) {
            return *existing;
        }

        let next = match anchor {
            Some(a) => self.buckets[a].next_bucket,
            None => self.min,
        };

        let handle = self.buckets.insert(FrequencyBucket {
            frequency,
            head: None,
            tail: None,
            prev_bucket: anchor,
            next_bucket: next,
        });

        match anchor {
            Some(a) => self.buckets[a].next_bucket = Some(handle),
            None => self.min = Some(handle),
        }
        if let Some(n) = next {
            self.buckets[n].prev_bucket = Some(handle);
        }

        self.by_frequency.insert(frequency, handle);
        handle
    }

    /// Unlinks and frees an empty bucket, reconnecting its neighbors.
    ///
    /// Returns the bucket's former predecessor, which is the correct anchor
    /// for inserting whatever bucket should now occupy its old position.
    pub fn collapse_empty(
        &mut self,
        bucket: Handle<FrequencyBucket<V>>,
    ) -> Option<Handle<FrequencyBucket<V>>> {
        debug_assert!(self.buckets[bucket].is_empty());
        let prev = self.buckets[bucket].prev_bucket;
        let next = self.buckets[bucket].next_bucket;

        match prev {
            Some(p) => self.buckets[p].next_bucket = next,
            None => self.min = next,
        }
        if let Some(n) = next {
            self.buckets[n].prev_bucket = prev;
        }

        let frequency = self.buckets[bucket].frequency;
        self.by_frequency.remove(&frequency);
        self.buckets.remove(bucket);
        prev
    }
}

impl<V> Default for FrequencyIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}
