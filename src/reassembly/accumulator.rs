//! Storage back-ends for in-flight messages.
//!
//! A [`KeyedAccumulator`] hands out exclusive access to one entry at a time
//! while leaving unrelated entries free for other callers. Two stores are
//! provided: [`LockedAccumulator`] guards the whole map with a single mutex,
//! [`ShardedAccumulator`] relies on `dashmap` shard locks.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use bytes::{Bytes, BytesMut};
use dashmap::DashMap;

use crate::fragment::MessageId;

/// Accumulation state for one in-flight message.
#[derive(Debug, Default)]
pub struct PartialMessage {
    buffer: BytesMut,
    highest_chunk_seen: i32,
}

impl PartialMessage {
    /// Append `payload` when `chunk` is above the watermark.
    ///
    /// Returns `false`, leaving the entry untouched, when `chunk` is at or
    /// below the highest chunk already accepted.
    pub fn accept(&mut self, chunk: i32, payload: &[u8]) -> bool {
        if self.highest_chunk_seen >= chunk {
            return false;
        }
        self.buffer.extend_from_slice(payload);
        self.highest_chunk_seen = chunk;
        true
    }

    /// Highest chunk ordinal accepted so far, or zero for a fresh entry.
    #[must_use]
    pub const fn highest_chunk_seen(&self) -> i32 { self.highest_chunk_seen }

    /// Number of bytes buffered so far.
    #[must_use]
    pub fn len(&self) -> usize { self.buffer.len() }

    /// Return `true` when nothing has been buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Append the final payload and return the complete message bytes.
    #[must_use]
    pub fn finish(mut self, payload: &[u8]) -> Bytes {
        self.buffer.extend_from_slice(payload);
        self.buffer.freeze()
    }
}

/// Concurrent map from message identity to [`PartialMessage`].
///
/// Implementations must run `with_entry` closures with exclusive access to
/// the entry, and `take` must remove an entry atomically with respect to
/// `with_entry` on the same key.
pub trait KeyedAccumulator: Send + Sync {
    /// Run `f` against the entry for `key`, creating an empty entry first if
    /// none exists.
    fn with_entry<R>(&self, key: &MessageId, f: impl FnOnce(&mut PartialMessage) -> R) -> R;

    /// Remove and return the entry for `key`.
    fn take(&self, key: &MessageId) -> Option<PartialMessage>;

    /// Return `true` when an entry exists for `key`.
    fn contains(&self, key: &MessageId) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Return `true` when no message is in flight.
    fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Accumulator guarded by one table-wide mutex.
#[derive(Debug, Default)]
pub struct LockedAccumulator(Mutex<HashMap<MessageId, PartialMessage>>);

impl LockedAccumulator {
    // Every update is a single append plus watermark store; a poisoned map
    // still holds consistent entries.
    fn lock(&self) -> MutexGuard<'_, HashMap<MessageId, PartialMessage>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyedAccumulator for LockedAccumulator {
    fn with_entry<R>(&self, key: &MessageId, f: impl FnOnce(&mut PartialMessage) -> R) -> R {
        let mut entries = self.lock();
        f(entries.entry(key.clone()).or_default())
    }

    fn take(&self, key: &MessageId) -> Option<PartialMessage> { self.lock().remove(key) }

    fn contains(&self, key: &MessageId) -> bool { self.lock().contains_key(key) }

    fn len(&self) -> usize { self.lock().len() }
}

/// Accumulator backed by a sharded concurrent map.
///
/// Fragments of messages hashed to different shards never contend.
#[derive(Debug, Default)]
pub struct ShardedAccumulator(DashMap<MessageId, PartialMessage>);

impl KeyedAccumulator for ShardedAccumulator {
    fn with_entry<R>(&self, key: &MessageId, f: impl FnOnce(&mut PartialMessage) -> R) -> R {
        let mut entry = self.0.entry(key.clone()).or_default();
        f(entry.value_mut())
    }

    fn take(&self, key: &MessageId) -> Option<PartialMessage> {
        self.0.remove(key).map(|(_, partial)| partial)
    }

    fn contains(&self, key: &MessageId) -> bool { self.0.contains_key(key) }

    fn len(&self) -> usize { self.0.len() }
}
