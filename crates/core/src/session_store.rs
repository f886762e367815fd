//! In-memory registry of generated questions awaiting answers.
//!
//! Entries are spread across independently locked shards keyed by question
//! id, so inserts and lookups for unrelated questions do not contend. The
//! registry is bounded: entries older than the TTL are invisible to readers
//! and purged by [`SessionStore::sweep`] or when a shard reaches capacity,
//! at which point the oldest live entries are evicted as well. Each shard
//! keeps its entries indexed by serve time, so both purges pop from the
//! oldest end instead of scanning the shard.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use chrono::Utc;

use crate::types::{DbId, Timestamp};

/// Generated question ids start above this value so they never collide with
/// stored question ids for any realistic table size.
pub const QUESTION_ID_OFFSET: DbId = 100_000;

/// Default total number of live entries.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Default lifetime of an entry, measured from its serve time.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Default number of shards.
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// What is needed to evaluate a later answer to a generated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub correct_answer_name: String,
    pub served_at: Timestamp,
}

/// Sizing and lifetime of a [`SessionStore`].
#[derive(Debug, Clone, Copy)]
pub struct SessionStoreConfig {
    pub capacity: usize,
    pub ttl: chrono::Duration,
    pub shard_count: usize,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: chrono::Duration::seconds(DEFAULT_TTL_SECS),
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

/// One shard: contexts by id plus `(served_at, id)` pairs in age order.
/// Both collections always hold the same ids.
#[derive(Debug, Default)]
struct Shard {
    entries: HashMap<DbId, SessionContext>,
    by_age: BTreeSet<(Timestamp, DbId)>,
}

impl Shard {
    fn insert(&mut self, id: DbId, ctx: SessionContext) {
        self.remove(id);
        self.by_age.insert((ctx.served_at, id));
        self.entries.insert(id, ctx);
    }

    fn remove(&mut self, id: DbId) -> Option<SessionContext> {
        let ctx = self.entries.remove(&id)?;
        self.by_age.remove(&(ctx.served_at, id));
        Some(ctx)
    }

    /// Remove the oldest entry if `evict` accepts its serve time.
    fn pop_oldest_if(&mut self, evict: impl Fn(Timestamp) -> bool) -> Option<DbId> {
        let &(served_at, id) = self.by_age.first()?;
        if !evict(served_at) {
            return None;
        }
        self.by_age.pop_first();
        self.entries.remove(&id);
        Some(id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Sharded, bounded session registry plus the question id allocator.
#[derive(Debug)]
pub struct SessionStore {
    shards: Box<[RwLock<Shard>]>,
    shard_capacity: usize,
    ttl: chrono::Duration,
    last_id: AtomicI64,
}

impl SessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        let shard_count = config.shard_count.max(1);
        let shard_capacity = config.capacity.div_ceil(shard_count).max(1);
        let shards = (0..shard_count)
            .map(|_| RwLock::new(Shard::default()))
            .collect();

        Self {
            shards,
            shard_capacity,
            ttl: config.ttl,
            last_id: AtomicI64::new(QUESTION_ID_OFFSET),
        }
    }

    /// Allocate the next question id. Ids are unique and increasing across
    /// all callers; the first id is `QUESTION_ID_OFFSET + 1`.
    pub fn next_id(&self) -> DbId {
        self.last_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn shard(&self, id: DbId) -> &RwLock<Shard> {
        let idx = id.rem_euclid(self.shards.len() as i64) as usize;
        &self.shards[idx]
    }

    fn write(shard: &RwLock<Shard>) -> RwLockWriteGuard<'_, Shard> {
        // Shard updates cannot panic between the two collections, so a
        // poisoned lock still guards consistent data.
        shard.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, served_at: Timestamp, now: Timestamp) -> bool {
        now - served_at > self.ttl
    }

    /// Register the context of a freshly generated question.
    pub fn insert(&self, id: DbId, ctx: SessionContext) {
        self.insert_at(id, ctx, Utc::now());
    }

    /// [`Self::insert`] with an explicit notion of "now" for eviction.
    pub fn insert_at(&self, id: DbId, ctx: SessionContext, now: Timestamp) {
        let mut shard = Self::write(self.shard(id));
        shard.remove(id);

        if shard.len() >= self.shard_capacity {
            while shard
                .pop_oldest_if(|served_at| self.is_expired(served_at, now))
                .is_some()
            {}

            while shard.len() >= self.shard_capacity {
                match shard.pop_oldest_if(|_| true) {
                    Some(key) => {
                        tracing::debug!(question_id = key, "Evicted oldest session context");
                    }
                    None => break,
                }
            }
        }

        shard.insert(id, ctx);
    }

    /// Look up a live context.
    pub fn get(&self, id: DbId) -> Option<SessionContext> {
        self.get_at(id, Utc::now())
    }

    /// [`Self::get`] with an explicit notion of "now" for expiry.
    pub fn get_at(&self, id: DbId, now: Timestamp) -> Option<SessionContext> {
        let shard = self
            .shard(id)
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        shard
            .entries
            .get(&id)
            .filter(|ctx| !self.is_expired(ctx.served_at, now))
            .cloned()
    }

    /// Purge expired entries from every shard. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    pub fn sweep_at(&self, now: Timestamp) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                let mut shard = Self::write(shard);
                let mut removed = 0;
                while shard
                    .pop_oldest_if(|served_at| self.is_expired(served_at, now))
                    .is_some()
                {
                    removed += 1;
                }
                removed
            })
            .sum()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionStoreConfig::default())
    }
}
