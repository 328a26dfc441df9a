use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A fixed table of read/write locks addressed by key.
///
/// Two keys contend only when they hash into the same shard, so writers on
/// one post (or token) do not stall callers working on another.
pub struct ShardedLocks {
    shards: Box<[RwLock<()>]>,
}

impl ShardedLocks {
    pub fn new(shards: usize) -> Self {
        Self {
            shards: (0..shards.max(1)).map(|_| RwLock::new(())).collect(),
        }
    }

    fn shard<K: Hash + ?Sized>(&self, key: &K) -> &RwLock<()> {
        let mut h = DefaultHasher::new();
        key.hash(&mut h);
        &self.shards[(h.finish() % self.shards.len() as u64) as usize]
    }

    pub async fn read<K: Hash + ?Sized>(&self, key: &K) -> RwLockReadGuard<'_, ()> {
        self.shard(key).read().await
    }

    pub async fn write<K: Hash + ?Sized>(&self, key: &K) -> RwLockWriteGuard<'_, ()> {
        self.shard(key).write().await
    }
}

impl Default for ShardedLocks {
    fn default() -> Self {
        Self::new(crate::constants::LOCK_SHARDS)
    }
}
