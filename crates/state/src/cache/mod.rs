//! Checkpointable write-back cache.
//!
//! A [`CheckpointCache`] keeps three things apart:
//!
//! * clean entries mirroring the backing store, held in a [`BackingKind`] structure that may
//!   forget entries at will,
//! * dirty entries written since the last [`flush`](CheckpointCache::flush), never evicted,
//! * a stack of diff maps, one per open checkpoint, holding the value each key had before it was
//!   first written at that height.
//!
//! Reverting replays the top diff map onto the dirty set. Committing folds the top diff map into
//! the one below it, keeping the older entry when both hold the same key, so an outer revert
//! still sees the value from before the outer checkpoint.
mod backing;

pub use backing::BackingKind;

use backing::Backing;
use core::hash::Hash;
use primitives::BTreeMap;

/// Result of a cache read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<V> {
    /// The key holds a value.
    Present(V),
    /// The key is known not to exist.
    Absent,
    /// The cache has no information, the backing store must be asked.
    Unknown,
}

impl<V> Lookup<V> {
    /// Converts a known result into an `Option`, `None` for [`Lookup::Unknown`].
    pub fn known(self) -> Option<Option<V>> {
        match self {
            Self::Present(value) => Some(Some(value)),
            Self::Absent => Some(None),
            Self::Unknown => None,
        }
    }
}

/// Misuse of the checkpoint protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// `commit` or `revert` without an open checkpoint.
    #[error("no open checkpoint")]
    NoCheckpoint,
    /// `flush` while checkpoints are still open.
    #[error("cannot flush with {0} open checkpoint(s)")]
    OpenCheckpoints(usize),
}

/// Value of a key before its first write at some checkpoint height.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Prior<V> {
    /// The key was dirty with this value (`None` = deleted).
    Dirty(Option<V>),
    /// The key was not dirty; its value lives in the clean layer or the store.
    Clean,
}

/// Layered cache with exact checkpoint revert.
#[derive(Debug)]
pub struct CheckpointCache<K: Hash + Eq, V> {
    clean: Backing<K, V>,
    dirty: BTreeMap<K, Option<V>>,
    diffs: Vec<BTreeMap<K, Prior<V>>>,
}

impl<K: Ord + Hash + Clone, V: Clone> Default for CheckpointCache<K, V> {
    fn default() -> Self {
        Self::new(BackingKind::Ordered)
    }
}

impl<K: Ord + Hash + Clone, V: Clone> CheckpointCache<K, V> {
    /// Creates an empty cache with the given clean-entry structure.
    pub fn new(kind: BackingKind) -> Self {
        Self {
            clean: Backing::new(kind),
            dirty: BTreeMap::new(),
            diffs: Vec::new(),
        }
    }

    /// Reads the current value of `key`.
    pub fn get(&mut self, key: &K) -> Lookup<V> {
        if let Some(value) = self.dirty.get(key) {
            return match value {
                Some(value) => Lookup::Present(value.clone()),
                None => Lookup::Absent,
            };
        }
        self.get_clean(key)
    }

    /// Reads `key` as of the last flush, ignoring pending writes.
    pub fn get_clean(&mut self, key: &K) -> Lookup<V> {
        match self.clean.get(key) {
            Some(Some(value)) => Lookup::Present(value.clone()),
            Some(None) => Lookup::Absent,
            None => Lookup::Unknown,
        }
    }

    /// Records a value fetched from the backing store.
    ///
    /// Must only be called for keys that read as [`Lookup::Unknown`] in the clean layer.
    pub fn fill(&mut self, key: K, value: Option<V>) {
        self.clean.insert(key, value);
    }

    /// Writes `value` under `key`.
    pub fn put(&mut self, key: K, value: V) {
        self.capture(&key);
        self.dirty.insert(key, Some(value));
    }

    /// Deletes `key`.
    pub fn del(&mut self, key: K) {
        self.capture(&key);
        self.dirty.insert(key, None);
    }

    fn capture(&mut self, key: &K) {
        let Some(diff) = self.diffs.last_mut() else {
            return;
        };
        if diff.contains_key(key) {
            return;
        }
        let prior = match self.dirty.get(key) {
            Some(value) => Prior::Dirty(value.clone()),
            None => Prior::Clean,
        };
        diff.insert(key.clone(), prior);
    }

    /// Opens a checkpoint.
    pub fn checkpoint(&mut self) {
        self.diffs.push(BTreeMap::new());
    }

    /// Keeps the writes since the last checkpoint, folding its diff into the parent.
    pub fn commit(&mut self) -> Result<(), CacheError> {
        let diff = self.diffs.pop().ok_or(CacheError::NoCheckpoint)?;
        if let Some(parent) = self.diffs.last_mut() {
            for (key, prior) in diff {
                parent.entry(key).or_insert(prior);
            }
        }
        Ok(())
    }

    /// Undoes every write since the last checkpoint.
    pub fn revert(&mut self) -> Result<(), CacheError> {
        let diff = self.diffs.pop().ok_or(CacheError::NoCheckpoint)?;
        for (key, prior) in diff {
            match prior {
                Prior::Dirty(value) => {
                    self.dirty.insert(key, value);
                }
                Prior::Clean => {
                    self.dirty.remove(&key);
                }
            }
        }
        Ok(())
    }

    /// Drains the entries written since the last flush, moving them into the clean layer.
    ///
    /// `None` values are deletions.
    pub fn flush(&mut self) -> Result<Vec<(K, Option<V>)>, CacheError> {
        if !self.diffs.is_empty() {
            return Err(CacheError::OpenCheckpoints(self.diffs.len()));
        }
        let dirty = core::mem::take(&mut self.dirty);
        let mut entries = Vec::with_capacity(dirty.len());
        for (key, value) in dirty {
            self.clean.insert(key.clone(), value.clone());
            entries.push((key, value));
        }
        Ok(entries)
    }

    /// Number of open checkpoints.
    #[inline]
    pub fn depth(&self) -> usize {
        self.diffs.len()
    }

    /// Number of keys written since the last flush.
    #[inline]
    pub fn dirty_len(&self) -> usize {
        self.dirty.len()
    }

    /// Number of clean entries currently held.
    #[inline]
    pub fn clean_len(&self) -> usize {
        self.clean.len()
    }

    /// Iterates over pending writes in key order.
    pub fn dirty_iter(&self) -> impl Iterator<Item = (&K, Option<&V>)> {
        self.dirty.iter().map(|(key, value)| (key, value.as_ref()))
    }

    /// Drops everything, including pending writes and open checkpoints.
    pub fn clear(&mut self) {
        self.clean.clear();
        self.dirty.clear();
        self.diffs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::NonZeroUsize;
    use rstest::rstest;

    fn lru(capacity: usize) -> BackingKind {
        BackingKind::Lru(NonZeroUsize::new(capacity).unwrap())
    }

    enum Op {
        Put(u8, u32),
        Del(u8),
    }

    fn apply(cache: &mut CheckpointCache<u8, u32>, ops: &[Op]) {
        for op in ops {
            match op {
                Op::Put(key, value) => cache.put(*key, *value),
                Op::Del(key) => cache.del(*key),
            }
        }
    }

    fn snapshot(cache: &mut CheckpointCache<u8, u32>) -> Vec<Lookup<u32>> {
        (0..8).map(|key| cache.get(&key)).collect()
    }

    #[rstest]
    #[case(BackingKind::Ordered)]
    #[case(lru(2))]
    fn revert_restores_exact_state(#[case] kind: BackingKind) {
        let mut cache = CheckpointCache::new(kind);
        cache.fill(1, Some(10));
        cache.fill(2, None);
        cache.put(3, 30);
        let before = snapshot(&mut cache);

        cache.checkpoint();
        apply(
            &mut cache,
            &[
                Op::Put(1, 11),
                Op::Put(1, 12),
                Op::Del(3),
                Op::Put(4, 40),
                Op::Put(2, 20),
            ],
        );
        cache.revert().unwrap();

        assert_eq!(snapshot(&mut cache), before);
        assert_eq!(cache.get(&4), Lookup::Unknown);
    }

    #[rstest]
    #[case(BackingKind::Ordered)]
    #[case(lru(4))]
    fn commit_then_outer_revert(#[case] kind: BackingKind) {
        let mut cache = CheckpointCache::new(kind);
        cache.put(1, 1);
        let before = snapshot(&mut cache);

        cache.checkpoint();
        cache.put(1, 2);
        cache.checkpoint();
        apply(&mut cache, &[Op::Put(1, 3), Op::Put(5, 50), Op::Del(1)]);
        cache.commit().unwrap();
        assert_eq!(cache.get(&1), Lookup::Absent);
        assert_eq!(cache.get(&5), Lookup::Present(50));
        cache.revert().unwrap();

        assert_eq!(snapshot(&mut cache), before);
        assert_eq!(cache.depth(), 0);
    }

    #[test]
    fn inner_revert_keeps_outer_writes() {
        let mut cache = CheckpointCache::default();
        cache.checkpoint();
        cache.put(1u8, 1u32);
        cache.checkpoint();
        cache.put(1, 2);
        cache.revert().unwrap();
        assert_eq!(cache.get(&1), Lookup::Present(1));
        cache.commit().unwrap();
        assert_eq!(cache.get(&1), Lookup::Present(1));
    }

    #[test]
    fn flush_refused_with_open_checkpoint() {
        let mut cache: CheckpointCache<u8, u32> = CheckpointCache::default();
        cache.checkpoint();
        cache.put(1, 1);
        assert_eq!(cache.flush(), Err(CacheError::OpenCheckpoints(1)));
        cache.commit().unwrap();
        assert_eq!(cache.flush().unwrap(), vec![(1, Some(1))]);
        assert_eq!(cache.dirty_len(), 0);
        // flushed entries become clean
        assert_eq!(cache.get_clean(&1), Lookup::Present(1));
        assert!(cache.flush().unwrap().is_empty());
    }

    #[test]
    fn commit_without_checkpoint_fails() {
        let mut cache: CheckpointCache<u8, u32> = CheckpointCache::default();
        assert_eq!(cache.commit(), Err(CacheError::NoCheckpoint));
        assert_eq!(cache.revert(), Err(CacheError::NoCheckpoint));
    }

    #[test]
    fn lru_evicts_clean_entries_only() {
        let mut cache = CheckpointCache::new(lru(1));
        cache.fill(1u8, Some(1u32));
        cache.fill(2, Some(2));
        assert_eq!(cache.get(&1), Lookup::Unknown);
        cache.put(3, 3);
        cache.put(4, 4);
        assert_eq!(cache.get(&3), Lookup::Present(3));
        assert_eq!(cache.get(&4), Lookup::Present(4));
    }

    #[test]
    fn get_clean_ignores_pending_writes() {
        let mut cache = CheckpointCache::default();
        cache.fill(1u8, Some(1u32));
        cache.put(1, 5);
        assert_eq!(cache.get(&1), Lookup::Present(5));
        assert_eq!(cache.get_clean(&1), Lookup::Present(1));
    }
}
