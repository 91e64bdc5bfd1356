use core::{fmt, hash::Hash, num::NonZeroUsize};
use lru::LruCache;
use primitives::BTreeMap;

/// Which structure holds clean (persisted) entries of a cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackingKind {
    /// Unbounded ordered map. Suited to short-lived and test contexts.
    #[default]
    Ordered,
    /// Fixed-capacity LRU. Suited to long-lived contexts with high churn.
    Lru(NonZeroUsize),
}

/// Clean-entry storage. `None` values record a key known to be absent.
///
/// Both variants behave the same for reads; the LRU may forget entries, which turns them back
/// into unknown keys that are refetched from the store.
pub(crate) enum Backing<K: Hash + Eq, V> {
    Ordered(BTreeMap<K, Option<V>>),
    Lru(LruCache<K, Option<V>>),
}

impl<K: Hash + Eq, V> fmt::Debug for Backing<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordered(map) => f.debug_struct("Ordered").field("len", &map.len()).finish(),
            Self::Lru(cache) => f
                .debug_struct("Lru")
                .field("len", &cache.len())
                .field("cap", &cache.cap())
                .finish(),
        }
    }
}

impl<K: Ord + Hash + Eq, V> Backing<K, V> {
    pub(crate) fn new(kind: BackingKind) -> Self {
        match kind {
            BackingKind::Ordered => Self::Ordered(BTreeMap::new()),
            BackingKind::Lru(capacity) => Self::Lru(LruCache::new(capacity)),
        }
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<&Option<V>> {
        match self {
            Self::Ordered(map) => map.get(key),
            Self::Lru(cache) => cache.get(key),
        }
    }

    pub(crate) fn insert(&mut self, key: K, value: Option<V>) {
        match self {
            Self::Ordered(map) => {
                map.insert(key, value);
            }
            Self::Lru(cache) => {
                cache.put(key, value);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Ordered(map) => map.len(),
            Self::Lru(cache) => cache.len(),
        }
    }

    pub(crate) fn clear(&mut self) {
        match self {
            Self::Ordered(map) => map.clear(),
            Self::Lru(cache) => cache.clear(),
        }
    }
}
