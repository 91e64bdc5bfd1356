//! Durable key-value store contract used behind the caches.
use auto_impl::auto_impl;
use core::convert::Infallible;
use primitives::{BTreeMap, Bytes};

/// One write in an atomic batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite `key`.
    Put {
        /// Key.
        key: Vec<u8>,
        /// Value.
        value: Bytes,
    },
    /// Remove `key`.
    Del {
        /// Key.
        key: Vec<u8>,
    },
    /// Remove every key starting with `prefix`.
    DelPrefix {
        /// Key prefix.
        prefix: Vec<u8>,
    },
}

/// Minimal contract the state caches need from persistent storage.
#[auto_impl(&mut, Box)]
pub trait BackingStore {
    /// Store error type.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Reads a value.
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, Self::Error>;

    /// Writes a value.
    fn put(&mut self, key: &[u8], value: Bytes) -> Result<(), Self::Error>;

    /// Deletes a value. Deleting a missing key is not an error.
    fn del(&mut self, key: &[u8]) -> Result<(), Self::Error>;

    /// Applies all operations atomically, in order.
    fn batch(&mut self, ops: Vec<BatchOp>) -> Result<(), Self::Error>;
}

/// In-memory ordered store. Used for tests and short-lived executions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryStore {
    data: BTreeMap<Vec<u8>, Bytes>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl BackingStore for InMemoryStore {
    type Error = Infallible;

    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, Self::Error> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: Bytes) -> Result<(), Self::Error> {
        self.data.insert(key.to_vec(), value);
        Ok(())
    }

    fn del(&mut self, key: &[u8]) -> Result<(), Self::Error> {
        self.data.remove(key);
        Ok(())
    }

    fn batch(&mut self, ops: Vec<BatchOp>) -> Result<(), Self::Error> {
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOp::Del { key } => {
                    self.data.remove(&key);
                }
                BatchOp::DelPrefix { prefix } => {
                    let keys: Vec<_> = self
                        .data
                        .range(prefix.clone()..)
                        .take_while(|(key, _)| key.starts_with(&prefix))
                        .map(|(key, _)| key.clone())
                        .collect();
                    for key in keys {
                        self.data.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }
}
