//! World state for stratum: accounts, checkpointable caches and the backing store contract.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod account;
pub mod cache;
mod error;
pub mod manager;
pub mod store;

pub use account::AccountInfo;
pub use cache::{BackingKind, CacheError, CheckpointCache, Lookup};
pub use error::StateError;
pub use manager::{StateChangeset, StateManager, StorageKey};
pub use store::{BackingStore, BatchOp, InMemoryStore};
