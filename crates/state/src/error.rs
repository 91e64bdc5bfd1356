use crate::cache::CacheError;

/// Failure while reading or writing world state.
#[derive(Debug, thiserror::Error)]
pub enum StateError<E> {
    /// The backing store failed.
    #[error("backing store: {0}")]
    Store(#[source] E),
    /// A stored value has the wrong shape for its key.
    #[error("corrupt record under key 0x{}", primitives::hex::encode(key))]
    Corrupt {
        /// Offending key.
        key: Vec<u8>,
    },
    /// A stored record failed to decode.
    #[error(transparent)]
    Decode(#[from] alloy_rlp::Error),
    /// Checkpoint protocol misuse.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
