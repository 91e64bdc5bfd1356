use crate::analysis::{analyze, JumpTable};
use core::fmt;
use primitives::{keccak256, Bytes, B256, KECCAK_EMPTY};
use std::sync::{Arc, OnceLock};

/// Contract code together with its hash and lazily computed analysis (jump destinations and
/// decoded push immediates).
///
/// Clones share the analysis, so a code blob is analyzed at most once no matter how many frames
/// execute it.
#[derive(Clone)]
pub struct Bytecode {
    bytes: Bytes,
    hash: B256,
    jump_table: Arc<OnceLock<JumpTable>>,
}

impl fmt::Debug for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bytecode")
            .field("bytes", &self.bytes)
            .field("hash", &self.hash)
            .field("analyzed", &self.is_analyzed())
            .finish()
    }
}

impl Default for Bytecode {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Bytecode {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Bytecode {}

impl Bytecode {
    /// Creates a new empty bytecode.
    #[inline]
    pub fn new() -> Self {
        Self {
            bytes: Bytes::new(),
            hash: KECCAK_EMPTY,
            jump_table: Arc::default(),
        }
    }

    /// Creates bytecode from raw bytes, hashing them.
    pub fn new_raw(bytes: Bytes) -> Self {
        let hash = if bytes.is_empty() {
            KECCAK_EMPTY
        } else {
            keccak256(&bytes)
        };
        Self {
            bytes,
            hash,
            jump_table: Arc::default(),
        }
    }

    /// Creates bytecode with a hash that is already known.
    ///
    /// The caller is responsible for `hash` matching `bytes`.
    pub fn new_with_hash(bytes: Bytes, hash: B256) -> Self {
        Self {
            bytes,
            hash,
            jump_table: Arc::default(),
        }
    }

    /// Returns the raw bytes.
    #[inline]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the raw bytes as a slice.
    #[inline]
    pub fn bytes_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the Keccak-256 hash of the code.
    #[inline]
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Code length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if there is no code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the jump table, analyzing the code on first use.
    #[inline]
    pub fn jump_table(&self) -> &JumpTable {
        self.jump_table.get_or_init(|| analyze(&self.bytes))
    }

    /// Returns `true` if jump analysis already ran for this code blob.
    #[inline]
    pub fn is_analyzed(&self) -> bool {
        self.jump_table.get().is_some()
    }

    /// Returns the opcode at `pc`, or `STOP` past the end of the code.
    #[inline]
    pub fn opcode_at(&self, pc: usize) -> u8 {
        self.bytes.get(pc).copied().unwrap_or(crate::opcode::STOP)
    }
}

impl From<Bytes> for Bytecode {
    fn from(bytes: Bytes) -> Self {
        Self::new_raw(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode;
    use rstest::rstest;

    #[test]
    fn empty_code_hash() {
        assert_eq!(Bytecode::new().hash(), KECCAK_EMPTY);
        assert_eq!(Bytecode::new_raw(Bytes::new()).hash(), KECCAK_EMPTY);
    }

    #[test]
    fn analysis_is_shared_between_clones() {
        let code = Bytecode::new_raw(Bytes::from_static(&[opcode::JUMPDEST, opcode::STOP]));
        let clone = code.clone();
        assert!(!clone.is_analyzed());
        assert!(code.jump_table().is_valid(0));
        assert!(clone.is_analyzed());
    }

    #[rstest]
    #[case(0, opcode::ADD)]
    #[case(1, opcode::STOP)]
    #[case(usize::MAX, opcode::STOP)]
    fn reading_past_end_is_stop(#[case] pc: usize, #[case] expected: u8) {
        let code = Bytecode::new_raw(Bytes::from_static(&[opcode::ADD]));
        assert_eq!(code.opcode_at(pc), expected);
    }
}
