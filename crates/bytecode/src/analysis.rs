use crate::opcode;
use bitvec::{bitvec, order::Lsb0, vec::BitVec};
use primitives::{BTreeMap, U256};

/// Valid jump destinations of a code blob.
///
/// Also records `BEGINSUB` positions so EIP-2315 `JUMPSUB` targets can be validated from the
/// same pass. PUSH immediates are skipped, so a `0x5b` byte inside push data is never a
/// destination. The skipped immediates are decoded once and kept by the offset of their PUSH.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpTable {
    jumpdests: BitVec<u8>,
    subroutines: BitVec<u8>,
    immediates: BTreeMap<usize, U256>,
}

impl JumpTable {
    /// Returns `true` if `pc` is a `JUMPDEST` outside of push data.
    #[inline]
    pub fn is_valid(&self, pc: usize) -> bool {
        pc < self.jumpdests.len() && self.jumpdests[pc]
    }

    /// Returns `true` if `pc` is a `BEGINSUB` outside of push data.
    #[inline]
    pub fn is_valid_subroutine(&self, pc: usize) -> bool {
        pc < self.subroutines.len() && self.subroutines[pc]
    }

    /// Number of valid jump destinations.
    pub fn jumpdest_count(&self) -> usize {
        self.jumpdests.count_ones()
    }

    /// Decoded immediate of the `PUSH1..=PUSH32` at `pc`.
    ///
    /// Immediates cut off by the end of the code read as if padded with zero bytes.
    #[inline]
    pub fn push_value(&self, pc: usize) -> Option<U256> {
        self.immediates.get(&pc).copied()
    }
}

fn decode_immediate(code: &[u8], start: usize, len: usize) -> U256 {
    let end = start.saturating_add(len).min(code.len());
    let data = code.get(start..end).unwrap_or_default();
    let mut word = [0u8; 32];
    word[32 - len..32 - len + data.len()].copy_from_slice(data);
    U256::from_be_bytes(word)
}

/// Analyzes the bytecode, marking `JUMPDEST` and `BEGINSUB` opcodes that are not push data and
/// decoding every push immediate.
pub fn analyze(code: &[u8]) -> JumpTable {
    let mut jumpdests: BitVec<u8> = bitvec![u8, Lsb0; 0; code.len()];
    let mut subroutines: BitVec<u8> = bitvec![u8, Lsb0; 0; code.len()];
    let mut immediates = BTreeMap::new();

    let mut i = 0;
    while i < code.len() {
        let op = code[i];
        if op == opcode::JUMPDEST {
            jumpdests.set(i, true);
            i += 1;
        } else if op == opcode::BEGINSUB {
            subroutines.set(i, true);
            i += 1;
        } else {
            let push_offset = op.wrapping_sub(opcode::PUSH1);
            if push_offset < 32 {
                let len = push_offset as usize + 1;
                immediates.insert(i, decode_immediate(code, i + 1, len));
                i += len + 1;
            } else {
                i += 1;
            }
        }
    }

    JumpTable {
        jumpdests,
        subroutines,
        immediates,
    }
}
