use alloy_primitives::{b256, Address, B256};

/// Number of block hashes that EVM can access in the past.
pub const BLOCK_HASH_HISTORY: u64 = 256;

/// Maximum call depth.
pub const CALL_STACK_LIMIT: usize = 1024;

/// EIP-170: Contract code size limit
///
/// By default this limit is 0x6000 (~25kb)
pub const MAX_CODE_SIZE: usize = 0x6000;

/// EIP-3860: Limit and meter initcode
pub const MAX_INITCODE_SIZE: usize = 2 * MAX_CODE_SIZE;

/// The address of precompile 3, which is handled specially in a few places.
pub const PRECOMPILE3: Address =
    Address::new([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3]);

/// Keccak-256 of empty input.
pub const KECCAK_EMPTY: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Root hash of an empty trie, used as the storage root of fresh accounts.
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");
