//! This module contains [`BlockEnv`].
use primitives::{Address, BTreeMap, B256, BLOCK_HASH_HISTORY, U256};

/// The block environment
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEnv {
    /// The number of ancestor blocks of this block (block height)
    pub number: u64,
    /// Beneficiary (Coinbase or miner) is a address that have signed the block
    ///
    /// This is the receiver of the priority fees paid by transactions in the block.
    pub beneficiary: Address,
    /// The timestamp of the block in seconds since the UNIX epoch
    pub timestamp: u64,
    /// The gas limit of the block
    pub gas_limit: u64,
    /// The base fee per gas, added in the London upgrade with [EIP-1559]
    ///
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub basefee: U256,
    /// The difficulty of the block
    ///
    /// Unused after the Paris (AKA the merge) upgrade, and replaced by `prevrandao`.
    pub difficulty: U256,
    /// The output of the randomness beacon provided by the beacon chain
    ///
    /// Replaces `difficulty` after the merge with [EIP-4399].
    ///
    /// [EIP-4399]: https://eips.ethereum.org/EIPS/eip-4399
    pub prevrandao: Option<B256>,
    /// Blob base fee, returned by BLOBBASEFEE ([EIP-7516]).
    ///
    /// [EIP-7516]: https://eips.ethereum.org/EIPS/eip-7516
    pub blob_basefee: U256,
    /// Hashes of recent ancestors, keyed by block number.
    pub block_hashes: BTreeMap<u64, B256>,
}

impl BlockEnv {
    /// Hash of block `number` as seen by BLOCKHASH.
    ///
    /// Only the [`BLOCK_HASH_HISTORY`] most recent ancestors are visible, anything else is zero.
    pub fn block_hash(&self, number: u64) -> B256 {
        if number >= self.number || self.number - number > BLOCK_HASH_HISTORY {
            return B256::ZERO;
        }
        self.block_hashes.get(&number).copied().unwrap_or_default()
    }
}

impl Default for BlockEnv {
    fn default() -> Self {
        Self {
            number: 0,
            beneficiary: Address::ZERO,
            timestamp: 1,
            gas_limit: u64::MAX,
            basefee: U256::ZERO,
            difficulty: U256::ZERO,
            prevrandao: Some(B256::ZERO),
            blob_basefee: U256::from(1),
            block_hashes: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::parent(299, B256::repeat_byte(1))]
    #[case::oldest_visible(44, B256::repeat_byte(2))]
    #[case::too_old(43, B256::ZERO)]
    #[case::current(300, B256::ZERO)]
    #[case::future(1000, B256::ZERO)]
    fn block_hash_window(#[case] number: u64, #[case] expected: B256) {
        let mut block = BlockEnv {
            number: 300,
            ..Default::default()
        };
        block.block_hashes.insert(299, B256::repeat_byte(1));
        block.block_hashes.insert(44, B256::repeat_byte(2));
        block.block_hashes.insert(43, B256::repeat_byte(3));

        assert_eq!(block.block_hash(number), expected);
    }
}
