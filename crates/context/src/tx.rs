//! This module contains [`TxEnv`].
use primitives::{Address, Bytes, TxKind, B256, U256};

/// One entry of an [EIP-2930] access list.
///
/// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessListItem {
    /// Account address.
    pub address: Address,
    /// Storage slots of the account.
    pub storage_keys: Vec<B256>,
}

/// The transaction environment
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEnv {
    /// Caller aka Author aka transaction signer
    pub caller: Address,
    /// The gas limit of the transaction
    pub gas_limit: u64,
    /// The gas price of the transaction
    ///
    /// For EIP-1559 transactions this is the max fee per gas.
    pub gas_price: U256,
    /// The priority fee per gas
    ///
    /// Incorporated as part of the London upgrade via [EIP-1559].
    ///
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub gas_priority_fee: Option<U256>,
    /// The destination of the transaction
    pub kind: TxKind,
    /// The value sent to the destination
    pub value: U256,
    /// The data of the transaction
    pub data: Bytes,
    /// The nonce of the transaction
    pub nonce: u64,
    /// The chain ID of the transaction
    ///
    /// If set to [`None`], no checks are performed.
    pub chain_id: Option<u64>,
    /// A list of addresses and storage keys that the transaction plans to access
    pub access_list: Vec<AccessListItem>,
    /// The list of blob versioned hashes, read by BLOBHASH
    pub blob_hashes: Vec<B256>,
}

impl Default for TxEnv {
    fn default() -> Self {
        Self {
            caller: Address::ZERO,
            gas_limit: 30_000_000,
            gas_price: U256::ZERO,
            gas_priority_fee: None,
            kind: TxKind::Call(Address::ZERO),
            value: U256::ZERO,
            data: Bytes::new(),
            nonce: 0,
            chain_id: None,
            access_list: Vec::new(),
            blob_hashes: Vec::new(),
        }
    }
}

impl TxEnv {
    /// Price per gas actually paid, given the block base fee.
    ///
    /// Legacy transactions pay `gas_price`. EIP-1559 transactions pay
    /// `min(gas_price, basefee + priority_fee)`.
    pub fn effective_gas_price(&self, basefee: U256) -> U256 {
        match self.gas_priority_fee {
            Some(priority_fee) => self.gas_price.min(basefee.saturating_add(priority_fee)),
            None => self.gas_price,
        }
    }

    /// Number of storage keys across the access list.
    pub fn access_list_storage_keys(&self) -> usize {
        self.access_list
            .iter()
            .map(|item| item.storage_keys.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_gas_price_caps_at_max_fee() {
        let mut tx = TxEnv {
            gas_price: U256::from(100),
            ..Default::default()
        };
        assert_eq!(tx.effective_gas_price(U256::from(10)), U256::from(100));
        tx.gas_priority_fee = Some(U256::from(5));
        assert_eq!(tx.effective_gas_price(U256::from(10)), U256::from(15));
        assert_eq!(tx.effective_gas_price(U256::from(99)), U256::from(100));
    }
}
