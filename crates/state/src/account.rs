use alloy_rlp::{RlpDecodable, RlpEncodable};
use primitives::{B256, EMPTY_ROOT_HASH, KECCAK_EMPTY, U256};

/// Account record as stored in the backing store.
///
/// `storage_root` is an opaque reference owned by the persistence layer; execution never reads
/// it and passes it through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountInfo {
    /// Account nonce.
    pub nonce: u64,
    /// Account balance.
    pub balance: U256,
    /// Storage root reference.
    pub storage_root: B256,
    /// Hash of the account code.
    pub code_hash: B256,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            nonce: 0,
            balance: U256::ZERO,
            storage_root: EMPTY_ROOT_HASH,
            code_hash: KECCAK_EMPTY,
        }
    }
}

impl AccountInfo {
    /// Creates an account holding only a balance.
    pub fn from_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Creates an account with the given code hash.
    pub fn with_code_hash(mut self, code_hash: B256) -> Self {
        self.code_hash = code_hash;
        self
    }

    /// Creates an account with the given nonce.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// EIP-161 emptiness: no code, zero nonce and zero balance.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero() && !self.has_code()
    }

    /// Returns `true` if the account has code.
    #[inline]
    pub fn has_code(&self) -> bool {
        self.code_hash != KECCAK_EMPTY && self.code_hash != B256::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_account_is_empty() {
        assert!(AccountInfo::default().is_empty());
        assert!(!AccountInfo::from_balance(U256::from(1)).is_empty());
        assert!(!AccountInfo::default().with_nonce(1).is_empty());
        assert!(!AccountInfo::default().with_code_hash(B256::repeat_byte(1)).is_empty());
    }

    #[test]
    fn rlp_record_decodes() {
        let account = AccountInfo::from_balance(U256::from(1000)).with_nonce(7);
        let encoded = alloy_rlp::encode(&account);
        let decoded: AccountInfo = alloy_rlp::decode_exact(&encoded).unwrap();
        assert_eq!(decoded, account);
    }
}
