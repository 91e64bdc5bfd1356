use primitives::U256;
use state::{CacheError, StateError};

/// Failure of a transaction or of the machinery executing it.
///
/// In-frame failures (out of gas, reverts, invalid opcodes) are not errors. They end up in the
/// [`ExecutionResult`](crate::ExecutionResult).
#[derive(Debug, thiserror::Error)]
pub enum EvmError<E> {
    /// The transaction failed validation and was not executed.
    #[error("transaction validation error: {0}")]
    Transaction(#[from] InvalidTransaction),
    /// Reading or writing world state failed. The transaction is rolled back.
    #[error(transparent)]
    State(#[from] StateError<E>),
}

impl<E> From<CacheError> for EvmError<E> {
    fn from(value: CacheError) -> Self {
        Self::State(StateError::Cache(value))
    }
}

/// Reasons a transaction is rejected before execution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidTransaction {
    /// The priority fee exceeds the max fee.
    #[error("priority fee is greater than max fee")]
    PriorityFeeGreaterThanMaxFee,
    /// EIP-1559: `gas_price` is less than `basefee`.
    #[error("gas price is less than basefee")]
    GasPriceLessThanBasefee,
    /// `gas_limit` in the tx is bigger than `block_gas_limit`.
    #[error("caller gas limit exceeds the block gas limit")]
    CallerGasLimitMoreThanBlock,
    /// Intrinsic gas is bigger than the transaction gas limit.
    #[error("call gas cost ({initial_gas}) exceeds the gas limit ({gas_limit})")]
    CallGasCostMoreThanGasLimit {
        /// Intrinsic gas of the transaction.
        initial_gas: u64,
        /// Gas limit of the transaction.
        gas_limit: u64,
    },
    /// EIP-3607: reject transactions from senders with deployed code.
    #[error("reject transactions from senders with deployed code")]
    RejectCallerWithCode,
    /// The caller can not pay for `value + gas_limit * gas_price`.
    #[error("lack of funds ({balance}) for max fee ({fee})")]
    LackOfFundForMaxFee {
        /// Required funds.
        fee: Box<U256>,
        /// Caller balance.
        balance: Box<U256>,
    },
    /// Overflow payment in transaction.
    #[error("overflow payment in transaction")]
    OverflowPaymentInTransaction,
    /// EIP-2681: the caller nonce can not be incremented.
    #[error("nonce overflow in transaction")]
    NonceOverflowInTransaction,
    /// Transaction nonce is ahead of the account nonce.
    #[error("nonce {tx} too high, expected {state}")]
    NonceTooHigh {
        /// Transaction nonce.
        tx: u64,
        /// Account nonce.
        state: u64,
    },
    /// Transaction nonce was already used.
    #[error("nonce {tx} too low, expected {state}")]
    NonceTooLow {
        /// Transaction nonce.
        tx: u64,
        /// Account nonce.
        state: u64,
    },
    /// EIP-3860: initcode exceeds the size limit.
    #[error("create initcode size limit")]
    CreateInitCodeSizeLimit,
    /// Transaction chain id does not match the config chain id.
    #[error("invalid chain ID")]
    InvalidChainId,
    /// Access lists need EIP-2930.
    #[error("access list is not supported")]
    AccessListNotSupported,
    /// Blob hashes need EIP-4844.
    #[error("blob versioned hashes are not supported")]
    BlobVersionedHashesNotSupported,
}
