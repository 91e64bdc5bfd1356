use context::TxEnv;
use core::ops::Range;
use primitives::{Address, Bytes, TxKind, U256};

/// Inputs for a call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallInputs {
    /// The call data of the call.
    pub input: Bytes,
    /// The return memory offset where the output of the call is written.
    pub return_memory_offset: Range<usize>,
    /// The gas limit of the call.
    pub gas_limit: u64,
    /// The account address of bytecode that is going to be executed.
    pub bytecode_address: Address,
    /// Target address, this account storage is going to be modified.
    pub target_address: Address,
    /// This caller is invoking the call.
    pub caller: Address,
    /// Value that is transferred in Ether.
    ///
    /// If enum is [`CallValue::Transfer`] balance is transferred from `caller` to the `target_address`.
    ///
    /// If enum is [`CallValue::Apparent`] balance transfer is **not**
    /// done and apparent value is used by CALLVALUE opcode. Used by delegate call.
    pub value: CallValue,
    /// The scheme used for the call. Call, callcode, delegatecall or staticcall.
    pub scheme: CallScheme,
    /// Whether this is a static call.
    pub is_static: bool,
}

impl CallInputs {
    /// Creates the top level call inputs of a transaction.
    ///
    /// Returns `None` for contract creation transactions.
    pub fn new(tx_env: &TxEnv, gas_limit: u64) -> Option<Self> {
        let TxKind::Call(target_address) = tx_env.kind else {
            return None;
        };
        Some(CallInputs {
            input: tx_env.data.clone(),
            gas_limit,
            target_address,
            bytecode_address: target_address,
            caller: tx_env.caller,
            value: CallValue::Transfer(tx_env.value),
            scheme: CallScheme::Call,
            is_static: false,
            return_memory_offset: 0..0,
        })
    }

    /// Returns `true` if the call will transfer a non-zero value.
    #[inline]
    pub fn transfers_value(&self) -> bool {
        self.value.transfer().is_some_and(|x| !x.is_zero())
    }

    /// Return call value
    #[inline]
    pub fn call_value(&self) -> U256 {
        self.value.get()
    }
}

/// Call schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallScheme {
    /// `CALL`.
    Call,
    /// `CALLCODE`
    CallCode,
    /// `DELEGATECALL`
    DelegateCall,
    /// `STATICCALL`
    StaticCall,
}

/// Call value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallValue {
    /// Concrete value, transferred from caller to callee at the start of the call.
    Transfer(U256),
    /// Apparent value, that is **not** actually transferred.
    ///
    /// Set when in a `DELEGATECALL` call type, and used by the `CALLVALUE` opcode.
    Apparent(U256),
}

impl Default for CallValue {
    #[inline]
    fn default() -> Self {
        CallValue::Transfer(U256::ZERO)
    }
}

impl CallValue {
    /// Returns the call value, regardless of the transfer value type.
    #[inline]
    pub const fn get(&self) -> U256 {
        match *self {
            Self::Transfer(value) | Self::Apparent(value) => value,
        }
    }

    /// Returns the transferred value, if any.
    #[inline]
    pub const fn transfer(&self) -> Option<U256> {
        match *self {
            Self::Transfer(transfer) => Some(transfer),
            Self::Apparent(_) => None,
        }
    }
}
