mod dummy;

pub use dummy::DummyHost;

use crate::{CallInputs, CallOutcome, CreateInputs, CreateOutcome, Interpreter};
use auto_impl::auto_impl;
use bytecode::Bytecode;
use context::Env;
use primitives::{Address, Log, B256, U256};

/// EVM context host.
///
/// Everything an instruction needs beyond its own frame goes through here. `None` from any
/// state accessor means the backing store failed, the interpreter halts the frame with
/// [`FatalExternalError`](crate::InstructionResult::FatalExternalError).
#[auto_impl(&mut, Box)]
pub trait Host {
    /// Called before every instruction.
    fn step(&mut self, _interpreter: &mut Interpreter) {}

    /// Called after every instruction, including the one that stopped the frame.
    fn step_end(&mut self, _interpreter: &mut Interpreter) {}

    /// Returns a reference to the environment.
    fn env(&self) -> &Env;

    /// Load an account, warming it.
    fn load_account(&mut self, address: Address) -> Option<StateLoad<AccountLoad>>;

    /// Get the block hash of the given block `number`, zero outside the last 256 blocks.
    fn block_hash(&mut self, number: u64) -> Option<B256>;

    /// Get balance of `address` and if the account is cold.
    fn balance(&mut self, address: Address) -> Option<StateLoad<U256>>;

    /// Get code of `address` and if the account is cold.
    fn code(&mut self, address: Address) -> Option<StateLoad<Bytecode>>;

    /// Get code hash of `address` and if the account is cold.
    ///
    /// Zero for accounts that do not exist or are empty.
    fn code_hash(&mut self, address: Address) -> Option<StateLoad<B256>>;

    /// Get storage value of `address` at `index` and if the slot is cold.
    fn sload(&mut self, address: Address, index: U256) -> Option<StateLoad<U256>>;

    /// Set storage value of account address at index.
    ///
    /// Returns the original, present and new values of the slot and if it was cold.
    fn sstore(
        &mut self,
        address: Address,
        index: U256,
        value: U256,
    ) -> Option<StateLoad<SStoreResult>>;

    /// Get the transient storage value of `address` at `index`.
    fn tload(&mut self, address: Address, index: U256) -> U256;

    /// Set the transient storage value of `address` at `index`.
    fn tstore(&mut self, address: Address, index: U256, value: U256);

    /// Emit a log owned by `address` with given `LogData`.
    fn log(&mut self, log: Log);

    /// Mark `address` to be deleted, with funds transferred to `target`.
    fn selfdestruct(
        &mut self,
        address: Address,
        target: Address,
    ) -> Option<StateLoad<SelfDestructResult>>;

    /// Runs a sub call to completion.
    fn call(&mut self, inputs: &mut CallInputs) -> CallOutcome;

    /// Runs a contract creation to completion.
    fn create(&mut self, inputs: &mut CreateInputs) -> CreateOutcome;
}

/// A loaded value together with its warm/cold status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateLoad<T> {
    /// Returned data.
    pub data: T,
    /// True if the account or slot was cold before this access.
    pub is_cold: bool,
}

impl<T> StateLoad<T> {
    /// Returns a new [`StateLoad`] with the given data and cold load status.
    pub fn new(data: T, is_cold: bool) -> Self {
        Self { data, is_cold }
    }

    /// Maps the data of the [`StateLoad`] to a new value.
    pub fn map<B, F>(self, f: F) -> StateLoad<B>
    where
        F: FnOnce(T) -> B,
    {
        StateLoad::new(f(self.data), self.is_cold)
    }
}

/// Existence of a loaded account, as needed by call gas accounting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountLoad {
    /// Account is present in state.
    pub exists: bool,
    /// Account has zero nonce and balance and no code (EIP-161).
    pub is_empty: bool,
}

/// Represents the result of an `sstore` operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SStoreResult {
    /// Value of the storage when it is first read
    pub original_value: U256,
    /// Current value of the storage
    pub present_value: U256,
    /// New value that is set
    pub new_value: U256,
}

impl SStoreResult {
    /// Returns `true` if the new value is equal to the present value.
    #[inline]
    pub fn is_new_eq_present(&self) -> bool {
        self.new_value == self.present_value
    }

    /// Returns `true` if the original value is equal to the present value.
    #[inline]
    pub fn is_original_eq_present(&self) -> bool {
        self.original_value == self.present_value
    }

    /// Returns `true` if the original value is equal to the new value.
    #[inline]
    pub fn is_original_eq_new(&self) -> bool {
        self.original_value == self.new_value
    }

    /// Returns `true` if the original value is zero.
    #[inline]
    pub fn is_original_zero(&self) -> bool {
        self.original_value.is_zero()
    }

    /// Returns `true` if the present value is zero.
    #[inline]
    pub fn is_present_zero(&self) -> bool {
        self.present_value.is_zero()
    }

    /// Returns `true` if the new value is zero.
    #[inline]
    pub fn is_new_zero(&self) -> bool {
        self.new_value.is_zero()
    }
}

/// Result of a selfdestruct action.
///
/// Value returned are needed to calculate the gas spent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfDestructResult {
    /// The destroyed account had a non-zero balance.
    pub had_value: bool,
    /// The beneficiary existed before the transfer.
    pub target_exists: bool,
    /// The account was already scheduled for deletion in this transaction.
    pub previously_destroyed: bool,
}
