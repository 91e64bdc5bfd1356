use crate::{
    CallInputs, CallOutcome, CreateInputs, CreateOutcome, Gas, Host, InstructionResult,
    InterpreterResult, SStoreResult, SelfDestructResult, StateLoad,
};
use crate::AccountLoad;
use bytecode::Bytecode;
use context::Env;
use primitives::{Address, Bytes, HashMap, Log, B256, KECCAK_EMPTY, U256};
use std::collections::hash_map::Entry;

/// A dummy [Host] implementation.
///
/// Storage is a single map keyed by slot, every account looks empty, sub calls succeed
/// immediately and hand all of their gas back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DummyHost {
    /// Environment reported by environment opcodes.
    pub env: Env,
    /// Persistent storage of every account.
    pub storage: HashMap<U256, U256>,
    /// Transient storage of every account.
    pub transient_storage: HashMap<U256, U256>,
    /// Emitted logs.
    pub log: Vec<Log>,
    /// Calls that reached the host.
    pub calls: Vec<CallInputs>,
}

impl DummyHost {
    /// Create a new dummy host with the given [`Env`].
    #[inline]
    pub fn new(env: Env) -> Self {
        Self {
            env,
            ..Default::default()
        }
    }

    /// Clears the storage and logs of the dummy host.
    #[inline]
    pub fn clear(&mut self) {
        self.storage.clear();
        self.transient_storage.clear();
        self.log.clear();
        self.calls.clear();
    }
}

impl Host for DummyHost {
    #[inline]
    fn env(&self) -> &Env {
        &self.env
    }

    #[inline]
    fn load_account(&mut self, _address: Address) -> Option<StateLoad<AccountLoad>> {
        Some(StateLoad::new(
            AccountLoad {
                exists: false,
                is_empty: true,
            },
            false,
        ))
    }

    #[inline]
    fn block_hash(&mut self, number: u64) -> Option<B256> {
        Some(self.env.block.block_hash(number))
    }

    #[inline]
    fn balance(&mut self, _address: Address) -> Option<StateLoad<U256>> {
        Some(StateLoad::new(U256::ZERO, false))
    }

    #[inline]
    fn code(&mut self, _address: Address) -> Option<StateLoad<Bytecode>> {
        Some(StateLoad::new(Bytecode::default(), false))
    }

    #[inline]
    fn code_hash(&mut self, _address: Address) -> Option<StateLoad<B256>> {
        Some(StateLoad::new(KECCAK_EMPTY, false))
    }

    #[inline]
    fn sload(&mut self, _address: Address, index: U256) -> Option<StateLoad<U256>> {
        match self.storage.entry(index) {
            Entry::Occupied(entry) => Some(StateLoad::new(*entry.get(), false)),
            Entry::Vacant(entry) => {
                entry.insert(U256::ZERO);
                Some(StateLoad::new(U256::ZERO, true))
            }
        }
    }

    #[inline]
    fn sstore(
        &mut self,
        _address: Address,
        index: U256,
        value: U256,
    ) -> Option<StateLoad<SStoreResult>> {
        let (present, is_cold) = match self.storage.entry(index) {
            Entry::Occupied(mut entry) => (entry.insert(value), false),
            Entry::Vacant(entry) => {
                entry.insert(value);
                (U256::ZERO, true)
            }
        };

        Some(StateLoad::new(
            SStoreResult {
                original_value: U256::ZERO,
                present_value: present,
                new_value: value,
            },
            is_cold,
        ))
    }

    #[inline]
    fn tload(&mut self, _address: Address, index: U256) -> U256 {
        self.transient_storage
            .get(&index)
            .copied()
            .unwrap_or_default()
    }

    #[inline]
    fn tstore(&mut self, _address: Address, index: U256, value: U256) {
        self.transient_storage.insert(index, value);
    }

    #[inline]
    fn log(&mut self, log: Log) {
        self.log.push(log)
    }

    #[inline]
    fn selfdestruct(
        &mut self,
        _address: Address,
        _target: Address,
    ) -> Option<StateLoad<SelfDestructResult>> {
        Some(StateLoad::default())
    }

    fn call(&mut self, inputs: &mut CallInputs) -> CallOutcome {
        self.calls.push(inputs.clone());
        CallOutcome::new(
            InterpreterResult::new(InstructionResult::Stop, Bytes::new(), Gas::new(inputs.gas_limit)),
            inputs.return_memory_offset.clone(),
        )
    }

    fn create(&mut self, inputs: &mut CreateInputs) -> CreateOutcome {
        CreateOutcome::new(
            InterpreterResult::new(InstructionResult::Return, Bytes::new(), Gas::new(inputs.gas_limit)),
            Some(inputs.created_address(0)),
        )
    }
}
