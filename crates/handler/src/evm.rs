use crate::{
    checkpoint::{Checkpoint, CheckpointGuard},
    inspector::{Inspector, NoOpInspector},
    message::Message,
    post_execution, pre_execution,
    result::{FrameResult, ResultAndState},
    validation, EvmError,
};
use bytecode::Bytecode;
use context::{CfgEnv, Context, Env, TxEnv};
use core::{fmt, mem};
use interpreter::{
    AccountLoad, CallInputs, CallOutcome, Contract, CreateInputs, CreateOutcome, Host,
    InstructionResult, InstructionTables, Interpreter, InterpreterResult, SStoreResult,
    SelfDestructResult, StateLoad,
};
use precompile::Precompiles;
use primitives::{Address, BTreeSet, Bytes, Features, Log, B256, U256};
use state::{AccountInfo, BackingStore, CacheError, StateChangeset, StateError};
use std::{borrow::Cow, sync::Arc};
use tracing::{debug, warn};

/// Logs and address sets collected by the running frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct Substate {
    pub(crate) logs: Vec<Log>,
    pub(crate) selfdestruct: BTreeSet<Address>,
    pub(crate) created: BTreeSet<Address>,
}

impl Substate {
    /// Starts a frame from the sets handed down by its parent.
    pub(crate) fn from_message(message: &Message) -> Self {
        Self {
            logs: Vec::new(),
            selfdestruct: message.selfdestruct.clone(),
            created: message.created.clone(),
        }
    }
}

/// Executes messages and transactions against a [`Context`].
///
/// The instruction tables and precompiles are resolved from the configuration once, when the
/// EVM is built or reconfigured.
pub struct Evm<S: BackingStore, I = NoOpInspector> {
    /// Environment, world state and access journal.
    pub ctx: Context<S>,
    /// Execution observer.
    pub inspector: I,
    precompiles: Cow<'static, Precompiles>,
    instructions: Arc<InstructionTables<Evm<S, I>>>,
    pub(crate) substate: Substate,
    pub(crate) depth: usize,
    error: Option<StateError<S::Error>>,
}

impl<S: BackingStore, I> fmt::Debug for Evm<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evm")
            .field("env", &self.ctx.env)
            .field("checkpoints", &self.ctx.depth())
            .field("precompiles", &self.precompiles.len())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl<S: BackingStore> Evm<S> {
    /// Creates an EVM without an inspector.
    pub fn new(ctx: Context<S>) -> Self {
        Self::new_with_inspector(ctx, NoOpInspector)
    }
}

impl<S: BackingStore, I: Inspector<S>> Evm<S, I> {
    /// Creates an EVM reporting to `inspector`.
    pub fn new_with_inspector(ctx: Context<S>, inspector: I) -> Self {
        let precompiles = precompiles_for(&ctx.env.cfg);
        let instructions = Arc::new(InstructionTables::new(ctx.features()));
        Self {
            ctx,
            inspector,
            precompiles,
            instructions,
            substate: Substate::default(),
            depth: 0,
            error: None,
        }
    }

    /// Swaps the inspector, keeping the context.
    pub fn with_inspector<OI: Inspector<S>>(self, inspector: OI) -> Evm<S, OI> {
        Evm::new_with_inspector(self.ctx, inspector)
    }

    /// Replaces the configuration and re-resolves instruction tables and precompiles.
    pub fn set_cfg(&mut self, cfg: CfgEnv) {
        self.precompiles = precompiles_for(&cfg);
        self.instructions = Arc::new(InstructionTables::new(cfg.features()));
        self.ctx.env.cfg = cfg;
    }

    /// Consumes the EVM and returns its context.
    pub fn into_context(self) -> Context<S> {
        self.ctx
    }

    /// Precompiles active under the configuration.
    pub fn precompiles(&self) -> &Precompiles {
        &self.precompiles
    }

    /// Executes a transaction and flushes its effects to the backing store.
    ///
    /// Validation failures and store errors leave the state untouched.
    pub fn transact(&mut self, tx: TxEnv) -> Result<ResultAndState, EvmError<S::Error>> {
        self.ctx.env.tx = tx;
        let result = self.transact_inner();
        self.ctx.journal.clear();
        self.substate = Substate::default();
        self.depth = 0;
        self.error = None;
        if let Err(error) = &result {
            debug!(target: "handler", %error, "transaction failed");
        }
        result
    }

    fn transact_inner(&mut self) -> Result<ResultAndState, EvmError<S::Error>> {
        validation::validate_env(&self.ctx.env)?;
        let initial_gas = validation::validate_initial_tx_gas(&self.ctx.env)?;
        let features = self.ctx.features();

        let mut evm = CheckpointGuard::new(self);
        let caller_address = evm.ctx.env.tx.caller;
        let caller = evm.ctx.state.account_or_default(caller_address)?;
        validation::validate_tx_against_state(&evm.ctx.env, &caller)?;

        let precompiles = Cow::clone(&evm.precompiles);
        pre_execution::load_accounts(&mut evm.ctx, &precompiles);
        pre_execution::deduct_caller(&mut evm.ctx)?;

        let tx = &evm.ctx.env.tx;
        let gas_limit = tx.gas_limit;
        let is_create = tx.kind.is_create();
        let message = match tx.kind.to() {
            Some(to) => Message::call(tx.caller, *to, tx.value, tx.data.clone(), gas_limit - initial_gas),
            None => Message::create(tx.caller, tx.value, tx.data.clone(), gas_limit - initial_gas),
        };
        let frame = evm.execute(message)?;

        let gas = post_execution::transaction_gas(features, gas_limit, &frame);
        post_execution::reimburse_caller(&mut evm.ctx, &gas)?;
        post_execution::reward_beneficiary(&mut evm.ctx, &gas)?;
        post_execution::destroy_accounts(&mut evm.ctx, &frame.selfdestructs)?;
        let cleaned = evm.ctx.cleanup()?;
        evm.commit()?;

        let state = self.ctx.state.flush()?;
        let selfdestructed = frame.selfdestructs.clone();
        let created = frame.created.clone();
        let result = post_execution::output(frame, &gas, is_create);
        debug!(
            target: "handler",
            success = result.is_success(),
            gas_used = result.gas_used(),
            "transaction executed"
        );
        Ok(ResultAndState {
            result,
            state,
            selfdestructed,
            created,
            cleaned,
        })
    }

    /// Executes one message against the current state.
    ///
    /// No fee is charged and nothing is flushed. The returned address sets are those the
    /// message added to the sets it carried.
    pub fn run_message(&mut self, message: Message) -> Result<FrameResult, EvmError<S::Error>> {
        let result = self.execute(message);
        self.error = None;
        Ok(result?)
    }

    /// Runs `code` as the code of `address` without a message call.
    ///
    /// No value moves and no account is touched. Call data and caller come from the
    /// transaction environment. State changes are kept if the code succeeds.
    pub fn run_code(
        &mut self,
        address: Address,
        code: Bytes,
        gas_limit: u64,
    ) -> Result<FrameResult, EvmError<S::Error>> {
        let contract = Contract::new(
            self.ctx.env.tx.data.clone(),
            Bytecode::new_raw(code),
            address,
            self.ctx.env.tx.caller,
            U256::ZERO,
        );
        let mut interpreter = Interpreter::new(contract, gas_limit, false, 0, self.ctx.features());

        let parent = mem::take(&mut self.substate);
        let outcome = self.run_code_frame(&mut interpreter);
        let substate = mem::replace(&mut self.substate, parent);
        self.error = None;

        let mut frame = FrameResult::new(outcome?);
        if frame.is_ok() {
            frame.logs = substate.logs;
            frame.selfdestructs = substate.selfdestruct;
            frame.created = substate.created;
        }
        Ok(frame)
    }

    fn run_code_frame(
        &mut self,
        interpreter: &mut Interpreter,
    ) -> Result<InterpreterResult, StateError<S::Error>> {
        let mut evm = CheckpointGuard::new(self);
        let result = evm.run_interpreter(interpreter)?;
        if result.is_ok() {
            evm.commit()?;
        }
        Ok(result)
    }

    /// Writes pending state to the backing store and resets the journal.
    pub fn flush(&mut self) -> Result<StateChangeset, EvmError<S::Error>> {
        let changeset = self.ctx.state.flush()?;
        self.ctx.journal.clear();
        Ok(changeset)
    }

    /// Runs the interpreter of a frame to completion.
    ///
    /// A store failure hit by any instruction surfaces here as an error.
    pub(crate) fn run_interpreter(
        &mut self,
        interpreter: &mut Interpreter,
    ) -> Result<InterpreterResult, StateError<S::Error>> {
        let instructions = Arc::clone(&self.instructions);
        self.inspector.initialize_interp(interpreter, &mut self.ctx);
        let result = interpreter.run(&instructions, self);
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        Ok(result)
    }

    /// Runs a child message sent by the running frame and merges what it added on success.
    fn run_child(&mut self, message: Message) -> FrameResult {
        let gas_limit = message.gas_limit;
        match self.execute(message) {
            Ok(mut frame) => {
                if frame.is_ok() {
                    self.substate.logs.append(&mut frame.logs);
                    self.substate.selfdestruct.extend(&frame.selfdestructs);
                    self.substate.created.extend(&frame.created);
                }
                frame
            }
            Err(error) => {
                self.record_error(error);
                FrameResult::new(InterpreterResult::new_halt(
                    InstructionResult::FatalExternalError,
                    gas_limit,
                ))
            }
        }
    }

    /// Moves `value` from `from` to `to` and touches `to`.
    ///
    /// The caller checks the balance. Before EIP-161 a missing `to` is created even for a zero
    /// value.
    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), StateError<S::Error>> {
        self.ctx.journal.touch(to);
        if value.is_zero() {
            if !self.ctx.features().contains(Features::EIP161) && !self.ctx.state.exists(to)? {
                self.ctx.state.put_account(to, AccountInfo::default());
            }
            return Ok(());
        }

        let mut sender = self.ctx.state.account_or_default(from)?;
        sender.balance = sender.balance.saturating_sub(value);
        self.ctx.state.put_account(from, sender);

        let mut receiver = self.ctx.state.account_or_default(to)?;
        receiver.balance = receiver.balance.saturating_add(value);
        self.ctx.state.put_account(to, receiver);
        Ok(())
    }

    fn record_error(&mut self, error: StateError<S::Error>) {
        warn!(target: "handler", %error, "state access failed, aborting transaction");
        self.error = Some(error);
    }

    /// Unwraps a state result, parking the error until the running frame stops.
    fn fallible<T>(&mut self, result: Result<T, StateError<S::Error>>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.record_error(error);
                None
            }
        }
    }
}

fn precompiles_for(cfg: &CfgEnv) -> Cow<'static, Precompiles> {
    let features = cfg.features();
    if features == Features::for_spec(cfg.spec()) {
        Cow::Borrowed(Precompiles::for_spec(cfg.spec()))
    } else {
        Cow::Owned(Precompiles::new(features))
    }
}

impl<S: BackingStore, I> Checkpoint for Evm<S, I> {
    fn checkpoint(&mut self) {
        self.ctx.checkpoint();
    }

    fn commit_checkpoint(&mut self) -> Result<(), CacheError> {
        self.ctx.commit()
    }

    fn revert_checkpoint(&mut self) -> Result<(), CacheError> {
        self.ctx.revert()
    }
}

impl<S: BackingStore, I: Inspector<S>> Host for Evm<S, I> {
    fn step(&mut self, interpreter: &mut Interpreter) {
        self.inspector.step(interpreter, &mut self.ctx);
    }

    fn step_end(&mut self, interpreter: &mut Interpreter) {
        self.inspector.step_end(interpreter, &mut self.ctx);
    }

    fn env(&self) -> &Env {
        &self.ctx.env
    }

    fn load_account(&mut self, address: Address) -> Option<StateLoad<AccountLoad>> {
        let is_cold = self.ctx.journal.warm(address);
        let account = self.ctx.state.account(address);
        let account = self.fallible(account)?;
        Some(StateLoad::new(
            AccountLoad {
                exists: account.is_some(),
                is_empty: account.as_ref().is_none_or(AccountInfo::is_empty),
            },
            is_cold,
        ))
    }

    fn block_hash(&mut self, number: u64) -> Option<B256> {
        Some(self.ctx.env.block.block_hash(number))
    }

    fn balance(&mut self, address: Address) -> Option<StateLoad<U256>> {
        let is_cold = self.ctx.journal.warm(address);
        let account = self.ctx.state.account_or_default(address);
        let account = self.fallible(account)?;
        Some(StateLoad::new(account.balance, is_cold))
    }

    fn code(&mut self, address: Address) -> Option<StateLoad<Bytecode>> {
        let is_cold = self.ctx.journal.warm(address);
        let code = self.ctx.state.code_by_address(address);
        let code = self.fallible(code)?;
        Some(StateLoad::new(code, is_cold))
    }

    fn code_hash(&mut self, address: Address) -> Option<StateLoad<B256>> {
        let is_cold = self.ctx.journal.warm(address);
        let account = self.ctx.state.account(address);
        let hash = match self.fallible(account)? {
            Some(account) if !account.is_empty() => account.code_hash,
            _ => B256::ZERO,
        };
        Some(StateLoad::new(hash, is_cold))
    }

    fn sload(&mut self, address: Address, index: U256) -> Option<StateLoad<U256>> {
        let is_cold = self.ctx.journal.warm_slot(address, index);
        let value = self.ctx.state.storage(address, index);
        let value = self.fallible(value)?;
        Some(StateLoad::new(value, is_cold))
    }

    fn sstore(
        &mut self,
        address: Address,
        index: U256,
        value: U256,
    ) -> Option<StateLoad<SStoreResult>> {
        let is_cold = self.ctx.journal.warm_slot(address, index);
        let present = self.ctx.state.storage(address, index);
        let present_value = self.fallible(present)?;
        let original = self.ctx.state.original_storage(address, index);
        let original_value = self.fallible(original)?;
        let written = self.ctx.state.set_storage(address, index, value);
        self.fallible(written)?;
        Some(StateLoad::new(
            SStoreResult {
                original_value,
                present_value,
                new_value: value,
            },
            is_cold,
        ))
    }

    fn tload(&mut self, address: Address, index: U256) -> U256 {
        self.ctx.journal.tload(address, index)
    }

    fn tstore(&mut self, address: Address, index: U256, value: U256) {
        self.ctx.journal.tstore(address, index, value)
    }

    fn log(&mut self, log: Log) {
        self.inspector.log(&mut self.ctx, &log);
        self.substate.logs.push(log);
    }

    fn selfdestruct(
        &mut self,
        address: Address,
        target: Address,
    ) -> Option<StateLoad<SelfDestructResult>> {
        let features = self.ctx.features();
        let is_cold = self.ctx.journal.warm(target);

        let target_account = self.ctx.state.account(target);
        let target_account = self.fallible(target_account)?;
        let target_exists = if features.contains(Features::EIP161) {
            target_account.as_ref().is_some_and(|account| !account.is_empty())
        } else {
            target_account.is_some()
        };

        let account = self.ctx.state.account_or_default(address);
        let mut account = self.fallible(account)?;
        let balance = account.balance;
        let previously_destroyed = self.substate.selfdestruct.contains(&address);
        // EIP-6780: SELFDESTRUCT only in same transaction
        let destroys =
            !features.contains(Features::EIP6780) || self.substate.created.contains(&address);

        if address != target {
            let mut target_account = target_account.unwrap_or_default();
            target_account.balance = target_account.balance.saturating_add(balance);
            self.ctx.state.put_account(target, target_account);
            account.balance = U256::ZERO;
        } else if destroys {
            account.balance = U256::ZERO;
        }
        self.ctx.state.put_account(address, account);
        self.ctx.journal.touch(address);
        self.ctx.journal.touch(target);
        if destroys {
            self.substate.selfdestruct.insert(address);
        }
        self.inspector.selfdestruct(address, target, balance);

        Some(StateLoad::new(
            SelfDestructResult {
                had_value: !balance.is_zero(),
                target_exists,
                previously_destroyed,
            },
            is_cold,
        ))
    }

    fn call(&mut self, inputs: &mut CallInputs) -> CallOutcome {
        if let Some(outcome) = self.inspector.call(&mut self.ctx, inputs) {
            return outcome;
        }
        let message = Message::from_call_inputs(inputs, self.depth + 1).with_sets(
            self.substate.selfdestruct.clone(),
            self.substate.created.clone(),
        );
        let frame = self.run_child(message);
        let mut outcome = CallOutcome::new(frame.result, inputs.return_memory_offset.clone());
        self.inspector.call_end(&mut self.ctx, inputs, &mut outcome);
        outcome
    }

    fn create(&mut self, inputs: &mut CreateInputs) -> CreateOutcome {
        if let Some(outcome) = self.inspector.create(&mut self.ctx, inputs) {
            return outcome;
        }
        let message = Message::from_create_inputs(inputs, self.depth + 1).with_sets(
            self.substate.selfdestruct.clone(),
            self.substate.created.clone(),
        );
        let frame = self.run_child(message);
        let mut outcome = CreateOutcome::new(frame.result, frame.created_address);
        self.inspector.create_end(&mut self.ctx, inputs, &mut outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExecutionResult, InvalidTransaction, TracingInspector};
    use bytecode::opcode::*;
    use primitives::{address, SpecId, TxKind, CALL_STACK_LIMIT};
    use state::InMemoryStore;

    const CALLER: Address = address!("0x000000000000000000000000000000000000aaaa");
    const TARGET: Address = address!("0x000000000000000000000000000000000000bbbb");
    const IDENTITY: Address = address!("0x0000000000000000000000000000000000000004");

    fn evm(spec: SpecId) -> Evm<InMemoryStore> {
        let env = Env {
            cfg: CfgEnv::new_with_spec(spec),
            ..Default::default()
        };
        let mut ctx = Context::new(env, InMemoryStore::new());
        ctx.state
            .put_account(CALLER, AccountInfo::from_balance(U256::from(1_000_000_000u64)));
        Evm::new(ctx)
    }

    fn deploy(evm: &mut Evm<InMemoryStore>, address: Address, code: &[u8]) {
        let code_hash = evm
            .ctx
            .state
            .put_code(Bytecode::new_raw(Bytes::copy_from_slice(code)));
        evm.ctx
            .state
            .put_account(address, AccountInfo::default().with_code_hash(code_hash));
    }

    fn call(evm: &mut Evm<InMemoryStore>, value: u64, gas_limit: u64) -> FrameResult {
        evm.run_message(Message::call(
            CALLER,
            TARGET,
            U256::from(value),
            Bytes::new(),
            gas_limit,
        ))
        .unwrap()
    }

    fn storage(evm: &mut Evm<InMemoryStore>, slot: u64) -> U256 {
        evm.ctx.state.storage(TARGET, U256::from(slot)).unwrap()
    }

    #[test]
    fn call_moves_value_and_keeps_storage() {
        let mut evm = evm(SpecId::CANCUN);
        deploy(&mut evm, TARGET, &[PUSH1, 0x2a, PUSH1, 0x00, SSTORE, STOP]);
        let frame = call(&mut evm, 7, 100_000);
        assert_eq!(frame.instruction_result(), InstructionResult::Stop);
        assert_eq!(storage(&mut evm, 0), U256::from(0x2a));
        let balance = evm.ctx.state.account_or_default(TARGET).unwrap().balance;
        assert_eq!(balance, U256::from(7));
    }

    #[test]
    fn original_value_is_the_flushed_one() {
        let mut evm = evm(SpecId::CANCUN);
        // sstore(0, calldataload(0))
        deploy(&mut evm, TARGET, &[PUSH1, 0x00, CALLDATALOAD, PUSH1, 0x00, SSTORE, STOP]);
        let store = |evm: &mut Evm<InMemoryStore>, value: u64| {
            let data = Bytes::copy_from_slice(&U256::from(value).to_be_bytes::<32>());
            let frame = evm
                .run_message(Message::call(CALLER, TARGET, U256::ZERO, data, 100_000))
                .unwrap();
            assert_eq!(frame.instruction_result(), InstructionResult::Stop);
            frame.result.gas.spent() - 9
        };

        // cold set of a fresh slot
        assert_eq!(store(&mut evm, 1), 2100 + 20_000);
        // without a flush the slot is still dirty against its original zero
        assert_eq!(store(&mut evm, 2), 100);
        assert_eq!(evm.ctx.state.original_storage(TARGET, U256::ZERO).unwrap(), U256::ZERO);

        evm.flush().unwrap();
        assert_eq!(
            evm.ctx.state.original_storage(TARGET, U256::ZERO).unwrap(),
            U256::from(2)
        );
        // flushed value is the new original, and warmth was reset with it
        assert_eq!(store(&mut evm, 3), 2100 + 2900);
    }

    #[test]
    fn revert_discards_storage_and_value() {
        let mut evm = evm(SpecId::CANCUN);
        deploy(
            &mut evm,
            TARGET,
            &[PUSH1, 0x01, PUSH1, 0x00, SSTORE, PUSH1, 0x00, PUSH1, 0x00, REVERT],
        );
        let frame = call(&mut evm, 7, 100_000);
        assert_eq!(frame.instruction_result(), InstructionResult::Revert);
        assert!(frame.result.gas.remaining() > 0);
        assert_eq!(storage(&mut evm, 0), U256::ZERO);
        let balance = evm.ctx.state.account_or_default(TARGET).unwrap().balance;
        assert_eq!(balance, U256::ZERO);
        assert_eq!(evm.ctx.depth(), 0);
    }

    #[test]
    fn call_too_deep_keeps_gas() {
        let mut evm = evm(SpecId::CANCUN);
        let mut message = Message::call(CALLER, TARGET, U256::ZERO, Bytes::new(), 5_000);
        message.depth = CALL_STACK_LIMIT + 1;
        let frame = evm.run_message(message).unwrap();
        assert_eq!(frame.instruction_result(), InstructionResult::CallTooDeep);
        assert_eq!(frame.result.gas.remaining(), 5_000);
    }

    #[test]
    fn value_above_balance_is_out_of_funds() {
        let mut evm = evm(SpecId::CANCUN);
        let frame = evm
            .run_message(Message::call(
                TARGET,
                CALLER,
                U256::from(1),
                Bytes::new(),
                5_000,
            ))
            .unwrap();
        assert_eq!(frame.instruction_result(), InstructionResult::OutOfFunds);
        assert_eq!(frame.result.gas.remaining(), 5_000);
    }

    #[test]
    fn precompile_out_of_gas_spends_everything() {
        let mut evm = evm(SpecId::CANCUN);
        let data = Bytes::from(vec![1u8; 64]);
        let frame = evm
            .run_message(Message::call(CALLER, IDENTITY, U256::ZERO, data.clone(), 10))
            .unwrap();
        assert_eq!(frame.instruction_result(), InstructionResult::PrecompileOOG);
        assert_eq!(frame.result.gas.remaining(), 0);

        let frame = evm
            .run_message(Message::call(CALLER, IDENTITY, U256::ZERO, data.clone(), 100))
            .unwrap();
        assert_eq!(frame.instruction_result(), InstructionResult::Return);
        assert_eq!(frame.result.output, data);
        assert_eq!(frame.result.gas.spent(), 15 + 2 * 3);
    }

    #[test]
    fn create_rejects_ef_prefix() {
        let mut evm = evm(SpecId::LONDON);
        // mstore8(0, 0xef) return(0, 1)
        let init = [PUSH1, 0xef, PUSH1, 0x00, MSTORE8, PUSH1, 0x01, PUSH1, 0x00, RETURN];
        let message = Message::create(CALLER, U256::ZERO, Bytes::copy_from_slice(&init), 100_000);
        let frame = evm.run_message(message).unwrap();
        assert_eq!(
            frame.instruction_result(),
            InstructionResult::CreateContractStartingWithEF
        );
        assert_eq!(frame.result.gas.remaining(), 0);
        assert!(frame.created.is_empty());
        // the nonce bump survives the failed creation
        assert_eq!(evm.ctx.state.account_or_default(CALLER).unwrap().nonce, 1);
    }

    #[test]
    fn create_deploys_returned_code() {
        let mut evm = evm(SpecId::CANCUN);
        // mstore8(0, 0x00) return(0, 1)
        let init = [PUSH1, 0x00, PUSH1, 0x00, MSTORE8, PUSH1, 0x01, PUSH1, 0x00, RETURN];
        let message = Message::create(CALLER, U256::ZERO, Bytes::copy_from_slice(&init), 100_000);
        let expected = message.created_address(0);
        let frame = evm.run_message(message).unwrap();
        assert_eq!(frame.instruction_result(), InstructionResult::Return);
        assert_eq!(frame.created_address, Some(expected));
        assert!(frame.created.contains(&expected));

        let account = evm.ctx.state.account(expected).unwrap().unwrap();
        assert_eq!(account.nonce, 1);
        assert_eq!(evm.ctx.state.code(account.code_hash).unwrap().bytes_slice(), &[0x00]);
    }

    #[test]
    fn create_collision_spends_everything() {
        let mut evm = evm(SpecId::CANCUN);
        let message = Message::create(CALLER, U256::ZERO, Bytes::new(), 100_000);
        let address = message.created_address(0);
        evm.ctx
            .state
            .put_account(address, AccountInfo::default().with_nonce(1));
        let frame = evm.run_message(message).unwrap();
        assert_eq!(frame.instruction_result(), InstructionResult::CreateCollision);
        assert_eq!(frame.result.gas.remaining(), 0);
        assert_eq!(frame.created_address, None);
    }

    #[test]
    fn selfdestruct_only_deletes_same_transaction_contracts() {
        let beneficiary = address!("0x000000000000000000000000000000000000cccc");
        let mut code = vec![PUSH20];
        code.extend_from_slice(beneficiary.as_slice());
        code.push(SELFDESTRUCT);

        let mut evm = evm(SpecId::CANCUN);
        deploy(&mut evm, TARGET, &code);
        let frame = call(&mut evm, 5, 100_000);
        assert_eq!(frame.instruction_result(), InstructionResult::SelfDestruct);
        assert!(frame.selfdestructs.is_empty());
        let balance = evm.ctx.state.account_or_default(beneficiary).unwrap().balance;
        assert_eq!(balance, U256::from(5));

        let mut evm = self::evm(SpecId::SHANGHAI);
        deploy(&mut evm, TARGET, &code);
        let frame = call(&mut evm, 5, 100_000);
        assert!(frame.selfdestructs.contains(&TARGET));
    }

    #[test]
    fn transact_plain_transfer() {
        let mut evm = evm(SpecId::CANCUN);
        evm.ctx.env.block.basefee = U256::from(1);
        let tx = TxEnv {
            caller: CALLER,
            kind: TxKind::Call(TARGET),
            value: U256::from(100),
            gas_limit: 21_000,
            gas_price: U256::from(2),
            ..Default::default()
        };
        let outcome = evm.transact(tx).unwrap();
        assert!(outcome.result.is_success());
        assert_eq!(outcome.result.gas_used(), 21_000);

        let caller = evm.ctx.state.account_or_default(CALLER).unwrap();
        assert_eq!(caller.nonce, 1);
        assert_eq!(caller.balance, U256::from(1_000_000_000u64 - 100 - 42_000));
        let coinbase = evm.ctx.state.account_or_default(Address::ZERO).unwrap();
        assert_eq!(coinbase.balance, U256::from(21_000));
        assert_eq!(evm.ctx.depth(), 0);
    }

    #[test]
    fn rejected_transaction_changes_nothing() {
        let mut evm = evm(SpecId::CANCUN);
        let tx = TxEnv {
            caller: CALLER,
            kind: TxKind::Call(TARGET),
            nonce: 3,
            gas_limit: 21_000,
            ..Default::default()
        };
        assert!(matches!(
            evm.transact(tx),
            Err(EvmError::Transaction(InvalidTransaction::NonceTooHigh { tx: 3, state: 0 }))
        ));
        assert_eq!(evm.ctx.state.account_or_default(CALLER).unwrap().nonce, 0);
    }

    #[test]
    fn tracing_inspector_counts_steps() {
        let mut evm = evm(SpecId::CANCUN).with_inspector(TracingInspector::new());
        let code = [PUSH1, 0x01, PUSH1, 0x02, ADD, STOP];
        let code_hash = evm
            .ctx
            .state
            .put_code(Bytecode::new_raw(Bytes::copy_from_slice(&code)));
        evm.ctx
            .state
            .put_account(TARGET, AccountInfo::default().with_code_hash(code_hash));
        let tx = TxEnv {
            caller: CALLER,
            kind: TxKind::Call(TARGET),
            gas_limit: 50_000,
            ..Default::default()
        };
        let outcome = evm.transact(tx).unwrap();
        assert!(matches!(outcome.result, ExecutionResult::Success { .. }));
        assert_eq!(evm.inspector.steps(), 4);
    }
}
