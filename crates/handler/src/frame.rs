//! Message frames: value transfer, precompile dispatch, code execution and deployment.
use crate::{
    checkpoint::CheckpointGuard,
    evm::{Evm, Substate},
    inspector::Inspector,
    message::Message,
    result::FrameResult,
};
use bytecode::Bytecode;
use core::mem;
use interpreter::{gas, Contract, Gas, InstructionResult, Interpreter, InterpreterResult};
use primitives::{Bytes, Features, CALL_STACK_LIMIT};
use state::{AccountInfo, BackingStore, StateError};
use tracing::debug;

/// First byte reserved for EOF containers (EIP-3541).
const EOF_MAGIC: u8 = 0xEF;

impl<S: BackingStore, I: Inspector<S>> Evm<S, I> {
    /// Executes `message` in a frame of its own.
    ///
    /// Failures of the frame are reported in the result. `Err` is reserved for backing store
    /// failures, which abort the whole execution.
    pub(crate) fn execute(&mut self, message: Message) -> Result<FrameResult, StateError<S::Error>> {
        debug!(
            target: "handler",
            depth = message.depth,
            caller = %message.caller,
            to = ?message.to,
            value = %message.value,
            gas_limit = message.gas_limit,
            "frame start"
        );

        let parent_depth = mem::replace(&mut self.depth, message.depth);
        let parent = mem::replace(&mut self.substate, Substate::from_message(&message));
        let result = if message.is_create() {
            self.create_frame(&message)
        } else {
            self.call_frame(&message)
        };
        let substate = mem::replace(&mut self.substate, parent);
        self.depth = parent_depth;

        let mut frame = result?;
        if frame.is_ok() {
            frame.logs = substate.logs;
            frame.selfdestructs = substate
                .selfdestruct
                .difference(&message.selfdestruct)
                .copied()
                .collect();
            frame.created = substate.created.difference(&message.created).copied().collect();
        }

        debug!(
            target: "handler",
            depth = message.depth,
            result = ?frame.instruction_result(),
            gas_used = frame.result.gas.spent(),
            "frame end"
        );
        Ok(frame)
    }

    fn call_frame(&mut self, message: &Message) -> Result<FrameResult, StateError<S::Error>> {
        let gas = Gas::new(message.gas_limit);
        let halt = |result| Ok(FrameResult::new(InterpreterResult::new(result, Bytes::new(), gas)));
        let Some(target) = message.to else {
            return halt(InstructionResult::FatalExternalError);
        };

        if message.depth > CALL_STACK_LIMIT {
            return halt(InstructionResult::CallTooDeep);
        }
        if message.transfers_value() {
            let balance = self.ctx.state.account_or_default(message.caller)?.balance;
            if balance < message.value {
                return halt(InstructionResult::OutOfFunds);
            }
        }

        let mut evm = CheckpointGuard::new(self);
        if !message.delegatecall {
            evm.transfer(message.caller, target, message.value)?;
        }

        let precompile = evm
            .precompiles()
            .dispatch(&message.code_address, &message.data, message.gas_limit);
        if let Some(outcome) = precompile {
            let mut gas = gas;
            let result = match outcome {
                Ok(output) if gas.record_cost(output.gas_used) => {
                    evm.commit()?;
                    InterpreterResult::new(InstructionResult::Return, output.bytes, gas)
                }
                Ok(_) => {
                    InterpreterResult::new_halt(InstructionResult::PrecompileOOG, message.gas_limit)
                }
                Err(error) => {
                    debug!(target: "handler", %error, address = %message.code_address, "precompile failed");
                    let result = if error.is_oog() {
                        InstructionResult::PrecompileOOG
                    } else {
                        InstructionResult::PrecompileError
                    };
                    InterpreterResult::new_halt(result, message.gas_limit)
                }
            };
            return Ok(FrameResult::new(result));
        }

        let code = match &message.code {
            Some(code) => code.clone(),
            None => evm.ctx.state.code_by_address(message.code_address)?,
        };
        if code.is_empty() {
            evm.commit()?;
            return halt(InstructionResult::Stop);
        }

        let mut contract = Contract::new(
            message.data.clone(),
            code,
            target,
            message.caller,
            message.value,
        );
        contract.bytecode_address = message.code_address;
        let features = evm.ctx.features();
        let mut interpreter = Interpreter::new(
            contract,
            message.gas_limit,
            message.is_static,
            message.depth,
            features,
        );
        let result = evm.run_interpreter(&mut interpreter)?;
        if result.is_ok() {
            evm.commit()?;
        }
        Ok(FrameResult::new(result))
    }

    fn create_frame(&mut self, message: &Message) -> Result<FrameResult, StateError<S::Error>> {
        let gas_limit = message.gas_limit;
        let halt = |result| {
            Ok(FrameResult::new(InterpreterResult::new(
                result,
                Bytes::new(),
                Gas::new(gas_limit),
            )))
        };

        if message.depth > CALL_STACK_LIMIT {
            return halt(InstructionResult::CallTooDeep);
        }
        let mut caller = self.ctx.state.account_or_default(message.caller)?;
        if caller.balance < message.value {
            return halt(InstructionResult::OutOfFunds);
        }

        // EIP-2681: Limit account nonce to 2^64-1
        let nonce = caller.nonce;
        let Some(next_nonce) = nonce.checked_add(1) else {
            return halt(InstructionResult::NonceOverflow);
        };
        caller.nonce = next_nonce;
        self.ctx.state.put_account(message.caller, caller);

        let address = message.created_address(nonce);
        self.ctx.journal.warm(address);
        let features = self.ctx.features();

        let mut evm = CheckpointGuard::new(self);
        if let Some(existing) = evm.ctx.state.account(address)? {
            if existing.nonce != 0 || existing.has_code() {
                debug!(target: "handler", %address, "create collision");
                return Ok(FrameResult::new(InterpreterResult::new_halt(
                    InstructionResult::CreateCollision,
                    gas_limit,
                )));
            }
        }

        // EIP-161: State trie clearing
        let mut account = evm.ctx.state.account_or_default(address)?;
        if features.contains(Features::EIP161) {
            account.nonce = 1;
        }
        evm.ctx.state.put_account(address, account);
        evm.transfer(message.caller, address, message.value)?;
        evm.substate.created.insert(address);

        let contract = Contract::new(
            Bytes::new(),
            Bytecode::new_raw(message.data.clone()),
            address,
            message.caller,
            message.value,
        );
        let mut interpreter = Interpreter::new(contract, gas_limit, false, message.depth, features);
        let mut result = evm.run_interpreter(&mut interpreter)?;
        if !result.is_ok() {
            return Ok(FrameResult::new(result));
        }

        let fail = |result: &mut InterpreterResult, outcome| {
            result.result = outcome;
            result.gas.spend_all();
            result.gas.set_refund(0);
            result.output = Bytes::new();
        };

        // EIP-3541: Reject new contract code starting with the 0xEF byte
        if features.contains(Features::EIP3541) && result.output.first() == Some(&EOF_MAGIC) {
            fail(&mut result, InstructionResult::CreateContractStartingWithEF);
            return Ok(FrameResult::new(result));
        }

        // EIP-170: Contract code size limit
        if features.contains(Features::EIP170) && result.output.len() > evm.ctx.env.cfg.max_code_size()
        {
            fail(&mut result, InstructionResult::CreateContractSizeLimit);
            return Ok(FrameResult::new(result));
        }

        let deposit = result.output.len() as u64 * gas::CODEDEPOSIT;
        if !result.gas.record_cost(deposit) {
            // EIP-2: Homestead hard-fork changes
            if features.contains(Features::EIP2) {
                fail(&mut result, InstructionResult::CodeStoreOutOfGas);
                return Ok(FrameResult::new(result));
            }
            // Frontier keeps the account but deploys no code.
            result.output = Bytes::new();
        }

        let code_hash = evm
            .ctx
            .state
            .put_code(Bytecode::new_raw(result.output.clone()));
        let account = evm.ctx.state.account_or_default(address)?;
        evm.ctx.state.put_account(address, AccountInfo { code_hash, ..account });
        evm.commit()?;

        result.result = InstructionResult::Return;
        let mut frame = FrameResult::new(result);
        frame.created_address = Some(address);
        Ok(frame)
    }
}
