mod contract;
mod memory;
mod stack;

pub use contract::Contract;
pub use memory::{num_words, num_words_usize, Memory};
pub use stack::{Stack, STACK_LIMIT};

use crate::{Gas, Host, InstructionResult, InstructionTables, InterpreterResult};
use bytecode::opcode::info_for;
use core::ops::Range;
use primitives::{Bytes, Features, U256};

/// State of one executing frame.
#[derive(Debug)]
pub struct Interpreter {
    /// Code, call data and identities of the frame.
    pub contract: Contract,
    /// Index of the next opcode in the code.
    pub pc: usize,
    /// Gas accounting of the frame.
    pub gas: Gas,
    /// Operand stack.
    pub stack: Stack,
    /// Frame memory.
    pub memory: Memory,
    /// Output of the last sub call or create.
    pub return_data_buffer: Bytes,
    /// EIP-2315 return addresses.
    pub return_stack: Vec<usize>,
    /// Set by an instruction to stop the loop. `Continue` while running.
    pub instruction_result: InstructionResult,
    /// Set inside `STATICCALL`, forbids state changes.
    pub is_static: bool,
    /// Call depth of the frame, zero for the transaction's frame.
    pub depth: usize,
    /// Active feature set.
    pub features: Features,
    /// Data handed back by `RETURN` or `REVERT`.
    pub output: Bytes,
}

impl Interpreter {
    /// Creates a new interpreter instance for a frame.
    pub fn new(
        contract: Contract,
        gas_limit: u64,
        is_static: bool,
        depth: usize,
        features: Features,
    ) -> Self {
        Self {
            contract,
            pc: 0,
            gas: Gas::new(gas_limit),
            stack: Stack::new(),
            memory: Memory::new(),
            return_data_buffer: Bytes::new(),
            return_stack: Vec::new(),
            instruction_result: InstructionResult::Continue,
            is_static,
            depth,
            features,
            output: Bytes::new(),
        }
    }

    /// Returns the opcode at the current program counter, `STOP` past the end of the code.
    #[inline]
    pub fn current_opcode(&self) -> u8 {
        self.contract.bytecode.opcode_at(self.pc)
    }

    /// Immediate of the `PUSH<len>` being executed, read from the code analysis.
    ///
    /// Expects the program counter to point just past the opcode.
    #[inline]
    pub fn immediate(&self, len: usize) -> U256 {
        if len == 0 {
            return U256::ZERO;
        }
        self.contract
            .bytecode
            .jump_table()
            .push_value(self.pc.wrapping_sub(1))
            .unwrap_or_default()
    }

    /// Copies `output` into memory at `range`, truncated to the range length.
    ///
    /// The range was sized and charged when the call was set up.
    pub fn write_return(&mut self, range: Range<usize>, output: &[u8]) {
        let target_len = range.len().min(output.len());
        if target_len > 0 {
            self.memory.set(range.start, &output[..target_len]);
        }
    }

    /// Executes one instruction.
    ///
    /// Dispatch order: host hook, activation check, static gas, program counter bump, handler,
    /// closing host hook.
    #[inline]
    pub fn step<H: Host + ?Sized>(&mut self, tables: &InstructionTables<H>, host: &mut H) {
        host.step(self);
        if self.instruction_result != InstructionResult::Continue {
            return;
        }

        let opcode = self.current_opcode();
        let idx = opcode as usize;
        if !tables.enabled[idx] {
            self.instruction_result = if info_for(opcode, self.features).is_some() {
                InstructionResult::NotActivated
            } else {
                InstructionResult::OpcodeNotFound
            };
        } else if !self.gas.record_cost(tables.static_gas[idx]) {
            self.instruction_result = InstructionResult::OutOfGas;
        } else {
            self.pc += 1;
            (tables.handlers[idx])(self, host);
        }

        host.step_end(self);
    }

    /// Runs the frame until an instruction stops it.
    ///
    /// Exceptional halts consume all remaining gas and drop the output.
    pub fn run<H: Host + ?Sized>(
        &mut self,
        tables: &InstructionTables<H>,
        host: &mut H,
    ) -> InterpreterResult {
        while self.instruction_result == InstructionResult::Continue {
            self.step(tables, host);
        }

        let mut output = core::mem::take(&mut self.output);
        if self.instruction_result.is_error() {
            self.gas.spend_all();
            self.gas.set_refund(0);
            output = Bytes::new();
        }
        InterpreterResult::new(self.instruction_result, output, self.gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DummyHost;
    use bytecode::Bytecode;
    use primitives::{bytes, SpecId, U256};

    fn run(code: Bytes, gas_limit: u64, spec: SpecId) -> (Interpreter, InterpreterResult) {
        let features = Features::for_spec(spec);
        let contract = Contract::new(
            Bytes::new(),
            Bytecode::new_raw(code),
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interpreter = Interpreter::new(contract, gas_limit, false, 0, features);
        let tables = InstructionTables::<DummyHost>::new(features);
        let mut host = DummyHost::default();
        let result = interpreter.run(&tables, &mut host);
        (interpreter, result)
    }

    #[test]
    fn add_and_return() {
        // PUSH1 1 PUSH1 2 ADD PUSH1 0 MSTORE PUSH1 32 PUSH1 0 RETURN
        let (_, result) = run(
            bytes!("600160020160005260206000f3"),
            100_000,
            SpecId::CANCUN,
        );
        assert_eq!(result.result, InstructionResult::Return);
        assert_eq!(U256::from_be_slice(&result.output), U256::from(3));
        // five pushes, ADD, MSTORE and one word of memory
        assert_eq!(result.gas.spent(), 5 * 3 + 3 + 3 + 3);
    }

    #[test]
    fn end_of_code_is_stop() {
        let (interpreter, result) = run(bytes!("6001"), 100, SpecId::CANCUN);
        assert_eq!(result.result, InstructionResult::Stop);
        assert_eq!(interpreter.stack.len(), 1);
        assert_eq!(result.gas.spent(), 3);
    }

    #[test]
    fn truncated_push_is_zero_padded() {
        let (interpreter, _) = run(bytes!("61ff"), 100, SpecId::CANCUN);
        assert_eq!(interpreter.stack.peek(0), Some(U256::from(0xff00)));
    }

    #[test]
    fn push_uses_the_code_analysis() {
        let (interpreter, _) = run(bytes!("600a600b01"), 100, SpecId::CANCUN);
        assert!(interpreter.contract.bytecode.is_analyzed());
        assert_eq!(interpreter.stack.peek(0), Some(U256::from(0x15)));
    }

    #[test]
    fn halts_consume_all_gas() {
        let (_, result) = run(bytes!("fe"), 1000, SpecId::CANCUN);
        assert_eq!(result.result, InstructionResult::InvalidFEOpcode);
        assert_eq!(result.gas.remaining(), 0);
        assert!(result.output.is_empty());

        let (_, result) = run(bytes!("0c"), 1000, SpecId::CANCUN);
        assert_eq!(result.result, InstructionResult::OpcodeNotFound);
    }

    #[test]
    fn inactive_opcode() {
        // PUSH0 before Shanghai
        let (_, result) = run(bytes!("5f"), 1000, SpecId::MERGE);
        assert_eq!(result.result, InstructionResult::NotActivated);
        let (_, result) = run(bytes!("5f"), 1000, SpecId::SHANGHAI);
        assert_eq!(result.result, InstructionResult::Stop);
    }

    #[test]
    fn static_gas_out_of_gas() {
        let (_, result) = run(bytes!("600160020a"), 6, SpecId::CANCUN);
        assert_eq!(result.result, InstructionResult::OutOfGas);
    }

    #[test]
    fn memory_only_grows() {
        // MSTORE at 64, then MLOAD at 0, MSIZE stays 96
        let (interpreter, _) = run(bytes!("60016040526000515900"), 100_000, SpecId::CANCUN);
        assert_eq!(interpreter.memory.len(), 96);
        assert_eq!(interpreter.stack.peek(0), Some(U256::from(96)));
    }
}
