//! Execution observers.
use auto_impl::auto_impl;
use context::Context;
use interpreter::{
    opcode::info_for, CallInputs, CallOutcome, CreateInputs, CreateOutcome, Interpreter,
};
use primitives::{Address, Log, U256};
use tracing::{debug, trace};

/// EVM [Interpreter] callbacks.
///
/// Every method has an empty default, implement only what you need.
#[auto_impl(&mut, Box)]
pub trait Inspector<S> {
    /// Called before the interpreter of a frame starts running.
    #[inline]
    fn initialize_interp(&mut self, interp: &mut Interpreter, context: &mut Context<S>) {
        let _ = interp;
        let _ = context;
    }

    /// Called before every instruction.
    ///
    /// Setting `interp.instruction_result` to anything other than `Continue` stops the frame
    /// before the instruction runs.
    #[inline]
    fn step(&mut self, interp: &mut Interpreter, context: &mut Context<S>) {
        let _ = interp;
        let _ = context;
    }

    /// Called after every instruction, including the one that stopped the frame.
    #[inline]
    fn step_end(&mut self, interp: &mut Interpreter, context: &mut Context<S>) {
        let _ = interp;
        let _ = context;
    }

    /// Called when a log is emitted.
    #[inline]
    fn log(&mut self, context: &mut Context<S>, log: &Log) {
        let _ = context;
        let _ = log;
    }

    /// Called before a message call is executed.
    ///
    /// Returning an outcome skips the call and uses it instead.
    #[inline]
    fn call(&mut self, context: &mut Context<S>, inputs: &mut CallInputs) -> Option<CallOutcome> {
        let _ = context;
        let _ = inputs;
        None
    }

    /// Called when a message call has concluded. `outcome` may be modified.
    #[inline]
    fn call_end(&mut self, context: &mut Context<S>, inputs: &CallInputs, outcome: &mut CallOutcome) {
        let _ = context;
        let _ = inputs;
        let _ = outcome;
    }

    /// Called before a contract creation is executed.
    ///
    /// Returning an outcome skips the creation and uses it instead.
    #[inline]
    fn create(
        &mut self,
        context: &mut Context<S>,
        inputs: &mut CreateInputs,
    ) -> Option<CreateOutcome> {
        let _ = context;
        let _ = inputs;
        None
    }

    /// Called when a contract creation has concluded. `outcome` may be modified.
    #[inline]
    fn create_end(
        &mut self,
        context: &mut Context<S>,
        inputs: &CreateInputs,
        outcome: &mut CreateOutcome,
    ) {
        let _ = context;
        let _ = inputs;
        let _ = outcome;
    }

    /// Called when a contract self-destructs, moving `value` to `target`.
    #[inline]
    fn selfdestruct(&mut self, contract: Address, target: Address, value: U256) {
        let _ = contract;
        let _ = target;
        let _ = value;
    }
}

/// Dummy [Inspector], helpful as standalone replacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoOpInspector;

impl<S> Inspector<S> for NoOpInspector {}

/// Emits a `trace` event per executed opcode and a `debug` event per frame.
///
/// Events go to the `stratum::trace` target, enable them with a subscriber filter such as
/// `RUST_LOG=stratum::trace=trace`.
#[derive(Clone, Debug, Default)]
pub struct TracingInspector {
    pc: usize,
    opcode: u8,
    gas_remaining: u64,
    steps: u64,
}

impl TracingInspector {
    /// Creates a new tracer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl<S> Inspector<S> for TracingInspector {
    fn step(&mut self, interp: &mut Interpreter, _: &mut Context<S>) {
        self.pc = interp.pc;
        self.opcode = interp.current_opcode();
        self.gas_remaining = interp.gas.remaining();
    }

    fn step_end(&mut self, interp: &mut Interpreter, _: &mut Context<S>) {
        self.steps += 1;
        let name = info_for(self.opcode, interp.features).map_or("UNKNOWN", |info| info.name());
        trace!(
            target: "stratum::trace",
            depth = interp.depth,
            pc = self.pc,
            op = name,
            gas = self.gas_remaining,
            gas_cost = self.gas_remaining.saturating_sub(interp.gas.remaining()),
            refund = interp.gas.refunded(),
            stack = interp.stack.len(),
            memory = interp.memory.len(),
            result = ?interp.instruction_result,
        );
    }

    fn log(&mut self, _: &mut Context<S>, log: &Log) {
        debug!(target: "stratum::trace", address = %log.address, topics = log.topics().len(), "log");
    }

    fn call(&mut self, _: &mut Context<S>, inputs: &mut CallInputs) -> Option<CallOutcome> {
        debug!(
            target: "stratum::trace",
            scheme = ?inputs.scheme,
            caller = %inputs.caller,
            target = %inputs.target_address,
            gas_limit = inputs.gas_limit,
            "call"
        );
        None
    }

    fn call_end(&mut self, _: &mut Context<S>, _: &CallInputs, outcome: &mut CallOutcome) {
        debug!(
            target: "stratum::trace",
            result = ?outcome.result.result,
            gas_used = outcome.result.gas.spent(),
            "call end"
        );
    }

    fn create(&mut self, _: &mut Context<S>, inputs: &mut CreateInputs) -> Option<CreateOutcome> {
        debug!(
            target: "stratum::trace",
            scheme = ?inputs.scheme,
            caller = %inputs.caller,
            gas_limit = inputs.gas_limit,
            "create"
        );
        None
    }

    fn create_end(&mut self, _: &mut Context<S>, _: &CreateInputs, outcome: &mut CreateOutcome) {
        debug!(
            target: "stratum::trace",
            result = ?outcome.result.result,
            address = ?outcome.address,
            "create end"
        );
    }

    fn selfdestruct(&mut self, contract: Address, target: Address, value: U256) {
        debug!(target: "stratum::trace", %contract, %target, %value, "selfdestruct");
    }
}
