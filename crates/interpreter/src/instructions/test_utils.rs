use crate::{Contract, DummyHost, InstructionTables, Interpreter, InterpreterResult};
use bytecode::Bytecode;
use primitives::{address, Address, Bytes, Features, SpecId, U256};

pub(crate) const TARGET: Address = address!("0000000000000000000000000000000000001000");
pub(crate) const CALLER: Address = address!("0000000000000000000000000000000000002000");

const GAS_LIMIT: u64 = 1_000_000;

fn frame(code: Bytes, input: Bytes, features: Features, gas_limit: u64, is_static: bool) -> Interpreter {
    let contract = Contract::new(input, Bytecode::new_raw(code), TARGET, CALLER, U256::ZERO);
    Interpreter::new(contract, gas_limit, is_static, 0, features)
}

pub(crate) fn run_with_host_gas(
    code: Bytes,
    features: Features,
    host: &mut DummyHost,
    gas_limit: u64,
) -> (Interpreter, InterpreterResult) {
    let mut interpreter = frame(code, Bytes::new(), features, gas_limit, false);
    let tables = InstructionTables::<DummyHost>::new(features);
    let result = interpreter.run(&tables, host);
    (interpreter, result)
}

pub(crate) fn run_with_host(
    code: Bytes,
    features: Features,
    host: &mut DummyHost,
) -> (Interpreter, InterpreterResult) {
    run_with_host_gas(code, features, host, GAS_LIMIT)
}

pub(crate) fn run_frame(
    code: Bytes,
    input: Bytes,
    features: Features,
) -> (Interpreter, InterpreterResult) {
    let mut interpreter = frame(code, input, features, GAS_LIMIT, false);
    let tables = InstructionTables::<DummyHost>::new(features);
    let result = interpreter.run(&tables, &mut DummyHost::default());
    (interpreter, result)
}

pub(crate) fn run_code(code: Bytes, features: Features) -> (Interpreter, InterpreterResult) {
    run_frame(code, Bytes::new(), features)
}

pub(crate) fn run_static(code: Bytes, features: Features) -> (Interpreter, InterpreterResult) {
    let mut interpreter = frame(code, Bytes::new(), features, GAS_LIMIT, true);
    let tables = InstructionTables::<DummyHost>::new(features);
    let result = interpreter.run(&tables, &mut DummyHost::default());
    (interpreter, result)
}

/// Runs `ops` on a stack preloaded with `stack`, bottom first, and returns the final stack.
pub(crate) fn run_ops(stack: &[U256], ops: &[u8], spec: SpecId) -> Vec<U256> {
    let features = Features::for_spec(spec);
    let mut interpreter = frame(Bytes::copy_from_slice(ops), Bytes::new(), features, GAS_LIMIT, false);
    for value in stack {
        assert!(interpreter.stack.push(*value));
    }
    let tables = InstructionTables::<DummyHost>::new(features);
    let result = interpreter.run(&tables, &mut DummyHost::default());
    assert!(result.is_ok(), "{:?}", result.result);
    interpreter.stack.data().to_vec()
}
