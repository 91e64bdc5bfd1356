use crate::{
    gas::{self, CALL_STIPEND, SELFDESTRUCT_REFUND},
    Host, InstructionResult, Interpreter,
};
use primitives::{Address, Bytes, Features, Log, LogData, B256, U256};

pub fn balance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let address = Address::from_word(B256::from(*top));
    let balance = host_or_fail!(interpreter, host.balance(address));
    gas!(
        interpreter,
        gas::cold_account_surcharge(interpreter.features, balance.is_cold)
    );
    *top = balance.data;
}

/// EIP-1884: Repricing for trie-size-dependent opcodes
pub fn selfbalance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    let balance = host_or_fail!(
        interpreter,
        host.balance(interpreter.contract.target_address)
    );
    push!(interpreter, balance.data);
}

pub fn extcodesize<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let address = Address::from_word(B256::from(*top));
    let code = host_or_fail!(interpreter, host.code(address));
    gas!(
        interpreter,
        gas::cold_account_surcharge(interpreter.features, code.is_cold)
    );
    *top = U256::from(code.data.len());
}

/// EIP-1052: EXTCODEHASH opcode
pub fn extcodehash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let address = Address::from_word(B256::from(*top));
    let code_hash = host_or_fail!(interpreter, host.code_hash(address));
    gas!(
        interpreter,
        gas::cold_account_surcharge(interpreter.features, code_hash.is_cold)
    );
    *top = code_hash.data.into();
}

pub fn extcodecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([address, memory_offset, code_offset, len_u256], interpreter);
    let address = Address::from_word(B256::from(address));
    let code = host_or_fail!(interpreter, host.code(address));

    let len = as_usize_or_fail!(interpreter, len_u256);
    gas_or_fail!(
        interpreter,
        gas::copy_cost(len as u64).map(|cost| {
            cost + gas::cold_account_surcharge(interpreter.features, code.is_cold)
        })
    );
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = as_usize_saturated!(code_offset);
    resize_memory!(interpreter, memory_offset, len);

    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, code.data.bytes_slice());
}

pub fn blockhash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], number, interpreter);
    let requested = as_u64_saturated!(number);
    let hash = host_or_fail!(interpreter, host.block_hash(requested));
    *number = hash.into();
}

pub fn sload<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], index, interpreter);
    let value = host_or_fail!(
        interpreter,
        host.sload(interpreter.contract.target_address, *index)
    );
    gas!(
        interpreter,
        gas::cold_sload_surcharge(interpreter.features, value.is_cold)
    );
    *index = value.data;
}

pub fn sstore<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);

    popn!([index, value], interpreter);

    // EIP-2200: Structured Definitions for Net Gas Metering
    if interpreter.features.contains(Features::EIP2200) && interpreter.gas.remaining() <= CALL_STIPEND {
        interpreter.instruction_result = InstructionResult::OutOfGas;
        return;
    }

    let state_load = host_or_fail!(
        interpreter,
        host.sstore(interpreter.contract.target_address, index, value)
    );
    gas!(
        interpreter,
        gas::sstore_cost(interpreter.features, &state_load.data, state_load.is_cold)
    );
    interpreter
        .gas
        .record_refund(gas::sstore_refund(interpreter.features, &state_load.data));
}

/// EIP-1153: Transient storage opcodes
/// Store value to transient storage
pub fn tstore<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);

    popn!([index, value], interpreter);

    host.tstore(interpreter.contract.target_address, index, value);
}

/// EIP-1153: Transient storage opcodes
/// Load value from transient storage
pub fn tload<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], index, interpreter);

    *index = host.tload(interpreter.contract.target_address, *index);
}

pub fn log<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);

    popn!([offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::log_cost(len as u64));
    let data = if len == 0 {
        Bytes::new()
    } else {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        Bytes::copy_from_slice(interpreter.memory.slice(offset, len))
    };

    if interpreter.stack.len() < N {
        interpreter.instruction_result = InstructionResult::StackUnderflow;
        return;
    }
    let mut topics = Vec::with_capacity(N);
    for _ in 0..N {
        let Some(topic) = interpreter.stack.pop() else {
            interpreter.instruction_result = InstructionResult::StackUnderflow;
            return;
        };
        topics.push(B256::from(topic));
    }

    let log = Log {
        address: interpreter.contract.target_address,
        data: LogData::new_unchecked(topics, data),
    };

    host.log(log);
}

pub fn selfdestruct<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);
    popn!([target], interpreter);
    let target = Address::from_word(B256::from(target));

    let res = host_or_fail!(
        interpreter,
        host.selfdestruct(interpreter.contract.target_address, target)
    );

    // EIP-3529: Reduction in refunds
    if !interpreter.features.contains(Features::EIP3529) && !res.data.previously_destroyed {
        interpreter.gas.record_refund(SELFDESTRUCT_REFUND);
    }
    gas!(
        interpreter,
        gas::selfdestruct_cost(interpreter.features, &res.data, res.is_cold)
    );

    interpreter.instruction_result = InstructionResult::SelfDestruct;
}

#[cfg(test)]
mod tests {
    use crate::instructions::test_utils::{run_static, run_with_host, run_with_host_gas};
    use crate::{DummyHost, InstructionResult};
    use primitives::{bytes, Features, SpecId, U256};

    #[test]
    fn sstore_sentry() {
        let mut host = DummyHost::default();
        // PUSH1 1 PUSH1 0 SSTORE with 2306 gas: 2300 left at SSTORE
        let (_, result) = run_with_host_gas(
            bytes!("6001600055"),
            Features::for_spec(SpecId::ISTANBUL),
            &mut host,
            2306,
        );
        assert_eq!(result.result, InstructionResult::OutOfGas);
        assert!(host.storage.get(&U256::ZERO).is_none());
    }

    #[test]
    fn cold_then_warm_sload() {
        let mut host = DummyHost::default();
        // SLOAD(0) twice
        let (_, result) =
            run_with_host(bytes!("5f545f5400"), Features::for_spec(SpecId::SHANGHAI), &mut host);
        assert_eq!(result.gas.spent(), 2 + 2100 + 2 + 100);
    }

    #[test]
    fn log_records_topics_in_order() {
        let mut host = DummyHost::default();
        // LOG2 with topics 1 and 2, empty data
        let (_, result) = run_with_host(
            bytes!("600260015f5fa200"),
            Features::for_spec(SpecId::CANCUN),
            &mut host,
        );
        assert_eq!(result.result, InstructionResult::Stop);
        let topics = host.log[0].topics();
        assert_eq!(U256::from_be_bytes(topics[0].0), U256::from(1));
        assert_eq!(U256::from_be_bytes(topics[1].0), U256::from(2));
    }

    #[test]
    fn state_change_in_static_frame() {
        let cancun = Features::for_spec(SpecId::CANCUN);
        for code in [bytes!("6001600055"), bytes!("5f5fa0"), bytes!("60015f5d"), bytes!("5fff")] {
            let (_, result) = run_static(code, cancun);
            assert_eq!(result.result, InstructionResult::StateChangeDuringStaticCall);
        }
    }
}
