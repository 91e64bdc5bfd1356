mod call_helpers;

pub use call_helpers::{calc_call_gas, get_memory_input_and_out_ranges};

use crate::{
    gas::{self, CALL_STIPEND},
    return_ok, return_revert, CallInputs, CallOutcome, CallScheme, CallValue, CreateInputs,
    CreateOutcome, CreateScheme, Host, InstructionResult, Interpreter,
};
use primitives::{Address, Bytes, Features, B256, U256};

pub fn create<const IS_CREATE2: bool, H: Host + ?Sized>(
    interpreter: &mut Interpreter,
    host: &mut H,
) {
    require_non_staticcall!(interpreter);

    popn!([value, code_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);

    let mut code = Bytes::new();
    if len != 0 {
        // EIP-3860: Limit and meter initcode
        if interpreter.features.contains(Features::EIP3860) {
            if len > host.env().cfg.max_initcode_size() {
                interpreter.instruction_result = InstructionResult::CreateInitCodeSizeLimit;
                return;
            }
            gas!(interpreter, gas::initcode_cost(len as u64));
        }

        let code_offset = as_usize_or_fail!(interpreter, code_offset);
        resize_memory!(interpreter, code_offset, len);
        code = Bytes::copy_from_slice(interpreter.memory.slice(code_offset, len));
    }

    // EIP-1014: Skinny CREATE2
    let scheme = if IS_CREATE2 {
        popn!([salt], interpreter);
        gas_or_fail!(interpreter, gas::create2_cost(len as u64));
        CreateScheme::Create2 { salt }
    } else {
        CreateScheme::Create
    };

    let mut gas_limit = interpreter.gas.remaining();

    // EIP-150: Gas cost changes for IO-heavy operations
    if interpreter.features.contains(Features::EIP150) {
        // take remaining gas and deduce l64 part of it.
        gas_limit -= gas_limit / 64
    }
    gas!(interpreter, gas_limit);

    let mut inputs = CreateInputs {
        caller: interpreter.contract.target_address,
        scheme,
        value,
        init_code: code,
        gas_limit,
    };
    let outcome = host.create(&mut inputs);
    insert_create_outcome(interpreter, outcome);
}

/// Applies a finished creation to the calling frame.
pub fn insert_create_outcome(interpreter: &mut Interpreter, outcome: CreateOutcome) {
    let instruction_result = *outcome.instruction_result();
    interpreter.return_data_buffer = if instruction_result.is_revert() {
        outcome.output().clone()
    } else {
        Bytes::new()
    };

    match instruction_result {
        return_ok!() => {
            let address = outcome.address;
            push!(
                interpreter,
                address.map(|a| a.into_word().into()).unwrap_or(U256::ZERO)
            );
            interpreter.gas.erase_cost(outcome.gas().remaining());
            interpreter.gas.record_refund(outcome.gas().refunded());
        }
        return_revert!() => {
            push!(interpreter, U256::ZERO);
            interpreter.gas.erase_cost(outcome.gas().remaining());
        }
        InstructionResult::FatalExternalError => {
            interpreter.instruction_result = InstructionResult::FatalExternalError;
        }
        _ => {
            push!(interpreter, U256::ZERO);
        }
    }
}

pub fn call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([local_gas_limit, to, value], interpreter);
    let to = Address::from_word(B256::from(to));
    // max gas limit is not possible in real ethereum situation.
    let local_gas_limit = as_u64_saturated!(local_gas_limit);

    let has_transfer = !value.is_zero();
    if interpreter.is_static && has_transfer {
        interpreter.instruction_result = InstructionResult::CallNotAllowedInsideStatic;
        return;
    }

    let Some((input, return_memory_offset)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let Some(mut gas_limit) =
        calc_call_gas(interpreter, host, to, has_transfer, local_gas_limit, true)
    else {
        return;
    };

    gas!(interpreter, gas_limit);

    // add call stipend if there is value to be transferred.
    if has_transfer {
        gas_limit = gas_limit.saturating_add(CALL_STIPEND);
    }

    let mut inputs = CallInputs {
        input,
        gas_limit,
        target_address: to,
        caller: interpreter.contract.target_address,
        bytecode_address: to,
        value: CallValue::Transfer(value),
        scheme: CallScheme::Call,
        is_static: interpreter.is_static,
        return_memory_offset,
    };
    let outcome = host.call(&mut inputs);
    insert_call_outcome(interpreter, outcome);
}

pub fn call_code<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([local_gas_limit, to, value], interpreter);
    let to = Address::from_word(B256::from(to));
    // max gas limit is not possible in real ethereum situation.
    let local_gas_limit = as_u64_saturated!(local_gas_limit);

    let Some((input, return_memory_offset)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let has_transfer = !value.is_zero();
    let Some(mut gas_limit) =
        calc_call_gas(interpreter, host, to, has_transfer, local_gas_limit, false)
    else {
        return;
    };

    gas!(interpreter, gas_limit);

    // add call stipend if there is value to be transferred.
    if has_transfer {
        gas_limit = gas_limit.saturating_add(CALL_STIPEND);
    }

    let mut inputs = CallInputs {
        input,
        gas_limit,
        target_address: interpreter.contract.target_address,
        caller: interpreter.contract.target_address,
        bytecode_address: to,
        value: CallValue::Transfer(value),
        scheme: CallScheme::CallCode,
        is_static: interpreter.is_static,
        return_memory_offset,
    };
    let outcome = host.call(&mut inputs);
    insert_call_outcome(interpreter, outcome);
}

/// EIP-7: DELEGATECALL
pub fn delegate_call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([local_gas_limit, to], interpreter);
    let to = Address::from_word(B256::from(to));
    // max gas limit is not possible in real ethereum situation.
    let local_gas_limit = as_u64_saturated!(local_gas_limit);

    let Some((input, return_memory_offset)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let Some(gas_limit) = calc_call_gas(interpreter, host, to, false, local_gas_limit, false)
    else {
        return;
    };

    gas!(interpreter, gas_limit);

    let mut inputs = CallInputs {
        input,
        gas_limit,
        target_address: interpreter.contract.target_address,
        caller: interpreter.contract.caller,
        bytecode_address: to,
        value: CallValue::Apparent(interpreter.contract.value),
        scheme: CallScheme::DelegateCall,
        is_static: interpreter.is_static,
        return_memory_offset,
    };
    let outcome = host.call(&mut inputs);
    insert_call_outcome(interpreter, outcome);
}

/// EIP-214: New opcode STATICCALL
pub fn static_call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([local_gas_limit, to], interpreter);
    let to = Address::from_word(B256::from(to));
    // max gas limit is not possible in real ethereum situation.
    let local_gas_limit = as_u64_saturated!(local_gas_limit);

    let Some((input, return_memory_offset)) = get_memory_input_and_out_ranges(interpreter) else {
        return;
    };

    let Some(gas_limit) = calc_call_gas(interpreter, host, to, false, local_gas_limit, false)
    else {
        return;
    };
    gas!(interpreter, gas_limit);

    let mut inputs = CallInputs {
        input,
        gas_limit,
        target_address: to,
        caller: interpreter.contract.target_address,
        bytecode_address: to,
        value: CallValue::Transfer(U256::ZERO),
        scheme: CallScheme::StaticCall,
        is_static: true,
        return_memory_offset,
    };
    let outcome = host.call(&mut inputs);
    insert_call_outcome(interpreter, outcome);
}

/// Applies a finished sub call to the calling frame.
pub fn insert_call_outcome(interpreter: &mut Interpreter, outcome: CallOutcome) {
    let out_offset = outcome.memory_offset.clone();
    let instruction_result = *outcome.instruction_result();
    interpreter.return_data_buffer = outcome.output().clone();

    match instruction_result {
        return_ok!() => {
            // return unspend gas.
            interpreter.gas.erase_cost(outcome.gas().remaining());
            interpreter.gas.record_refund(outcome.gas().refunded());
            let output = interpreter.return_data_buffer.clone();
            interpreter.write_return(out_offset, &output);
            push!(interpreter, U256::from(1));
        }
        return_revert!() => {
            interpreter.gas.erase_cost(outcome.gas().remaining());
            let output = interpreter.return_data_buffer.clone();
            interpreter.write_return(out_offset, &output);
            push!(interpreter, U256::ZERO);
        }
        InstructionResult::FatalExternalError => {
            interpreter.instruction_result = InstructionResult::FatalExternalError;
        }
        _ => {
            push!(interpreter, U256::ZERO);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::instructions::test_utils::{run_static, run_with_host, run_with_host_gas};
    use crate::{CallScheme, DummyHost, InstructionResult};
    use primitives::{address, bytes, Features, SpecId, U256};

    #[test]
    fn call_forwards_all_but_one_64th() {
        let mut host = DummyHost::default();
        // CALL(gas=MAX, to=0xff, value=0, 0, 0, 0, 0)
        let (interpreter, result) = run_with_host_gas(
            bytes!("5f5f5f5f5f60ff5f19f100"),
            Features::for_spec(SpecId::SHANGHAI),
            &mut host,
            100_000,
        );
        assert_eq!(result.result, InstructionResult::Stop);
        // 7 pushes and NOT, then warm account access
        let before_call = 100_000 - (6 * 2 + 3 + 3) - 100;
        assert_eq!(host.calls[0].gas_limit, before_call - before_call / 64);
        assert_eq!(host.calls[0].target_address, address!("00000000000000000000000000000000000000ff"));
        assert_eq!(interpreter.stack.data(), &[U256::from(1)]);
    }

    #[test]
    fn value_transfer_gets_stipend() {
        let mut host = DummyHost::default();
        // CALL(gas=0, to=0xff, value=1, 0, 0, 0, 0)
        let (_, result) = run_with_host_gas(
            bytes!("5f5f5f5f600160ff5ff100"),
            Features::for_spec(SpecId::SHANGHAI),
            &mut host,
            100_000,
        );
        assert_eq!(result.result, InstructionResult::Stop);
        assert_eq!(host.calls[0].gas_limit, 2300);
        // pushes, warm access, value transfer and new account, minus the unused stipend
        assert_eq!(result.gas.spent(), 4 * 2 + 3 + 3 + 2 + 100 + 9000 + 25000 - 2300);
    }

    #[test]
    fn static_frame_rejects_value_call() {
        let (_, result) = run_static(bytes!("5f5f5f5f600160ff5ff1"), Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.result, InstructionResult::CallNotAllowedInsideStatic);
    }

    #[test]
    fn delegatecall_keeps_context() {
        let mut host = DummyHost::default();
        let (_, _) = run_with_host(
            bytes!("5f5f5f5f60ff5af400"),
            Features::for_spec(SpecId::CANCUN),
            &mut host,
        );
        let call = &host.calls[0];
        assert_eq!(call.scheme, CallScheme::DelegateCall);
        assert_eq!(call.target_address, crate::instructions::test_utils::TARGET);
        assert_eq!(call.bytecode_address, address!("00000000000000000000000000000000000000ff"));
    }
}
