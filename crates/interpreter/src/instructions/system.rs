use crate::{gas, Host, InstructionResult, Interpreter};
use primitives::{keccak256 as keccak, B256, KECCAK_EMPTY, U256};

pub fn keccak256<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([offset], top, interpreter);
    let len = as_usize_or_fail!(interpreter, top);
    gas_or_fail!(interpreter, gas::keccak256_cost(len as u64));
    let hash = if len == 0 {
        KECCAK_EMPTY
    } else {
        let from = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, from, len);
        keccak(interpreter.memory.slice(from, len))
    };
    *top = hash.into();
}

pub fn address<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, interpreter.contract.target_address.into_word().into());
}

pub fn caller<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, interpreter.contract.caller.into_word().into());
}

pub fn codesize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.contract.bytecode.len()));
}

pub fn codecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([memory_offset, code_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::copy_cost(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = as_usize_saturated!(code_offset);
    resize_memory!(interpreter, memory_offset, len);

    let code = interpreter.contract.bytecode.bytes().clone();
    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, &code);
}

pub fn calldataload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([], offset_ptr, interpreter);
    let offset = as_usize_saturated!(offset_ptr);
    let input = &interpreter.contract.input;
    let load = if offset < input.len() {
        let have_bytes = 32.min(input.len() - offset);
        let mut bytes = [0u8; 32];
        bytes[..have_bytes].copy_from_slice(&input[offset..offset + have_bytes]);
        B256::new(bytes)
    } else {
        B256::ZERO
    };
    *offset_ptr = load.into();
}

pub fn calldatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.contract.input.len()));
}

pub fn callvalue<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, interpreter.contract.value);
}

pub fn calldatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([memory_offset, data_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::copy_cost(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let data_offset = as_usize_saturated!(data_offset);
    resize_memory!(interpreter, memory_offset, len);

    let input = interpreter.contract.input.clone();
    interpreter
        .memory
        .set_data(memory_offset, data_offset, len, &input);
}

/// EIP-211: New opcodes: RETURNDATASIZE and RETURNDATACOPY
pub fn returndatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.return_data_buffer.len()));
}

/// EIP-211: New opcodes: RETURNDATASIZE and RETURNDATACOPY
pub fn returndatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([memory_offset, offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::copy_cost(len as u64));
    let data_offset = as_usize_saturated!(offset);
    let data_end = data_offset.saturating_add(len);
    if data_end > interpreter.return_data_buffer.len() {
        interpreter.instruction_result = InstructionResult::OutOfOffset;
        return;
    }
    if len != 0 {
        let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
        resize_memory!(interpreter, memory_offset, len);
        let buffer = interpreter.return_data_buffer.clone();
        interpreter
            .memory
            .set(memory_offset, &buffer[data_offset..data_end]);
    }
}

pub fn gas<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.gas.remaining()));
}
