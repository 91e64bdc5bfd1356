use crate::{gas, interpreter::Interpreter, Host, InstructionResult};
use core::{cmp::min, ops::Range};
use primitives::{Address, Bytes, Features};

/// Pops the input and output memory ranges of a call, resizing memory for both.
#[inline]
pub fn get_memory_input_and_out_ranges(
    interpreter: &mut Interpreter,
) -> Option<(Bytes, Range<usize>)> {
    popn!([in_offset, in_len, out_offset, out_len], interpreter, None);

    let in_len = as_usize_or_fail_ret!(interpreter, in_len, None);
    let input = if in_len != 0 {
        let in_offset = as_usize_or_fail_ret!(interpreter, in_offset, None);
        resize_memory!(interpreter, in_offset, in_len, None);
        Bytes::copy_from_slice(interpreter.memory.slice(in_offset, in_len))
    } else {
        Bytes::new()
    };

    let out_len = as_usize_or_fail_ret!(interpreter, out_len, None);
    let out_offset = if out_len != 0 {
        let out_offset = as_usize_or_fail_ret!(interpreter, out_offset, None);
        resize_memory!(interpreter, out_offset, out_len, None);
        out_offset
    } else {
        0
    };

    Some((input, out_offset..out_offset + out_len))
}

/// Charges the dynamic call cost and returns the gas limit handed to the callee, stipend excluded.
///
/// `new_account_applies` is only set for `CALL`, the one scheme that can bring `to` into
/// existence.
#[inline]
pub fn calc_call_gas<H: Host + ?Sized>(
    interpreter: &mut Interpreter,
    host: &mut H,
    to: Address,
    has_transfer: bool,
    local_gas_limit: u64,
    new_account_applies: bool,
) -> Option<u64> {
    let Some(account) = host.load_account(to) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return None;
    };

    let call_cost = gas::call_cost(
        interpreter.features,
        has_transfer,
        account.is_cold,
        new_account_applies && !account.data.exists,
        new_account_applies && account.data.is_empty,
    );

    gas!(interpreter, call_cost, None);

    // EIP-150: Gas cost changes for IO-heavy operations
    let gas_limit = if interpreter.features.contains(Features::EIP150) {
        let gas = interpreter.gas.remaining();
        // take l64 part of gas_limit
        min(gas - gas / 64, local_gas_limit)
    } else {
        local_gas_limit
    };

    Some(gas_limit)
}
