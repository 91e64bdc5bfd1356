use crate::{gas, Host, Interpreter};
use core::cmp::max;
use primitives::U256;

pub fn mload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([], top, interpreter);
    let offset = as_usize_or_fail!(interpreter, top);
    resize_memory!(interpreter, offset, 32);
    *top = interpreter.memory.get_u256(offset);
}

pub fn mstore<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([offset, value], interpreter);
    let offset = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, offset, 32);
    interpreter.memory.set_u256(offset, value);
}

pub fn mstore8<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([offset, value], interpreter);
    let offset = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, offset, 1);
    interpreter.memory.set_byte(offset, value.byte(0))
}

pub fn msize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::from(interpreter.memory.len()));
}

/// EIP-5656: MCOPY - Memory copying instruction
pub fn mcopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([dst, src, len], interpreter);

    // into usize or fail
    let len = as_usize_or_fail!(interpreter, len);
    // deduce gas
    gas_or_fail!(interpreter, gas::copy_cost(len as u64));
    if len == 0 {
        return;
    }

    let dst = as_usize_or_fail!(interpreter, dst);
    let src = as_usize_or_fail!(interpreter, src);
    // resize memory
    resize_memory!(interpreter, max(dst, src), len);
    // copy memory in place
    interpreter.memory.copy(dst, src, len);
}

#[cfg(test)]
mod tests {
    use crate::instructions::test_utils::run_code;
    use crate::InstructionResult;
    use primitives::{bytes, Features, SpecId, U256};

    #[test]
    fn mcopy_overlapping() {
        // PUSH1 0x0102 at 30..32, MCOPY(dst 31, src 30, len 2), MLOAD 0
        let code = bytes!("6101026000526002601e601f5e60005100");
        let (interpreter, result) = run_code(code, Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.result, InstructionResult::Stop);
        assert_eq!(interpreter.stack.peek(0), Some(U256::from(0x0101)));
        assert_eq!(&interpreter.memory.data()[30..33], &[0x01, 0x01, 0x02]);
    }

    #[test]
    fn memory_expansion_cost() {
        // MSTORE8 at 1023: 32 words
        let (_, result) = run_code(bytes!("60ff6103ff5300"), Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.gas.spent(), 3 + 3 + 3 + 32 * 3 + 32 * 32 / 512);
    }

    #[test]
    fn huge_offset_runs_out_of_gas() {
        // MLOAD at 2^64
        let (_, result) = run_code(bytes!("680100000000000000005100"), Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.result, InstructionResult::InvalidOperandOOG);
        let (_, result) = run_code(bytes!("6401000000005100"), Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.result, InstructionResult::MemoryOOG);
    }
}
