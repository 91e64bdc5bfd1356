use crate::{Host, InstructionResult, Interpreter};
use primitives::U256;

pub fn pop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([_i], interpreter);
}

/// EIP-3855: PUSH0 instruction
///
/// Introduce a new instruction which pushes the constant value 0 onto the stack.
pub fn push0<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    push!(interpreter, U256::ZERO);
}

/// Pushes the `N` bytes that follow the opcode. Code past the end reads as zero.
pub fn push<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    let value = interpreter.immediate(N);
    push!(interpreter, value);
    interpreter.pc += N;
}

pub fn dup<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    if !interpreter.stack.dup(N) {
        interpreter.instruction_result = if interpreter.stack.len() < N {
            InstructionResult::StackUnderflow
        } else {
            InstructionResult::StackOverflow
        };
    }
}

pub fn swap<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    if !interpreter.stack.swap(N) {
        interpreter.instruction_result = InstructionResult::StackUnderflow;
    }
}

#[cfg(test)]
mod tests {
    use crate::instructions::test_utils::run_code;
    use crate::InstructionResult;
    use primitives::{bytes, Features, SpecId, U256};

    #[test]
    fn dup_underflow() {
        let (_, result) = run_code(bytes!("600181"), Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.result, InstructionResult::StackUnderflow);
    }

    #[test]
    fn push32_and_swap() {
        let code = bytes!("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff600290");
        let (interpreter, result) = run_code(code, Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.result, InstructionResult::Stop);
        assert_eq!(interpreter.stack.data(), &[U256::from(2), U256::MAX]);
    }

    #[test]
    fn stack_overflow_on_push() {
        // JUMPDEST PUSH0 PUSH1 0 JUMP
        let (interpreter, result) = run_code(bytes!("5b5f600056"), Features::for_spec(SpecId::CANCUN));
        assert_eq!(result.result, InstructionResult::StackOverflow);
        assert_eq!(interpreter.stack.len(), 1024);
    }
}
