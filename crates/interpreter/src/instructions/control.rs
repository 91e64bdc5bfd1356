use crate::{gas::RETURN_STACK_LIMIT, Host, InstructionResult, Interpreter};
use primitives::{Bytes, U256};

pub fn jump<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([target], interpreter);
    jump_inner(interpreter, target);
}

pub fn jumpi<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([target, cond], interpreter);
    if !cond.is_zero() {
        jump_inner(interpreter, target);
    }
}

#[inline]
fn jump_inner(interpreter: &mut Interpreter, target: U256) {
    let target = as_usize_or_fail!(interpreter, target, InstructionResult::InvalidJump);
    if !interpreter.contract.is_valid_jump(target) {
        interpreter.instruction_result = InstructionResult::InvalidJump;
        return;
    }
    // jumpdest is executed as the next instruction
    interpreter.pc = target;
}

pub fn jumpdest<H: Host + ?Sized>(_interpreter: &mut Interpreter, _host: &mut H) {}

pub fn pc<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    // `pc` already points past this opcode
    push!(interpreter, U256::from(interpreter.pc - 1));
}

/// EIP-2315: `BEGINSUB` is only entered through `JUMPSUB`, which skips over it.
pub fn beginsub<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::InvalidBeginSub;
}

/// EIP-2315: pushes the return address and continues after the target `BEGINSUB`.
pub fn jumpsub<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([target], interpreter);
    let target = as_usize_or_fail!(interpreter, target, InstructionResult::InvalidJumpSub);
    if !interpreter.contract.is_valid_subroutine(target) {
        interpreter.instruction_result = InstructionResult::InvalidJumpSub;
        return;
    }
    if interpreter.return_stack.len() >= RETURN_STACK_LIMIT {
        interpreter.instruction_result = InstructionResult::StackOverflow;
        return;
    }
    interpreter.return_stack.push(interpreter.pc);
    interpreter.pc = target + 1;
}

/// EIP-2315: returns to the instruction after the matching `JUMPSUB`.
pub fn returnsub<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    let Some(pc) = interpreter.return_stack.pop() else {
        interpreter.instruction_result = InstructionResult::InvalidReturnSub;
        return;
    };
    interpreter.pc = pc;
}

#[inline]
fn return_inner(interpreter: &mut Interpreter, instruction_result: InstructionResult) {
    popn!([offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    // important: offset must be ignored if len is zeros
    let mut output = Bytes::default();
    if len != 0 {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        output = Bytes::copy_from_slice(interpreter.memory.slice(offset, len));
    }
    interpreter.output = output;
    interpreter.instruction_result = instruction_result;
}

pub fn ret<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    return_inner(interpreter, InstructionResult::Return);
}

/// EIP-140: REVERT instruction
pub fn revert<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    return_inner(interpreter, InstructionResult::Revert);
}

/// Stop opcode. This opcode halts the execution.
pub fn stop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::Stop;
}

/// Invalid opcode. This opcode halts the execution.
pub fn invalid<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::InvalidFEOpcode;
}

/// Unknown opcode. This opcode halts the execution.
pub fn unknown<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::OpcodeNotFound;
}
