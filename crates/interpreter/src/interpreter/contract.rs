use crate::CallInputs;
use bytecode::Bytecode;
use primitives::{Address, Bytes, U256};

/// The code a frame runs and the identities it runs under.
#[derive(Clone, Debug, Default)]
pub struct Contract {
    /// Call data.
    pub input: Bytes,
    /// Code being executed, with its lazily built jump table.
    pub bytecode: Bytecode,
    /// Account whose storage and balance the code acts on.
    pub target_address: Address,
    /// Account the code was loaded from. Differs from `target_address` for
    /// `CALLCODE` and `DELEGATECALL`.
    pub bytecode_address: Address,
    /// Caller of the frame.
    pub caller: Address,
    /// Value reported by `CALLVALUE`.
    pub value: U256,
}

impl Contract {
    /// Creates a contract frame description.
    pub fn new(
        input: Bytes,
        bytecode: Bytecode,
        target_address: Address,
        caller: Address,
        value: U256,
    ) -> Self {
        Self {
            input,
            bytecode,
            target_address,
            bytecode_address: target_address,
            caller,
            value,
        }
    }

    /// Builds the contract of a message call from its inputs and the loaded code.
    pub fn new_with_call(inputs: &CallInputs, bytecode: Bytecode) -> Self {
        Self {
            input: inputs.input.clone(),
            bytecode,
            target_address: inputs.target_address,
            bytecode_address: inputs.bytecode_address,
            caller: inputs.caller,
            value: inputs.value.get(),
        }
    }

    /// Returns `true` if `position` is a valid `JUMPDEST`.
    #[inline]
    pub fn is_valid_jump(&self, position: usize) -> bool {
        self.bytecode.jump_table().is_valid(position)
    }

    /// Returns `true` if `position` is a valid `BEGINSUB`.
    #[inline]
    pub fn is_valid_subroutine(&self, position: usize) -> bool {
        self.bytecode.jump_table().is_valid_subroutine(position)
    }
}
