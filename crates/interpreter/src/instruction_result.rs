/// Outcome of an instruction, and of a frame once it stops running.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstructionResult {
    // success codes
    #[default]
    Continue = 0x00,
    Stop,
    Return,
    SelfDestruct,

    // revert codes
    Revert = 0x10,
    /// Call depth limit reached. All gas is returned to the caller.
    CallTooDeep,
    /// Caller balance is below the transferred value. All gas is returned to the caller.
    OutOfFunds,

    // error codes
    OutOfGas = 0x50,
    MemoryOOG,
    PrecompileOOG,
    InvalidOperandOOG,
    OpcodeNotFound,
    /// Opcode exists but its EIP is not active.
    NotActivated,
    CallNotAllowedInsideStatic,
    StateChangeDuringStaticCall,
    InvalidFEOpcode,
    InvalidJump,
    /// JUMPSUB target is not a BEGINSUB.
    InvalidJumpSub,
    /// BEGINSUB reached by normal execution.
    InvalidBeginSub,
    /// RETURNSUB with an empty return stack.
    InvalidReturnSub,
    StackUnderflow,
    StackOverflow,
    OutOfOffset,
    CreateCollision,
    PrecompileError,
    NonceOverflow,
    /// Deployed code exceeds the size limit (EIP-170).
    CreateContractSizeLimit,
    /// Deployed code starts with 0xEF (EIP-3541).
    CreateContractStartingWithEF,
    /// Initcode exceeds the size limit (EIP-3860).
    CreateInitCodeSizeLimit,
    /// Not enough gas left to pay the code deposit (EIP-2).
    CodeStoreOutOfGas,

    /// Fatal external error. The host failed to read or write state.
    FatalExternalError,
}

#[macro_export]
macro_rules! return_ok {
    () => {
        $crate::InstructionResult::Continue
            | $crate::InstructionResult::Stop
            | $crate::InstructionResult::Return
            | $crate::InstructionResult::SelfDestruct
    };
}

#[macro_export]
macro_rules! return_revert {
    () => {
        $crate::InstructionResult::Revert
            | $crate::InstructionResult::CallTooDeep
            | $crate::InstructionResult::OutOfFunds
    };
}

impl InstructionResult {
    /// Returns whether the result is a success.
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, crate::return_ok!())
    }

    /// Returns whether the result is a revert.
    #[inline]
    pub const fn is_revert(self) -> bool {
        matches!(self, crate::return_revert!())
    }

    /// Returns whether the result is an exceptional halt.
    #[inline]
    pub const fn is_error(self) -> bool {
        !self.is_ok() && !self.is_revert()
    }

    /// Returns whether the frame must abort the whole execution.
    #[inline]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::FatalExternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(InstructionResult::Stop.is_ok());
        assert!(InstructionResult::CallTooDeep.is_revert());
        assert!(InstructionResult::OutOfFunds.is_revert());
        assert!(InstructionResult::InvalidJumpSub.is_error());
        assert!(InstructionResult::CodeStoreOutOfGas.is_error());
        assert!(!InstructionResult::Revert.is_error());
        assert!(InstructionResult::FatalExternalError.is_fatal());
    }
}
