use crate::{Gas, InstructionResult};
use core::ops::Range;
use primitives::{Address, Bytes};

/// The result of an interpreter operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpreterResult {
    /// The result of the instruction execution.
    pub result: InstructionResult,
    /// The output of the instruction execution.
    pub output: Bytes,
    /// The gas usage information.
    pub gas: Gas,
}

impl InterpreterResult {
    /// Returns a new `InterpreterResult` with the given values.
    pub fn new(result: InstructionResult, output: Bytes, gas: Gas) -> Self {
        Self {
            result,
            output,
            gas,
        }
    }

    /// Returns a result that consumed all of `gas_limit` and produced no output.
    pub fn new_halt(result: InstructionResult, gas_limit: u64) -> Self {
        Self::new(result, Bytes::new(), Gas::new_spent(gas_limit))
    }

    /// Returns whether the instruction result is a success.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns whether the instruction result is a revert.
    #[inline]
    pub const fn is_revert(&self) -> bool {
        self.result.is_revert()
    }

    /// Returns whether the instruction result is an error.
    #[inline]
    pub const fn is_error(&self) -> bool {
        self.result.is_error()
    }
}

/// Outcome of a message call, as seen by the calling frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallOutcome {
    /// Result of the callee frame.
    pub result: InterpreterResult,
    /// Where the caller wants the output copied.
    pub memory_offset: Range<usize>,
}

impl CallOutcome {
    /// Constructs a new `CallOutcome`.
    pub fn new(result: InterpreterResult, memory_offset: Range<usize>) -> Self {
        Self {
            result,
            memory_offset,
        }
    }

    /// Returns a reference to the instruction result.
    pub fn instruction_result(&self) -> &InstructionResult {
        &self.result.result
    }

    /// Returns the output data.
    pub fn output(&self) -> &Bytes {
        &self.result.output
    }

    /// Returns the gas information.
    pub fn gas(&self) -> Gas {
        self.result.gas
    }
}

/// Outcome of a contract creation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateOutcome {
    /// Result of the init code frame. Output is only kept on revert.
    pub result: InterpreterResult,
    /// Address of the new contract, set only on success.
    pub address: Option<Address>,
}

impl CreateOutcome {
    /// Constructs a new `CreateOutcome`.
    pub fn new(result: InterpreterResult, address: Option<Address>) -> Self {
        Self { result, address }
    }

    /// Returns a reference to the instruction result.
    pub fn instruction_result(&self) -> &InstructionResult {
        &self.result.result
    }

    /// Returns the output data.
    pub fn output(&self) -> &Bytes {
        &self.result.output
    }

    /// Returns the gas information.
    pub fn gas(&self) -> Gas {
        self.result.gas
    }
}
