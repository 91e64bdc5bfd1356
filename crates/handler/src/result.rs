//! Results of frames and transactions.
use interpreter::{InstructionResult, InterpreterResult};
use primitives::{Address, BTreeSet, Bytes, Log};
use state::StateChangeset;

/// Result of a transaction execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionResult {
    /// Returned successfully.
    Success {
        /// Opcode that ended the outermost frame.
        reason: SuccessReason,
        /// Gas used, refund already deducted.
        gas_used: u64,
        /// Refund granted after capping.
        gas_refunded: u64,
        /// Logs emitted, in execution order.
        logs: Vec<Log>,
        /// Return data or created contract.
        output: Output,
    },
    /// Reverted by `REVERT` or a value/depth failure. Unused gas was returned.
    Revert {
        /// Gas used.
        gas_used: u64,
        /// Revert data.
        output: Bytes,
    },
    /// Stopped by an exceptional halt. All gas was spent.
    Halt {
        /// Halt reason.
        reason: InstructionResult,
        /// Gas used, equal to the gas limit.
        gas_used: u64,
    },
}

impl ExecutionResult {
    /// Returns if transaction execution is successful.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if execution result is a Halt.
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::Halt { .. })
    }

    /// Returns created address if execution is Create transaction
    /// and Contract was created.
    pub fn created_address(&self) -> Option<Address> {
        match self {
            Self::Success { output, .. } => output.address().copied(),
            _ => None,
        }
    }

    /// Returns the output data of the execution.
    ///
    /// Returns [`None`] if the execution was halted.
    pub fn output(&self) -> Option<&Bytes> {
        match self {
            Self::Success { output, .. } => Some(output.data()),
            Self::Revert { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Returns the logs if execution is successful, or an empty list otherwise.
    pub fn logs(&self) -> &[Log] {
        match self {
            Self::Success { logs, .. } => logs.as_slice(),
            _ => &[],
        }
    }

    /// Returns the gas used.
    pub fn gas_used(&self) -> u64 {
        match *self {
            Self::Success { gas_used, .. }
            | Self::Revert { gas_used, .. }
            | Self::Halt { gas_used, .. } => gas_used,
        }
    }
}

/// Output of a transaction execution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Output {
    /// Return data of a call.
    Call(Bytes),
    /// Deployed code and the address of the new contract.
    Create(Bytes, Option<Address>),
}

impl Output {
    /// Returns the output data of the execution output.
    pub fn into_data(self) -> Bytes {
        match self {
            Output::Call(data) => data,
            Output::Create(data, _) => data,
        }
    }

    /// Returns the output data of the execution output.
    pub fn data(&self) -> &Bytes {
        match self {
            Output::Call(data) => data,
            Output::Create(data, _) => data,
        }
    }

    /// Returns the created address, if any.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Output::Call(_) => None,
            Output::Create(_, address) => address.as_ref(),
        }
    }
}

/// Opcode that ended a successful execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SuccessReason {
    /// `STOP` or end of code.
    Stop,
    /// `RETURN`.
    Return,
    /// `SELFDESTRUCT`.
    SelfDestruct,
}

impl SuccessReason {
    /// Maps a successful instruction result, `None` for reverts and halts.
    pub fn from_instruction_result(result: InstructionResult) -> Option<Self> {
        match result {
            InstructionResult::Continue | InstructionResult::Stop => Some(Self::Stop),
            InstructionResult::Return => Some(Self::Return),
            InstructionResult::SelfDestruct => Some(Self::SelfDestruct),
            _ => None,
        }
    }
}

/// Transaction result together with what it wrote to the backing store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultAndState {
    /// Status of execution.
    pub result: ExecutionResult,
    /// Entries flushed to the backing store.
    pub state: StateChangeset,
    /// Accounts deleted by `SELFDESTRUCT`.
    pub selfdestructed: BTreeSet<Address>,
    /// Accounts created by the transaction, including by nested creates.
    pub created: BTreeSet<Address>,
    /// Empty touched accounts removed under EIP-161.
    pub cleaned: Vec<Address>,
}

/// Outcome of one message frame as seen by its parent.
///
/// The address sets only hold what the frame and its children added on top of the sets the
/// parent handed down. They are empty unless the frame succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameResult {
    /// Status, output and gas of the frame.
    pub result: InterpreterResult,
    /// Logs emitted by the frame and its successful children.
    pub logs: Vec<Log>,
    /// Address of the contract, for successful creates.
    pub created_address: Option<Address>,
    /// Accounts newly scheduled for deletion.
    pub selfdestructs: BTreeSet<Address>,
    /// Accounts newly created.
    pub created: BTreeSet<Address>,
}

impl FrameResult {
    /// A frame that did not run, with every piece of its gas intact.
    pub fn new(result: InterpreterResult) -> Self {
        Self {
            result,
            logs: Vec::new(),
            created_address: None,
            selfdestructs: BTreeSet::new(),
            created: BTreeSet::new(),
        }
    }

    /// Instruction result of the frame.
    #[inline]
    pub fn instruction_result(&self) -> InstructionResult {
        self.result.result
    }

    /// Returns whether the frame succeeded.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
