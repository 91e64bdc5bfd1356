//! # stratum-interpreter
//!
//! Frame interpreter: stack, memory, gas accounting, instruction handlers and the
//! per feature set dispatch tables.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
mod macros;

pub mod gas;
mod host;
mod instruction_result;
pub mod instructions;
mod interpreter;
mod interpreter_action;
mod table;

// Reexport primary types.
pub use bytecode::opcode;
pub use gas::Gas;
pub use host::{AccountLoad, DummyHost, Host, SStoreResult, SelfDestructResult, StateLoad};
pub use instruction_result::InstructionResult;
pub use interpreter::{
    num_words, num_words_usize, Contract, Interpreter, Memory, Stack, STACK_LIMIT,
};
pub use interpreter_action::{
    CallInputs, CallOutcome, CallScheme, CallValue, CreateInputs, CreateOutcome, CreateScheme,
    InterpreterResult,
};
pub use table::{instruction, Instruction, InstructionTables};
