//! # stratum
//!
//! Ethereum Virtual Machine execution engine. Re-exports every stratum crate and the types
//! most users need to run transactions against a [`BackingStore`].
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Reexport crates.
pub use bytecode;
pub use context;
pub use handler;
pub use interpreter;
pub use precompile;
pub use primitives;
pub use state;

// Reexport primary types.
pub use bytecode::Bytecode;
pub use context::{AccessListItem, BlockEnv, CfgEnv, Context, Env, Journal, TxEnv};
pub use handler::{
    Evm, EvmError, ExecutionResult, FrameResult, Inspector, InvalidTransaction, Message,
    NoOpInspector, Output, ResultAndState, SuccessReason, TracingInspector,
};
pub use interpreter::{Gas, Host, InstructionResult, Interpreter, InterpreterResult};
pub use precompile::Precompiles;
pub use primitives::{Features, SpecId};
pub use state::{AccountInfo, BackingStore, InMemoryStore, StateChangeset, StateError, StateManager};
