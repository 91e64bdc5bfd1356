//! # stratum-handler
//!
//! Call orchestration on top of the interpreter: message frames, checkpoints, precompile
//! dispatch, inspector hooks and the transaction wrapper that validates, charges and settles.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod checkpoint;
mod error;
mod evm;
mod frame;
pub mod inspector;
mod message;
pub mod post_execution;
pub mod pre_execution;
mod result;
pub mod validation;

pub use checkpoint::{Checkpoint, CheckpointGuard};
pub use error::{EvmError, InvalidTransaction};
pub use evm::Evm;
pub use inspector::{Inspector, NoOpInspector, TracingInspector};
pub use message::Message;
pub use result::{ExecutionResult, FrameResult, Output, ResultAndState, SuccessReason};
