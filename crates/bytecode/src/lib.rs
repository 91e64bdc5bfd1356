//! Contract bytecode, the opcode table and jump destination analysis.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod analysis;
mod bytecode;
pub mod opcode;

pub use analysis::{analyze, JumpTable};
pub use bytecode::Bytecode;
pub use opcode::{OpCode, OpCodeInfo, OPCODE_INFO};
