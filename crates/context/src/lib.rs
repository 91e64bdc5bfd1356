//! Execution environment and checkpointed state shared by the interpreter and the handler.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod block;
pub mod cfg;
pub mod context;
pub mod journal;
pub mod tx;

pub use block::BlockEnv;
pub use cfg::CfgEnv;
pub use context::{Context, Env};
pub use journal::Journal;
pub use tx::{AccessListItem, TxEnv};
