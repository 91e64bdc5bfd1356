mod call_inputs;
mod create_inputs;
mod outcome;

pub use call_inputs::{CallInputs, CallScheme, CallValue};
pub use create_inputs::{CreateInputs, CreateScheme};
pub use outcome::{CallOutcome, CreateOutcome, InterpreterResult};
