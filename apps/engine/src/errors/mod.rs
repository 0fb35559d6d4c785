//! Error handling for the Landgrab engine.

pub mod engine;
pub mod error_code;

#[cfg(test)]
mod tests_error_mapping;

pub use engine::{EngineError, NotFoundKind, RuleKind, StateKind};
pub use error_code::ErrorCode;
