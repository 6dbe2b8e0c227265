//! This crate provides the core logic for a multi-tape Turing machine simulator.
//! It includes modules for parsing line-oriented machine definitions, validating input,
//! simulating and tracing execution, and analyzing definitions for dead rules.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod tracer;
pub mod types;
pub mod validator;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `Diagnostic` enum from the analyzer module.
pub use analyzer::{analyze, Diagnostic};
/// Re-exports the `DefinitionLoader` struct from the loader module.
pub use loader::DefinitionLoader;
/// Re-exports the engine entry points from the machine module.
pub use machine::{initialize, run, step, TuringMachine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the tracing entry point from the tracer module.
pub use tracer::{simulate_and_trace, trace, Observer};
/// Re-exports the data model and error types from the types module.
pub use types::{
    Configuration, Definition, Direction, FormatError, InputError, Step, Symbol, Tape,
    Transition, BLANK_SYMBOL, WILDCARD,
};
/// Re-exports the `validate_input` function from the validator module.
pub use validator::validate_input;
