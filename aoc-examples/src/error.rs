//! Error types for example extraction

use std::fmt;
use thiserror::Error;

/// Errors raised while evaluating a transform pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// An operation received a value of the wrong shape
    #[error("`{operation}` expects {expected} but received {found}")]
    TypeMismatch {
        operation: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// `reduce` was applied to an empty sequence
    #[error("`reduce` needs a sequence with at least one element")]
    EmptySequence,

    /// `reduce` must wrap exactly one `add` or `multiply`
    #[error("`reduce` takes exactly one aggregation operation (`add` or `multiply`)")]
    InvalidReducer,

    /// The pattern given to `match` does not compile
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A value could not be read as an integer
    #[error("`{0}` is not a number")]
    NotANumber(String),

    /// Arithmetic left the i64 range
    #[error("arithmetic overflow in `{0}`")]
    Overflow(&'static str),

    /// The pipeline ended on a sequence where a scalar was required
    #[error("pipeline returned a sequence but must return a string or number")]
    NonScalarResult,

    /// The pipeline ended on an undefined value (e.g. `at` past the end)
    #[error("pipeline returned undefined but must return a string or number")]
    UndefinedResult,

    /// An input pipeline must end on a sequence of strings
    #[error("input pipeline must return a sequence of strings but returned {0}")]
    NotLines(&'static str),
}

/// Which part of an example a transform or lookup was working on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Input,
    Answer,
    AdditionalInfo,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::Input => "input",
            Slot::Answer => "answer",
            Slot::AdditionalInfo => "additional info",
        })
    }
}

/// Errors that abort example extraction for a puzzle
#[derive(Error, Debug)]
pub enum ExampleError {
    /// A bundled or caller-supplied database file is not valid JSON for its schema
    #[error("Invalid example database `{name}`: {source}")]
    Database {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An override record violates its own length invariants
    #[error("Inconsistent example database entry for {year} day {day}: {reason}")]
    Inconsistent { year: u16, day: u8, reason: String },

    /// A selector string could not be parsed
    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// An override points at an element index the page does not have
    #[error("Selector `{selector}` has no element at index {index} ({year} day {day})")]
    MissingElement {
        year: u16,
        day: u8,
        selector: String,
        index: usize,
    },

    /// A transform failed or produced the wrong type for its slot
    #[error("Transform for {slot} of example {entry} ({year} day {day}) failed: {source}")]
    Transform {
        year: u16,
        day: u8,
        slot: Slot,
        entry: usize,
        #[source]
        source: TransformError,
    },
}
