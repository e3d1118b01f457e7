//! Interpreter errors
//!
//! Every error aborts the whole run. They are grouped into the three classes
//! reported by [`InterpError::kind`].

use thiserror::Error;

/// Class of an interpreter error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Structural,
    Execution,
}

#[derive(Debug, Error)]
pub enum InterpError {
    /* ---------- lexical ---------- */
    #[error("unterminated string starting at {start}")]
    UnterminatedString { start: String },

    /* ---------- structural ---------- */
    #[error("'fun' is not followed by a function name")]
    MissingFunctionName,

    #[error("\"{name}\" can't be used as a function name: {reason}")]
    InvalidFunctionName { name: String, reason: &'static str },

    #[error("{word} is not a type (parameters of '{function}')")]
    NotAType { function: String, word: String },

    #[error("function '{function}' has no 'as' after its parameters")]
    MissingAs { function: String },

    #[error("'{function}' is missing an 'end'")]
    MissingEnd { function: String },

    #[error("unexpected '{keyword}' in '{function}'")]
    UnexpectedKeyword { function: String, keyword: &'static str },

    #[error("can't declare a function inside '{function}'")]
    NestedFunction { function: String },

    #[error("entry function '{0}' does not exist")]
    EntryNotFound(String),

    /* ---------- execution ---------- */
    #[error("{op}: needs {needed} value(s) on the stack, found {found}")]
    StackUnderflow {
        op: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("{op}: {detail}")]
    TypeMismatch { op: &'static str, detail: String },

    #[error("assertion failed: \"{left}\" != \"{right}\"")]
    AssertionFailed { left: String, right: String },

    #[error("{0} is not a printable object")]
    NotPrintable(String),

    #[error("{function} expected {expected} argument(s) but got {found}: nothing to get from parent {{{caller}}} stack")]
    MissingArguments {
        function: String,
        caller: String,
        expected: usize,
        found: usize,
    },

    #[error("{function}: parameter {index} is declared {expected} but got {found} ({found_kind})")]
    ArgumentType {
        function: String,
        index: usize,
        expected: &'static str,
        found: String,
        found_kind: &'static str,
    },

    #[error("no condition for '{keyword}' in '{function}'")]
    NoCondition { function: String, keyword: &'static str },

    #[error("{0}'s block is undefined")]
    UndefinedBlock(String),

    #[error("function '{0}' is not defined")]
    UndefinedFunction(String),

    #[error("more than {limit} frames are live")]
    FrameLimit { limit: usize },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl InterpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InterpError::UnterminatedString { .. } => ErrorKind::Lexical,

            InterpError::MissingFunctionName
            | InterpError::InvalidFunctionName { .. }
            | InterpError::NotAType { .. }
            | InterpError::MissingAs { .. }
            | InterpError::MissingEnd { .. }
            | InterpError::UnexpectedKeyword { .. }
            | InterpError::NestedFunction { .. }
            | InterpError::EntryNotFound(_) => ErrorKind::Structural,

            InterpError::StackUnderflow { .. }
            | InterpError::TypeMismatch { .. }
            | InterpError::AssertionFailed { .. }
            | InterpError::NotPrintable(_)
            | InterpError::MissingArguments { .. }
            | InterpError::ArgumentType { .. }
            | InterpError::NoCondition { .. }
            | InterpError::UndefinedBlock(_)
            | InterpError::UndefinedFunction(_)
            | InterpError::FrameLimit { .. }
            | InterpError::Io(_) => ErrorKind::Execution,
        }
    }
}

pub type InterpResult<T> = Result<T, InterpError>;
