//! Numen interpreter
//!
//! Source text goes through the [`lexer`] into words, the [`parser`] builds a
//! [`Program`] (function registry plus Blocks), and the [`executor`] runs it
//! on a frame-stack VM.

pub mod errors;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod types;

use std::io::Write;

pub use errors::{ErrorKind, InterpError, InterpResult};
pub use executor::{run_program, RunOptions};
pub use parser::{parse_program, parse_program_with_version};
pub use types::{DataStack, FunctionDef, Program, Token};

/// Parse and run `source` in one go
pub fn run_source(source: &str, options: &RunOptions, out: &mut dyn Write) -> InterpResult<DataStack> {
    let program = parse_program_with_version(source, &options.version)?;
    run_program(&program, options, out)
}
