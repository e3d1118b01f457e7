pub mod cli;
pub mod config;
pub mod interpreter;

// Re-export the embedding API
pub use interpreter::{
    parse_program, run_program, run_source, ErrorKind, InterpError, Program, RunOptions, Token,
};
