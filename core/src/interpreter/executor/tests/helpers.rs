//! Test helpers for executor tests
//!
//! Common utilities for parsing programs and running them with captured output

use crate::interpreter::executor::{run_program, RunOptions};
use crate::interpreter::parser;
use crate::interpreter::types::{DataStack, Program};
use crate::interpreter::InterpResult;

/// Parse source, then round-trip the program through JSON
pub fn parse_round_trip(source: &str) -> Program {
    let program = parser::parse_program(source).expect("Parse failed");
    let json = serde_json::to_string(&program).expect("Program serialization failed");
    serde_json::from_str(&json).expect("Program deserialization failed")
}

/// Run a parsed program, returning everything printed plus the result
pub fn run_with(program: &Program, options: &RunOptions) -> (String, InterpResult<DataStack>) {
    let mut out = Vec::new();
    let result = run_program(program, options, &mut out);
    (String::from_utf8(out).expect("Output is not UTF-8"), result)
}

/// Options for programs with no entry function
pub fn no_entry() -> RunOptions {
    RunOptions {
        require_entry: false,
        ..RunOptions::default()
    }
}

/// Parse and run with default options, expecting success
pub fn run_ok(source: &str) -> (String, DataStack) {
    run_ok_with(source, &RunOptions::default())
}

/// Parse and run top-level code only, expecting success
pub fn run_global(source: &str) -> (String, DataStack) {
    run_ok_with(source, &no_entry())
}

pub fn run_ok_with(source: &str, options: &RunOptions) -> (String, DataStack) {
    let program = parse_round_trip(source);
    let (output, result) = run_with(&program, options);
    match result {
        Ok(stack) => (output, stack),
        Err(e) => panic!("Run failed: {} (output so far: {:?})", e, output),
    }
}

/// Parse and run top-level code only, expecting an error
pub fn run_err(source: &str) -> (String, crate::interpreter::InterpError) {
    let program = parse_round_trip(source);
    let (output, result) = run_with(&program, &no_entry());
    match result {
        Ok(stack) => panic!("Expected an error, run ended with stack {:?}", stack),
        Err(e) => (output, e),
    }
}
