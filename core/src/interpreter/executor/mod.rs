//! # Executor - Frame-Stack Interpreter
//!
//! Runs a parsed [`Program`]: first the `_global` body, then the entry
//! function.
//!
//! ## Core Principles
//!
//! 1. **Stack-driven execution**: all state lives in `VM::frames`, no native
//!    recursion for user calls or branches
//! 2. **Token-level execution**: each frame has a `pc` into its function body
//! 3. **Fresh stacks**: every invocation binds its parameters onto a new
//!    stack; branches start from a copy of their parent's
//! 4. **Abort on first error**: any [`InterpError`] ends the run

pub mod binding;
pub mod exec_loop;
pub mod statements;
pub mod stdlib;
pub mod vm;

#[cfg(test)]
mod tests;

use std::io::Write;

use tracing::{debug, warn};

use crate::interpreter::errors::{InterpError, InterpResult};
use crate::interpreter::types::{DataStack, Program, ReturnTo, DEFAULT_ENTRY, DEFAULT_VERSION, GLOBAL};

// Re-export commonly used items
pub use exec_loop::{run_until_done, step};
pub use vm::{Step, VM};

/// Default cap on live frames
pub const DEFAULT_MAX_FRAMES: usize = 1_000_000;

/// Knobs for one run of a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Function invoked after `_global`
    pub entry: String,
    /// Whether a missing entry function is an error
    pub require_entry: bool,
    pub max_frames: usize,
    /// Value bound to `version` in the `_global` Block
    pub version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            entry: DEFAULT_ENTRY.to_string(),
            require_entry: true,
            max_frames: DEFAULT_MAX_FRAMES,
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// Run `_global`, then the entry function, writing `print` output to `out`
///
/// `_global` is its own caller; the entry function takes its arguments from
/// what `_global` left behind. Returns the stack left after the entry
/// function (or after `_global` when the entry is skipped).
pub fn run_program(program: &Program, options: &RunOptions, out: &mut dyn Write) -> InterpResult<DataStack> {
    let mut vm = VM::new(program, options.max_frames);

    vm.invoke_root(GLOBAL, GLOBAL, ReturnTo::Own)?;
    run_until_done(&mut vm, out)?;

    if program.function(&options.entry).is_some() {
        debug!(entry = %options.entry, "running entry function");
        vm.invoke_root(&options.entry, GLOBAL, ReturnTo::Root)?;
        run_until_done(&mut vm, out)?;
    } else if options.require_entry {
        return Err(InterpError::EntryNotFound(options.entry.clone()));
    } else {
        warn!(entry = %options.entry, "entry function not defined, skipping");
    }

    out.flush()?;
    Ok(vm.root)
}
