//! Core execution loop
//!
//! `step()` executes one body token of the innermost frame. Calls and taken
//! branches push frames instead of recursing, so `run_until_done()` is a flat
//! loop whatever the program's nesting depth.

use std::io::Write;

use tracing::trace;

use super::statements::{execute_do, execute_end, execute_ident, execute_if};
use super::stdlib::call_builtin;
use super::vm::{Step, VM};
use crate::interpreter::errors::InterpResult;
use crate::interpreter::types::{Keyword, Token};

/* ===================== Public API ===================== */

/// Run the VM until every frame has finished
///
/// Stops at the first error; the VM is left as it was when the error hit.
pub fn run_until_done(vm: &mut VM<'_>, out: &mut dyn Write) -> InterpResult<()> {
    loop {
        match step(vm, out)? {
            Step::Continue => continue,
            Step::Done => break,
        }
    }
    Ok(())
}

/// Execute one step of the VM
pub fn step(vm: &mut VM<'_>, out: &mut dyn Write) -> InterpResult<Step> {
    let Some(idx) = vm.frames.len().checked_sub(1) else {
        return Ok(Step::Done);
    };

    let (func, pc, end) = {
        let f = &vm.frames[idx];
        (f.func, f.pc, f.end)
    };

    if pc >= end {
        vm.finish_frame();
        return Ok(Step::Continue);
    }

    vm.frames[idx].pc = pc + 1;
    let token = &func.body[pc];
    trace!(function = %func.name, pc, token = %token, "step");

    match token {
        Token::Op(op) => call_builtin(vm, idx, *op, out)?,
        Token::Ident(name) => execute_ident(vm, idx, name)?,
        Token::Keyword(Keyword::If | Keyword::Iff) => execute_if(vm, idx, pc)?,
        Token::Keyword(Keyword::Do) => execute_do(vm, idx, pc)?,
        Token::Keyword(Keyword::End) => execute_end(vm, idx, pc),
        // only mark positions for the jumps
        Token::Keyword(Keyword::While | Keyword::Else) => {}
        value => vm.frames[idx].stack.push(value.clone()),
    }

    Ok(Step::Continue)
}
