//! Handlers for identifiers and structural keywords
//!
//! Each handler runs with the frame's `pc` already moved past the token, so
//! a handler only touches `pc` when it jumps.

use tracing::debug;

use super::vm::VM;
use crate::interpreter::errors::{InterpError, InterpResult};
use crate::interpreter::types::{Jump, Keyword, Token};

/* ===================== Identifiers ===================== */

/// Resolve an identifier: function call, then own Block, then caller Block
///
/// An identifier matching none of them does nothing.
pub fn execute_ident<'p>(vm: &mut VM<'p>, idx: usize, name: &'p str) -> InterpResult<()> {
    let program = vm.program;

    if let Some(func) = program.function(name) {
        return vm.push_call(func, idx);
    }

    let (own, caller) = (vm.frames[idx].func, vm.frames[idx].caller_block);
    let value = match program.block(&own.name)?.get(name) {
        Some(value) => Some(value),
        None => program.block(caller)?.get(name),
    };

    match value {
        Some(value) => vm.frames[idx].stack.push(value.clone()),
        None => debug!(function = %own.name, name, "unresolved identifier ignored"),
    }
    Ok(())
}

/* ===================== Conditionals ===================== */

fn pop_condition(vm: &mut VM<'_>, idx: usize, keyword: Keyword) -> InterpResult<Token> {
    let frame = &mut vm.frames[idx];
    frame.stack.pop().ok_or_else(|| InterpError::NoCondition {
        function: frame.func.name.clone(),
        keyword: keyword.name(),
    })
}

/// `if`/`iff` at body offset `at`
///
/// The taken branch runs as its own frame on a copy of the stack, then the
/// frame carries on after the matching `end`.
pub fn execute_if(vm: &mut VM<'_>, idx: usize, at: usize) -> InterpResult<()> {
    let func = vm.frames[idx].func;
    let keyword = match func.body[at] {
        Token::Keyword(kw) => kw,
        _ => Keyword::If,
    };
    let Some(Jump::If { else_at, end_at }) = func.jump(at) else {
        return Err(InterpError::MissingEnd {
            function: func.name.clone(),
        });
    };

    let condition = pop_condition(vm, idx, keyword)?;
    vm.frames[idx].pc = end_at + 1;

    if condition == Token::Bool(true) {
        vm.push_branch(idx, at + 1, else_at.unwrap_or(end_at))
    } else if let Some(else_at) = else_at {
        vm.push_branch(idx, else_at + 1, end_at)
    } else {
        Ok(())
    }
}

/* ===================== Loops ===================== */

/// `do` at body offset `at`: enter the loop body or leave the loop
pub fn execute_do(vm: &mut VM<'_>, idx: usize, at: usize) -> InterpResult<()> {
    let func = vm.frames[idx].func;
    let Some(Jump::Do { end_at }) = func.jump(at) else {
        return Err(InterpError::UnexpectedKeyword {
            function: func.name.clone(),
            keyword: Keyword::Do.name(),
        });
    };

    let condition = pop_condition(vm, idx, Keyword::Do)?;
    if condition != Token::Bool(true) {
        vm.frames[idx].pc = end_at + 1;
    }
    Ok(())
}

/// `end` at body offset `at`: loop ends jump back to re-run the condition
pub fn execute_end(vm: &mut VM<'_>, idx: usize, at: usize) {
    if let Some(Jump::Loop { while_at }) = vm.frames[idx].func.jump(at) {
        vm.frames[idx].pc = while_at + 1;
    }
}
