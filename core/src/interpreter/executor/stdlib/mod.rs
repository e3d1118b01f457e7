//! Builtin operator library
//!
//! Every operator works on the data stack of the frame that executes it.
//! `ret` additionally reaches the caller's stack and `print` the output sink.

pub mod arith;
pub mod stack;

use std::io::Write;

use super::vm::VM;
use crate::interpreter::errors::InterpResult;
use crate::interpreter::types::{DataStack, Operator, Token};

/* ===================== Dispatcher ===================== */

/// Execute `op` for the frame at `frame`
pub fn call_builtin(vm: &mut VM<'_>, frame: usize, op: Operator, out: &mut dyn Write) -> InterpResult<()> {
    if let Some(value) = apply(op, &mut vm.frames[frame].stack, out)? {
        vm.deliver(frame, value);
    }
    Ok(())
}

/// Execute an operator against one stack
///
/// Returns the value `ret` popped; where it goes is up to the caller.
pub fn apply(op: Operator, data: &mut DataStack, out: &mut dyn Write) -> InterpResult<Option<Token>> {
    match op {
        Operator::Add => arith::add(data)?,
        Operator::Sub | Operator::Mul | Operator::Div | Operator::Mod => arith::arithmetic(data, op)?,
        Operator::Max | Operator::Min => arith::extremum(data, op)?,
        Operator::Eq | Operator::Ne => arith::equality(data, op)?,
        Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le => arith::compare(data, op)?,
        Operator::Sqrt => arith::sqrt(data)?,
        Operator::Is => arith::is_type(data)?,
        Operator::Assert => arith::assert_equal(data)?,
        Operator::Copy => stack::copy(data)?,
        Operator::Drop => stack::drop(data)?,
        Operator::Swap => stack::swap(data)?,
        Operator::Rot => stack::rot(data)?,
        Operator::Carry => stack::carry(data)?,
        Operator::Print => stack::print(data, out)?,
        Operator::Ret => return stack::pop_one(data, op).map(Some),
    }
    Ok(None)
}
