//! Stack shuffling and output: copy, drop, swap, rot, carry, print

use std::io::Write;

use crate::interpreter::errors::{InterpError, InterpResult};
use crate::interpreter::types::{DataStack, Operator, Token};

/// Fail unless `data` holds at least `needed` values
pub fn ensure_depth(data: &DataStack, op: Operator, needed: usize) -> InterpResult<()> {
    if data.len() < needed {
        return Err(InterpError::StackUnderflow {
            op: op.name(),
            needed,
            found: data.len(),
        });
    }
    Ok(())
}

pub fn pop_one(data: &mut DataStack, op: Operator) -> InterpResult<Token> {
    data.pop().ok_or(InterpError::StackUnderflow {
        op: op.name(),
        needed: 1,
        found: 0,
    })
}

/// Pop the top two values as `(first, second)`, second being the old top
pub fn pop_two(data: &mut DataStack, op: Operator) -> InterpResult<(Token, Token)> {
    ensure_depth(data, op, 2)?;
    let second = pop_one(data, op)?;
    let first = pop_one(data, op)?;
    Ok((first, second))
}

/// `x copy` -> `x x`
pub fn copy(data: &mut DataStack) -> InterpResult<()> {
    ensure_depth(data, Operator::Copy, 1)?;
    let top = data[data.len() - 1].clone();
    data.push(top);
    Ok(())
}

/// `x drop` -> ``
pub fn drop(data: &mut DataStack) -> InterpResult<()> {
    pop_one(data, Operator::Drop).map(|_| ())
}

/// `x y swap` -> `y x`
pub fn swap(data: &mut DataStack) -> InterpResult<()> {
    ensure_depth(data, Operator::Swap, 2)?;
    let len = data.len();
    data.swap(len - 1, len - 2);
    Ok(())
}

/// `a b c rot` -> `a c b`
pub fn rot(data: &mut DataStack) -> InterpResult<()> {
    ensure_depth(data, Operator::Rot, 3)?;
    let len = data.len();
    data.swap(len - 1, len - 2);
    Ok(())
}

/// `x y carry` -> `x y x`
pub fn carry(data: &mut DataStack) -> InterpResult<()> {
    ensure_depth(data, Operator::Carry, 2)?;
    let second = data[data.len() - 2].clone();
    data.push(second);
    Ok(())
}

/// Pop a number, string or boolean and write it on its own line
pub fn print(data: &mut DataStack, out: &mut dyn Write) -> InterpResult<()> {
    let value = pop_one(data, Operator::Print)?;
    if !value.is_printable() {
        return Err(InterpError::NotPrintable(value.to_string()));
    }
    writeln!(out, "{}", value)?;
    Ok(())
}
