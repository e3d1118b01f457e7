//! Parameter binding
//!
//! Moves a call's arguments from the caller's stack onto the callee's fresh
//! stack, checking each against its declared type.

use crate::interpreter::errors::{InterpError, InterpResult};
use crate::interpreter::types::{DataStack, FunctionDef};

/// Pop one value per parameter from `caller`, last parameter first
///
/// The returned stack holds the arguments in declaration order. Fails when
/// the caller runs out of values or a value does not fit its parameter.
pub fn bind_params(func: &FunctionDef, caller: &mut DataStack, caller_name: &str) -> InterpResult<DataStack> {
    let expected = func.params.len();
    let mut bound = DataStack::with_capacity(expected);

    for (index, param) in func.params.iter().enumerate().rev() {
        let value = caller.pop().ok_or_else(|| InterpError::MissingArguments {
            function: func.name.clone(),
            caller: caller_name.to_string(),
            expected,
            found: bound.len(),
        })?;

        let value = param.ty.accept(&value).ok_or_else(|| InterpError::ArgumentType {
            function: func.name.clone(),
            index,
            expected: param.ty.name(),
            found: value.to_string(),
            found_kind: value.kind_name(),
        })?;
        bound.push(value);
    }

    bound.reverse();
    Ok(bound)
}
