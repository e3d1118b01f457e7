//! Arithmetic and comparison operators
//!
//! Binary operators pop two operands. `first` is the deeper one, so `7 2 -`
//! computes `7 - 2`. Numeric results keep the numeric kind of `first`.

use super::stack::{pop_one, pop_two};
use crate::interpreter::errors::{InterpError, InterpResult};
use crate::interpreter::types::{DataStack, NumKind, Operator, Token};

/* ===================== Helpers ===================== */

fn mismatch(op: Operator, first: &Token, second: &Token, wanted: &str) -> InterpError {
    InterpError::TypeMismatch {
        op: op.name(),
        detail: format!(
            "expected {}, got {} ({}) and {} ({})",
            wanted,
            first,
            first.kind_name(),
            second,
            second.kind_name()
        ),
    }
}

/// Pop two numbers, leaving the stack untouched if either is not numeric
fn pop_numbers(data: &mut DataStack, op: Operator) -> InterpResult<(NumKind, f64, f64)> {
    let (first, second) = pop_two(data, op)?;
    match (first.as_number(), second.as_number()) {
        (Some((kind, a)), Some((_, b))) => Ok((kind, a, b)),
        _ => {
            let err = mismatch(op, &first, &second, "two numbers");
            data.push(first);
            data.push(second);
            Err(err)
        }
    }
}

/* ===================== Operators ===================== */

/// `+`: numeric sum, or concatenation of two strings
pub fn add(data: &mut DataStack) -> InterpResult<()> {
    let (first, second) = pop_two(data, Operator::Add)?;
    let result = match (&first, &second) {
        (Token::Num { kind, v: a }, Token::Num { v: b, .. }) => Token::Num { kind: *kind, v: a + b },
        (Token::Str(a), Token::Str(b)) => Token::Str(format!("{}{}", a, b)),
        _ => {
            let err = mismatch(Operator::Add, &first, &second, "two numbers or two strings");
            data.push(first);
            data.push(second);
            return Err(err);
        }
    };
    data.push(result);
    Ok(())
}

/// `-`, `*`, `/`, `%` with native float semantics (`1 0 /` is Infinity)
pub fn arithmetic(data: &mut DataStack, op: Operator) -> InterpResult<()> {
    let (kind, a, b) = pop_numbers(data, op)?;
    let v = match op {
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => a / b,
        _ => a % b,
    };
    data.push(Token::Num { kind, v });
    Ok(())
}

/// `max`, `min`: push the chosen operand itself, kind included
pub fn extremum(data: &mut DataStack, op: Operator) -> InterpResult<()> {
    let (first, second) = pop_two(data, op)?;
    let (Some((_, a)), Some((_, b))) = (first.as_number(), second.as_number()) else {
        let err = mismatch(op, &first, &second, "two numbers");
        data.push(first);
        data.push(second);
        return Err(err);
    };

    let take_first = match op {
        Operator::Max => a >= b,
        _ => a <= b,
    };
    data.push(if take_first { first } else { second });
    Ok(())
}

/// `==`, `!=` on any two values
pub fn equality(data: &mut DataStack, op: Operator) -> InterpResult<()> {
    let (first, second) = pop_two(data, op)?;
    let same = first.same_value(&second);
    data.push(Token::Bool(if op == Operator::Eq { same } else { !same }));
    Ok(())
}

/// `>`, `<`, `>=`, `<=` on two numbers
pub fn compare(data: &mut DataStack, op: Operator) -> InterpResult<()> {
    let (_, a, b) = pop_numbers(data, op)?;
    let result = match op {
        Operator::Gt => a > b,
        Operator::Lt => a < b,
        Operator::Ge => a >= b,
        _ => a <= b,
    };
    data.push(Token::Bool(result));
    Ok(())
}

/// `sqrt`: square root of one number; `int` values stay whole
pub fn sqrt(data: &mut DataStack) -> InterpResult<()> {
    let value = pop_one(data, Operator::Sqrt)?;
    let Some((kind, v)) = value.as_number() else {
        let err = InterpError::TypeMismatch {
            op: Operator::Sqrt.name(),
            detail: format!("expected a number, got {} ({})", value, value.kind_name()),
        };
        data.push(value);
        return Err(err);
    };

    let root = match kind {
        NumKind::Int => v.sqrt().trunc(),
        _ => v.sqrt(),
    };
    data.push(Token::Num { kind, v: root });
    Ok(())
}

/* ===================== Checks ===================== */

/// `value <type> is`: whether `value` would bind to a `<type>` parameter
pub fn is_type(data: &mut DataStack) -> InterpResult<()> {
    let (value, ty) = pop_two(data, Operator::Is)?;
    if let Token::Type(decl) = ty {
        data.push(Token::Bool(decl.accept(&value).is_some()));
        return Ok(());
    }

    let err = mismatch(Operator::Is, &value, &ty, "a value and a type");
    data.push(value);
    data.push(ty);
    Err(err)
}

/// `assert`: abort the run unless the top two values are equal
pub fn assert_equal(data: &mut DataStack) -> InterpResult<()> {
    let (first, second) = pop_two(data, Operator::Assert)?;
    if !first.same_value(&second) {
        return Err(InterpError::AssertionFailed {
            left: first.to_string(),
            right: second.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::types::TypeDecl;

    fn run(data: &mut DataStack, op: Operator) -> InterpResult<()> {
        match op {
            Operator::Add => add(data),
            Operator::Max | Operator::Min => extremum(data, op),
            Operator::Eq | Operator::Ne => equality(data, op),
            Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le => compare(data, op),
            _ => arithmetic(data, op),
        }
    }

    fn top(values: Vec<Token>, op: Operator) -> Token {
        let mut data = values;
        run(&mut data, op).unwrap();
        assert_eq!(data.len(), 1);
        data.pop().unwrap()
    }

    #[test]
    fn test_operand_order() {
        assert_eq!(top(vec![Token::num(7.0), Token::num(2.0)], Operator::Sub), Token::num(5.0));
        assert_eq!(top(vec![Token::num(7.0), Token::num(2.0)], Operator::Div), Token::num(3.5));
        assert_eq!(top(vec![Token::num(7.0), Token::num(2.0)], Operator::Mod), Token::num(1.0));
        assert_eq!(top(vec![Token::num(5.0), Token::num(3.0)], Operator::Gt), Token::Bool(true));
        assert_eq!(top(vec![Token::num(5.0), Token::num(3.0)], Operator::Le), Token::Bool(false));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            top(vec![Token::str("hello"), Token::str(" world")], Operator::Add),
            Token::str("hello world")
        );
    }

    #[test]
    fn test_divide_by_zero_is_native() {
        let result = top(vec![Token::num(1.0), Token::num(0.0)], Operator::Div);
        assert_eq!(result.as_number().map(|(_, v)| v), Some(f64::INFINITY));
    }

    #[test]
    fn test_result_keeps_kind_of_first_operand() {
        let int = Token::Num { kind: NumKind::Int, v: 3.0 };
        assert_eq!(
            top(vec![int, Token::num(4.0)], Operator::Mul),
            Token::Num { kind: NumKind::Int, v: 12.0 }
        );
    }

    #[test]
    fn test_extremum_pushes_chosen_operand() {
        let float = Token::Num { kind: NumKind::Float, v: 9.0 };
        assert_eq!(top(vec![Token::num(1.0), float.clone()], Operator::Max), float);
        assert_eq!(top(vec![Token::num(1.0), float], Operator::Min), Token::num(1.0));
    }

    #[test]
    fn test_equality_on_any_values() {
        assert_eq!(top(vec![Token::str("a"), Token::str("a")], Operator::Eq), Token::Bool(true));
        assert_eq!(top(vec![Token::str("1"), Token::num(1.0)], Operator::Eq), Token::Bool(false));
        assert_eq!(top(vec![Token::Bool(true), Token::Bool(false)], Operator::Ne), Token::Bool(true));
        let int = Token::Num { kind: NumKind::Int, v: 2.0 };
        assert_eq!(top(vec![int, Token::num(2.0)], Operator::Eq), Token::Bool(true));
    }

    #[test]
    fn test_mismatch_leaves_operands() {
        let mut data = vec![Token::num(1.0), Token::str("x")];
        let err = add(&mut data).unwrap_err();
        assert!(matches!(err, InterpError::TypeMismatch { op: "+", .. }));
        assert_eq!(data, vec![Token::num(1.0), Token::str("x")]);

        let mut data = vec![Token::str("a"), Token::str("b")];
        assert!(matches!(
            compare(&mut data, Operator::Lt),
            Err(InterpError::TypeMismatch { op: "<", .. })
        ));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_sqrt_keeps_kind() {
        let mut data = vec![Token::Num { kind: NumKind::Int, v: 10.0 }, Token::num(2.25)];
        sqrt(&mut data).unwrap();
        assert_eq!(data.pop(), Some(Token::num(1.5)));
        sqrt(&mut data).unwrap();
        assert_eq!(data.pop(), Some(Token::Num { kind: NumKind::Int, v: 3.0 }));

        let mut data = vec![Token::str("4")];
        assert!(matches!(sqrt(&mut data), Err(InterpError::TypeMismatch { op: "sqrt", .. })));
        assert_eq!(data, vec![Token::str("4")]);
    }

    #[test]
    fn test_is_follows_parameter_rules() {
        let cases = [
            (Token::num(5.0), TypeDecl::Num, true),
            (Token::num(5.0), TypeDecl::Int, true),
            (Token::num(2.5), TypeDecl::Int, false),
            (Token::str("5"), TypeDecl::Num, false),
            (Token::str("5"), TypeDecl::String, true),
            (Token::Bool(false), TypeDecl::Bool, true),
        ];
        for (value, ty, expected) in cases {
            let mut data = vec![value.clone(), Token::Type(ty)];
            is_type(&mut data).unwrap();
            assert_eq!(data, vec![Token::Bool(expected)], "{} {} is", value, ty.name());
        }
    }

    #[test]
    fn test_is_needs_a_type_on_top() {
        let mut data = vec![Token::num(1.0), Token::num(2.0)];
        assert!(matches!(is_type(&mut data), Err(InterpError::TypeMismatch { op: "is", .. })));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_assert_equal() {
        let mut data = vec![Token::num(7.0), Token::num(7.0)];
        assert_equal(&mut data).unwrap();
        assert!(data.is_empty());

        let mut data = vec![Token::num(7.0), Token::str("7")];
        match assert_equal(&mut data).unwrap_err() {
            InterpError::AssertionFailed { left, right } => {
                assert_eq!(left, "7");
                assert_eq!(right, "7");
            }
            other => panic!("expected AssertionFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_underflow_on_single_operand() {
        let mut data = vec![Token::num(1.0)];
        let err = arithmetic(&mut data, Operator::Mul).unwrap_err();
        assert!(matches!(
            err,
            InterpError::StackUnderflow {
                op: "*",
                needed: 2,
                found: 1
            }
        ));
        assert_eq!(data, vec![Token::num(1.0)]);
    }
}
