//! Tests for user function calls and name resolution

use super::helpers::{parse_round_trip, run_ok, run_ok_with, run_with};
use crate::interpreter::executor::RunOptions;
use crate::interpreter::types::{NumKind, Token};
use crate::interpreter::InterpError;

#[test]
fn test_add_function() {
    let (output, _) = run_ok("fun add int int as + ret end fun main as 3 4 add print end");
    assert_eq!(output, "7\n");
}

#[test]
fn test_arguments_in_declaration_order() {
    let (output, _) = run_ok("fun sub num num as - ret end fun main as 10 4 sub print end");
    assert_eq!(output, "6\n");
}

#[test]
fn test_call_pops_only_its_parameters() {
    let (_, stack) = run_ok("fun first num as ret end fun main as 1 2 3 first end");
    assert_eq!(stack, vec![Token::num(1.0), Token::num(2.0), Token::num(3.0)]);
}

#[test]
fn test_each_call_gets_a_fresh_stack() {
    let (output, stack) = run_ok("fun leave as 1 end fun main as 9 leave leave print end");
    assert_eq!(output, "9\n");
    assert!(stack.is_empty());
}

#[test]
fn test_ret_keeps_bound_kind() {
    let (_, stack) = run_ok("fun twice int as 2 * ret end fun main as 21 twice end");
    assert_eq!(stack, vec![Token::Num { kind: NumKind::Int, v: 42.0 }]);
}

#[test]
fn test_string_parameter() {
    let (output, _) = run_ok(r#"fun greet string as " there" + print end fun main as "hi" greet end"#);
    assert_eq!(output, "hi there\n");
}

#[test]
fn test_ret_from_main_goes_to_root() {
    let (_, stack) = run_ok("fun main as 5 ret 6 end");
    assert_eq!(stack, vec![Token::num(5.0), Token::num(6.0)]);
}

#[test]
fn test_ret_at_top_level_stays_put() {
    let (output, _) = run_ok_with("1 ret print", &super::helpers::no_entry());
    assert_eq!(output, "1\n");
}

#[test]
fn test_caller_block_is_one_level() {
    // main's caller is _global, so `version` resolves there
    let (output, _) = run_ok("fun main as version print end");
    assert_eq!(output, "alpha\n");

    // show's caller is main, whose Block has no `version`
    let (output, _) = run_ok(r#"fun show as "none" version print end fun main as show end"#);
    assert_eq!(output, "none\n");
}

#[test]
fn test_functions_resolve_before_blocks() {
    let (output, _) = run_ok(r#"fun version as "fn" ret end fun main as version print end"#);
    assert_eq!(output, "fn\n");
}

#[test]
fn test_call_from_top_level() {
    let (output, _) = run_ok_with(
        "fun sq num as copy * ret end 5 sq print",
        &super::helpers::no_entry(),
    );
    assert_eq!(output, "25\n");
}

const SUM: &str = r#"
    fun sum num as
        copy 0 > if copy 1 - sum + ret else ret end
    end
"#;

#[test]
fn test_deep_recursion() {
    let source = format!("{} fun main as 10000 sum print end", SUM);
    let (output, _) = run_ok(&source);
    assert_eq!(output, "50005000\n");
}

#[test]
fn test_frame_limit() {
    let program = parse_round_trip(&format!("{} fun main as 100 sum print end", SUM));
    let options = RunOptions {
        max_frames: 50,
        ..RunOptions::default()
    };

    let (output, result) = run_with(&program, &options);
    assert_eq!(output, "");
    assert!(matches!(result, Err(InterpError::FrameLimit { limit: 50 })));
}
