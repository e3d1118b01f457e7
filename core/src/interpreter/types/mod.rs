//! Type definitions for the interpreter
//!
//! - Tokens and values (Token, Operator, Keyword, TypeDecl)
//! - Registry (Program, FunctionDef, Block, Jump)
//! - Execution frames (Frame, FrameKind, ReturnTo)

pub mod control;
pub mod program;
pub mod token;

pub use control::{DataStack, Frame, FrameKind, ReturnTo};
pub use program::{Block, FunctionDef, Jump, Param, Program, DEFAULT_ENTRY, DEFAULT_VERSION, GLOBAL};
pub use token::{format_number, Keyword, NumKind, Operator, Token, TypeDecl};
