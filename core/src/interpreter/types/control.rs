//! Execution frame types

use super::program::FunctionDef;
use super::token::Token;

/// Per-invocation last-in-first-out value stack
pub type DataStack = Vec<Token>;

/* ===================== Frames ===================== */

/// What a frame is executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A function invocation with its own freshly bound stack
    Call,
    /// A taken `if`/`else` branch running on a copy of its parent's stack
    Branch,
}

/// Where `ret` delivers a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTo {
    /// The invocation is its own caller (`_global`)
    Own,
    /// The VM's root stack, the caller stack of the entry function
    Root,
    /// The frame at this index in `VM::frames`
    Frame(usize),
}

/// Execution frame - one per live invocation or branch
///
/// Frames borrow their function from the `Program`, which outlives the VM.
#[derive(Debug, Clone)]
pub struct Frame<'p> {
    pub kind: FrameKind,

    /// Function whose body is being executed (branches share their parent's)
    pub func: &'p FunctionDef,

    /// Next body offset to execute
    pub pc: usize,

    /// Exclusive end of the executed body range
    pub end: usize,

    pub stack: DataStack,

    pub ret_to: ReturnTo,

    /// Name of the caller's Block, the second level of name resolution
    pub caller_block: &'p str,
}

impl<'p> Frame<'p> {
    /// Target for `ret` inside a branch pushed from this frame
    pub fn branch_return(&self, own_index: usize) -> ReturnTo {
        match self.ret_to {
            ReturnTo::Own => ReturnTo::Frame(own_index),
            other => other,
        }
    }
}
