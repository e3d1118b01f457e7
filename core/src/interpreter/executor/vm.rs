//! Virtual Machine state
//!
//! The VM holds all execution state:
//! - frames: stack of live invocations and branches
//! - root: the stack the top-level invocations hand values through

use tracing::debug;

use super::binding::bind_params;
use crate::interpreter::errors::{InterpError, InterpResult};
use crate::interpreter::types::{DataStack, Frame, FrameKind, FunctionDef, Program, ReturnTo, Token};

/* ===================== VM ===================== */

#[derive(Debug)]
pub struct VM<'p> {
    pub program: &'p Program,

    /// Stack of execution frames, innermost last
    pub frames: Vec<Frame<'p>>,

    /// Caller stack of the top-level invocations
    ///
    /// `_global` leaves its final stack here; the entry function takes its
    /// arguments from it and `ret`s into it.
    pub root: DataStack,

    pub max_frames: usize,
}

impl<'p> VM<'p> {
    pub fn new(program: &'p Program, max_frames: usize) -> Self {
        VM {
            program,
            frames: vec![],
            root: vec![],
            max_frames,
        }
    }

    /// Start a top-level invocation of `name`
    ///
    /// Arguments come from the root stack. `ret_to` is `Own` for `_global`
    /// (its own caller) and `Root` for the entry function.
    pub fn invoke_root(&mut self, name: &str, caller_block: &'p str, ret_to: ReturnTo) -> InterpResult<()> {
        let program = self.program;
        let func = program
            .function(name)
            .ok_or_else(|| InterpError::UndefinedFunction(name.to_string()))?;
        program.block(&func.name)?;
        program.block(caller_block)?;

        let stack = bind_params(func, &mut self.root, caller_block)?;
        debug!(function = %func.name, args = stack.len(), "invoke");

        self.push_frame(Frame {
            kind: FrameKind::Call,
            func,
            pc: 0,
            end: func.body.len(),
            stack,
            ret_to,
            caller_block,
        })
    }
}

/* ===================== Frame Management ===================== */

impl<'p> VM<'p> {
    fn push_frame(&mut self, frame: Frame<'p>) -> InterpResult<()> {
        if self.frames.len() >= self.max_frames {
            return Err(InterpError::FrameLimit {
                limit: self.max_frames,
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Call `func` from the frame at `caller`
    ///
    /// Parameters are popped from the caller's stack into a brand-new stack.
    pub fn push_call(&mut self, func: &'p FunctionDef, caller: usize) -> InterpResult<()> {
        let caller_func: &'p FunctionDef = self.frames[caller].func;
        let caller_block: &'p str = &caller_func.name;
        self.program.block(&func.name)?;
        self.program.block(caller_block)?;

        let stack = bind_params(func, &mut self.frames[caller].stack, caller_block)?;
        debug!(function = %func.name, caller = caller_block, args = stack.len(), "invoke");

        self.push_frame(Frame {
            kind: FrameKind::Call,
            func,
            pc: 0,
            end: func.body.len(),
            stack,
            ret_to: ReturnTo::Frame(caller),
            caller_block,
        })
    }

    /// Run body offsets `start..end` of the parent's function as a branch
    ///
    /// The branch starts from a copy of the parent's stack, resolves names
    /// like its parent, and `ret`s to its parent's caller.
    pub fn push_branch(&mut self, parent: usize, start: usize, end: usize) -> InterpResult<()> {
        let frame = &self.frames[parent];
        let branch = Frame {
            kind: FrameKind::Branch,
            func: frame.func,
            pc: start,
            end,
            stack: frame.stack.clone(),
            ret_to: frame.branch_return(parent),
            caller_block: frame.caller_block,
        };
        self.push_frame(branch)
    }

    /// Pop the innermost frame once its range is exhausted
    ///
    /// Top-level invocations leave their stack on the root; every other
    /// stack is dropped with its frame.
    pub fn finish_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        if frame.kind == FrameKind::Call {
            debug!(function = %frame.func.name, left = frame.stack.len(), "return");
        }

        match frame.ret_to {
            ReturnTo::Own if frame.kind == FrameKind::Call => self.root = frame.stack,
            ReturnTo::Root if frame.kind == FrameKind::Call => self.root.extend(frame.stack),
            _ => {}
        }
    }

    /// Push `value` wherever `ret` in frame `from` delivers
    pub fn deliver(&mut self, from: usize, value: Token) {
        match self.frames[from].ret_to {
            ReturnTo::Own => self.frames[from].stack.push(value),
            ReturnTo::Root => self.root.push(value),
            ReturnTo::Frame(target) => self.frames[target].stack.push(value),
        }
    }
}

/* ===================== Step Result ===================== */

/// Result of executing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue to next step
    Continue,
    /// No frames left
    Done,
}
