//! Function registry and per-function Blocks
//!
//! A `Program` is built once by the structural parser and only read by the
//! executor afterwards.

use super::token::{Token, TypeDecl};
use crate::interpreter::errors::InterpError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Name of the implicit function holding the top-level program
pub const GLOBAL: &str = "_global";

/// Entry function run after `_global` unless configured otherwise
pub const DEFAULT_ENTRY: &str = "main";

/// Value of the `version` binding seeded into the `_global` Block
pub const DEFAULT_VERSION: &str = "alpha";

/// Name -> value table attached to a function
pub type Block = HashMap<String, Token>;

/// One declared parameter: its type and the word it was written as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub ty: TypeDecl,
    pub name: String,
}

/// Precomputed block boundary for a structural keyword in a body
///
/// Keys of `FunctionDef::jumps` are body offsets of the keyword the jump
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Jump {
    /// At an `if`/`iff`: where its `else` (if any) and matching `end` sit
    If { else_at: Option<usize>, end_at: usize },
    /// At a `while`: its `do` and matching `end`
    While { do_at: usize, end_at: usize },
    /// At a `do`: the `end` closing the loop
    Do { end_at: usize },
    /// At the `end` of a loop: the `while` to go back to
    Loop { while_at: usize },
}

/// A named function: parameters plus its flat instruction stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Token>,
    pub jumps: BTreeMap<usize, Jump>,
}

impl FunctionDef {
    /// Build a definition, indexing the block structure of its body
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: Vec<Token>) -> Result<Self, InterpError> {
        let name = name.into();
        let jumps = crate::interpreter::parser::index_blocks(&name, &body)?;
        Ok(Self {
            name,
            params,
            body,
            jumps,
        })
    }

    pub fn jump(&self, at: usize) -> Option<Jump> {
        self.jumps.get(&at).copied()
    }
}

/// Function registry plus the Block of every function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: HashMap<String, FunctionDef>,
    pub blocks: HashMap<String, Block>,
}

impl Program {
    /// Empty program with `_global` registered and its Block seeded
    pub fn new(version: &str) -> Self {
        let global = FunctionDef {
            name: GLOBAL.to_string(),
            params: vec![],
            body: vec![],
            jumps: BTreeMap::new(),
        };

        let mut global_block = Block::new();
        global_block.insert("version".to_string(), Token::str(version));

        Self {
            functions: HashMap::from([(GLOBAL.to_string(), global)]),
            blocks: HashMap::from([(GLOBAL.to_string(), global_block)]),
        }
    }

    /// Register a function with a fresh empty Block
    ///
    /// Returns the definition it replaced, if the name was taken.
    pub fn define(&mut self, func: FunctionDef) -> Option<FunctionDef> {
        self.blocks.insert(func.name.clone(), Block::new());
        self.functions.insert(func.name.clone(), func)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn block(&self, name: &str) -> Result<&Block, InterpError> {
        self.blocks
            .get(name)
            .ok_or_else(|| InterpError::UndefinedBlock(name.to_string()))
    }
}
