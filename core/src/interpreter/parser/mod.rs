//! Structural parser
//!
//! Walks the lexeme stream once. `fun <name> <type>... as <body>... end`
//! definitions go to the registry; every other top-level word lands in the
//! `_global` body. Control blocks stay flat in the body, but their boundaries
//! are indexed here so the executor can jump without re-scanning.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::errors::{InterpError, InterpResult};
use super::lexer::{self, Lexeme};
use super::types::{FunctionDef, Jump, Keyword, Operator, Param, Program, Token, TypeDecl, DEFAULT_VERSION, GLOBAL};


/* ===================== Public API ===================== */

/// Parse source text into a program with the default `version` binding
pub fn parse_program(source: &str) -> InterpResult<Program> {
    parse_program_with_version(source, DEFAULT_VERSION)
}

/// Parse source text, seeding the `_global` Block's `version` with `version`
pub fn parse_program_with_version(source: &str, version: &str) -> InterpResult<Program> {
    let source = lexer::strip_carriage_returns(source);
    let lexemes = lexer::lex(&source)?;
    let mut program = Program::new(version);
    let mut global_body = Vec::new();
    let mut i = 0;

    while i < lexemes.len() {
        if lexemes[i].is_keyword(Keyword::Fun) {
            let (func, next) = parse_function(&lexemes, i + 1)?;
            let name = func.name.clone();
            debug!(function = %name, params = func.params.len(), words = func.body.len(), "registered function");
            if program.define(func).is_some() {
                warn!(function = %name, "function redefined, keeping the later definition");
            }
            i = next;
        } else {
            global_body.push(lexemes[i].to_token());
            i += 1;
        }
    }

    let global = FunctionDef::new(GLOBAL, vec![], global_body)?;
    program.functions.insert(GLOBAL.to_string(), global);

    Ok(program)
}

/* ===================== Function Definitions ===================== */

/// Parse one definition; `start` is the index just after `fun`
///
/// Returns the definition and the index after its closing `end`.
fn parse_function(lexemes: &[Lexeme<'_>], start: usize) -> InterpResult<(FunctionDef, usize)> {
    let name = match lexemes.get(start) {
        Some(Lexeme::Word(word)) => *word,
        Some(Lexeme::Quoted(s)) => {
            return Err(InterpError::InvalidFunctionName {
                name: s.clone(),
                reason: "a string is not a name",
            })
        }
        None => return Err(InterpError::MissingFunctionName),
    };
    validate_name(name)?;

    // parameters up to `as`
    let mut params = Vec::new();
    let mut i = start + 1;
    loop {
        match lexemes.get(i) {
            None => return Err(InterpError::MissingAs { function: name.to_string() }),
            Some(lexeme) if lexeme.is_keyword(Keyword::As) => break,
            Some(Lexeme::Word(word)) => match TypeDecl::from_word(word) {
                Some(ty) => params.push(Param {
                    ty,
                    name: word.to_string(),
                }),
                None => {
                    return Err(InterpError::NotAType {
                        function: name.to_string(),
                        word: word.to_string(),
                    })
                }
            },
            Some(Lexeme::Quoted(s)) => {
                return Err(InterpError::NotAType {
                    function: name.to_string(),
                    word: format!("\"{}\"", s),
                })
            }
        }
        i += 1;
    }
    i += 1; // as

    // body up to the `end` that balances it
    let mut body = Vec::new();
    let mut depth = 0usize;
    loop {
        let Some(lexeme) = lexemes.get(i) else {
            return Err(InterpError::MissingEnd { function: name.to_string() });
        };
        let token = lexeme.to_token();
        match token {
            Token::Keyword(Keyword::End) if depth == 0 => break,
            Token::Keyword(Keyword::End) => depth -= 1,
            Token::Keyword(kw) if kw.opens_block() => depth += 1,
            Token::Keyword(Keyword::Fun) => {
                return Err(InterpError::NestedFunction { function: name.to_string() })
            }
            _ => {}
        }
        body.push(token);
        i += 1;
    }

    let func = FunctionDef::new(name, params, body)?;
    Ok((func, i + 1))
}

/// Function names must not shadow reserved words and must look like
/// identifiers
fn validate_name(name: &str) -> InterpResult<()> {
    let invalid = |reason| {
        Err(InterpError::InvalidFunctionName {
            name: name.to_string(),
            reason,
        })
    };

    if name == GLOBAL {
        return invalid("reserved for the top-level program");
    }
    if Operator::from_word(name).is_some()
        || Keyword::from_word(name).is_some()
        || TypeDecl::from_word(name).is_some()
        || name == "true"
        || name == "false"
    {
        return invalid("it is a reserved word");
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return invalid("first char must be a letter or '_'"),
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return invalid("only letters, digits and '_' are allowed");
    }

    Ok(())
}

/* ===================== Block Index ===================== */

/// An `if`/`iff`/`while` waiting for its `end`
struct OpenBlock {
    keyword: Keyword,
    at: usize,
    /// Offset of its `else` or `do`
    middle: Option<usize>,
}

/// Match every structural keyword in `body` with its partners
///
/// Uses one nesting stack: `if`/`iff`/`while` open, `else`/`do` attach to the
/// innermost open block, `end` closes it.
pub fn index_blocks(function: &str, body: &[Token]) -> InterpResult<BTreeMap<usize, Jump>> {
    let unexpected = |keyword: Keyword| InterpError::UnexpectedKeyword {
        function: function.to_string(),
        keyword: keyword.name(),
    };

    let mut jumps = BTreeMap::new();
    let mut open: Vec<OpenBlock> = Vec::new();

    for (pos, token) in body.iter().enumerate() {
        let Token::Keyword(keyword) = token else {
            continue;
        };

        match keyword {
            Keyword::If | Keyword::Iff | Keyword::While => open.push(OpenBlock {
                keyword: *keyword,
                at: pos,
                middle: None,
            }),

            Keyword::Else => match open.last_mut() {
                Some(block) if block.keyword != Keyword::While && block.middle.is_none() => {
                    block.middle = Some(pos)
                }
                _ => return Err(unexpected(Keyword::Else)),
            },

            Keyword::Do => match open.last_mut() {
                Some(block) if block.keyword == Keyword::While && block.middle.is_none() => {
                    block.middle = Some(pos)
                }
                _ => return Err(unexpected(Keyword::Do)),
            },

            Keyword::End => {
                let block = open.pop().ok_or_else(|| unexpected(Keyword::End))?;
                if block.keyword == Keyword::While {
                    let do_at = block.middle.ok_or_else(|| unexpected(Keyword::While))?;
                    jumps.insert(block.at, Jump::While { do_at, end_at: pos });
                    jumps.insert(do_at, Jump::Do { end_at: pos });
                    jumps.insert(pos, Jump::Loop { while_at: block.at });
                } else {
                    jumps.insert(
                        block.at,
                        Jump::If {
                            else_at: block.middle,
                            end_at: pos,
                        },
                    );
                }
            }

            Keyword::Fun | Keyword::As => {}
        }
    }

    if !open.is_empty() {
        return Err(InterpError::MissingEnd {
            function: function.to_string(),
        });
    }

    Ok(jumps)
}
