//! Token and runtime value types
//!
//! A `Token` is both what the parser stores in a function body and what the
//! executor keeps on a data stack. The enum carries its payload inline, so a
//! token's kind and payload can never disagree.

use serde::{Deserialize, Serialize};
use std::fmt;

/* ===================== Builtin Operators ===================== */

/// Builtin stack-transforming primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Max,
    Min,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Print,
    Ret,
    Copy,
    Drop,
    Swap,
    Rot,
    Carry,
    Sqrt,
    Is,
    Assert,
}

impl Operator {
    pub const ALL: [Operator; 23] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Mod,
        Operator::Max,
        Operator::Min,
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Print,
        Operator::Ret,
        Operator::Copy,
        Operator::Drop,
        Operator::Swap,
        Operator::Rot,
        Operator::Carry,
        Operator::Sqrt,
        Operator::Is,
        Operator::Assert,
    ];

    /// Source spelling of the operator
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Max => "max",
            Operator::Min => "min",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Print => "print",
            Operator::Ret => "ret",
            Operator::Copy => "copy",
            Operator::Drop => "drop",
            Operator::Swap => "swap",
            Operator::Rot => "rot",
            Operator::Carry => "carry",
            Operator::Sqrt => "sqrt",
            Operator::Is => "is",
            Operator::Assert => "assert",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == word)
    }
}

/* ===================== Structural Keywords ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    End,
    If,
    Iff,
    Else,
    While,
    Do,
    Fun,
    As,
}

impl Keyword {
    pub const ALL: [Keyword; 8] = [
        Keyword::End,
        Keyword::If,
        Keyword::Iff,
        Keyword::Else,
        Keyword::While,
        Keyword::Do,
        Keyword::Fun,
        Keyword::As,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Keyword::End => "end",
            Keyword::If => "if",
            Keyword::Iff => "iff",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Do => "do",
            Keyword::Fun => "fun",
            Keyword::As => "as",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kw| kw.name() == word)
    }

    /// Keywords that open a block closed by `end`
    pub fn opens_block(self) -> bool {
        matches!(self, Keyword::If | Keyword::Iff | Keyword::While)
    }
}

/* ===================== Type Declarations ===================== */

/// Parameter type names usable between `fun <name>` and `as`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDecl {
    Num,
    Int,
    Float,
    Double,
    String,
    Bool,
}

impl TypeDecl {
    pub const ALL: [TypeDecl; 6] = [
        TypeDecl::Num,
        TypeDecl::Int,
        TypeDecl::Float,
        TypeDecl::Double,
        TypeDecl::String,
        TypeDecl::Bool,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeDecl::Num => "num",
            TypeDecl::Int => "int",
            TypeDecl::Float => "float",
            TypeDecl::Double => "double",
            TypeDecl::String => "string",
            TypeDecl::Bool => "bool",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == word)
    }

    /// Check a runtime value against this declared type
    ///
    /// Returns the value to bind, retagged with the declared numeric kind, or
    /// `None` when the value does not fit. `num` keeps the incoming kind and
    /// `int` rejects values with a fractional part.
    pub fn accept(self, value: &Token) -> Option<Token> {
        match (self, value) {
            (TypeDecl::Num, Token::Num { .. }) => Some(value.clone()),
            (TypeDecl::Int, Token::Num { v, .. }) if v.is_finite() && v.fract() == 0.0 => {
                Some(Token::Num { kind: NumKind::Int, v: *v })
            }
            (TypeDecl::Float, Token::Num { v, .. }) => Some(Token::Num { kind: NumKind::Float, v: *v }),
            (TypeDecl::Double, Token::Num { v, .. }) => Some(Token::Num { kind: NumKind::Double, v: *v }),
            (TypeDecl::String, Token::Str(_)) | (TypeDecl::Bool, Token::Bool(_)) => Some(value.clone()),
            _ => None,
        }
    }
}

/* ===================== Tokens ===================== */

/// Numeric kind carried by a number
///
/// Literals are always `Num`; the other kinds come from binding a number to
/// an `int`, `float` or `double` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumKind {
    Num,
    Int,
    Float,
    Double,
}

/// A classified word or runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Token {
    Op(Operator),
    Num { kind: NumKind, v: f64 },
    Str(String),
    Bool(bool),
    Type(TypeDecl),
    Keyword(Keyword),
    Ident(String),
}

impl Token {
    /// Plain numeric literal
    pub fn num(v: f64) -> Self {
        Token::Num { kind: NumKind::Num, v }
    }

    pub fn str(s: impl Into<String>) -> Self {
        Token::Str(s.into())
    }

    /// Short name of the token's kind, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Op(_) => "operator",
            Token::Num { kind: NumKind::Num, .. } => "num",
            Token::Num { kind: NumKind::Int, .. } => "int",
            Token::Num { kind: NumKind::Float, .. } => "float",
            Token::Num { kind: NumKind::Double, .. } => "double",
            Token::Str(_) => "string",
            Token::Bool(_) => "bool",
            Token::Type(_) => "type",
            Token::Keyword(_) => "keyword",
            Token::Ident(_) => "identifier",
        }
    }

    pub fn as_number(&self) -> Option<(NumKind, f64)> {
        match self {
            Token::Num { kind, v } => Some((*kind, *v)),
            _ => None,
        }
    }

    /// Values `print` accepts
    pub fn is_printable(&self) -> bool {
        matches!(self, Token::Num { .. } | Token::Str(_) | Token::Bool(_))
    }

    /// Equality as seen by `==` and `!=`
    ///
    /// Numbers compare by value whatever their kind.
    pub fn same_value(&self, other: &Token) -> bool {
        match (self, other) {
            (Token::Num { v: a, .. }, Token::Num { v: b, .. }) => a == b,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Op(op) => f.write_str(op.name()),
            Token::Num { v, .. } => f.write_str(&format_number(*v)),
            Token::Str(s) => f.write_str(s),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Type(ty) => f.write_str(ty.name()),
            Token::Keyword(kw) => f.write_str(kw.name()),
            Token::Ident(name) => f.write_str(name),
        }
    }
}

/// Render a number the way `print` shows it
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let sign = if v > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_names_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_word(op.name()), Some(op));
        }
        assert_eq!(Operator::from_word("plus"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_int_rejects_fraction() {
        assert_eq!(TypeDecl::Int.accept(&Token::num(2.5)), None);
        assert_eq!(
            TypeDecl::Int.accept(&Token::num(2.0)),
            Some(Token::Num { kind: NumKind::Int, v: 2.0 })
        );
    }

    #[test]
    fn test_num_keeps_kind() {
        let int = Token::Num { kind: NumKind::Int, v: 4.0 };
        assert_eq!(TypeDecl::Num.accept(&int), Some(int));
        assert_eq!(TypeDecl::Num.accept(&Token::str("4")), None);
    }

    #[test]
    fn test_same_value_ignores_numeric_kind() {
        let int = Token::Num { kind: NumKind::Int, v: 3.0 };
        assert!(int.same_value(&Token::num(3.0)));
        assert!(!Token::str("3").same_value(&Token::num(3.0)));
    }
}
