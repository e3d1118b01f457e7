//! Tokenizer and word classifier
//!
//! Carriage returns are stripped, then source text is split on whitespace
//! into words. Quoted strings spanning several words are reassembled first;
//! every other word is classified on its own by [`classify_word`].

use std::borrow::Cow;

use super::errors::{InterpError, InterpResult};
use super::types::{Keyword, Operator, Token, TypeDecl};

/// Output of the lexing pass: a bare word or a reassembled string literal
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme<'a> {
    Word(&'a str),
    Quoted(String),
}

impl<'a> Lexeme<'a> {
    pub fn to_token(&self) -> Token {
        match self {
            Lexeme::Word(word) => classify_word(word),
            Lexeme::Quoted(s) => Token::Str(s.clone()),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Lexeme::Word(word) if *word == keyword.name())
    }
}

/// Split source text into lexemes
pub fn lex(source: &str) -> InterpResult<Vec<Lexeme<'_>>> {
    let words = split_words(source);
    let mut lexemes = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let word = words[i];
        match opening_quote(word) {
            Some(quote) => {
                let (string, next) = read_string(&words, i, quote)?;
                lexemes.push(Lexeme::Quoted(string));
                i = next;
            }
            None => {
                lexemes.push(Lexeme::Word(word));
                i += 1;
            }
        }
    }

    Ok(lexemes)
}

/// Remove every carriage return, so `1\r2` is the single word `12`
pub fn strip_carriage_returns(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace('\r', ""))
    } else {
        Cow::Borrowed(source)
    }
}

/// Words are maximal non-whitespace runs
pub fn split_words(source: &str) -> Vec<&str> {
    source.split_whitespace().collect()
}

/// Classify one word, in priority order: operator, keyword, type, boolean,
/// number, identifier
pub fn classify_word(word: &str) -> Token {
    if let Some(op) = Operator::from_word(word) {
        Token::Op(op)
    } else if let Some(kw) = Keyword::from_word(word) {
        Token::Keyword(kw)
    } else if let Some(ty) = TypeDecl::from_word(word) {
        Token::Type(ty)
    } else if word == "true" || word == "false" {
        Token::Bool(word == "true")
    } else if let Some(v) = parse_number(word) {
        Token::num(v)
    } else {
        Token::Ident(word.to_string())
    }
}

/// Decimal literal such as `3`, `-2.5`, `.5` or `1e3`
///
/// Spellings Rust would also accept like `inf` or `NaN` stay identifiers.
fn parse_number(word: &str) -> Option<f64> {
    let numeric = word
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !numeric || !word.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    word.parse::<f64>().ok()
}

fn opening_quote(word: &str) -> Option<char> {
    word.chars().next().filter(|c| *c == '"' || *c == '\'')
}

/// Quote character closing `word`, unless it is escaped with a backslash
fn closing_quote(word: &str) -> Option<char> {
    let mut rev = word.chars().rev();
    let last = rev.next().filter(|c| *c == '"' || *c == '\'')?;
    match rev.next() {
        Some('\\') => None,
        _ => Some(last),
    }
}

/// Join words from `start` until one closes the string opened by `quote`
///
/// Returns the string without its quotes and the index after the last word
/// consumed.
fn read_string(words: &[&str], start: usize, quote: char) -> InterpResult<(String, usize)> {
    let mut text = words[start][quote.len_utf8()..].to_string();
    let mut i = start;

    while closing_quote(&text) != Some(quote) {
        i += 1;
        let Some(word) = words.get(i) else {
            return Err(InterpError::UnterminatedString {
                start: words[start].to_string(),
            });
        };
        text.push(' ');
        text.push_str(word);
    }

    text.pop();
    Ok((text, i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::types::NumKind;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify_word("+"), Token::Op(Operator::Add));
        assert_eq!(classify_word("print"), Token::Op(Operator::Print));
        assert_eq!(classify_word("while"), Token::Keyword(Keyword::While));
        assert_eq!(classify_word("double"), Token::Type(TypeDecl::Double));
        assert_eq!(classify_word("false"), Token::Bool(false));
        assert_eq!(classify_word("42"), Token::num(42.0));
        assert_eq!(classify_word("counter"), Token::Ident("counter".to_string()));
    }

    #[test]
    fn test_minus_is_operator_not_number() {
        assert_eq!(classify_word("-"), Token::Op(Operator::Sub));
        assert_eq!(
            classify_word("-7.5"),
            Token::Num {
                kind: NumKind::Num,
                v: -7.5
            }
        );
    }

    #[test]
    fn test_number_spellings() {
        assert_eq!(classify_word(".5"), Token::num(0.5));
        assert_eq!(classify_word("1e3"), Token::num(1000.0));
        assert_eq!(classify_word("inf"), Token::Ident("inf".to_string()));
        assert_eq!(classify_word("NaN"), Token::Ident("NaN".to_string()));
        assert_eq!(classify_word("1.2.3"), Token::Ident("1.2.3".to_string()));
    }

    #[test]
    fn test_carriage_returns_are_stripped_not_split() {
        let source = strip_carriage_returns("  1 2\r\n+\tpr\rint \n1\r2");
        assert_eq!(split_words(&source), vec!["1", "2", "+", "print", "12"]);
        assert!(matches!(strip_carriage_returns("1 2"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_multi_word_string() {
        let lexemes = lex(r#"1 "hello big world" print"#).unwrap();
        assert_eq!(
            lexemes,
            vec![
                Lexeme::Word("1"),
                Lexeme::Quoted("hello big world".to_string()),
                Lexeme::Word("print"),
            ]
        );
    }

    #[test]
    fn test_single_quotes_and_mixed_quote_inside() {
        let lexemes = lex(r#"'it "is' "it's""#).unwrap();
        assert_eq!(
            lexemes,
            vec![
                Lexeme::Quoted(r#"it "is"#.to_string()),
                Lexeme::Quoted("it's".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_and_space_strings() {
        let lexemes = lex(r#""" " " "#).unwrap();
        assert_eq!(
            lexemes,
            vec![Lexeme::Quoted(String::new()), Lexeme::Quoted(" ".to_string())]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        let lexemes = lex(r#""say \" more" x"#).unwrap();
        assert_eq!(
            lexemes,
            vec![
                Lexeme::Quoted(r#"say \" more"#.to_string()),
                Lexeme::Word("x"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex(r#"1 "never closed"#).unwrap_err();
        assert!(matches!(err, InterpError::UnterminatedString { .. }));
    }

    #[test]
    fn test_quoted_keyword_is_a_string() {
        let lexemes = lex(r#""end""#).unwrap();
        assert_eq!(lexemes[0].to_token(), Token::str("end"));
        assert!(!lexemes[0].is_keyword(Keyword::End));
    }
}
