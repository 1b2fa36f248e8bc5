//! Lexer for mapping-file SDL using logos.
//!
//! Keywords such as `type` or `extend` are contextual in SDL, so they are
//! lexed as plain names and recognised by the parser.

use crate::error::ParseError;
use crate::span::Span;
use logos::Logos;
use std::fmt;

/// SDL tokens.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f,\u{FEFF}]+")]
#[logos(skip r"#[^\r\n]*")]
pub enum Token {
    // Punctuators
    #[token("!")]
    Bang,
    #[token("$")]
    Dollar,
    #[token("&")]
    Amp,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("...")]
    Spread,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("@")]
    At,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("|")]
    Pipe,
    #[token("}")]
    RBrace,

    #[regex(r"[_A-Za-z][_0-9A-Za-z]*", |lex| lex.slice().to_string())]
    Name(String),

    #[regex(r"-?(0|[1-9][0-9]*)", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(
        r"-?(0|[1-9][0-9]*)(\.[0-9]+([eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)",
        |lex| lex.slice().parse::<f64>().ok()
    )]
    Float(f64),

    #[regex(r#""([^"\\\r\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len() - 1])
    })]
    String(String),

    #[token("\"\"\"", lex_block_string)]
    BlockString(String),
}

impl Token {
    /// Human readable form used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Name(name) => format!("name `{}`", name),
            Token::Int(v) => format!("integer {}", v),
            Token::Float(v) => format!("float {}", v),
            Token::String(_) | Token::BlockString(_) => "string".to_string(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Bang => "!",
            Token::Dollar => "$",
            Token::Amp => "&",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Spread => "...",
            Token::Colon => ":",
            Token::Equals => "=",
            Token::At => "@",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::Pipe => "|",
            Token::RBrace => "}",
            Token::Name(name) => name.as_str(),
            Token::Int(v) => return write!(f, "{}", v),
            Token::Float(v) => return write!(f, "{}", v),
            Token::String(s) | Token::BlockString(s) => return write!(f, "{:?}", s),
        };
        f.write_str(text)
    }
}

/// Unescape a quoted string literal body.
///
/// Returns `None` for a malformed `\u` escape, which logos reports as a
/// lexer error.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next()? {
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            'b' => result.push('\u{0008}'),
            'f' => result.push('\u{000C}'),
            '/' => result.push('/'),
            '\\' => result.push('\\'),
            '"' => result.push('"'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                result.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }

    Some(result)
}

/// Scan a `"""` block string; the opening quotes are already consumed.
fn lex_block_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i..].starts_with(b"\\\"\"\"") {
            i += 4;
            continue;
        }
        if bytes[i..].starts_with(b"\"\"\"") {
            let raw = rest[..i].replace("\\\"\"\"", "\"\"\"");
            lex.bump(i + 3);
            return Some(block_string_value(&raw));
        }
        i += 1;
    }

    None
}

/// Strip the common indentation and surrounding blank lines of a block string.
fn block_string_value(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let mut dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                *line
            } else {
                strip_indent(line, common_indent)
            }
        })
        .collect();

    while dedented.first().is_some_and(|l| l.trim().is_empty()) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(|l| l.trim().is_empty()) {
        dedented.pop();
    }

    dedented.join("\n")
}

/// Remove up to `indent` leading spaces or tabs.
fn strip_indent(line: &str, indent: usize) -> &str {
    let cut = line
        .chars()
        .take(indent)
        .take_while(|c| matches!(c, ' ' | '\t'))
        .count();
    &line[cut..]
}

/// A token with its span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer that produces spanned tokens.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
        }
    }

    /// Get the source string.
    pub fn source(&self) -> &'source str {
        self.inner.source()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<SpannedToken, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.inner.next()?;
        let span: Span = self.inner.span().into();
        Some(match token {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(()) => {
                let slice = self.inner.slice();
                let err = ParseError::new(format!("unexpected character sequence `{}`", slice), span);
                Err(if slice.starts_with('"') {
                    err.with_hint("string literals must be closed and use valid escapes")
                } else {
                    err
                })
            }
        })
    }
}

/// Tokenize a source string, stopping at the first invalid token.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    Lexer::new(source).collect()
}
