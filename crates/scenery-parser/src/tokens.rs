use std::fmt;

use crate::span::Span;

/// Token types of the scene description format
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Literals
    StringLiteral(String),
    /// `&"name"`
    StringName(String),
    /// `^"path"`
    NodePath(String),
    Number(f64),
    /// Keys, bare words and constructor names, e.g. `metadata/_edit_lock_`
    Identifier(&'src str),

    // Punctuation
    Equals,       // =
    Comma,        // ,
    Colon,        // :
    LeftBracket,  // [
    RightBracket, // ]
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }

    // Comments
    LineComment(&'src str), // ; comment

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns true for tokens the parser skips between meaningful tokens.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    }
}

/// A token with its position in the source
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::StringName(s) => write!(f, "&\"{s}\""),
            Token::NodePath(s) => write!(f, "^\"{s}\""),
            Token::Number(n) => write!(f, "{n}"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::Equals => write!(f, "="),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),

            Token::LineComment(comment) => write!(f, ";{comment}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => writeln!(f),
        }
    }
}
