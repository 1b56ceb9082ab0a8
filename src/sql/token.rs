//! Lexical units produced by the [`super::lexer::Lexer`].

use std::fmt;

use serde::Serialize;

/// The closed set of token classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    // -----------------------------------------------------------------------
    // Keywords
    // -----------------------------------------------------------------------
    SelectKeyword,
    FromKeyword,
    WhereKeyword,
    InsertKeyword,
    IntoKeyword,
    ValuesKeyword,
    DeleteKeyword,
    AndKeyword,
    OrKeyword,

    // -----------------------------------------------------------------------
    // Objects and literals
    // -----------------------------------------------------------------------
    Object,
    StringLiteral,
    Integer,

    // -----------------------------------------------------------------------
    // Operators
    // -----------------------------------------------------------------------
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // -----------------------------------------------------------------------
    // Punctuation
    // -----------------------------------------------------------------------
    Comma,
    Star,
    OpenParenthesis,
    CloseParenthesis,
    Whitespace,

    /// End-of-input sentinel.
    EndOfSequence,
}

impl TokenType {
    /// The six comparison operators accepted inside a condition.
    pub const COMPARISONS: [TokenType; 6] = [
        TokenType::Equal,
        TokenType::NotEqual,
        TokenType::LessThan,
        TokenType::LessThanOrEqual,
        TokenType::GreaterThan,
        TokenType::GreaterThanOrEqual,
    ];

    /// Classify a lowercased word as a keyword, if it is one.
    pub fn keyword(word: &str) -> Option<TokenType> {
        match word {
            "select" => Some(TokenType::SelectKeyword),
            "from" => Some(TokenType::FromKeyword),
            "where" => Some(TokenType::WhereKeyword),
            "insert" => Some(TokenType::InsertKeyword),
            "into" => Some(TokenType::IntoKeyword),
            "values" => Some(TokenType::ValuesKeyword),
            "delete" => Some(TokenType::DeleteKeyword),
            "and" => Some(TokenType::AndKeyword),
            "or" => Some(TokenType::OrKeyword),
            _ => None,
        }
    }

    /// The fixed spelling of keywords, operators and punctuation.
    ///
    /// Returns `None` for token types whose text varies (objects, literals,
    /// whitespace) and for the end-of-sequence sentinel.
    pub fn canonical_text(self) -> Option<&'static str> {
        let text = match self {
            TokenType::SelectKeyword => "select",
            TokenType::FromKeyword => "from",
            TokenType::WhereKeyword => "where",
            TokenType::InsertKeyword => "insert",
            TokenType::IntoKeyword => "into",
            TokenType::ValuesKeyword => "values",
            TokenType::DeleteKeyword => "delete",
            TokenType::AndKeyword => "and",
            TokenType::OrKeyword => "or",
            TokenType::Equal => "=",
            TokenType::NotEqual => "<>",
            TokenType::LessThan => "<",
            TokenType::LessThanOrEqual => "<=",
            TokenType::GreaterThan => ">",
            TokenType::GreaterThanOrEqual => ">=",
            TokenType::Comma => ",",
            TokenType::Star => "*",
            TokenType::OpenParenthesis => "(",
            TokenType::CloseParenthesis => ")",
            TokenType::Object
            | TokenType::StringLiteral
            | TokenType::Integer
            | TokenType::Whitespace
            | TokenType::EndOfSequence => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A classified lexical unit with an optional literal text payload.
///
/// `text` is set for objects, literals, whitespace, operators and punctuation;
/// keywords and the end-of-sequence sentinel carry no text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenType,
    pub text: Option<String>,
}

impl Token {
    pub fn new(kind: TokenType, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: Some(text.into()),
        }
    }

    /// A token carrying no text.
    pub fn marker(kind: TokenType) -> Self {
        Token { kind, text: None }
    }

    pub fn end_of_sequence() -> Self {
        Token::marker(TokenType::EndOfSequence)
    }

    /// The token's text, falling back to the canonical spelling of its type.
    pub fn lexeme(&self) -> &str {
        self.text
            .as_deref()
            .or_else(|| self.kind.canonical_text())
            .unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.text) {
            (TokenType::Object | TokenType::StringLiteral | TokenType::Integer, Some(text)) => {
                write!(f, "{} '{}'", self.kind, text)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}
