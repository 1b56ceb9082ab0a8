//! Unified error handling for MinDB.
//!
//! This module defines [`MinDbError`], the single error type propagated by
//! every layer of the crate: the lexer, the parser, the [`crate::Database`]
//! facade, and any [`crate::execution::Executor`] plugged in behind it.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, MinDbError>`.

use std::io;

use thiserror::Error;

use crate::sql::token::TokenType;

/// The canonical error type for all MinDB operations.
#[derive(Debug, Error)]
pub enum MinDbError {
    /// The query text could not be split into tokens.
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    /// The token stream does not match the grammar.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// The facade was handed blank input.
    #[error("unable to process query: no input")]
    EmptyQuery,

    /// An executor rejected a well-formed query (e.g. an unknown table).
    /// Never raised by the compiler itself.
    #[error("execution error: {0}")]
    Execution(String),

    /// An I/O error from the interactive shell.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl MinDbError {
    /// `true` for errors raised while compiling (lexing or parsing) a query.
    pub fn is_compile_error(&self) -> bool {
        matches!(self, MinDbError::Lex(_) | MinDbError::Syntax(_))
    }
}

/// Errors raised by [`crate::sql::lexer::Lexer`].
///
/// Positions are character offsets into the text as the caller passed it,
/// before lowercasing, and point at the first character of the offending
/// lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A digit-initial lexeme that mixes in letters or overflows `i32`.
    #[error("unable to tokenize integer '{text}' at offset {position}")]
    InvalidInteger { text: String, position: usize },

    #[error("string literal was never closed: '{text}' at offset {position}")]
    UnterminatedString { text: String, position: usize },

    #[error("encountered unexpected character '{character}' at offset {position}")]
    UnexpectedCharacter { character: char, position: usize },
}

/// Errors raised by [`crate::sql::parser::Parser`].
///
/// Positions are indexes into the token stream after whitespace removal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expected {}, found {found} at token {position}", describe_expected(.expected))]
    UnexpectedToken {
        expected: Vec<TokenType>,
        found: TokenType,
        position: usize,
    },

    #[error("condition nesting too deep (limit {limit}) at token {position}")]
    NestingTooDeep { limit: usize, position: usize },

    #[error("condition has too many AND/OR links (limit {limit}) at token {position}")]
    ChainTooLong { limit: usize, position: usize },
}

fn describe_expected(expected: &[TokenType]) -> String {
    match expected {
        [single] => single.to_string(),
        many => {
            let names: Vec<String> = many.iter().map(ToString::to_string).collect();
            format!("one of {}", names.join(", "))
        }
    }
}

/// A specialised [`Result`] type for MinDB operations.
pub type Result<T> = std::result::Result<T, MinDbError>;
