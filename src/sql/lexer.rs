//! Hand-written tokenizer for the MinDB query language.
//!
//! The [`Lexer`] takes raw query text and produces a `Vec<Token>` terminated
//! by [`TokenType::EndOfSequence`]. The whole input is lowercased before
//! scanning, so keywords are case-insensitive and identifiers and string
//! contents come out lowercased as well.
//!
//! Whitespace is kept in the output as [`TokenType::Whitespace`] tokens;
//! dropping it is the parser's job.

use tracing::{debug, trace};

use crate::error::{LexError, Result};
use crate::sql::token::{Token, TokenType};

/// Tokenize `text` in one call.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    Lexer::new(text).tokenize()
}

/// A hand-written query tokenizer.
///
/// Create one with [`Lexer::new`], then call [`Lexer::tokenize`] to obtain
/// the full token stream.
pub struct Lexer {
    input: Vec<char>,
    /// For each lowercased char, the char offset it came from in the text
    /// the caller passed in.
    origin: Vec<usize>,
    pos: usize,
}

impl Lexer {
    /// Create a new lexer over the given query text.
    ///
    /// Lowercasing can expand one char into several (`İ` becomes `i̇`), so
    /// each folded char remembers where it sat in `text`.
    pub fn new(text: &str) -> Self {
        let mut input = Vec::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        for (offset, ch) in text.chars().enumerate() {
            for lower in ch.to_lowercase() {
                input.push(lower);
                origin.push(offset);
            }
        }
        Lexer {
            input,
            origin,
            pos: 0,
        }
    }

    /// Tokenize the entire input.
    ///
    /// Either the returned vector ends with exactly one
    /// [`TokenType::EndOfSequence`], or the first invalid construct is
    /// reported and nothing else is returned.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            let token = if ch.is_whitespace() {
                self.read_whitespace()
            } else if ch.is_alphabetic() {
                self.read_keyword_or_object()
            } else if ch.is_numeric() {
                self.read_integer()?
            } else if ch == '\'' {
                self.read_string_literal()?
            } else {
                self.read_operator(ch)?
            };
            trace!(token = %token, "scanned token");
            tokens.push(token);
        }
        tokens.push(Token::end_of_sequence());

        debug!(count = tokens.len(), "tokenized query");
        Ok(tokens)
    }

    // -- helpers ------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    /// Offset in the caller's text of the char at `index`.
    fn source_offset(&self, index: usize) -> usize {
        self.origin.get(index).copied().unwrap_or(index)
    }

    fn advance_by(&mut self, count: usize) {
        self.pos += count;
    }

    /// Consume characters while `predicate` holds and return them.
    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().map_or(false, &predicate) {
            self.pos += 1;
        }
        self.input[start..self.pos].iter().collect()
    }

    // -- readers ------------------------------------------------------------

    fn read_whitespace(&mut self) -> Token {
        let text = self.take_while(char::is_whitespace);
        Token::new(TokenType::Whitespace, text)
    }

    fn read_keyword_or_object(&mut self) -> Token {
        let word = self.take_while(char::is_alphanumeric);
        match TokenType::keyword(&word) {
            Some(keyword) => Token::marker(keyword),
            None => Token::new(TokenType::Object, word),
        }
    }

    fn read_integer(&mut self) -> Result<Token> {
        let start = self.pos;
        // Letters are swallowed too so that `123abc` is reported as one bad
        // integer rather than split into an integer and an object.
        let text = self.take_while(char::is_alphanumeric);
        if text.parse::<i32>().is_err() {
            return Err(LexError::InvalidInteger {
                text,
                position: self.source_offset(start),
            }
            .into());
        }
        Ok(Token::new(TokenType::Integer, text))
    }

    fn read_string_literal(&mut self) -> Result<Token> {
        let start = self.pos;
        self.advance_by(1); // opening '
        let text = self.take_while(|c| c != '\'');
        if self.peek() != Some('\'') {
            return Err(LexError::UnterminatedString {
                text,
                position: self.source_offset(start),
            }
            .into());
        }
        self.advance_by(1); // closing '
        Ok(Token::new(TokenType::StringLiteral, text))
    }

    fn read_operator(&mut self, ch: char) -> Result<Token> {
        let kind = match (ch, self.peek_at(1)) {
            ('=', _) => TokenType::Equal,
            ('<', Some('=')) => TokenType::LessThanOrEqual,
            ('<', Some('>')) => TokenType::NotEqual,
            ('<', _) => TokenType::LessThan,
            ('>', Some('=')) => TokenType::GreaterThanOrEqual,
            ('>', _) => TokenType::GreaterThan,
            ('(', _) => TokenType::OpenParenthesis,
            (')', _) => TokenType::CloseParenthesis,
            (',', _) => TokenType::Comma,
            ('*', _) => TokenType::Star,
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    character: ch,
                    position: self.source_offset(self.pos),
                }
                .into())
            }
        };
        let spelling = kind.canonical_text().unwrap_or_default();
        self.advance_by(spelling.chars().count());
        Ok(Token::new(kind, spelling))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
