//! Query front-end for MinDB.
//!
//! This module contains the token model, the lexer (tokenizer), the abstract
//! syntax tree (AST) definitions, and a recursive-descent parser that turns
//! raw query text into a [`QueryModel`] ready for an executor.

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;

pub use ast::*;
pub use lexer::{tokenize, Lexer};
pub use parser::{compile, Parser};
pub use token::{Token, TokenType};
