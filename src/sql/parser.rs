//! Recursive-descent parser for MinDB queries.
//!
//! ```text
//! stmt         := select_stmt | insert_stmt | delete_stmt
//! select_stmt  := SELECT obj_list FROM object where_clause? EOS
//! insert_stmt  := INSERT INTO object VALUES row (',' row)* EOS
//! delete_stmt  := DELETE FROM object where_clause? EOS
//! row          := '(' value (',' value)* ')'
//! obj_list     := object (',' object)*
//! where_clause := WHERE condition
//! condition    := '(' condition ')' cond_next
//!               | object comp_op value cond_next
//! cond_next    := (AND | OR) condition | ε
//! comp_op      := '=' | '<>' | '<' | '<=' | '>' | '>='
//! value        := string_literal | integer
//! ```
//!
//! `AND` and `OR` share one precedence level and chain to the right:
//! `a AND b OR c` is `a AND (b OR c)`. Parentheses are the only way to group
//! differently. `*` is a token but is not accepted in the column list.

use tracing::debug;

use crate::error::{MinDbError, Result, SyntaxError};
use crate::sql::ast::*;
use crate::sql::lexer;
use crate::sql::token::{Token, TokenType};

/// Maximum depth of parenthesised conditions.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Maximum number of `AND`/`OR` links on any root-to-leaf path of a
/// condition tree, counting links in enclosing chains.
///
/// Each link adds one level to the tree, and rendering, comparing or dropping
/// a tree recurses once per level.
pub const MAX_CHAIN_LINKS: usize = 512;

static END_OF_SEQUENCE: Token = Token {
    kind: TokenType::EndOfSequence,
    text: None,
};

/// Tokenize and parse a query in one call.
pub fn compile(text: &str) -> Result<QueryModel> {
    Parser::new(lexer::tokenize(text)?).parse()
}

/// A recursive-descent parser over one query's token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    links: usize,
}

impl Parser {
    /// Build a parser over `tokens`, dropping whitespace.
    ///
    /// The stream need not end in [`TokenType::EndOfSequence`]: reading past
    /// the last token always yields one.
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| t.kind != TokenType::Whitespace)
            .collect();
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            links: 0,
        }
    }

    /// Parse exactly one query.
    pub fn parse(mut self) -> Result<QueryModel> {
        let query = match self.current_kind() {
            TokenType::SelectKeyword => self.parse_select()?,
            TokenType::InsertKeyword => self.parse_insert()?,
            TokenType::DeleteKeyword => self.parse_delete()?,
            _ => {
                return Err(self.unexpected(&[
                    TokenType::SelectKeyword,
                    TokenType::InsertKeyword,
                    TokenType::DeleteKeyword,
                ]))
            }
        };
        debug!(table = %query.target_table(), "parsed query");
        Ok(query)
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&END_OF_SEQUENCE)
    }

    fn current_kind(&self) -> TokenType {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenType) -> Result<Token> {
        if self.current_kind() == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&[expected]))
        }
    }

    /// Require the end of input, naming `alternatives` as what else could
    /// have followed.
    fn expect_end(&self, alternatives: &[TokenType]) -> Result<()> {
        if self.current_kind() == TokenType::EndOfSequence {
            return Ok(());
        }
        let mut expected = alternatives.to_vec();
        expected.push(TokenType::EndOfSequence);
        Err(self.unexpected(&expected))
    }

    fn unexpected(&self, expected: &[TokenType]) -> MinDbError {
        SyntaxError::UnexpectedToken {
            expected: expected.to_vec(),
            found: self.current_kind(),
            position: self.pos,
        }
        .into()
    }

    // =======================================================================
    // Statements
    // =======================================================================

    fn parse_select(&mut self) -> Result<QueryModel> {
        self.expect(TokenType::SelectKeyword)?;
        let target_columns = self.parse_object_list()?;
        self.expect(TokenType::FromKeyword)?;
        let target_table = self.parse_object()?;
        let condition = self.parse_where_clause()?;

        Ok(QueryModel::Select(SelectQuery {
            target_columns,
            target_table,
            condition,
        }))
    }

    fn parse_insert(&mut self) -> Result<QueryModel> {
        self.expect(TokenType::InsertKeyword)?;
        self.expect(TokenType::IntoKeyword)?;
        let target_table = self.parse_object()?;
        self.expect(TokenType::ValuesKeyword)?;

        let mut rows = vec![self.parse_value_group()?];
        while self.current_kind() == TokenType::Comma {
            self.advance();
            rows.push(self.parse_value_group()?);
        }
        self.expect_end(&[TokenType::Comma])?;

        Ok(QueryModel::Insert(InsertQuery { target_table, rows }))
    }

    fn parse_delete(&mut self) -> Result<QueryModel> {
        self.expect(TokenType::DeleteKeyword)?;
        self.expect(TokenType::FromKeyword)?;
        let target_table = self.parse_object()?;
        let condition = self.parse_where_clause()?;

        Ok(QueryModel::Delete(DeleteQuery {
            target_table,
            condition,
        }))
    }

    /// Optional `WHERE` clause, followed by the end of input.
    fn parse_where_clause(&mut self) -> Result<Option<ConditionTree>> {
        if self.current_kind() != TokenType::WhereKeyword {
            self.expect_end(&[TokenType::WhereKeyword])?;
            return Ok(None);
        }
        self.advance();
        let condition = self.parse_condition()?;
        self.expect_end(&[TokenType::AndKeyword, TokenType::OrKeyword])?;
        Ok(Some(condition))
    }

    // =======================================================================
    // Lists
    // =======================================================================

    fn parse_object_list(&mut self) -> Result<Vec<ObjectModel>> {
        let mut objects = vec![self.parse_object()?];
        while self.current_kind() == TokenType::Comma {
            self.advance();
            objects.push(self.parse_object()?);
        }
        Ok(objects)
    }

    fn parse_value_group(&mut self) -> Result<ValueGroup> {
        self.expect(TokenType::OpenParenthesis)?;
        let mut values = vec![self.parse_value()?];
        while self.current_kind() == TokenType::Comma {
            self.advance();
            values.push(self.parse_value()?);
        }
        self.expect(TokenType::CloseParenthesis)?;
        Ok(ValueGroup { values })
    }

    // =======================================================================
    // Conditions
    // =======================================================================

    /// A base condition followed by any number of `AND`/`OR` links.
    ///
    /// The chain is collected in a loop and folded from the right, which
    /// gives the same tree as recursing on the remainder after each link.
    fn parse_condition(&mut self) -> Result<ConditionTree> {
        let mut rightmost = self.parse_base_condition()?;
        let mut chain: Vec<(ConditionTree, OperatorKind)> = Vec::new();

        while let Some(kind) = self.junction() {
            if self.links == MAX_CHAIN_LINKS {
                return Err(SyntaxError::ChainTooLong {
                    limit: MAX_CHAIN_LINKS,
                    position: self.pos,
                }
                .into());
            }
            self.advance();
            self.links += 1;
            let next = self.parse_base_condition()?;
            chain.push((std::mem::replace(&mut rightmost, next), kind));
        }
        self.links -= chain.len();

        Ok(chain
            .into_iter()
            .rev()
            .fold(rightmost, |right, (left, kind)| {
                ConditionTree::junction(left, kind, right)
            }))
    }

    fn parse_base_condition(&mut self) -> Result<ConditionTree> {
        match self.current_kind() {
            TokenType::OpenParenthesis => {
                if self.depth == MAX_NESTING_DEPTH {
                    return Err(SyntaxError::NestingTooDeep {
                        limit: MAX_NESTING_DEPTH,
                        position: self.pos,
                    }
                    .into());
                }
                self.advance();
                self.depth += 1;
                let inner = self.parse_condition()?;
                self.depth -= 1;
                self.expect(TokenType::CloseParenthesis)?;
                Ok(inner)
            }
            TokenType::Object => {
                let object = self.parse_object()?;
                let operator = self.parse_comparison_operator()?;
                let value = self.parse_value()?;
                Ok(ConditionTree::comparison(object, operator, value))
            }
            _ => Err(self.unexpected(&[TokenType::OpenParenthesis, TokenType::Object])),
        }
    }

    fn junction(&self) -> Option<OperatorKind> {
        match self.current_kind() {
            TokenType::AndKeyword => Some(OperatorKind::And),
            TokenType::OrKeyword => Some(OperatorKind::Or),
            _ => None,
        }
    }

    fn parse_comparison_operator(&mut self) -> Result<OperatorKind> {
        let kind = match self.current_kind() {
            TokenType::Equal => OperatorKind::Equal,
            TokenType::NotEqual => OperatorKind::NotEqual,
            TokenType::LessThan => OperatorKind::LessThan,
            TokenType::LessThanOrEqual => OperatorKind::LessThanOrEqual,
            TokenType::GreaterThan => OperatorKind::GreaterThan,
            TokenType::GreaterThanOrEqual => OperatorKind::GreaterThanOrEqual,
            _ => return Err(self.unexpected(&TokenType::COMPARISONS)),
        };
        self.advance();
        Ok(kind)
    }

    // =======================================================================
    // Leaves
    // =======================================================================

    fn parse_object(&mut self) -> Result<ObjectModel> {
        let token = self.expect(TokenType::Object)?;
        Ok(ObjectModel::new(token.text.unwrap_or_default()))
    }

    fn parse_value(&mut self) -> Result<ValueModel> {
        let kind = match self.current_kind() {
            TokenType::StringLiteral => ValueType::String,
            TokenType::Integer => ValueType::Integer,
            _ => return Err(self.unexpected(&[TokenType::StringLiteral, TokenType::Integer])),
        };
        let token = self.advance();
        Ok(ValueModel {
            kind,
            text: token.text.unwrap_or_default(),
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
