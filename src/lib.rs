//! # MinDB
//!
//! A minimal SQL-like query compiler. Query text goes through the
//! [`sql::lexer`] and [`sql::parser`] and comes out as a typed
//! [`QueryModel`], which a [`Database`] hands to an [`Executor`].
//!
//! ```
//! use mindb::{compile, QueryModel};
//!
//! let query = compile("DELETE FROM users WHERE age > 0").unwrap();
//! assert!(matches!(query, QueryModel::Delete(_)));
//! ```

pub mod error;
pub mod sql;
pub mod execution;

pub use error::{LexError, MinDbError, Result, SyntaxError};
pub use execution::{DescribeExecutor, Executor, OutputFormat};
pub use sql::{compile, tokenize, QueryModel, Token, TokenType};

use std::sync::Arc;

use tracing::{debug, warn};

/// A row returned by an executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub columns: Arc<Vec<String>>,
    pub values: Vec<String>,
}

impl Row {
    /// Get a value by column name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Get a value by column index.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

/// Query result set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Arc<Vec<String>>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// A result with no columns and no rows, for statements that return
    /// nothing.
    pub fn empty() -> Self {
        QueryResult {
            columns: Arc::new(vec![]),
            rows: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Compiles query text and passes the result to an executor.
///
/// Each call to [`Database::execute`] is independent: a failed query leaves
/// nothing behind for the next one.
pub struct Database<E: Executor> {
    executor: E,
}

impl<E: Executor> Database<E> {
    pub fn new(executor: E) -> Self {
        Database { executor }
    }

    /// Compile and run one query.
    ///
    /// Blank input is rejected with [`MinDbError::EmptyQuery`] before the
    /// compiler sees it.
    pub fn execute(&mut self, text: &str) -> Result<QueryResult> {
        if text.trim().is_empty() {
            return Err(MinDbError::EmptyQuery);
        }

        let query = compile(text).map_err(|e| {
            warn!(error = %e, "rejected query");
            e
        })?;
        debug!(table = %query.target_table(), "executing query");
        self.executor.execute(query)
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }
}
