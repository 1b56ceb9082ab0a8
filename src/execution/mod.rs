//! # Execution boundary
//!
//! The compiler stops at a [`QueryModel`]; running it belongs to whatever
//! storage layer implements [`Executor`]. Dispatch is an exhaustive `match`
//! over the three query kinds, so an executor cannot forget one.
//!
//! [`DescribeExecutor`] is the one executor shipped here: it answers every
//! query with a rendering of its AST, which is what the shell prints.

use std::sync::Arc;

use tracing::debug;

use crate::error::{MinDbError, Result};
use crate::sql::ast::*;
use crate::{QueryResult, Row};

/// Something that can run compiled queries.
///
/// Implementors handle each query kind; [`Executor::execute`] routes a
/// [`QueryModel`] to the right one. Failures such as an unknown table are
/// reported as [`MinDbError::Execution`].
pub trait Executor {
    fn select(&mut self, query: SelectQuery) -> Result<QueryResult>;

    fn insert(&mut self, query: InsertQuery) -> Result<QueryResult>;

    fn delete(&mut self, query: DeleteQuery) -> Result<QueryResult>;

    fn execute(&mut self, query: QueryModel) -> Result<QueryResult> {
        match query {
            QueryModel::Select(select) => self.select(select),
            QueryModel::Insert(insert) => self.insert(insert),
            QueryModel::Delete(delete) => self.delete(delete),
        }
    }
}

/// How [`DescribeExecutor`] renders a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The compact `Display` form, e.g. `DELETE | Table = users`.
    #[default]
    Text,
    /// Pretty-printed JSON of the full AST.
    Json,
}

/// Answers every query with a single `plan` row describing its AST.
#[derive(Debug, Clone, Default)]
pub struct DescribeExecutor {
    format: OutputFormat,
}

impl DescribeExecutor {
    pub const COLUMN: &'static str = "plan";

    pub fn new(format: OutputFormat) -> Self {
        DescribeExecutor { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn describe(&self, query: QueryModel) -> Result<QueryResult> {
        let rendered = match self.format {
            OutputFormat::Text => query.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&query)
                .map_err(|e| MinDbError::Execution(format!("cannot render query: {e}")))?,
        };
        debug!(format = ?self.format, "described query");

        let columns = Arc::new(vec![Self::COLUMN.to_string()]);
        Ok(QueryResult {
            rows: vec![Row {
                columns: Arc::clone(&columns),
                values: vec![rendered],
            }],
            columns,
        })
    }
}

impl Executor for DescribeExecutor {
    fn select(&mut self, query: SelectQuery) -> Result<QueryResult> {
        self.describe(QueryModel::Select(query))
    }

    fn insert(&mut self, query: InsertQuery) -> Result<QueryResult> {
        self.describe(QueryModel::Insert(query))
    }

    fn delete(&mut self, query: DeleteQuery) -> Result<QueryResult> {
        self.describe(QueryModel::Delete(query))
    }
}
