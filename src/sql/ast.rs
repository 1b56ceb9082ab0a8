//! Abstract syntax tree definitions for MinDB queries.
//!
//! Every query accepted by the [`super::parser::Parser`] is represented as a
//! [`QueryModel`]. The tree is built once per parse, is strictly owned (no
//! sharing, no cycles), and is handed by value to an
//! [`crate::execution::Executor`].

use std::fmt;

use serde::Serialize;

/// A top-level query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QueryModel {
    Select(SelectQuery),
    Insert(InsertQuery),
    Delete(DeleteQuery),
}

impl QueryModel {
    /// The table every query variant targets.
    pub fn target_table(&self) -> &ObjectModel {
        match self {
            QueryModel::Select(q) => &q.target_table,
            QueryModel::Insert(q) => &q.target_table,
            QueryModel::Delete(q) => &q.target_table,
        }
    }
}

/// `SELECT a, b FROM t [WHERE ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectQuery {
    /// Never empty.
    pub target_columns: Vec<ObjectModel>,
    pub target_table: ObjectModel,
    pub condition: Option<ConditionTree>,
}

/// `INSERT INTO t VALUES (..), (..)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertQuery {
    pub target_table: ObjectModel,
    pub rows: Vec<ValueGroup>,
}

/// One parenthesised row of an `INSERT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueGroup {
    pub values: Vec<ValueModel>,
}

/// `DELETE FROM t [WHERE ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteQuery {
    pub target_table: ObjectModel,
    pub condition: Option<ConditionTree>,
}

/// An identifier: a table or column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectModel {
    pub name: String,
}

impl ObjectModel {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectModel { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueType {
    String,
    Integer,
}

/// A literal. `text` is the raw lexeme: string contents without quotes, or
/// the digit string of an integer. No numeric conversion happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueModel {
    pub kind: ValueType,
    pub text: String,
}

impl ValueModel {
    pub fn string(text: impl Into<String>) -> Self {
        ValueModel {
            kind: ValueType::String,
            text: text.into(),
        }
    }

    pub fn integer(text: impl Into<String>) -> Self {
        ValueModel {
            kind: ValueType::Integer,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl OperatorKind {
    pub fn is_comparison(self) -> bool {
        !matches!(self, OperatorKind::And | OperatorKind::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OperatorModel {
    pub kind: OperatorKind,
}

impl OperatorModel {
    pub fn new(kind: OperatorKind) -> Self {
        OperatorModel { kind }
    }
}

// ---------------------------------------------------------------------------
// Condition trees
// ---------------------------------------------------------------------------

/// Payload of a condition-tree leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Operand {
    Object(ObjectModel),
    Value(ValueModel),
}

/// A borrowed view of whatever a condition-tree node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionNode<'a> {
    Object(&'a ObjectModel),
    Operator(&'a OperatorModel),
    Value(&'a ValueModel),
}

/// A binary tree encoding a `WHERE` expression.
///
/// Leaves hold objects or values; internal nodes hold an operator and always
/// have both children. A comparison node has an object leaf on the left and a
/// value leaf on the right; `And`/`Or` nodes join arbitrary subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConditionTree {
    Leaf(Operand),
    Node {
        left: Box<ConditionTree>,
        operator: OperatorModel,
        right: Box<ConditionTree>,
    },
}

impl ConditionTree {
    /// `object <op> value`.
    pub fn comparison(object: ObjectModel, kind: OperatorKind, value: ValueModel) -> Self {
        debug_assert!(kind.is_comparison());
        ConditionTree::Node {
            left: Box::new(ConditionTree::Leaf(Operand::Object(object))),
            operator: OperatorModel::new(kind),
            right: Box::new(ConditionTree::Leaf(Operand::Value(value))),
        }
    }

    /// `left AND right` or `left OR right`.
    pub fn junction(left: ConditionTree, kind: OperatorKind, right: ConditionTree) -> Self {
        debug_assert!(!kind.is_comparison());
        ConditionTree::Node {
            left: Box::new(left),
            operator: OperatorModel::new(kind),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ConditionTree::Leaf(_))
    }

    pub fn payload(&self) -> ConditionNode<'_> {
        match self {
            ConditionTree::Leaf(Operand::Object(object)) => ConditionNode::Object(object),
            ConditionTree::Leaf(Operand::Value(value)) => ConditionNode::Value(value),
            ConditionTree::Node { operator, .. } => ConditionNode::Operator(operator),
        }
    }

    pub fn left(&self) -> Option<&ConditionTree> {
        match self {
            ConditionTree::Node { left, .. } => Some(left.as_ref()),
            ConditionTree::Leaf(_) => None,
        }
    }

    pub fn right(&self) -> Option<&ConditionTree> {
        match self {
            ConditionTree::Node { right, .. } => Some(right.as_ref()),
            ConditionTree::Leaf(_) => None,
        }
    }

    /// Number of nodes (leaves included).
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let ConditionTree::Node { left, right, .. } = node {
                stack.push(left.as_ref());
                stack.push(right.as_ref());
            }
        }
        count
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ObjectModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for ValueModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueType::Integer => write!(f, "Integer {}", self.text),
            ValueType::String => write!(f, "String '{}'", self.text),
        }
    }
}

impl fmt::Display for OperatorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)
    }
}

impl fmt::Display for ValueGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", join(&self.values, ","))
    }
}

impl fmt::Display for ConditionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionTree::Leaf(Operand::Object(object)) => write!(f, "{object}"),
            ConditionTree::Leaf(Operand::Value(value)) => write!(f, "{value}"),
            ConditionTree::Node {
                left,
                operator,
                right,
            } => write!(f, "[{operator} {left} {right}]"),
        }
    }
}

impl fmt::Display for QueryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryModel::Select(q) => {
                write!(
                    f,
                    "SELECT | Table = {}, Columns = [{}]",
                    q.target_table,
                    join(&q.target_columns, ",")
                )?;
                write_condition(f, q.condition.as_ref())
            }
            QueryModel::Insert(q) => write!(
                f,
                "INSERT | Table = {}, Values = [{}]",
                q.target_table,
                join(&q.rows, ",")
            ),
            QueryModel::Delete(q) => {
                write!(f, "DELETE | Table = {}", q.target_table)?;
                write_condition(f, q.condition.as_ref())
            }
        }
    }
}

fn write_condition(f: &mut fmt::Formatter<'_>, condition: Option<&ConditionTree>) -> fmt::Result {
    match condition {
        Some(condition) => write!(f, ", Condition = {condition}"),
        None => Ok(()),
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
