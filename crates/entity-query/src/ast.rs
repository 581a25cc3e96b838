//! Expression AST.
//!
//! Pure representation of a filter condition, independent of whether it was
//! built through the fluent API or parsed from text. Nodes are immutable:
//! combinators take their children by value and return a new node.
//!
//! Every comparison goes through [`Comparison::new`], so a tree that exists
//! is a tree the renderer can print and the parser can read back.

use crate::error::{QueryError, QueryResult};
use crate::field::{Field, SystemField, ValueType};
use crate::render::CanonicalRenderer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

// ============================================================================
// Literal
// ============================================================================

/// Right-hand side of a comparison
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    String(String),
    Integer(i64),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&CanonicalRenderer::quote(s)),
            Self::Integer(n) => write!(f, "{}", n),
        }
    }
}

// ============================================================================
// CompareOp
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Prefix match, `'prefix%'`
    Like,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// `field op literal`, checked against the field's value type
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ComparisonRepr", into = "ComparisonRepr")]
pub struct Comparison {
    field: Field,
    op: CompareOp,
    value: Literal,
}

impl Comparison {
    /// Construct a comparison, rejecting combinations the store cannot evaluate.
    ///
    /// - byte-blob system fields only support null-checks
    /// - `LIKE` needs a string pattern and a non-integer field
    /// - system fields only accept literals of their declared type
    pub fn new(field: Field, op: CompareOp, value: Literal) -> QueryResult<Self> {
        if let Some(value_type) = field.value_type() {
            if !value_type.is_comparable() {
                return Err(QueryError::type_mismatch(format!(
                    "{} is a {} field and only supports IS NULL / IS NOT NULL",
                    field, value_type
                )));
            }
            if op == CompareOp::Like && value_type == ValueType::Integer {
                return Err(QueryError::type_mismatch(format!(
                    "LIKE cannot be applied to integer field {}",
                    field
                )));
            }
            let accepted = match value {
                Literal::String(_) => value_type.is_textual(),
                Literal::Integer(_) => value_type == ValueType::Integer,
            };
            if !accepted {
                return Err(QueryError::type_mismatch(format!(
                    "{} is a {} field and cannot be compared with {} literal {}",
                    field,
                    value_type,
                    value.type_name(),
                    value
                )));
            }
        }

        if op == CompareOp::Like && value.as_str().is_none() {
            return Err(QueryError::type_mismatch(format!(
                "LIKE on {} requires a string pattern, got {}",
                field, value
            )));
        }

        Ok(Self { field, op, value })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn value(&self) -> &Literal {
        &self.value
    }
}

/// Unchecked wire shape, validated on the way in
#[derive(Clone, Serialize, Deserialize)]
struct ComparisonRepr {
    field: Field,
    op: CompareOp,
    value: Literal,
}

impl TryFrom<ComparisonRepr> for Comparison {
    type Error = QueryError;

    fn try_from(repr: ComparisonRepr) -> Result<Self, Self::Error> {
        Self::new(repr.field, repr.op, repr.value)
    }
}

impl From<Comparison> for ComparisonRepr {
    fn from(cmp: Comparison) -> Self {
        Self {
            field: cmp.field,
            op: cmp.op,
            value: cmp.value,
        }
    }
}

// ============================================================================
// Expr
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Comparison(Comparison),
    NullCheck { field: Field, is_null: bool },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn compare(field: Field, op: CompareOp, value: impl Into<Literal>) -> QueryResult<Self> {
        Comparison::new(field, op, value.into()).map(Self::Comparison)
    }

    #[must_use]
    pub fn is_null(field: Field) -> Self {
        Self::NullCheck {
            field,
            is_null: true,
        }
    }

    #[must_use]
    pub fn is_not_null(field: Field) -> Self {
        Self::NullCheck {
            field,
            is_null: false,
        }
    }

    #[must_use]
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Height of the tree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match expr {
                Self::Comparison(_) | Self::NullCheck { .. } => {}
                Self::And(l, r) | Self::Or(l, r) => {
                    stack.push((l.as_ref(), depth + 1));
                    stack.push((r.as_ref(), depth + 1));
                }
                Self::Not(inner) => stack.push((inner.as_ref(), depth + 1)),
            }
        }
        deepest
    }

    /// Cheapest node to leave behind while taking a subtree apart
    const fn hollow() -> Self {
        Self::NullCheck {
            field: Field::System(SystemField::EntityKey),
            is_null: true,
        }
    }

    /// Move the children of a junction or negation onto `stack`
    fn detach_children(&mut self, stack: &mut Vec<Expr>) {
        match self {
            Self::And(l, r) | Self::Or(l, r) => {
                stack.push(mem::replace(&mut **l, Self::hollow()));
                stack.push(mem::replace(&mut **r, Self::hollow()));
            }
            Self::Not(inner) => stack.push(mem::replace(&mut **inner, Self::hollow())),
            Self::Comparison(_) | Self::NullCheck { .. } => {}
        }
    }
}

/// Iterative teardown: `in_` sets and long parsed `OR` lists are as deep as
/// they are long.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut expr) = stack.pop() {
            expr.detach_children(&mut stack);
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CanonicalRenderer.render_expr(self))
    }
}

impl std::str::FromStr for Expr {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::syntax::parse(s)
    }
}
