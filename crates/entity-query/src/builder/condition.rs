use crate::ast::Expr;
use crate::error::{QueryError, QueryResult};
use crate::render::CanonicalRenderer;
use crate::syntax;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

// ============================================================================
// Condition
// ============================================================================

/// Builder-facing handle around an expression tree. Combinators consume
/// their operands and return a new condition; nothing is modified in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(Expr);

impl Condition {
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self(expr)
    }

    /// Parse a condition from query text
    pub fn parse(text: &str) -> QueryResult<Self> {
        syntax::parse(text).map(Self)
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }

    #[must_use]
    pub fn into_expr(self) -> Expr {
        self.0
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self(Expr::and(self.0, other.0))
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self(Expr::or(self.0, other.0))
    }

    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> Self {
        Self(Expr::not(self.0))
    }

    /// Canonical query text
    pub fn to_query_string(&self) -> String {
        CanonicalRenderer.render_expr(&self.0)
    }
}

impl From<Expr> for Condition {
    fn from(expr: Expr) -> Self {
        Self(expr)
    }
}

impl From<Condition> for Expr {
    fn from(condition: Condition) -> Self {
        condition.0
    }
}

impl BitAnd for Condition {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Condition::and(self, rhs)
    }
}

impl BitOr for Condition {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Condition::or(self, rhs)
    }
}

impl Not for Condition {
    type Output = Self;

    fn not(self) -> Self::Output {
        Condition::not(self)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl FromStr for Condition {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
