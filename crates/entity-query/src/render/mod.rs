//! Renderers for expression trees.
//!
//! The canonical renderer produces the query text the store understands;
//! the JSON renderer hands the tree itself to consumers that evaluate it.

mod canonical;
mod json;

pub use canonical::CanonicalRenderer;
pub use json::{JsonRenderer, MAX_JSON_DEPTH};

use crate::ast::Expr;
use crate::error::QueryResult;

/// Trait for rendering an expression tree to an output format
pub trait QueryRenderer: Send + Sync {
    /// Unique name for this renderer
    fn name(&self) -> &'static str;

    /// Render the expression
    fn render(&self, expr: &Expr) -> QueryResult<String>;
}
