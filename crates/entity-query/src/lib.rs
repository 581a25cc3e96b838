//! Entity Query
//!
//! Boolean filter expressions over entity records: build them with a
//! fluent API, render them to canonical query text, and parse query text
//! back into the same tree.
//!
//! - [`field`](mod@field): system fields (`$owner`, `$expires_at`, ...) and annotations
//! - [`ast`]: the immutable expression tree
//! - [`builder`]: method-chaining and free-function construction
//! - [`render`]: canonical text and JSON output
//! - [`syntax`]: chumsky grammar for query text
//!
//! ```
//! use entity_query::{annotation, parse, serialize, EXPIRES_AT};
//!
//! # fn main() -> entity_query::QueryResult<()> {
//! let condition = EXPIRES_AT.gt(1000)?.and(annotation("status")?.eq("active")?);
//! let text = condition.to_query_string();
//! assert_eq!(text, "$expires_at > 1000 AND status = 'active'");
//!
//! let parsed = parse(&text)?;
//! assert_eq!(serialize(&parsed), text);
//! # Ok(())
//! # }
//! ```
//!
//! Evaluating an expression against records is left to the consumer of the
//! tree or its text.

pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod field;
pub mod render;
pub mod syntax;

pub use ast::{CompareOp, Comparison, Expr, Literal};
pub use builder::{
    and, annotation, field, not, or, raw, Condition, QueryBuilder, ANNOTATIONS_ROOT, CREATED_AT,
    DATA_HASH, ENTITY_ROOT, EXPIRES_AT, ID, OWNER, PREVIOUS_OWNER, SIGNATURE, UPDATED_AT, VERSION,
};
pub use config::{LikePolicy, ParserConfig, QueryConfig};
pub use error::{QueryError, QueryResult};
pub use field::{AnnotationName, Field, FieldKind, SystemField, ValueType};
pub use render::{CanonicalRenderer, JsonRenderer, QueryRenderer};
pub use syntax::{parse, parse_with_config};

/// Render an expression to canonical query text
pub fn serialize(expr: &Expr) -> String {
    CanonicalRenderer.render_expr(expr)
}
