//! Fluent and functional builders.
//!
//! Both surfaces end in the same [`Expr`](crate::ast::Expr) constructors:
//!
//! ```
//! use entity_query::{and, annotation, or, EXPIRES_AT};
//!
//! # fn main() -> entity_query::QueryResult<()> {
//! let status = annotation("status")?;
//! let chained = EXPIRES_AT.gt(1000)?.and(status.eq("active")?);
//! let combined = and([EXPIRES_AT.gt(1000)?, status.eq("active")?])?;
//! assert_eq!(chained, combined);
//!
//! let either = or([status.eq("active")?, status.eq("pending")?])?;
//! assert_eq!(either.to_query_string(), "status = 'active' OR status = 'pending'");
//! # Ok(())
//! # }
//! ```

mod condition;
mod field;
mod query;


pub use condition::Condition;
pub use field::*;
pub use query::QueryBuilder;

use crate::error::{QueryError, QueryResult};
use crate::syntax;

/// AND two or more conditions, folding left: `and([a, b, c])` is `(a AND b) AND c`
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> QueryResult<Condition> {
    fold(conditions, "and", Condition::and)
}

/// OR two or more conditions, folding left
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> QueryResult<Condition> {
    fold(conditions, "or", Condition::or)
}

#[must_use]
pub fn not(condition: Condition) -> Condition {
    condition.not()
}

/// A condition from raw query text. The text is parsed, so it is validated
/// exactly like any other condition.
pub fn raw(text: &str) -> QueryResult<Condition> {
    syntax::parse(text).map(Condition::new)
}

fn fold(
    conditions: impl IntoIterator<Item = Condition>,
    name: &str,
    join: fn(Condition, Condition) -> Condition,
) -> QueryResult<Condition> {
    let mut conditions = conditions.into_iter();
    let (Some(first), Some(second)) = (conditions.next(), conditions.next()) else {
        return Err(QueryError::invalid_input(format!(
            "{}() needs at least two conditions",
            name
        )));
    };
    Ok(conditions.fold(join(first, second), join))
}
