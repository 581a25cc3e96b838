use crate::ast::{CompareOp, Expr, Literal};
use crate::builder::Condition;
use crate::error::{QueryError, QueryResult};
use crate::field::{AnnotationName, Field, SystemField, SYSTEM_FIELD_MARKER};

// System fields, known at compile time
pub const ID: Field = Field::System(SystemField::EntityKey);
pub const OWNER: Field = Field::System(SystemField::Owner);
pub const PREVIOUS_OWNER: Field = Field::System(SystemField::PreviousOwner);
pub const VERSION: Field = Field::System(SystemField::Version);
pub const CREATED_AT: Field = Field::System(SystemField::CreatedAt);
pub const UPDATED_AT: Field = Field::System(SystemField::UpdatedAt);
pub const EXPIRES_AT: Field = Field::System(SystemField::ExpiresAt);
pub const DATA_HASH: Field = Field::System(SystemField::DataHash);
pub const ANNOTATIONS_ROOT: Field = Field::System(SystemField::AnnotationsRoot);
pub const ENTITY_ROOT: Field = Field::System(SystemField::EntityRoot);
pub const SIGNATURE: Field = Field::System(SystemField::Signature);

/// Any field by name: `$`-prefixed names are system fields, the rest annotations
pub fn field(name: &str) -> QueryResult<Field> {
    Field::resolve(name)
}

/// A user annotation by name
pub fn annotation(name: &str) -> QueryResult<Field> {
    if name.starts_with(SYSTEM_FIELD_MARKER) {
        return Err(QueryError::invalid_input(format!(
            "'{}' is a system field name, not an annotation",
            name
        )));
    }
    AnnotationName::new(name).map(Field::Annotation)
}

/// Comparison builders. Each validates against the field's value type and
/// fails instead of producing a tree the parser would reject.
#[allow(clippy::should_implement_trait)]
impl Field {
    pub fn eq(&self, value: impl Into<Literal>) -> QueryResult<Condition> {
        self.compare(CompareOp::Eq, value)
    }

    pub fn ne(&self, value: impl Into<Literal>) -> QueryResult<Condition> {
        self.compare(CompareOp::Ne, value)
    }

    pub fn gt(&self, value: impl Into<Literal>) -> QueryResult<Condition> {
        self.compare(CompareOp::Gt, value)
    }

    pub fn gte(&self, value: impl Into<Literal>) -> QueryResult<Condition> {
        self.compare(CompareOp::Gte, value)
    }

    pub fn lt(&self, value: impl Into<Literal>) -> QueryResult<Condition> {
        self.compare(CompareOp::Lt, value)
    }

    pub fn lte(&self, value: impl Into<Literal>) -> QueryResult<Condition> {
        self.compare(CompareOp::Lte, value)
    }

    /// Prefix match, e.g. `name.like("Al%")`
    pub fn like(&self, pattern: impl Into<String>) -> QueryResult<Condition> {
        self.compare(CompareOp::Like, Literal::String(pattern.into()))
    }

    /// Membership sugar: expands to `f = v1 OR f = v2 OR ...`
    pub fn in_<I, V>(&self, values: I) -> QueryResult<Condition>
    where
        I: IntoIterator<Item = V>,
        V: Into<Literal>,
    {
        let mut values = values.into_iter();
        let first = values
            .next()
            .ok_or_else(|| QueryError::invalid_input(format!("{} IN needs at least one value", self)))?;

        let mut condition = self.eq(first)?;
        for value in values {
            condition = condition.or(self.eq(value)?);
        }
        Ok(condition)
    }

    #[must_use]
    pub fn is_null(&self) -> Condition {
        Condition::new(Expr::is_null(self.clone()))
    }

    #[must_use]
    pub fn is_not_null(&self) -> Condition {
        Condition::new(Expr::is_not_null(self.clone()))
    }

    fn compare(&self, op: CompareOp, value: impl Into<Literal>) -> QueryResult<Condition> {
        Expr::compare(self.clone(), op, value).map(Condition::new)
    }
}
