use crate::ast::Expr;
use crate::builder::Condition;
use crate::render::CanonicalRenderer;

// ============================================================================
// QueryBuilder
// ============================================================================

/// Statement-style accumulator: each `where_` starts a new condition, `and`
/// and `or` extend the most recent one, and `build` joins everything with
/// `AND`.
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    conditions: Vec<Condition>,
}

impl QueryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// AND onto the last condition (or start one if there is none)
    #[must_use]
    pub fn and(self, condition: Condition) -> Self {
        self.extend_last(condition, Condition::and)
    }

    /// OR onto the last condition (or start one if there is none)
    #[must_use]
    pub fn or(self, condition: Condition) -> Self {
        self.extend_last(condition, Condition::or)
    }

    /// Combined condition, or `None` when nothing was added
    #[must_use]
    pub fn build(self) -> Option<Condition> {
        self.conditions.into_iter().reduce(Condition::and)
    }

    /// Canonical query text; empty when nothing was added
    pub fn to_query_string(&self) -> String {
        let exprs: Vec<&Expr> = self.conditions.iter().map(Condition::expr).collect();
        CanonicalRenderer.render_conjunction(&exprs)
    }

    fn extend_last(
        mut self,
        condition: Condition,
        join: fn(Condition, Condition) -> Condition,
    ) -> Self {
        let next = match self.conditions.pop() {
            Some(last) => join(last, condition),
            None => condition,
        };
        self.conditions.push(next);
        self
    }
}
