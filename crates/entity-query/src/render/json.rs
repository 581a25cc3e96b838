//! JSON encoding of expression trees, for matchers that consume the AST
//! directly instead of query text.

use crate::ast::Expr;
use crate::error::{QueryError, QueryResult};
use crate::render::QueryRenderer;
use serde_json::Value;

/// Deepest tree that encodes to JSON serde_json will decode again. Each
/// junction costs two nested containers against its limit of 128.
pub const MAX_JSON_DEPTH: usize = 60;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    /// Indent the output
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Encode as a JSON value
    pub fn to_value(&self, expr: &Expr) -> QueryResult<Value> {
        check_depth(expr)?;
        Ok(serde_json::to_value(expr)?)
    }
}

fn check_depth(expr: &Expr) -> QueryResult<()> {
    let depth = expr.depth();
    if depth > MAX_JSON_DEPTH {
        return Err(QueryError::Serialization(format!(
            "expression depth {} exceeds JSON limit of {}",
            depth, MAX_JSON_DEPTH
        )));
    }
    Ok(())
}

impl QueryRenderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, expr: &Expr) -> QueryResult<String> {
        check_depth(expr)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(expr)?
        } else {
            serde_json::to_string(expr)?
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;
    use crate::field::{Field, SystemField};
    use serde_json::json;

    #[test]
    fn test_json_shape() {
        let expr = Expr::and(
            Expr::compare(Field::resolve("size").unwrap(), CompareOp::Gte, 10).unwrap(),
            Expr::is_null(Field::System(SystemField::Signature)),
        );

        let value = JsonRenderer::default().to_value(&expr).unwrap();
        assert_eq!(
            value,
            json!({
                "and": [
                    {
                        "comparison": {
                            "field": { "kind": "annotation", "name": "size" },
                            "op": "gte",
                            "value": { "integer": 10 }
                        }
                    },
                    {
                        "null_check": {
                            "field": { "kind": "system", "name": "signature" },
                            "is_null": true
                        }
                    }
                ]
            })
        );
    }

    #[test]
    fn test_json_decodes_back() {
        let expr = Expr::not(
            Expr::compare(Field::resolve("name").unwrap(), CompareOp::Like, "Al%").unwrap(),
        );
        let text = JsonRenderer::pretty().render(&expr).unwrap();
        let back: Expr = serde_json::from_str(&text).unwrap();
        assert_eq!(back, expr);
    }

    #[test]
    fn test_depth_limit() {
        let leaf = || Expr::compare(Field::resolve("a").unwrap(), CompareOp::Eq, 1).unwrap();

        let mut expr = leaf();
        for _ in 1..MAX_JSON_DEPTH {
            expr = Expr::or(leaf(), expr);
        }
        let text = JsonRenderer::default().render(&expr).unwrap();
        let back: Expr = serde_json::from_str(&text).unwrap();
        assert_eq!(back, expr);

        let deeper = Expr::or(leaf(), expr);
        let err = JsonRenderer::default().render(&deeper).unwrap_err();
        assert!(matches!(err, QueryError::Serialization(_)));
        assert!(JsonRenderer::default().to_value(&deeper).is_err());
    }
}
