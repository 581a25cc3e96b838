//! Canonical query text.
//!
//! Rendering is total and deterministic: the same tree always produces the
//! same bytes. Parenthesisation follows the parser's flat left fold, where
//! `AND` and `OR` share one precedence level:
//!
//! - `NOT` always wraps its operand: `NOT (...)`
//! - an `OR` on the left of an `AND` is parenthesised, as SQL readers expect
//! - a right operand that is itself `AND`/`OR` is always parenthesised, since
//!   the left fold would otherwise absorb its first term
//!
//! Trees built by left-folding (the builders, the parser) therefore render
//! without parentheses except where grouping actually changes.

use crate::ast::{Comparison, Expr};
use crate::error::QueryResult;
use crate::render::QueryRenderer;
use tracing::trace;

/// Renders expressions to the query grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalRenderer;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Junction {
    And,
    Or,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl CanonicalRenderer {
    /// Render an expression; never fails
    pub fn render_expr(&self, expr: &Expr) -> String {
        let mut out = String::new();
        write(vec![Step::Expr(expr)], &mut out);
        out
    }

    /// Render `exprs` as if left-folded with `AND`, without building the tree
    pub(crate) fn render_conjunction(&self, exprs: &[&Expr]) -> String {
        let mut steps = Vec::with_capacity(exprs.len() * 4);
        if let Some((first, rest)) = exprs.split_first() {
            for expr in rest.iter().rev() {
                push_operand(&mut steps, Junction::And, Side::Right, *expr);
                steps.push(Step::Text(" AND "));
            }
            if rest.is_empty() {
                steps.push(Step::Expr(*first));
            } else {
                push_operand(&mut steps, Junction::And, Side::Left, *first);
            }
        }

        let mut out = String::new();
        write(steps, &mut out);
        out
    }

    /// Quote a string literal, doubling embedded quotes: `O'Brien` -> `'O''Brien'`
    pub fn quote(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

impl QueryRenderer for CanonicalRenderer {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn render(&self, expr: &Expr) -> QueryResult<String> {
        let text = self.render_expr(expr);
        trace!(len = text.len(), "Rendered canonical query");
        Ok(text)
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Pending output, processed last-in first-out
enum Step<'a> {
    Expr(&'a Expr),
    Text(&'static str),
}

/// Left-folded chains are as deep as they are long, so rendering keeps its
/// own stack instead of recursing.
fn write(mut steps: Vec<Step<'_>>, out: &mut String) {
    while let Some(step) = steps.pop() {
        let expr = match step {
            Step::Text(text) => {
                out.push_str(text);
                continue;
            }
            Step::Expr(expr) => expr,
        };

        match expr {
            Expr::Comparison(cmp) => write_comparison(cmp, out),
            Expr::NullCheck { field, is_null } => {
                out.push_str(field.name());
                out.push_str(if *is_null { " IS NULL" } else { " IS NOT NULL" });
            }
            Expr::Not(inner) => {
                steps.push(Step::Text(")"));
                steps.push(Step::Expr(inner));
                steps.push(Step::Text("NOT ("));
            }
            Expr::And(left, right) => push_junction(&mut steps, Junction::And, left, right),
            Expr::Or(left, right) => push_junction(&mut steps, Junction::Or, left, right),
        }
    }
}

fn write_comparison(cmp: &Comparison, out: &mut String) {
    out.push_str(cmp.field().name());
    out.push(' ');
    out.push_str(cmp.op().symbol());
    out.push(' ');
    out.push_str(&cmp.value().to_string());
}

fn push_junction<'a>(steps: &mut Vec<Step<'a>>, junction: Junction, left: &'a Expr, right: &'a Expr) {
    push_operand(steps, junction, Side::Right, right);
    steps.push(Step::Text(match junction {
        Junction::And => " AND ",
        Junction::Or => " OR ",
    }));
    push_operand(steps, junction, Side::Left, left);
}

fn push_operand<'a>(steps: &mut Vec<Step<'a>>, parent: Junction, side: Side, child: &'a Expr) {
    if needs_parens(parent, side, child) {
        steps.push(Step::Text(")"));
        steps.push(Step::Expr(child));
        steps.push(Step::Text("("));
    } else {
        steps.push(Step::Expr(child));
    }
}

fn needs_parens(parent: Junction, side: Side, child: &Expr) -> bool {
    let child = match child {
        Expr::And(..) => Junction::And,
        Expr::Or(..) => Junction::Or,
        _ => return false,
    };
    match side {
        Side::Left => parent == Junction::And && child == Junction::Or,
        Side::Right => true,
    }
}
