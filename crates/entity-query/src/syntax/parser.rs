//! Query grammar.
//!
//! ```text
//! expr       ::= term (("AND" | "OR") term)*
//! term       ::= "NOT" term | factor
//! factor     ::= comparison | null_check | "(" expr ")"
//! comparison ::= field op value
//! null_check ::= field "IS NULL" | field "IS NOT NULL"
//! ```
//!
//! `AND` and `OR` share one precedence level and fold left to right:
//! `a = 1 OR b = 2 AND c = 3` means `(a = 1 OR b = 2) AND c = 3`.
//! This differs from SQL, where `AND` binds tighter; callers who want SQL
//! grouping must parenthesise.
//!
//! Only `(` groups recurse. Junction chains and `NOT` prefixes are read in
//! loops, so their length is bounded by memory alone, and `max_depth` limits
//! parenthesis nesting. Canonical text spends one level per `NOT (...)` and
//! one per parenthesised operand, so a tree renders to parseable text as long
//! as no path from the root crosses more than `max_depth` of those.
//!
//! Grammar failures are [`QueryError::Syntax`]. Unknown system fields and
//! type mismatches are reported after the text is known to be well formed,
//! so a syntax error anywhere in the input wins over them.

use crate::ast::{CompareOp, Comparison, Expr, Literal};
use crate::config::{LikePolicy, ParserConfig};
use crate::error::{QueryError, QueryResult};
use crate::field::Field;
use crate::syntax::common::{compare_op, field_name, kw, to_syntax_error, value, Extra};
use chumsky::prelude::*;
use tracing::{debug, trace};

/// Parse query text into an expression
pub fn parse_with_config(input: &str, config: &ParserConfig) -> QueryResult<Expr> {
    debug!(input_len = input.len(), "Parsing query");

    check_nesting(input, config.max_depth)?;

    let parsed = query_parser(config.like_policy)
        .parse(input)
        .into_result()
        .map_err(|errs| to_syntax_error(&errs, input))?;
    trace!(valid = parsed.is_ok(), "Parsed query");
    parsed
}

/// Reject `(` nesting past the limit before the grammar recurses into it
fn check_nesting(input: &str, max_depth: usize) -> QueryResult<()> {
    let mut depth = 0usize;
    let mut in_string = false;

    for (position, c) in input.char_indices() {
        match c {
            // `''` toggles twice, so escaped quotes need no special case
            '\'' => in_string = !in_string,
            '(' if !in_string => {
                depth += 1;
                if depth > max_depth {
                    debug!(depth, max_depth, position, "Query nesting limit exceeded");
                    return Err(QueryError::syntax(
                        position,
                        format!("nesting exceeds limit of {}", max_depth),
                    ));
                }
            }
            ')' if !in_string => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

// ============================================================================
// Grammar
// ============================================================================

#[derive(Clone, Copy)]
enum Junction {
    And,
    Or,
}

/// Everything after the field name
enum Predicate {
    NullCheck { is_null: bool },
    Compare(CompareOp, (QueryResult<Literal>, usize)),
}

fn query_parser<'src>(
    like_policy: LikePolicy,
) -> impl Parser<'src, &'src str, QueryResult<Expr>, Extra<'src>> {
    recursive(|expr| {
        let group = expr.delimited_by(just('(').padded(), just(')').padded());
        let factor = group.or(predicate(like_policy));

        let term = kw("NOT")
            .repeated()
            .collect::<Vec<_>>()
            .then(factor)
            .map(|(negations, inner): (Vec<()>, QueryResult<Expr>)| {
                inner.map(|expr| negations.iter().fold(expr, |acc, _| Expr::not(acc)))
            });

        let junction = choice((
            kw("AND").to(Junction::And),
            kw("OR").to(Junction::Or),
        ));

        term.clone().foldl(
            junction.then(term).repeated(),
            |left: QueryResult<Expr>,
             (junction, right): (Junction, QueryResult<Expr>)|
             -> QueryResult<Expr> {
                let (left, right) = (left?, right?);
                Ok(match junction {
                    Junction::And => Expr::and(left, right),
                    Junction::Or => Expr::or(left, right),
                })
            },
        )
    })
    .padded()
    .then_ignore(end())
}

fn predicate<'src>(
    like_policy: LikePolicy,
) -> impl Parser<'src, &'src str, QueryResult<Expr>, Extra<'src>> + Clone {
    let null_check = kw("IS")
        .ignore_then(kw("NOT").or_not())
        .then_ignore(kw("NULL"))
        .map(|not| Predicate::NullCheck {
            is_null: not.is_none(),
        });

    let comparison = compare_op()
        .then(value())
        .map(|(op, value)| Predicate::Compare(op, value));

    field_name()
        .then(choice((null_check, comparison)))
        .map(move |((name, position), predicate)| {
            build_predicate(name, position, predicate, like_policy)
        })
}

fn build_predicate(
    name: &str,
    position: usize,
    predicate: Predicate,
    like_policy: LikePolicy,
) -> QueryResult<Expr> {
    let field = Field::resolve(name).map_err(|err| match err {
        QueryError::InvalidInput(msg) => QueryError::syntax(position, msg),
        other => other,
    })?;

    match predicate {
        Predicate::NullCheck { is_null } => Ok(Expr::NullCheck { field, is_null }),
        Predicate::Compare(op, (value, value_position)) => {
            let value = value?;
            if op == CompareOp::Like {
                check_like_pattern(&value, value_position, like_policy)?;
            }
            Comparison::new(field, op, value).map(Expr::Comparison)
        }
    }
}

fn check_like_pattern(value: &Literal, position: usize, policy: LikePolicy) -> QueryResult<()> {
    let Some(pattern) = value.as_str() else {
        // Comparison::new reports non-string patterns
        return Ok(());
    };
    if policy.allows(pattern) {
        return Ok(());
    }
    Err(QueryError::syntax(
        position,
        format!("LIKE pattern '{}' is not a prefix pattern ('prefix%')", pattern),
    ))
}
