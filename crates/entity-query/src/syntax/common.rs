//! Token-level parsers for query text.
//!
//! Every parser here reads directly from `&str`, so chumsky spans are byte
//! offsets into the original input.

use crate::ast::{CompareOp, Literal};
use crate::error::{QueryError, QueryResult};
use chumsky::extra;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

/// Extra type for parsers - uses Rich errors for better messages
pub type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Reserved words, matched case-insensitively
pub const KEYWORDS: [&str; 6] = ["AND", "OR", "NOT", "IS", "NULL", "LIKE"];

/// Whether `word` is a reserved word in any case
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

// ============================================================================
// Primitive parsers
// ============================================================================

/// Run of identifier characters: alphanumeric + underscore
pub fn word<'src>() -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
}

/// Case-insensitive keyword; `ANDROID` does not match `AND`
pub fn kw<'src>(keyword: &'static str) -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    word()
        .try_map(move |s: &str, span| {
            if s.eq_ignore_ascii_case(keyword) {
                Ok(())
            } else {
                Err(Rich::custom(span, format!("expected keyword '{}'", keyword)))
            }
        })
        .padded()
}

/// Field name as written, with its byte offset: `$owner`, `status`
///
/// Only reserved words are rejected here. Whether the name exists (system
/// fields) or is well formed (annotations) is decided when the field is
/// resolved, so those failures keep their own error kinds.
pub fn field_name<'src>() -> impl Parser<'src, &'src str, (&'src str, usize), Extra<'src>> + Clone
{
    just('$')
        .or_not()
        .then(word())
        .to_slice()
        .try_map(|name: &str, span: SimpleSpan| {
            if is_keyword(name) {
                Err(Rich::custom(span, format!("'{}' is a reserved word", name)))
            } else {
                Ok((name, span.start))
            }
        })
        .padded()
}

/// Single-quoted literal; `''` is an escaped quote
pub fn string<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    let escaped_quote = just("''").to('\'');

    just('\'')
        .ignore_then(
            escaped_quote
                .or(none_of("'"))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('\''))
}

/// Signed decimal integer.
///
/// Overflow is reported as a syntax error at the first character of the
/// number rather than failing the grammar, so the position is exact.
pub fn integer<'src>() -> impl Parser<'src, &'src str, QueryResult<Literal>, Extra<'src>> + Clone
{
    one_of("+-")
        .or_not()
        .then(
            any()
                .filter(|c: &char| c.is_ascii_digit())
                .repeated()
                .at_least(1),
        )
        .to_slice()
        .map_with(|digits: &str, e| {
            let span: SimpleSpan = e.span();
            digits.parse::<i64>().map(Literal::Integer).map_err(|_| {
                QueryError::syntax(span.start, format!("integer out of range: {}", digits))
            })
        })
}

/// Comparison value with its byte offset
pub fn value<'src>(
) -> impl Parser<'src, &'src str, (QueryResult<Literal>, usize), Extra<'src>> + Clone {
    let string = string().map(|s: String| -> QueryResult<Literal> { Ok(Literal::String(s)) });

    choice((string, integer()))
        .map_with(|value, e| {
            let span: SimpleSpan = e.span();
            (value, span.start)
        })
        .padded()
}

/// Comparison operators; two-character symbols are tried first
pub fn compare_op<'src>() -> impl Parser<'src, &'src str, CompareOp, Extra<'src>> + Clone {
    choice((
        just("!=").to(CompareOp::Ne),
        just("<=").to(CompareOp::Lte),
        just(">=").to(CompareOp::Gte),
        just('<').to(CompareOp::Lt),
        just('>').to(CompareOp::Gt),
        just('=').to(CompareOp::Eq),
        kw("LIKE").to(CompareOp::Like),
    ))
    .padded()
}

// ============================================================================
// Error conversion
// ============================================================================

/// First chumsky error as a positioned syntax error
pub fn to_syntax_error(errs: &[Rich<'_, char>], input: &str) -> QueryError {
    let Some(err) = errs.first() else {
        return QueryError::syntax(input.len(), "invalid query");
    };

    let found = err
        .found()
        .map_or("end of input".to_string(), |c| format!("'{}'", c));

    QueryError::syntax(
        err.span().start,
        format!("{} (found {})", err.reason(), found),
    )
}
