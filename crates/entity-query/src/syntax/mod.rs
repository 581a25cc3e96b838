//! Query text parsing.
//!
//! The grammar is built from chumsky combinators over the raw `&str`, so
//! every error position is a byte offset into the input. Parsing is
//! all-or-nothing: the result is a complete [`Expr`] or an error, never a
//! partial tree.

mod common;
mod parser;

pub use common::{is_keyword, KEYWORDS};
pub use parser::parse_with_config;

use crate::ast::Expr;
use crate::config::ParserConfig;
use crate::error::QueryResult;

/// Parse query text with the default parser configuration
pub fn parse(input: &str) -> QueryResult<Expr> {
    parse_with_config(input, &ParserConfig::default())
}
