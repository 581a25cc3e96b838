//! Query engine configuration
//!
//! Only the parser has tunables. Configuration can be built in code or
//! loaded from a TOML fragment:
//!
//! ```toml
//! [parser]
//! max_depth = 32
//! like_policy = "prefix_only"
//! ```

use crate::error::QueryResult;
use serde::{Deserialize, Serialize};

/// Default nesting limit for parenthesised groups and `NOT` chains
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub parser: ParserConfig,
}

impl QueryConfig {
    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> QueryResult<Self> {
        Ok(toml::from_str(input)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Nesting past this depth fails with a syntax error
    pub max_depth: usize,
    pub like_policy: LikePolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            like_policy: LikePolicy::default(),
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_like_policy(mut self, like_policy: LikePolicy) -> Self {
        self.like_policy = like_policy;
        self
    }
}

/// Which `LIKE` patterns the parser accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikePolicy {
    /// Any `%` placement; interpretation is left to the matcher
    #[default]
    Permissive,
    /// Only `'prefix%'`: exactly one wildcard, at the end
    PrefixOnly,
}

impl LikePolicy {
    pub fn allows(self, pattern: &str) -> bool {
        match self {
            Self::Permissive => true,
            Self::PrefixOnly => pattern
                .strip_suffix('%')
                .is_some_and(|prefix| !prefix.contains('%')),
        }
    }
}
