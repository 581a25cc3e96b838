//! Field references.
//!
//! A condition compares either a *system field* (a closed set of entity
//! attributes known at compile time, written with a leading `$`) or an
//! *annotation field* (any caller-chosen key from the entity's string or
//! numeric annotations).

use crate::error::{QueryError, QueryResult};
use crate::syntax::is_keyword;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker that prefixes every system field name
pub const SYSTEM_FIELD_MARKER: char = '$';

/// Annotation names: a letter followed by letters, digits or underscores.
///
/// Assumed charset. The parser reads any run of `[A-Za-z0-9_]` as a name and
/// validates it here; dashes or dots would need grammar support first.
static ANNOTATION_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("annotation name regex"));

// ============================================================================
// Value types
// ============================================================================

/// Value domain of a system field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Entity key, compared as a string
    Identifier,
    /// Account address, compared as a string
    Address,
    /// Block numbers and counters
    Integer,
    /// Hashes, roots and signatures; only null-checks are allowed
    Bytes,
}

impl ValueType {
    /// Whether string literals are accepted
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Identifier | Self::Address)
    }

    /// Whether the field supports comparisons at all (as opposed to null-checks only)
    pub fn is_comparable(self) -> bool {
        !matches!(self, Self::Bytes)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "identifier",
            Self::Address => "address",
            Self::Integer => "integer",
            Self::Bytes => "byte-blob",
        };
        f.write_str(name)
    }
}

// ============================================================================
// System fields
// ============================================================================

/// Entity attributes maintained by the store itself
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemField {
    /// `$id`; named `id` in JSON as well
    #[serde(rename = "id")]
    EntityKey,
    Owner,
    PreviousOwner,
    Version,
    CreatedAt,
    UpdatedAt,
    ExpiresAt,
    DataHash,
    AnnotationsRoot,
    EntityRoot,
    Signature,
}

impl SystemField {
    /// Every system field, in table order
    pub const ALL: [SystemField; 11] = [
        Self::EntityKey,
        Self::Owner,
        Self::PreviousOwner,
        Self::Version,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::ExpiresAt,
        Self::DataHash,
        Self::AnnotationsRoot,
        Self::EntityRoot,
        Self::Signature,
    ];

    /// Textual name including the `$` marker
    pub fn name(self) -> &'static str {
        match self {
            Self::EntityKey => "$id",
            Self::Owner => "$owner",
            Self::PreviousOwner => "$previous_owner",
            Self::Version => "$version",
            Self::CreatedAt => "$created_at",
            Self::UpdatedAt => "$updated_at",
            Self::ExpiresAt => "$expires_at",
            Self::DataHash => "$data_hash",
            Self::AnnotationsRoot => "$annotations_root",
            Self::EntityRoot => "$entity_root",
            Self::Signature => "$signature",
        }
    }

    pub fn value_type(self) -> ValueType {
        match self {
            Self::EntityKey => ValueType::Identifier,
            Self::Owner | Self::PreviousOwner => ValueType::Address,
            Self::Version | Self::CreatedAt | Self::UpdatedAt | Self::ExpiresAt => {
                ValueType::Integer
            }
            Self::DataHash | Self::AnnotationsRoot | Self::EntityRoot | Self::Signature => {
                ValueType::Bytes
            }
        }
    }

    /// Look up a system field by its `$`-prefixed name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for SystemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Annotation names
// ============================================================================

/// Validated annotation key
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnotationName(String);

impl AnnotationName {
    /// Validate an annotation name.
    ///
    /// Reserved words (`AND`, `OR`, `NOT`, `IS`, `NULL`, `LIKE`, any case) are
    /// rejected since the parser could never read them back as field names.
    pub fn new(name: impl Into<String>) -> QueryResult<Self> {
        let name = name.into();
        if !ANNOTATION_NAME_RE.is_match(&name) {
            return Err(QueryError::invalid_input(format!(
                "invalid annotation name '{}': expected a letter followed by letters, digits or underscores",
                name
            )));
        }
        if is_keyword(&name) {
            return Err(QueryError::invalid_input(format!(
                "annotation name '{}' is a reserved word",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AnnotationName {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnnotationName> for String {
    fn from(name: AnnotationName) -> Self {
        name.0
    }
}

impl fmt::Display for AnnotationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Field
// ============================================================================

/// Which namespace a field belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    System,
    Annotation,
}

/// What a condition compares
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Field {
    System(SystemField),
    Annotation(AnnotationName),
}

impl Field {
    /// Resolve a field name.
    ///
    /// `$`-prefixed names go through the system field table; anything else
    /// must be a valid annotation name.
    pub fn resolve(name: &str) -> QueryResult<Self> {
        if name.starts_with(SYSTEM_FIELD_MARKER) {
            return SystemField::from_name(name)
                .map(Self::System)
                .ok_or_else(|| QueryError::UnknownSystemField(name.to_string()));
        }
        AnnotationName::new(name).map(Self::Annotation)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::System(_) => FieldKind::System,
            Self::Annotation(_) => FieldKind::Annotation,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::System(field) => field.name(),
            Self::Annotation(name) => name.as_str(),
        }
    }

    /// Declared value type; `None` for annotations, whose type follows the literal
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::System(field) => Some(field.value_type()),
            Self::Annotation(_) => None,
        }
    }
}

impl From<SystemField> for Field {
    fn from(field: SystemField) -> Self {
        Self::System(field)
    }
}

impl From<AnnotationName> for Field {
    fn from(name: AnnotationName) -> Self {
        Self::Annotation(name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
