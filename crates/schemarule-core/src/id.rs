//! Stable token and rule identifier newtypes.
//!
//! Labels, relationship types and property keys all live in separate token
//! namespaces that happen to share a `u32` representation. Distinct newtype
//! wrappers keep a `LabelId` from being passed where a `PropertyKeyId` is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label token identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelId(pub u32);

/// Relationship type token identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipTypeId(pub u32);

/// Property key token identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyKeyId(pub u32);

/// Catalog-assigned identity of a stored schema rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub u64);

/// The token namespace an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Label,
    RelationshipType,
    PropertyKey,
}

impl TokenKind {
    /// Lower-case noun used in user-facing messages.
    pub const fn noun(self) -> &'static str {
        match self {
            TokenKind::Label => "label",
            TokenKind::RelationshipType => "relationship type",
            TokenKind::PropertyKey => "property",
        }
    }

    /// Stable tag used by storage backends.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Label => "label",
            TokenKind::RelationshipType => "relationship_type",
            TokenKind::PropertyKey => "property_key",
        }
    }

    /// Inverse of [`TokenKind::as_str`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "label" => Some(TokenKind::Label),
            "relationship_type" => Some(TokenKind::RelationshipType),
            "property_key" => Some(TokenKind::PropertyKey),
            _ => None,
        }
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RelationshipTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PropertyKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
