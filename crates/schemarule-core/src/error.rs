//! Schema rule access errors and status classification.
//!
//! [`SchemaRuleAccessError`] is a snapshot of a failed lookup: the descriptor
//! and the rule kind, nothing else. User-facing text is produced later by
//! [`SchemaRuleAccessError::render`](crate::message), so its `Display` impl
//! only carries raw ids and is meant for logs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::SchemaDescriptor;
use crate::rule::RuleKind;

/// Failure to resolve exactly one schema rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaRuleAccessError {
    /// Zero candidates matched.
    #[error("{kind} not found for {descriptor}")]
    NotFound {
        descriptor: SchemaDescriptor,
        kind: RuleKind,
    },

    /// Two or more candidates matched a lookup expecting exactly one.
    #[error("multiple {plural} found for {descriptor}", plural = kind.plural())]
    Duplicate {
        descriptor: SchemaDescriptor,
        kind: RuleKind,
    },
}

impl SchemaRuleAccessError {
    pub fn descriptor(&self) -> &SchemaDescriptor {
        match self {
            SchemaRuleAccessError::NotFound { descriptor, .. }
            | SchemaRuleAccessError::Duplicate { descriptor, .. } => descriptor,
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            SchemaRuleAccessError::NotFound { kind, .. }
            | SchemaRuleAccessError::Duplicate { kind, .. } => *kind,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaRuleAccessError::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, SchemaRuleAccessError::Duplicate { .. })
    }
}

/// Broad category a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Caused by the request or by the data it targets.
    ClientError,
    /// Caused by the database or one of its services.
    DatabaseError,
}

/// Stable status codes for monitoring and external mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Umbrella status for every [`SchemaRuleAccessError`].
    SchemaRuleAccessFailed,
    /// A token id could not be turned into a name while rendering.
    TokenNameLookupFailed,
    /// The rule catalog backend failed.
    StorageFailed,
}

impl Status {
    pub const fn code(self) -> &'static str {
        match self {
            Status::SchemaRuleAccessFailed => "Schema.SchemaRuleAccessFailed",
            Status::TokenNameLookupFailed => "General.TokenNameLookupFailed",
            Status::StorageFailed => "Database.StorageFailed",
        }
    }

    pub const fn classification(self) -> Classification {
        match self {
            Status::SchemaRuleAccessFailed => Classification::ClientError,
            Status::TokenNameLookupFailed | Status::StorageFailed => {
                Classification::DatabaseError
            }
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors that carry a [`Status`].
pub trait HasStatus {
    fn status(&self) -> Status;
}

impl HasStatus for SchemaRuleAccessError {
    fn status(&self) -> Status {
        Status::SchemaRuleAccessFailed
    }
}
