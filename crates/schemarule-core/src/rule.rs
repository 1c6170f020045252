//! Schema rule values and the rule-kind tag.
//!
//! The resolver treats rules as opaque: it only counts them. The shapes here
//! exist so catalogs have something concrete to return and callers have
//! something concrete to receive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::SchemaDescriptor;
use crate::id::RuleId;

/// What a lookup is resolving. Selects the catalog query and the message
/// wording on failure; never affects the reduction itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// Any index, unique or not.
    Index,
    /// Only indexes that enforce uniqueness.
    UniqueIndex,
    /// Any constraint.
    Constraint,
    UniquenessConstraint,
    PropertyExistenceConstraint,
}

impl RuleKind {
    /// Singular message prefix, e.g. `"Uniqueness index"`.
    pub const fn prefix(self) -> &'static str {
        match self {
            RuleKind::Index => "Index",
            RuleKind::UniqueIndex => "Uniqueness index",
            RuleKind::Constraint => "Constraint",
            RuleKind::UniquenessConstraint => "Uniqueness constraint",
            RuleKind::PropertyExistenceConstraint => "Property existence constraint",
        }
    }

    /// Plural noun used in duplicate messages, e.g. `"uniqueness indexes"`.
    pub const fn plural(self) -> &'static str {
        match self {
            RuleKind::Index => "indexes",
            RuleKind::UniqueIndex => "uniqueness indexes",
            RuleKind::Constraint => "constraints",
            RuleKind::UniquenessConstraint => "uniqueness constraints",
            RuleKind::PropertyExistenceConstraint => "property existence constraints",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A stored index rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRule {
    pub id: RuleId,
    pub descriptor: SchemaDescriptor,
    pub unique: bool,
}

/// Constraint sub-kinds a catalog can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    Uniqueness,
    PropertyExistence,
}

impl ConstraintKind {
    /// The rule kind used when resolving only constraints of this kind.
    pub const fn rule_kind(self) -> RuleKind {
        match self {
            ConstraintKind::Uniqueness => RuleKind::UniquenessConstraint,
            ConstraintKind::PropertyExistence => RuleKind::PropertyExistenceConstraint,
        }
    }
}

/// A stored constraint rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintRule {
    pub id: RuleId,
    pub descriptor: SchemaDescriptor,
    pub kind: ConstraintKind,
}

/// Either kind of stored rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SchemaRule {
    Index(IndexRule),
    Constraint(ConstraintRule),
}

impl SchemaRule {
    pub fn id(&self) -> RuleId {
        match self {
            SchemaRule::Index(rule) => rule.id,
            SchemaRule::Constraint(rule) => rule.id,
        }
    }

    pub fn descriptor(&self) -> &SchemaDescriptor {
        match self {
            SchemaRule::Index(rule) => &rule.descriptor,
            SchemaRule::Constraint(rule) => &rule.descriptor,
        }
    }
}

impl From<IndexRule> for SchemaRule {
    fn from(rule: IndexRule) -> Self {
        SchemaRule::Index(rule)
    }
}

impl From<ConstraintRule> for SchemaRule {
    fn from(rule: ConstraintRule) -> Self {
        SchemaRule::Constraint(rule)
    }
}
