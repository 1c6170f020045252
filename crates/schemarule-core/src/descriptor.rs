//! Lookup target for schema rule resolution.
//!
//! A [`SchemaDescriptor`] names "entity token + property key": the label (or
//! relationship type) and the property an index or constraint covers. It is
//! independent of how any catalog stores its rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{LabelId, PropertyKeyId, RelationshipTypeId, TokenKind};

/// The entity-side token of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityToken {
    Label(LabelId),
    RelationshipType(RelationshipTypeId),
}

impl EntityToken {
    /// Raw token id, regardless of namespace.
    pub const fn id(self) -> u32 {
        match self {
            EntityToken::Label(id) => id.0,
            EntityToken::RelationshipType(id) => id.0,
        }
    }

    pub const fn token_kind(self) -> TokenKind {
        match self {
            EntityToken::Label(_) => TokenKind::Label,
            EntityToken::RelationshipType(_) => TokenKind::RelationshipType,
        }
    }
}

/// Immutable (entity token, property key) pair identifying a lookup target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    entity: EntityToken,
    property_key: PropertyKeyId,
}

impl SchemaDescriptor {
    pub const fn new(entity: EntityToken, property_key: PropertyKeyId) -> Self {
        SchemaDescriptor {
            entity,
            property_key,
        }
    }

    /// Descriptor for a node label and property key.
    pub const fn for_label(label: LabelId, property_key: PropertyKeyId) -> Self {
        Self::new(EntityToken::Label(label), property_key)
    }

    /// Descriptor for a relationship type and property key.
    pub const fn for_relationship_type(
        rel_type: RelationshipTypeId,
        property_key: PropertyKeyId,
    ) -> Self {
        Self::new(EntityToken::RelationshipType(rel_type), property_key)
    }

    pub const fn entity(&self) -> EntityToken {
        self.entity
    }

    pub const fn entity_token_id(&self) -> u32 {
        self.entity.id()
    }

    pub const fn property_key_id(&self) -> PropertyKeyId {
        self.property_key
    }
}

/// Raw-id form for logs, e.g. `label[1](property[2])`.
impl fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}](property[{}])",
            self.entity.token_kind().noun(),
            self.entity.id(),
            self.property_key.0
        )
    }
}
