//! Name resolution capability: token id -> human-readable name.
//!
//! Consulted only when an error message is rendered, never while resolving.

use thiserror::Error;

use crate::error::{HasStatus, Status};
use crate::id::{LabelId, PropertyKeyId, RelationshipTypeId, TokenKind};

/// Failure to map a token id to its name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenLookupError {
    /// No token with this id exists in the namespace.
    #[error("unknown {kind} token: {id}")]
    Unknown { kind: TokenKind, id: u32 },

    /// The name service could not answer.
    #[error("{kind} token {id} could not be resolved: {reason}")]
    Unavailable {
        kind: TokenKind,
        id: u32,
        reason: String,
    },
}

impl TokenLookupError {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenLookupError::Unknown { kind, .. } | TokenLookupError::Unavailable { kind, .. } => {
                *kind
            }
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            TokenLookupError::Unknown { id, .. } | TokenLookupError::Unavailable { id, .. } => *id,
        }
    }
}

impl HasStatus for TokenLookupError {
    fn status(&self) -> Status {
        Status::TokenNameLookupFailed
    }
}

/// Maps token ids to names.
pub trait TokenNameLookup {
    fn label_name(&self, id: LabelId) -> Result<String, TokenLookupError>;

    fn relationship_type_name(&self, id: RelationshipTypeId) -> Result<String, TokenLookupError>;

    fn property_key_name(&self, id: PropertyKeyId) -> Result<String, TokenLookupError>;
}

impl<T: TokenNameLookup + ?Sized> TokenNameLookup for &T {
    fn label_name(&self, id: LabelId) -> Result<String, TokenLookupError> {
        (**self).label_name(id)
    }

    fn relationship_type_name(&self, id: RelationshipTypeId) -> Result<String, TokenLookupError> {
        (**self).relationship_type_name(id)
    }

    fn property_key_name(&self, id: PropertyKeyId) -> Result<String, TokenLookupError> {
        (**self).property_key_name(id)
    }
}

impl<T: TokenNameLookup + ?Sized> TokenNameLookup for Box<T> {
    fn label_name(&self, id: LabelId) -> Result<String, TokenLookupError> {
        (**self).label_name(id)
    }

    fn relationship_type_name(&self, id: RelationshipTypeId) -> Result<String, TokenLookupError> {
        (**self).relationship_type_name(id)
    }

    fn property_key_name(&self, id: PropertyKeyId) -> Result<String, TokenLookupError> {
        (**self).property_key_name(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_display() {
        let err = TokenLookupError::Unknown {
            kind: TokenKind::Label,
            id: 4,
        };
        assert_eq!(err.to_string(), "unknown label token: 4");

        let err = TokenLookupError::Unavailable {
            kind: TokenKind::PropertyKey,
            id: 2,
            reason: "timed out".to_string(),
        };
        assert_eq!(err.to_string(), "property token 2 could not be resolved: timed out");
        assert_eq!(err.kind(), TokenKind::PropertyKey);
        assert_eq!(err.id(), 2);
    }

    #[test]
    fn lookup_errors_classify_as_name_failures() {
        let err = TokenLookupError::Unknown {
            kind: TokenKind::RelationshipType,
            id: 1,
        };
        assert_eq!(err.status(), Status::TokenNameLookupFailed);
    }

    /// Resolves ids 0 and 1 in every namespace; everything else is unknown.
    struct Fixed;

    impl TokenNameLookup for Fixed {
        fn label_name(&self, id: LabelId) -> Result<String, TokenLookupError> {
            match id.0 {
                0 | 1 => Ok(format!("L{}", id.0)),
                other => Err(TokenLookupError::Unknown {
                    kind: TokenKind::Label,
                    id: other,
                }),
            }
        }

        fn relationship_type_name(
            &self,
            id: RelationshipTypeId,
        ) -> Result<String, TokenLookupError> {
            match id.0 {
                0 | 1 => Ok(format!("R{}", id.0)),
                other => Err(TokenLookupError::Unavailable {
                    kind: TokenKind::RelationshipType,
                    id: other,
                    reason: "offline".to_string(),
                }),
            }
        }

        fn property_key_name(&self, id: PropertyKeyId) -> Result<String, TokenLookupError> {
            match id.0 {
                0 | 1 => Ok(format!("P{}", id.0)),
                other => Err(TokenLookupError::Unknown {
                    kind: TokenKind::PropertyKey,
                    id: other,
                }),
            }
        }
    }

    fn all_names<L: TokenNameLookup>(names: L, id: u32) -> [Result<String, TokenLookupError>; 3] {
        [
            names.label_name(LabelId(id)),
            names.relationship_type_name(RelationshipTypeId(id)),
            names.property_key_name(PropertyKeyId(id)),
        ]
    }

    #[test]
    fn wrappers_forward_every_lookup() {
        let boxed: Box<dyn TokenNameLookup> = Box::new(Fixed);
        for id in [1, 7] {
            let direct = all_names(Fixed, id);
            assert_eq!(all_names(&Fixed, id), direct);
            assert_eq!(all_names(&boxed, id), direct);
            assert_eq!(all_names(Box::new(Fixed), id), direct);
        }

        assert_eq!(
            all_names(boxed, 1),
            [Ok("L1".to_string()), Ok("R1".to_string()), Ok("P1".to_string())]
        );
        assert!(matches!(
            all_names(Box::new(&Fixed), 7)[1],
            Err(TokenLookupError::Unavailable { id: 7, .. })
        ));
    }
}
