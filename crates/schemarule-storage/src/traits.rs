//! Catalog contracts.
//!
//! - [`SchemaCatalog`] is the read-side candidate source. Every query returns
//!   a lazy iterator; an empty iterator means "nothing matches". Each item
//!   is decoded as it is pulled, so a bad row only fails the pull that
//!   reaches it.
//! - [`TokenStore`] maps token names to ids and back.
//! - [`CatalogWriter`] registers rules. The catalog never rejects a rule that
//!   duplicates an existing one; detecting that is the resolver's job.

use schemarule_core::{
    ConstraintKind, ConstraintRule, IndexRule, RuleKind, SchemaDescriptor, SchemaRule, TokenKind,
    TokenLookupError,
};

use crate::error::StorageError;

/// Lazy, finite candidate sequence. Ordering is backend-defined.
pub type Candidates<'a, T> = Box<dyn Iterator<Item = Result<T, StorageError>> + 'a>;

/// Source of candidate rules for a descriptor.
pub trait SchemaCatalog {
    /// All indexes, unique or not, on the descriptor's entity and property.
    fn index_candidates(
        &self,
        descriptor: &SchemaDescriptor,
    ) -> Result<Candidates<'_, IndexRule>, StorageError>;

    /// Only unique indexes on the descriptor's entity and property.
    fn unique_index_candidates(
        &self,
        descriptor: &SchemaDescriptor,
    ) -> Result<Candidates<'_, IndexRule>, StorageError>;

    /// Constraints on the descriptor's entity and property; `None` means
    /// every constraint kind.
    fn constraint_candidates(
        &self,
        descriptor: &SchemaDescriptor,
        kind: Option<ConstraintKind>,
    ) -> Result<Candidates<'_, ConstraintRule>, StorageError>;

    /// Dispatches to the query matching `kind`.
    fn candidates_for(
        &self,
        descriptor: &SchemaDescriptor,
        kind: RuleKind,
    ) -> Result<Candidates<'_, SchemaRule>, StorageError> {
        let candidates: Candidates<'_, SchemaRule> = match kind {
            RuleKind::Index => Box::new(
                self.index_candidates(descriptor)?
                    .map(|rule| rule.map(SchemaRule::from)),
            ),
            RuleKind::UniqueIndex => Box::new(
                self.unique_index_candidates(descriptor)?
                    .map(|rule| rule.map(SchemaRule::from)),
            ),
            RuleKind::Constraint => Box::new(
                self.constraint_candidates(descriptor, None)?
                    .map(|rule| rule.map(SchemaRule::from)),
            ),
            RuleKind::UniquenessConstraint => Box::new(
                self.constraint_candidates(descriptor, Some(ConstraintKind::Uniqueness))?
                    .map(|rule| rule.map(SchemaRule::from)),
            ),
            RuleKind::PropertyExistenceConstraint => Box::new(
                self.constraint_candidates(descriptor, Some(ConstraintKind::PropertyExistence))?
                    .map(|rule| rule.map(SchemaRule::from)),
            ),
        };
        Ok(candidates)
    }
}

/// Token name registry.
pub trait TokenStore {
    /// Returns the id for `name`, allocating the next free id in the
    /// namespace if the name is new.
    fn get_or_create_token(&mut self, kind: TokenKind, name: &str) -> Result<u32, StorageError>;

    /// Id for `name`, if registered.
    fn token_id(&self, kind: TokenKind, name: &str) -> Result<Option<u32>, StorageError>;

    /// The id the next new name in the namespace would receive. No
    /// registered token holds it.
    fn next_token_id(&self, kind: TokenKind) -> Result<u32, StorageError>;

    /// Name for `id`, if registered.
    fn token_name(&self, kind: TokenKind, id: u32) -> Result<Option<String>, StorageError>;
}

/// Rule registration.
pub trait CatalogWriter {
    fn add_index(
        &mut self,
        descriptor: SchemaDescriptor,
        unique: bool,
    ) -> Result<IndexRule, StorageError>;

    fn add_constraint(
        &mut self,
        descriptor: SchemaDescriptor,
        kind: ConstraintKind,
    ) -> Result<ConstraintRule, StorageError>;
}

/// Adapts a [`TokenStore`] answer to the name-lookup contract.
///
/// A missing token is `Unknown`; a backend failure is `Unavailable`.
pub(crate) fn lookup_token_name<S: TokenStore + ?Sized>(
    store: &S,
    kind: TokenKind,
    id: u32,
) -> Result<String, TokenLookupError> {
    match store.token_name(kind, id) {
        Ok(Some(name)) => Ok(name),
        Ok(None) => Err(TokenLookupError::Unknown { kind, id }),
        Err(e) => Err(TokenLookupError::Unavailable {
            kind,
            id,
            reason: e.to_string(),
        }),
    }
}
