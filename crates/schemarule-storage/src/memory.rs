//! In-memory implementation of the catalog traits.
//!
//! [`InMemoryCatalog`] is a first-class backend for tests and embedding. Rules
//! live in insertion-ordered Vecs and candidate iterators are lazy filters over
//! them, so a resolver that stops early never touches the remaining rules.

use std::collections::HashMap;

use schemarule_core::{
    ConstraintKind, ConstraintRule, IndexRule, LabelId, PropertyKeyId, RelationshipTypeId,
    RuleId, SchemaDescriptor, TokenKind, TokenLookupError, TokenNameLookup,
};

use crate::error::StorageError;
use crate::traits::{lookup_token_name, Candidates, CatalogWriter, SchemaCatalog, TokenStore};

/// Vec-backed rule catalog and token store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    /// Token names per namespace; the id is the position.
    tokens: HashMap<TokenKind, Vec<String>>,
    indexes: Vec<IndexRule>,
    constraints: Vec<ConstraintRule>,
    next_rule_id: u64,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rules of either kind.
    pub fn rule_count(&self) -> usize {
        self.indexes.len() + self.constraints.len()
    }

    fn allocate_rule_id(&mut self) -> RuleId {
        let id = RuleId(self.next_rule_id);
        self.next_rule_id += 1;
        id
    }
}

/// Token ids are positions in the namespace's name list.
fn token_id_from_pos(kind: TokenKind, pos: usize) -> Result<u32, StorageError> {
    u32::try_from(pos).map_err(|_| StorageError::TokenIdsExhausted { kind })
}

impl SchemaCatalog for InMemoryCatalog {
    fn index_candidates(
        &self,
        descriptor: &SchemaDescriptor,
    ) -> Result<Candidates<'_, IndexRule>, StorageError> {
        let descriptor = *descriptor;
        Ok(Box::new(
            self.indexes
                .iter()
                .filter(move |rule| rule.descriptor == descriptor)
                .cloned()
                .map(Ok::<_, StorageError>),
        ))
    }

    fn unique_index_candidates(
        &self,
        descriptor: &SchemaDescriptor,
    ) -> Result<Candidates<'_, IndexRule>, StorageError> {
        let descriptor = *descriptor;
        Ok(Box::new(
            self.indexes
                .iter()
                .filter(move |rule| rule.unique && rule.descriptor == descriptor)
                .cloned()
                .map(Ok::<_, StorageError>),
        ))
    }

    fn constraint_candidates(
        &self,
        descriptor: &SchemaDescriptor,
        kind: Option<ConstraintKind>,
    ) -> Result<Candidates<'_, ConstraintRule>, StorageError> {
        let descriptor = *descriptor;
        Ok(Box::new(
            self.constraints
                .iter()
                .filter(move |rule| {
                    rule.descriptor == descriptor && kind.map_or(true, |k| rule.kind == k)
                })
                .cloned()
                .map(Ok::<_, StorageError>),
        ))
    }
}

impl TokenStore for InMemoryCatalog {
    fn get_or_create_token(&mut self, kind: TokenKind, name: &str) -> Result<u32, StorageError> {
        let names = self.tokens.entry(kind).or_default();
        if let Some(pos) = names.iter().position(|n| n == name) {
            return token_id_from_pos(kind, pos);
        }
        let id = token_id_from_pos(kind, names.len())?;
        names.push(name.to_string());
        Ok(id)
    }

    fn token_id(&self, kind: TokenKind, name: &str) -> Result<Option<u32>, StorageError> {
        self.tokens
            .get(&kind)
            .and_then(|names| names.iter().position(|n| n == name))
            .map(|pos| token_id_from_pos(kind, pos))
            .transpose()
    }

    fn next_token_id(&self, kind: TokenKind) -> Result<u32, StorageError> {
        token_id_from_pos(kind, self.tokens.get(&kind).map_or(0, Vec::len))
    }

    fn token_name(&self, kind: TokenKind, id: u32) -> Result<Option<String>, StorageError> {
        Ok(self
            .tokens
            .get(&kind)
            .and_then(|names| names.get(id as usize))
            .cloned())
    }
}

impl CatalogWriter for InMemoryCatalog {
    fn add_index(
        &mut self,
        descriptor: SchemaDescriptor,
        unique: bool,
    ) -> Result<IndexRule, StorageError> {
        let rule = IndexRule {
            id: self.allocate_rule_id(),
            descriptor,
            unique,
        };
        self.indexes.push(rule.clone());
        Ok(rule)
    }

    fn add_constraint(
        &mut self,
        descriptor: SchemaDescriptor,
        kind: ConstraintKind,
    ) -> Result<ConstraintRule, StorageError> {
        let rule = ConstraintRule {
            id: self.allocate_rule_id(),
            descriptor,
            kind,
        };
        self.constraints.push(rule.clone());
        Ok(rule)
    }
}

impl TokenNameLookup for InMemoryCatalog {
    fn label_name(&self, id: LabelId) -> Result<String, TokenLookupError> {
        lookup_token_name(self, TokenKind::Label, id.0)
    }

    fn relationship_type_name(&self, id: RelationshipTypeId) -> Result<String, TokenLookupError> {
        lookup_token_name(self, TokenKind::RelationshipType, id.0)
    }

    fn property_key_name(&self, id: PropertyKeyId) -> Result<String, TokenLookupError> {
        lookup_token_name(self, TokenKind::PropertyKey, id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_name(catalog: &mut InMemoryCatalog) -> SchemaDescriptor {
        let label = catalog.get_or_create_token(TokenKind::Label, "Person").unwrap();
        let prop = catalog
            .get_or_create_token(TokenKind::PropertyKey, "name")
            .unwrap();
        SchemaDescriptor::for_label(LabelId(label), PropertyKeyId(prop))
    }

    #[test]
    fn tokens_are_allocated_per_namespace() {
        let mut catalog = InMemoryCatalog::new();
        assert_eq!(catalog.get_or_create_token(TokenKind::Label, "A").unwrap(), 0);
        assert_eq!(catalog.get_or_create_token(TokenKind::Label, "B").unwrap(), 1);
        assert_eq!(catalog.get_or_create_token(TokenKind::PropertyKey, "p").unwrap(), 0);
        assert_eq!(catalog.get_or_create_token(TokenKind::Label, "A").unwrap(), 0);

        assert_eq!(catalog.token_id(TokenKind::Label, "B").unwrap(), Some(1));
        assert_eq!(catalog.token_id(TokenKind::RelationshipType, "B").unwrap(), None);
        assert_eq!(
            catalog.token_name(TokenKind::PropertyKey, 0).unwrap(),
            Some("p".to_string())
        );
    }

    #[test]
    fn next_token_id_is_unregistered() {
        let mut catalog = InMemoryCatalog::new();
        assert_eq!(catalog.next_token_id(TokenKind::Label).unwrap(), 0);
        catalog.get_or_create_token(TokenKind::Label, "A").unwrap();
        let next = catalog.next_token_id(TokenKind::Label).unwrap();
        assert_eq!(next, 1);
        assert_eq!(catalog.token_name(TokenKind::Label, next).unwrap(), None);
        assert_eq!(catalog.next_token_id(TokenKind::PropertyKey).unwrap(), 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn positions_past_u32_are_rejected() {
        assert_eq!(token_id_from_pos(TokenKind::Label, u32::MAX as usize).unwrap(), u32::MAX);
        let err = token_id_from_pos(TokenKind::Label, u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(
            err,
            StorageError::TokenIdsExhausted {
                kind: TokenKind::Label
            }
        ));
    }

    #[test]
    fn empty_catalog_yields_empty_candidates() {
        let catalog = InMemoryCatalog::new();
        let d = SchemaDescriptor::for_label(LabelId(0), PropertyKeyId(0));
        assert_eq!(catalog.index_candidates(&d).unwrap().count(), 0);
        assert_eq!(catalog.unique_index_candidates(&d).unwrap().count(), 0);
        assert_eq!(catalog.constraint_candidates(&d, None).unwrap().count(), 0);
    }

    #[test]
    fn unique_query_is_narrower_than_general_query() {
        let mut catalog = InMemoryCatalog::new();
        let d = person_name(&mut catalog);
        catalog.add_index(d, false).unwrap();
        let unique = catalog.add_index(d, true).unwrap();

        assert_eq!(catalog.index_candidates(&d).unwrap().count(), 2);
        let narrowed: Vec<_> = catalog
            .unique_index_candidates(&d)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(narrowed, vec![unique]);
    }

    #[test]
    fn constraint_query_filters_by_kind() {
        let mut catalog = InMemoryCatalog::new();
        let d = person_name(&mut catalog);
        catalog.add_constraint(d, ConstraintKind::Uniqueness).unwrap();
        catalog.add_constraint(d, ConstraintKind::PropertyExistence).unwrap();

        assert_eq!(catalog.constraint_candidates(&d, None).unwrap().count(), 2);
        let existence: Vec<_> = catalog
            .constraint_candidates(&d, Some(ConstraintKind::PropertyExistence))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(existence.len(), 1);
        assert_eq!(existence[0].kind, ConstraintKind::PropertyExistence);
    }

    #[test]
    fn rules_on_other_descriptors_are_not_candidates() {
        let mut catalog = InMemoryCatalog::new();
        let d = person_name(&mut catalog);
        let other = SchemaDescriptor::for_label(LabelId(9), d.property_key_id());
        catalog.add_index(other, true).unwrap();

        assert_eq!(catalog.index_candidates(&d).unwrap().count(), 0);
        assert_eq!(catalog.rule_count(), 1);
    }

    #[test]
    fn rule_ids_are_unique_across_kinds() {
        let mut catalog = InMemoryCatalog::new();
        let d = person_name(&mut catalog);
        let a = catalog.add_index(d, false).unwrap();
        let b = catalog.add_constraint(d, ConstraintKind::Uniqueness).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn name_lookup_reports_unknown_tokens() {
        let mut catalog = InMemoryCatalog::new();
        let d = person_name(&mut catalog);
        let label = LabelId(d.entity_token_id());

        assert_eq!(catalog.label_name(label).unwrap(), "Person");
        assert_eq!(catalog.property_key_name(d.property_key_id()).unwrap(), "name");
        assert_eq!(
            catalog.relationship_type_name(RelationshipTypeId(0)),
            Err(TokenLookupError::Unknown {
                kind: TokenKind::RelationshipType,
                id: 0
            })
        );
    }
}
