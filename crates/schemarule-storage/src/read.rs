//! Lookup entry points: catalog query -> resolver -> typed result.
//!
//! Each entry point issues exactly the catalog query for its rule kind (the
//! unique-index lookup uses the narrow unique query rather than filtering the
//! general one), pulls at most two candidates from it and hands them to
//! [`resolve_single`]. Access errors pass through unchanged.

use schemarule_core::{
    resolve_single, ConstraintKind, ConstraintRule, HasStatus, IndexRule, RuleKind,
    SchemaDescriptor, SchemaRule, SchemaRuleAccessError, Status,
};
use thiserror::Error;

use crate::error::StorageError;
use crate::traits::{Candidates, SchemaCatalog};

/// Failure of a lookup entry point.
#[derive(Debug, Error)]
pub enum SchemaReadError {
    /// Zero or several rules matched.
    #[error(transparent)]
    Access(#[from] SchemaRuleAccessError),

    /// The catalog could not produce candidates.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SchemaReadError {
    /// The resolution failure, if that is what this is.
    pub fn access_error(&self) -> Option<&SchemaRuleAccessError> {
        match self {
            SchemaReadError::Access(err) => Some(err),
            SchemaReadError::Storage(_) => None,
        }
    }
}

impl HasStatus for SchemaReadError {
    fn status(&self) -> Status {
        match self {
            SchemaReadError::Access(err) => err.status(),
            SchemaReadError::Storage(err) => err.status(),
        }
    }
}

/// Read-side schema lookups over a catalog.
///
/// Stateless apart from the catalog reference: every call re-queries the
/// catalog, and nothing is cached between calls.
pub struct SchemaRead<'a, C: SchemaCatalog + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: SchemaCatalog + ?Sized> SchemaRead<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        SchemaRead { catalog }
    }

    /// The single index (unique or not) on `descriptor`.
    pub fn index_for_label_and_property_key(
        &self,
        descriptor: SchemaDescriptor,
    ) -> Result<IndexRule, SchemaReadError> {
        let candidates = self.catalog.index_candidates(&descriptor)?;
        resolve_candidates(descriptor, RuleKind::Index, candidates)
    }

    /// The single unique index on `descriptor`.
    pub fn unique_index_for_label_and_property_key(
        &self,
        descriptor: SchemaDescriptor,
    ) -> Result<IndexRule, SchemaReadError> {
        let candidates = self.catalog.unique_index_candidates(&descriptor)?;
        resolve_candidates(descriptor, RuleKind::UniqueIndex, candidates)
    }

    /// The single constraint of any kind on `descriptor`.
    pub fn constraint_for_label_and_property_key(
        &self,
        descriptor: SchemaDescriptor,
    ) -> Result<ConstraintRule, SchemaReadError> {
        let candidates = self.catalog.constraint_candidates(&descriptor, None)?;
        resolve_candidates(descriptor, RuleKind::Constraint, candidates)
    }

    /// The single constraint of `kind` on `descriptor`.
    pub fn constraint_of_kind(
        &self,
        descriptor: SchemaDescriptor,
        kind: ConstraintKind,
    ) -> Result<ConstraintRule, SchemaReadError> {
        let candidates = self.catalog.constraint_candidates(&descriptor, Some(kind))?;
        resolve_candidates(descriptor, kind.rule_kind(), candidates)
    }

    /// The single rule of `kind` on `descriptor`, whatever its shape.
    pub fn resolve(
        &self,
        descriptor: SchemaDescriptor,
        kind: RuleKind,
    ) -> Result<SchemaRule, SchemaReadError> {
        let candidates = self.catalog.candidates_for(&descriptor, kind)?;
        resolve_candidates(descriptor, kind, candidates)
    }
}

/// Pulls at most two candidates and reduces them. A storage error is raised
/// only when one of those two fails to decode.
fn resolve_candidates<T>(
    descriptor: SchemaDescriptor,
    kind: RuleKind,
    candidates: Candidates<'_, T>,
) -> Result<T, SchemaReadError> {
    let pulled = candidates
        .take(2)
        .collect::<Result<Vec<T>, StorageError>>()?;
    resolve_single(descriptor, kind, pulled).map_err(traced)
}

/// Logs a resolution failure with raw ids and wraps it.
fn traced(err: SchemaRuleAccessError) -> SchemaReadError {
    match &err {
        SchemaRuleAccessError::NotFound { descriptor, kind } => {
            tracing::debug!(%descriptor, %kind, "schema rule not found");
        }
        SchemaRuleAccessError::Duplicate { descriptor, kind } => {
            tracing::warn!(%descriptor, %kind, "multiple schema rules matched a single-rule lookup");
        }
    }
    SchemaReadError::Access(err)
}

#[cfg(test)]
mod tests {
    use schemarule_core::{LabelId, PropertyKeyId, RuleId};

    use super::*;
    use crate::memory::InMemoryCatalog;
    use crate::traits::CatalogWriter;

    fn descriptor() -> SchemaDescriptor {
        SchemaDescriptor::for_label(LabelId(1), PropertyKeyId(2))
    }

    /// Catalog that fails every query.
    struct Broken;

    impl SchemaCatalog for Broken {
        fn index_candidates(
            &self,
            _: &SchemaDescriptor,
        ) -> Result<Candidates<'_, IndexRule>, StorageError> {
            Err(StorageError::Migration("offline".to_string()))
        }

        fn unique_index_candidates(
            &self,
            _: &SchemaDescriptor,
        ) -> Result<Candidates<'_, IndexRule>, StorageError> {
            Err(StorageError::Migration("offline".to_string()))
        }

        fn constraint_candidates(
            &self,
            _: &SchemaDescriptor,
            _: Option<ConstraintKind>,
        ) -> Result<Candidates<'_, ConstraintRule>, StorageError> {
            Err(StorageError::Migration("offline".to_string()))
        }
    }

    /// Catalog whose index queries yield a fixed script of decode outcomes.
    struct Scripted {
        script: Vec<bool>,
    }

    impl SchemaCatalog for Scripted {
        fn index_candidates(
            &self,
            descriptor: &SchemaDescriptor,
        ) -> Result<Candidates<'_, IndexRule>, StorageError> {
            let descriptor = *descriptor;
            Ok(Box::new(self.script.iter().enumerate().map(move |(i, ok)| {
                if *ok {
                    Ok(IndexRule {
                        id: RuleId(i as u64),
                        descriptor,
                        unique: true,
                    })
                } else {
                    Err(StorageError::CorruptRow {
                        reason: format!("row {}", i),
                    })
                }
            })))
        }

        fn unique_index_candidates(
            &self,
            descriptor: &SchemaDescriptor,
        ) -> Result<Candidates<'_, IndexRule>, StorageError> {
            self.index_candidates(descriptor)
        }

        fn constraint_candidates(
            &self,
            _: &SchemaDescriptor,
            _: Option<ConstraintKind>,
        ) -> Result<Candidates<'_, ConstraintRule>, StorageError> {
            Ok(Box::new(std::iter::empty::<Result<ConstraintRule, StorageError>>()))
        }
    }

    #[test]
    fn bad_candidate_past_the_second_is_never_decoded() {
        let catalog = Scripted {
            script: vec![true, true, false],
        };
        let err = SchemaRead::new(&catalog)
            .unique_index_for_label_and_property_key(descriptor())
            .unwrap_err();
        assert_eq!(
            err.access_error(),
            Some(&SchemaRuleAccessError::Duplicate {
                descriptor: descriptor(),
                kind: RuleKind::UniqueIndex,
            })
        );
    }

    #[test]
    fn bad_candidate_within_the_first_two_is_a_storage_error() {
        for script in [vec![false], vec![true, false], vec![false, true, true]] {
            let catalog = Scripted { script };
            let err = SchemaRead::new(&catalog)
                .index_for_label_and_property_key(descriptor())
                .unwrap_err();
            assert!(matches!(
                err,
                SchemaReadError::Storage(StorageError::CorruptRow { .. })
            ));
        }
    }

    #[test]
    fn general_index_lookup_sees_non_unique_indexes() {
        let mut catalog = InMemoryCatalog::new();
        let index = catalog.add_index(descriptor(), false).unwrap();

        let read = SchemaRead::new(&catalog);
        assert_eq!(read.index_for_label_and_property_key(descriptor()).unwrap(), index);

        let err = read
            .unique_index_for_label_and_property_key(descriptor())
            .unwrap_err();
        assert_eq!(
            err.access_error(),
            Some(&SchemaRuleAccessError::NotFound {
                descriptor: descriptor(),
                kind: RuleKind::UniqueIndex,
            })
        );
    }

    #[test]
    fn unique_lookup_ignores_non_unique_siblings() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add_index(descriptor(), false).unwrap();
        let unique = catalog.add_index(descriptor(), true).unwrap();

        let read = SchemaRead::new(&catalog);
        assert_eq!(
            read.unique_index_for_label_and_property_key(descriptor()).unwrap(),
            unique
        );
        // Two indexes in total, so the general lookup is ambiguous.
        let err = read.index_for_label_and_property_key(descriptor()).unwrap_err();
        assert_eq!(
            err.access_error(),
            Some(&SchemaRuleAccessError::Duplicate {
                descriptor: descriptor(),
                kind: RuleKind::Index,
            })
        );
    }

    #[test]
    fn constraint_of_kind_uses_kind_specific_rule_kind() {
        let catalog = InMemoryCatalog::new();
        let read = SchemaRead::new(&catalog);
        let err = read
            .constraint_of_kind(descriptor(), ConstraintKind::Uniqueness)
            .unwrap_err();
        assert_eq!(err.access_error().unwrap().kind(), RuleKind::UniquenessConstraint);
    }

    #[test]
    fn resolve_dispatches_on_kind() {
        let mut catalog = InMemoryCatalog::new();
        let constraint = catalog
            .add_constraint(descriptor(), ConstraintKind::PropertyExistence)
            .unwrap();

        let read = SchemaRead::new(&catalog);
        let resolved = read
            .resolve(descriptor(), RuleKind::PropertyExistenceConstraint)
            .unwrap();
        assert_eq!(resolved, SchemaRule::Constraint(constraint));
        assert_eq!(resolved.id(), RuleId(0));

        let err = read.resolve(descriptor(), RuleKind::Index).unwrap_err();
        assert!(err.access_error().unwrap().is_not_found());
    }

    #[test]
    fn storage_failures_are_not_access_errors() {
        let read = SchemaRead::new(&Broken);
        let err = read.index_for_label_and_property_key(descriptor()).unwrap_err();
        assert!(err.access_error().is_none());
        assert_eq!(err.status(), Status::StorageFailed);
    }

    #[test]
    fn access_errors_keep_umbrella_status() {
        let catalog = InMemoryCatalog::new();
        let read = SchemaRead::new(&catalog);
        let err = read
            .constraint_for_label_and_property_key(descriptor())
            .unwrap_err();
        assert_eq!(err.status(), Status::SchemaRuleAccessFailed);
    }

    #[test]
    fn works_through_a_trait_object() {
        let mut catalog = InMemoryCatalog::new();
        let index = catalog.add_index(descriptor(), true).unwrap();
        let dyn_catalog: &dyn SchemaCatalog = &catalog;

        let read = SchemaRead::new(dyn_catalog);
        assert_eq!(
            read.unique_index_for_label_and_property_key(descriptor()).unwrap(),
            index
        );
    }
}
