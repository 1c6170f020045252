//! Exactly-one reduction over a lazy candidate sequence.
//!
//! The outcome depends only on how many candidates the sequence yields:
//! none is `NotFound`, one is that candidate, two or more is `Duplicate`.
//! At most two elements are ever pulled, so a catalog scan behind the
//! iterator is never forced past the second match.

use crate::descriptor::SchemaDescriptor;
use crate::error::SchemaRuleAccessError;
use crate::rule::RuleKind;

/// Reduces `candidates` to its single element.
///
/// `kind` is only recorded in the error; it never changes the reduction.
pub fn resolve_single<I>(
    descriptor: SchemaDescriptor,
    kind: RuleKind,
    candidates: I,
) -> Result<I::Item, SchemaRuleAccessError>
where
    I: IntoIterator,
{
    let mut candidates = candidates.into_iter();

    let Some(first) = candidates.next() else {
        return Err(SchemaRuleAccessError::NotFound { descriptor, kind });
    };

    if candidates.next().is_some() {
        return Err(SchemaRuleAccessError::Duplicate { descriptor, kind });
    }

    Ok(first)
}
