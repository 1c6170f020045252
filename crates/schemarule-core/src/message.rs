//! Deferred, user-facing rendering of [`SchemaRuleAccessError`].
//!
//! Names are resolved through a caller-supplied [`TokenNameLookup`] at render
//! time. A name that cannot be resolved is replaced by a marked raw id and
//! recorded in [`RenderedMessage::unresolved`], so a degraded name service is
//! visible separately from the lookup failure itself.

use std::fmt;

use crate::descriptor::{EntityToken, SchemaDescriptor};
use crate::error::{HasStatus, SchemaRuleAccessError, Status};
use crate::id::TokenKind;
use crate::token::{TokenLookupError, TokenNameLookup};

/// Rendered error text plus any names that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub text: String,
    pub unresolved: Vec<TokenLookupError>,
}

impl RenderedMessage {
    /// True when at least one token name fell back to its raw id.
    pub fn is_degraded(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

impl HasStatus for RenderedMessage {
    fn status(&self) -> Status {
        if self.is_degraded() {
            Status::TokenNameLookupFailed
        } else {
            Status::SchemaRuleAccessFailed
        }
    }
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl SchemaRuleAccessError {
    /// Renders the user-facing message, resolving names through `names`.
    pub fn render(&self, names: &dyn TokenNameLookup) -> RenderedMessage {
        let mut unresolved = Vec::new();
        let target = describe_target(self.descriptor(), names, &mut unresolved);
        let kind = self.kind();

        let text = match self {
            SchemaRuleAccessError::NotFound { .. } => {
                format!("{} for {} not found.", kind.prefix(), target)
            }
            SchemaRuleAccessError::Duplicate { .. } => {
                format!("Multiple {} found for {}.", kind.plural(), target)
            }
        };

        RenderedMessage { text, unresolved }
    }

    /// Renders only the message text.
    pub fn render_message(&self, names: &dyn TokenNameLookup) -> String {
        self.render(names).text
    }
}

/// `label 'Person' and property 'name'`
fn describe_target(
    descriptor: &SchemaDescriptor,
    names: &dyn TokenNameLookup,
    unresolved: &mut Vec<TokenLookupError>,
) -> String {
    let entity = descriptor.entity();
    let entity_name = match entity {
        EntityToken::Label(id) => names.label_name(id),
        EntityToken::RelationshipType(id) => names.relationship_type_name(id),
    };
    let property_key = descriptor.property_key_id();
    let property_name = names.property_key_name(property_key);

    format!(
        "{} '{}' and property '{}'",
        entity.token_kind().noun(),
        name_or_marker(entity_name, entity.token_kind(), entity.id(), unresolved),
        name_or_marker(property_name, TokenKind::PropertyKey, property_key.0, unresolved),
    )
}

fn name_or_marker(
    result: Result<String, TokenLookupError>,
    kind: TokenKind,
    id: u32,
    unresolved: &mut Vec<TokenLookupError>,
) -> String {
    match result {
        Ok(name) => name,
        Err(err) => {
            unresolved.push(err);
            format!("<unresolved {} {}>", kind.noun(), id)
        }
    }
}
