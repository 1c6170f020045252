pub mod id;
pub mod descriptor;
pub mod rule;
pub mod token;
pub mod error;
pub mod message;
pub mod resolve;

// Re-export commonly used types
pub use id::{LabelId, PropertyKeyId, RelationshipTypeId, RuleId, TokenKind};
pub use descriptor::{EntityToken, SchemaDescriptor};
pub use rule::{ConstraintKind, ConstraintRule, IndexRule, RuleKind, SchemaRule};
pub use token::{TokenLookupError, TokenNameLookup};
pub use error::{Classification, HasStatus, SchemaRuleAccessError, Status};
pub use message::RenderedMessage;
pub use resolve::resolve_single;
