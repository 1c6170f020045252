//! Rule catalogs and lookup entry points for schema rule resolution.
//!
//! Provides the [`SchemaCatalog`] trait (the candidate source the resolver
//! consumes), two backends implementing it, and [`SchemaRead`], which pairs
//! each catalog query with `schemarule_core::resolve_single`.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all backend failure modes
//! - [`traits`]: SchemaCatalog, TokenStore and CatalogWriter traits
//! - [`memory`]: InMemoryCatalog implementation
//! - [`schema`]: SQL migrations and connection setup
//! - [`sqlite`]: SqliteCatalog implementation
//! - [`read`]: SchemaRead lookup entry points and SchemaReadError

pub mod error;
pub mod memory;
pub mod read;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryCatalog;
pub use read::{SchemaRead, SchemaReadError};
pub use sqlite::SqliteCatalog;
pub use traits::{Candidates, CatalogWriter, SchemaCatalog, TokenStore};
