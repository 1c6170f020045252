//! SQLite implementation of the catalog traits.
//!
//! [`SqliteCatalog`] keeps tokens and rules in two tables (see
//! `migrations/001_initial_schema.sql`). Enum-valued columns are stored as
//! TEXT through the explicit helpers below. Candidate queries collect the
//! matching rows before returning, because a prepared statement cannot
//! outlive the call, but leave them undecoded: a row is only checked when
//! the resolver pulls it, so a bad row past the second match cannot turn a
//! duplicate into a storage failure.

use rusqlite::types::FromSql;
use rusqlite::{params, Connection, OptionalExtension, Params};

use schemarule_core::{
    ConstraintKind, ConstraintRule, EntityToken, IndexRule, LabelId, PropertyKeyId,
    RelationshipTypeId, RuleId, SchemaDescriptor, TokenKind, TokenLookupError, TokenNameLookup,
};

use crate::error::StorageError;
use crate::traits::{lookup_token_name, Candidates, CatalogWriter, SchemaCatalog, TokenStore};

const SELECT_INDEXES: &str = "SELECT rule_id, is_unique FROM schema_rules \
     WHERE rule_type = 'index' AND entity_kind = ?1 AND entity_token_id = ?2 AND property_key_id = ?3 \
     ORDER BY rule_id";

const SELECT_UNIQUE_INDEXES: &str = "SELECT rule_id, is_unique FROM schema_rules \
     WHERE rule_type = 'index' AND is_unique = 1 \
     AND entity_kind = ?1 AND entity_token_id = ?2 AND property_key_id = ?3 \
     ORDER BY rule_id";

const SELECT_CONSTRAINTS: &str = "SELECT rule_id, constraint_kind FROM schema_rules \
     WHERE rule_type = 'constraint' AND entity_kind = ?1 AND entity_token_id = ?2 AND property_key_id = ?3 \
     ORDER BY rule_id";

const SELECT_CONSTRAINTS_OF_KIND: &str = "SELECT rule_id, constraint_kind FROM schema_rules \
     WHERE rule_type = 'constraint' AND constraint_kind = ?4 \
     AND entity_kind = ?1 AND entity_token_id = ?2 AND property_key_id = ?3 \
     ORDER BY rule_id";

/// Undecoded `(rule_id, column)` candidate rows.
type RawRows<T> = Vec<rusqlite::Result<(i64, T)>>;

/// SQLite-backed rule catalog and token store.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Opens (or creates) a catalog database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteCatalog { conn })
    }

    /// Opens an in-memory catalog (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteCatalog { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn entity_kind_to_str(entity: EntityToken) -> &'static str {
        entity.token_kind().as_str()
    }

    fn constraint_kind_to_str(kind: ConstraintKind) -> &'static str {
        match kind {
            ConstraintKind::Uniqueness => "uniqueness",
            ConstraintKind::PropertyExistence => "property_existence",
        }
    }

    fn str_to_constraint_kind(s: &str) -> Result<ConstraintKind, StorageError> {
        match s {
            "uniqueness" => Ok(ConstraintKind::Uniqueness),
            "property_existence" => Ok(ConstraintKind::PropertyExistence),
            other => Err(StorageError::CorruptRow {
                reason: format!("unknown constraint kind '{}'", other),
            }),
        }
    }

    fn rule_id_from_row(raw: i64) -> Result<RuleId, StorageError> {
        u64::try_from(raw)
            .map(RuleId)
            .map_err(|_| StorageError::CorruptRow {
                reason: format!("negative rule id {}", raw),
            })
    }

    /// Runs a candidate query, keeping each row's `(rule_id, column)` pair
    /// undecoded. Per-row failures are kept in place, not raised.
    fn fetch_rows<T: FromSql>(
        &self,
        sql: &str,
        params: impl Params,
    ) -> Result<RawRows<T>, StorageError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params, |row| -> rusqlite::Result<(i64, T)> {
            Ok((row.get(0)?, row.get(1)?))
        })?;
        let raw: RawRows<T> = rows.collect();
        Ok(raw)
    }

    fn decode_indexes(
        descriptor: SchemaDescriptor,
        rows: RawRows<bool>,
    ) -> Candidates<'static, IndexRule> {
        Box::new(
            rows.into_iter()
                .map(move |row| -> Result<IndexRule, StorageError> {
                    let (id, unique) = row?;
                    Ok(IndexRule {
                        id: Self::rule_id_from_row(id)?,
                        descriptor,
                        unique,
                    })
                }),
        )
    }

    fn decode_constraints(
        descriptor: SchemaDescriptor,
        rows: RawRows<String>,
    ) -> Candidates<'static, ConstraintRule> {
        Box::new(
            rows.into_iter()
                .map(move |row| -> Result<ConstraintRule, StorageError> {
                    let (id, kind) = row?;
                    Ok(ConstraintRule {
                        id: Self::rule_id_from_row(id)?,
                        descriptor,
                        kind: Self::str_to_constraint_kind(&kind)?,
                    })
                }),
        )
    }

    fn insert_rule(
        &mut self,
        rule_type: &str,
        descriptor: &SchemaDescriptor,
        unique: bool,
        constraint_kind: Option<ConstraintKind>,
    ) -> Result<RuleId, StorageError> {
        self.conn.execute(
            "INSERT INTO schema_rules (rule_type, entity_kind, entity_token_id, property_key_id, is_unique, constraint_kind) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                rule_type,
                Self::entity_kind_to_str(descriptor.entity()),
                descriptor.entity_token_id(),
                descriptor.property_key_id().0,
                unique,
                constraint_kind.map(Self::constraint_kind_to_str),
            ],
        )?;
        Self::rule_id_from_row(self.conn.last_insert_rowid())
    }
}

impl SchemaCatalog for SqliteCatalog {
    fn index_candidates(
        &self,
        descriptor: &SchemaDescriptor,
    ) -> Result<Candidates<'_, IndexRule>, StorageError> {
        let rows = self.fetch_rows(
            SELECT_INDEXES,
            params![
                Self::entity_kind_to_str(descriptor.entity()),
                descriptor.entity_token_id(),
                descriptor.property_key_id().0,
            ],
        )?;
        Ok(Self::decode_indexes(*descriptor, rows))
    }

    fn unique_index_candidates(
        &self,
        descriptor: &SchemaDescriptor,
    ) -> Result<Candidates<'_, IndexRule>, StorageError> {
        let rows = self.fetch_rows(
            SELECT_UNIQUE_INDEXES,
            params![
                Self::entity_kind_to_str(descriptor.entity()),
                descriptor.entity_token_id(),
                descriptor.property_key_id().0,
            ],
        )?;
        Ok(Self::decode_indexes(*descriptor, rows))
    }

    fn constraint_candidates(
        &self,
        descriptor: &SchemaDescriptor,
        kind: Option<ConstraintKind>,
    ) -> Result<Candidates<'_, ConstraintRule>, StorageError> {
        let entity_kind = Self::entity_kind_to_str(descriptor.entity());
        let entity_id = descriptor.entity_token_id();
        let property_id = descriptor.property_key_id().0;

        let rows = match kind {
            None => self.fetch_rows(
                SELECT_CONSTRAINTS,
                params![entity_kind, entity_id, property_id],
            )?,
            Some(kind) => self.fetch_rows(
                SELECT_CONSTRAINTS_OF_KIND,
                params![
                    entity_kind,
                    entity_id,
                    property_id,
                    Self::constraint_kind_to_str(kind)
                ],
            )?,
        };
        Ok(Self::decode_constraints(*descriptor, rows))
    }
}

impl TokenStore for SqliteCatalog {
    fn get_or_create_token(&mut self, kind: TokenKind, name: &str) -> Result<u32, StorageError> {
        let tx = self.conn.transaction()?;

        let existing: Option<u32> = tx
            .query_row(
                "SELECT id FROM tokens WHERE kind = ?1 AND name = ?2",
                params![kind.as_str(), name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(id) + 1, 0) FROM tokens WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        let id = u32::try_from(next).map_err(|_| StorageError::TokenIdsExhausted { kind })?;
        tx.execute(
            "INSERT INTO tokens (kind, id, name) VALUES (?1, ?2, ?3)",
            params![kind.as_str(), id, name],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn token_id(&self, kind: TokenKind, name: &str) -> Result<Option<u32>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id FROM tokens WHERE kind = ?1 AND name = ?2",
                params![kind.as_str(), name],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn next_token_id(&self, kind: TokenKind) -> Result<u32, StorageError> {
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(id) + 1, 0) FROM tokens WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        u32::try_from(next).map_err(|_| StorageError::TokenIdsExhausted { kind })
    }

    fn token_name(&self, kind: TokenKind, id: u32) -> Result<Option<String>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT name FROM tokens WHERE kind = ?1 AND id = ?2",
                params![kind.as_str(), id],
                |row| row.get(0),
            )
            .optional()?)
    }
}

impl CatalogWriter for SqliteCatalog {
    fn add_index(
        &mut self,
        descriptor: SchemaDescriptor,
        unique: bool,
    ) -> Result<IndexRule, StorageError> {
        let id = self.insert_rule("index", &descriptor, unique, None)?;
        Ok(IndexRule {
            id,
            descriptor,
            unique,
        })
    }

    fn add_constraint(
        &mut self,
        descriptor: SchemaDescriptor,
        kind: ConstraintKind,
    ) -> Result<ConstraintRule, StorageError> {
        let id = self.insert_rule("constraint", &descriptor, false, Some(kind))?;
        Ok(ConstraintRule {
            id,
            descriptor,
            kind,
        })
    }
}

impl TokenNameLookup for SqliteCatalog {
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
