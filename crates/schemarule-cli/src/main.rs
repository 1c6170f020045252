//! Schema rule catalog CLI.
//!
//! Provides the `schemarule` binary for registering index and constraint
//! rules in a SQLite catalog and resolving single-rule lookups against it.
//!
//! The database path is taken from `--db`, then the `SCHEMARULE_DB_PATH`
//! environment variable, then `schemarule.db`. Logging goes to stderr and
//! honours `RUST_LOG`.

use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use schemarule_core::{
    ConstraintKind, LabelId, PropertyKeyId, RelationshipTypeId, SchemaDescriptor,
    SchemaRuleAccessError, TokenKind, TokenNameLookup,
};
use schemarule_storage::{
    CatalogWriter, SchemaRead, SchemaReadError, SqliteCatalog, StorageError, TokenStore,
};

const DEFAULT_DB_PATH: &str = "schemarule.db";

/// Exit code: rule resolved or registered.
const EXIT_OK: i32 = 0;
/// Exit code: no rule matched.
const EXIT_NOT_FOUND: i32 = 1;
/// Exit code: several rules matched.
const EXIT_DUPLICATE: i32 = 2;
/// Exit code: the catalog could not be opened or queried, or the result
/// could not be encoded.
const EXIT_STORAGE: i32 = 3;
/// Exit code: the command line could not be parsed.
const EXIT_USAGE: i32 = 4;

/// Failure of a subcommand.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Read(#[from] SchemaReadError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Read(SchemaReadError::Access(SchemaRuleAccessError::NotFound { .. })) => {
                EXIT_NOT_FOUND
            }
            CliError::Read(SchemaReadError::Access(SchemaRuleAccessError::Duplicate { .. })) => {
                EXIT_DUPLICATE
            }
            _ => EXIT_STORAGE,
        }
    }
}

/// Schema rule catalog tools.
#[derive(Parser)]
#[command(name = "schemarule", about = "Schema rule catalog tools")]
struct Cli {
    /// Path to the catalog database file.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Identifies the (entity token, property key) a command targets.
#[derive(clap::Args)]
struct Target {
    /// Label name (relationship type name with --relationship).
    #[arg(short, long)]
    label: String,

    /// Property key name.
    #[arg(short, long)]
    property: String,

    /// Treat --label as a relationship type.
    #[arg(long)]
    relationship: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ConstraintArg {
    Uniqueness,
    Existence,
}

impl From<ConstraintArg> for ConstraintKind {
    fn from(arg: ConstraintArg) -> Self {
        match arg {
            ConstraintArg::Uniqueness => ConstraintKind::Uniqueness,
            ConstraintArg::Existence => ConstraintKind::PropertyExistence,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Register an index rule.
    AddIndex {
        #[command(flatten)]
        target: Target,

        /// Register a uniqueness index.
        #[arg(long)]
        unique: bool,
    },

    /// Register a constraint rule.
    AddConstraint {
        #[command(flatten)]
        target: Target,

        #[arg(short, long, value_enum)]
        kind: ConstraintArg,
    },

    /// Resolve the single index on a label and property.
    Index {
        #[command(flatten)]
        target: Target,

        /// Only consider uniqueness indexes.
        #[arg(long)]
        unique: bool,
    },

    /// Resolve the single constraint on a label and property.
    Constraint {
        #[command(flatten)]
        target: Target,

        /// Only consider constraints of this kind.
        #[arg(short, long, value_enum)]
        kind: Option<ConstraintArg>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(parse_error_exit_code(&e));
        }
    };
    let db_path = cli
        .db
        .or_else(|| std::env::var("SCHEMARULE_DB_PATH").ok())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    let mut catalog = match SqliteCatalog::new(&db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: failed to open catalog '{}': {}", db_path, e);
            process::exit(EXIT_STORAGE);
        }
    };
    tracing::debug!(db = %db_path, "catalog opened");

    let result = match cli.command {
        Commands::AddIndex { target, unique } => {
            run_add(&mut catalog, &target, |catalog, d| -> Result<String, CliError> {
                let rule = catalog.add_index(d, unique)?;
                Ok(serde_json::to_string_pretty(&rule)?)
            })
        }
        Commands::AddConstraint { target, kind } => {
            run_add(&mut catalog, &target, |catalog, d| -> Result<String, CliError> {
                let rule = catalog.add_constraint(d, kind.into())?;
                Ok(serde_json::to_string_pretty(&rule)?)
            })
        }
        Commands::Index { target, unique } => {
            run_lookup(&catalog, &target, |read, d| -> Result<String, CliError> {
                let rule = if unique {
                    read.unique_index_for_label_and_property_key(d)?
                } else {
                    read.index_for_label_and_property_key(d)?
                };
                Ok(serde_json::to_string_pretty(&rule)?)
            })
        }
        Commands::Constraint { target, kind } => {
            run_lookup(&catalog, &target, |read, d| -> Result<String, CliError> {
                let rule = match kind {
                    Some(kind) => read.constraint_of_kind(d, kind.into())?,
                    None => read.constraint_for_label_and_property_key(d)?,
                };
                Ok(serde_json::to_string_pretty(&rule)?)
            })
        }
    };

    let exit_code = match result {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(err) => report(&err, &catalog),
    };
    process::exit(exit_code);
}

/// Help and version requests succeed; every other parse failure is a usage
/// error with its own exit code.
fn parse_error_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
        _ => EXIT_USAGE,
    }
}

fn entity_kind(target: &Target) -> TokenKind {
    if target.relationship {
        TokenKind::RelationshipType
    } else {
        TokenKind::Label
    }
}

fn descriptor_from_ids(entity_kind: TokenKind, entity: u32, property: u32) -> SchemaDescriptor {
    let property = PropertyKeyId(property);
    match entity_kind {
        TokenKind::RelationshipType => {
            SchemaDescriptor::for_relationship_type(RelationshipTypeId(entity), property)
        }
        _ => SchemaDescriptor::for_label(LabelId(entity), property),
    }
}

/// Execute a registration subcommand, creating tokens as needed.
fn run_add<F>(catalog: &mut SqliteCatalog, target: &Target, add: F) -> Result<String, CliError>
where
    F: FnOnce(&mut SqliteCatalog, SchemaDescriptor) -> Result<String, CliError>,
{
    let descriptor = register(catalog, target)?;
    add(catalog, descriptor)
}

/// Resolves (or allocates) the token ids for `target`.
fn register<S: TokenStore>(store: &mut S, target: &Target) -> Result<SchemaDescriptor, StorageError> {
    let kind = entity_kind(target);
    let entity = store.get_or_create_token(kind, &target.label)?;
    let property = store.get_or_create_token(TokenKind::PropertyKey, &target.property)?;
    Ok(descriptor_from_ids(kind, entity, property))
}

/// Execute a lookup subcommand. Lookups never create tokens.
fn run_lookup<F>(catalog: &SqliteCatalog, target: &Target, lookup: F) -> Result<String, CliError>
where
    F: FnOnce(&SchemaRead<'_, SqliteCatalog>, SchemaDescriptor) -> Result<String, CliError>,
{
    let descriptor = lookup_descriptor(catalog, target)?;
    lookup(&SchemaRead::new(catalog), descriptor)
}

/// Token ids for `target` without registering anything.
///
/// An unregistered name stands in as the next id its namespace would hand
/// out. No rule references that id and no name resolves for it, so the
/// lookup reports not-found and the message marks the name unresolved.
fn lookup_descriptor<S: TokenStore>(store: &S, target: &Target) -> Result<SchemaDescriptor, StorageError> {
    let kind = entity_kind(target);
    let entity = existing_or_next_id(store, kind, &target.label)?;
    let property = existing_or_next_id(store, TokenKind::PropertyKey, &target.property)?;
    Ok(descriptor_from_ids(kind, entity, property))
}

fn existing_or_next_id<S: TokenStore>(store: &S, kind: TokenKind, name: &str) -> Result<u32, StorageError> {
    match store.token_id(kind, name)? {
        Some(id) => Ok(id),
        None => {
            tracing::info!(kind = %kind, token = name, "name is not registered");
            store.next_token_id(kind)
        }
    }
}

/// Print `err` and pick the exit code. Resolution failures are rendered
/// through `names`.
fn report(err: &CliError, names: &dyn TokenNameLookup) -> i32 {
    match err {
        CliError::Read(SchemaReadError::Access(access)) => {
            let rendered = access.render(names);
            for failure in &rendered.unresolved {
                tracing::warn!(error = %failure, "token name could not be resolved");
            }
            eprintln!("{}", rendered);
        }
        other => eprintln!("Error: {}", other),
    }
    err.exit_code()
}
