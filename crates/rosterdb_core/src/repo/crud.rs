//! Generic CRUD repository engine.
//!
//! # Responsibility
//! - Provide the save/find/count/delete/update lifecycle shared by every
//!   persisted type, atop per-operation SQL resolution and entity-specific
//!   binding callbacks.
//! - Extract entity identity uniformly through the [`Entity`] contract.
//!
//! # Invariants
//! - `save` assigns the store-generated identity onto the entity exactly
//!   once; the engine never changes an assigned identity afterwards.
//! - Zero affected rows on delete/update is tolerated, never an error.
//! - All operations are blocking calls on the externally-owned connection;
//!   the engine never commits, rolls back, or closes it.

use crate::db::DbError;
use crate::model::entity::Entity;
use crate::repo::templates::{CrudOperation, SqlTemplates};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Textual marker replaced by the comma-joined id list in delete-many
/// templates, e.g. `DELETE FROM people WHERE id IN (:ids)`.
pub const IDS_MARKER: &str = ":ids";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure taxonomy.
///
/// Not-found is deliberately absent: `find_by_id` reports a missing row as
/// `Ok(None)`.
#[derive(Debug)]
pub enum RepoError {
    /// Insert or save-binding failure; carries a snapshot of the entity.
    Save {
        snapshot: String,
        source: Box<dyn Error + Send + Sync>,
    },
    /// Store-execution failure on any other operation.
    Db(DbError),
    /// Persisted row failed row-mapping validation.
    InvalidData(String),
    /// Programmer error: duplicate template registration, missing template
    /// without fallback, malformed delete-many template, or an unassigned
    /// identity where one is required.
    Misconfiguration(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Save { snapshot, .. } => write!(f, "failed to save entity: {snapshot}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Misconfiguration(message) => write!(f, "repository misconfigured: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Save { source, .. } => Some(source.as_ref()),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Misconfiguration(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Extracts the assigned identity of any entity type.
///
/// # Errors
/// - `RepoError::Misconfiguration` when the entity is still transient.
pub fn identity_of<T: Entity>(entity: &T) -> RepoResult<i64> {
    entity.id().ok_or_else(|| {
        RepoError::Misconfiguration(format!("entity has no assigned identity: {entity:?}"))
    })
}

/// Generic CRUD lifecycle over one entity type.
///
/// Concrete repositories supply the connection, the template table, and the
/// three entity-specific callbacks; every operation body is provided here.
/// Template resolution prefers the registered template and lazily falls back
/// to [`CrudRepository::fallback_sql`] on a miss.
pub trait CrudRepository {
    type Entity: Entity;

    /// The externally-owned connection this repository is bound to.
    fn connection(&self) -> &Connection;

    /// Per-operation SQL registration table, built at construction.
    fn templates(&self) -> &SqlTemplates;

    /// Converts one result row into a fully formed entity.
    fn map_row(&self, row: &Row<'_>) -> RepoResult<Self::Entity>;

    /// Produces the positional insert parameters, in declared column order.
    ///
    /// Takes the entity mutably so dependent records can be saved first and
    /// their fresh identities recorded before binding.
    fn save_binding(&self, entity: &mut Self::Entity) -> RepoResult<Vec<Value>>;

    /// Produces the positional update parameters for all non-identity
    /// columns. The final parameter slot must be left open; the engine binds
    /// the identity there.
    fn update_binding(&self, entity: &Self::Entity) -> RepoResult<Vec<Value>>;

    /// Lazily produces SQL for operation kinds without a registered
    /// template. Only invoked on a resolution miss.
    fn fallback_sql(&self, op: CrudOperation) -> RepoResult<String> {
        Err(RepoError::Misconfiguration(format!(
            "no SQL template registered for operation `{op}` and no fallback provided"
        )))
    }

    /// Resolves the SQL text for one operation kind.
    fn resolve_sql(&self, op: CrudOperation) -> RepoResult<Cow<'_, str>> {
        self.templates().resolve(op, || self.fallback_sql(op))
    }

    /// Inserts the entity, assigns the store-generated identity onto it in
    /// place, and returns that identity.
    ///
    /// # Errors
    /// - `RepoError::Save` on any binding or execution failure, carrying a
    ///   snapshot of the entity.
    fn save(&self, entity: &mut Self::Entity) -> RepoResult<i64> {
        let sql = self.resolve_sql(CrudOperation::Save)?;
        let values = match self.save_binding(entity) {
            Ok(values) => values,
            Err(err) => {
                return Err(RepoError::Save {
                    snapshot: format!("{entity:?}"),
                    source: Box::new(err),
                })
            }
        };

        if let Err(err) = self.connection().execute(&sql, params_from_iter(values)) {
            return Err(RepoError::Save {
                snapshot: format!("{entity:?}"),
                source: Box::new(err),
            });
        }

        let id = self.connection().last_insert_rowid();
        entity.set_id(id);
        Ok(id)
    }

    /// Fetches one entity by identity.
    ///
    /// Returns `Ok(None)` when no row matches, including negative or
    /// never-assigned ids; absence is not an error.
    fn find_by_id(&self, id: i64) -> RepoResult<Option<Self::Entity>> {
        let sql = self.resolve_sql(CrudOperation::FindById)?;
        let mut stmt = self.connection().prepare(&sql)?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.map_row(row)?));
        }
        Ok(None)
    }

    /// Fetches every entity in store-defined order.
    fn find_all(&self) -> RepoResult<Vec<Self::Entity>> {
        let sql = self.resolve_sql(CrudOperation::FindAll)?;
        let mut stmt = self.connection().prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(self.map_row(row)?);
        }
        Ok(entities)
    }

    /// Counts all rows; zero on an empty result.
    fn count(&self) -> RepoResult<i64> {
        let sql = self.resolve_sql(CrudOperation::Count)?;
        let count = self
            .connection()
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    /// Deletes one persisted entity's row. A row already gone is not an
    /// error; the in-memory value keeps its stale identity.
    fn delete(&self, entity: &Self::Entity) -> RepoResult<()> {
        let sql = self.resolve_sql(CrudOperation::DeleteOne)?;
        let id = identity_of(entity)?;
        self.connection().execute(&sql, params![id])?;
        Ok(())
    }

    /// Deletes many persisted entities in a single statement.
    ///
    /// The resolved template must contain the [`IDS_MARKER`] marker, which
    /// is replaced textually by the comma-joined identity list: the driver
    /// cannot bind a variable-length id list. Identities are extracted
    /// through [`identity_of`], never caller-supplied text.
    ///
    /// # Errors
    /// - `RepoError::Misconfiguration` when the marker is missing or any
    ///   entity is still transient.
    fn delete_all(&self, entities: &[Self::Entity]) -> RepoResult<()> {
        // An empty id list would render `IN ()`, which SQLite rejects.
        if entities.is_empty() {
            return Ok(());
        }

        let sql = self.resolve_sql(CrudOperation::DeleteMany)?;
        if !sql.contains(IDS_MARKER) {
            return Err(RepoError::Misconfiguration(format!(
                "delete-many template is missing the `{IDS_MARKER}` marker: {sql}"
            )));
        }

        let ids = entities
            .iter()
            .map(|entity| identity_of(entity).map(|id| id.to_string()))
            .collect::<RepoResult<Vec<_>>>()?
            .join(",");

        self.connection().execute(&sql.replace(IDS_MARKER, &ids), [])?;
        Ok(())
    }

    /// Updates the persisted row's non-identity columns. The identity is
    /// bound by the engine into the final parameter slot left open by
    /// [`CrudRepository::update_binding`].
    fn update(&self, entity: &Self::Entity) -> RepoResult<()> {
        let sql = self.resolve_sql(CrudOperation::Update)?;
        let id = identity_of(entity)?;
        let mut values = self.update_binding(entity)?;
        values.push(Value::Integer(id));
        self.connection().execute(&sql, params_from_iter(values))?;
        Ok(())
    }
}
