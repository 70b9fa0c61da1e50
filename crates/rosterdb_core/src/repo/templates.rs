//! Per-operation SQL template registry.
//!
//! # Responsibility
//! - Map each CRUD operation kind to at most one registered SQL template.
//! - Resolve templates lazily: a registered template wins, otherwise a
//!   caller-supplied fallback producer is invoked exactly once.
//!
//! # Invariants
//! - Registering a second template for the same operation kind is an error;
//!   uniqueness is enforced here rather than at resolution time.
//! - The fallback producer is never invoked when a template is registered.

use crate::repo::crud::{RepoError, RepoResult};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// The seven CRUD actions the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    Save,
    Update,
    FindById,
    FindAll,
    Count,
    DeleteOne,
    DeleteMany,
}

impl CrudOperation {
    /// Every operation kind, in declaration order.
    pub const ALL: [CrudOperation; 7] = [
        Self::Save,
        Self::Update,
        Self::FindById,
        Self::FindAll,
        Self::Count,
        Self::DeleteOne,
        Self::DeleteMany,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

impl Display for CrudOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Save => "save",
            Self::Update => "update",
            Self::FindById => "find_by_id",
            Self::FindAll => "find_all",
            Self::Count => "count",
            Self::DeleteOne => "delete_one",
            Self::DeleteMany => "delete_many",
        };
        f.write_str(name)
    }
}

/// Registration table mapping operation kinds to SQL templates.
///
/// Built once at repository construction. Templates use positional `?`
/// placeholders bound in declared order, except the delete-many template
/// which carries the textual `:ids` marker.
#[derive(Debug, Clone, Default)]
pub struct SqlTemplates {
    slots: [Option<Cow<'static, str>>; 7],
}

impl SqlTemplates {
    /// Creates an empty table; every resolution falls back until templates
    /// are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the template for one operation kind.
    ///
    /// # Errors
    /// - `RepoError::Misconfiguration` when the kind already has a template.
    pub fn register(
        &mut self,
        op: CrudOperation,
        sql: impl Into<Cow<'static, str>>,
    ) -> RepoResult<()> {
        let slot = &mut self.slots[op.index()];
        if slot.is_some() {
            return Err(RepoError::Misconfiguration(format!(
                "duplicate SQL template registered for operation `{op}`"
            )));
        }
        *slot = Some(sql.into());
        Ok(())
    }

    /// Registers a group of (operation kind, template) pairs at once.
    ///
    /// Used when one logical member serves several operation kinds, e.g. a
    /// shared row mapper backing find/count/delete templates.
    pub fn register_all(&mut self, tags: &[(CrudOperation, &'static str)]) -> RepoResult<()> {
        for (op, sql) in tags {
            self.register(*op, *sql)?;
        }
        Ok(())
    }

    /// Returns the registered template for the kind, if any.
    pub fn get(&self, op: CrudOperation) -> Option<&str> {
        self.slots[op.index()].as_deref()
    }

    /// Resolves the template for an operation kind.
    ///
    /// Returns the registered template when one exists; otherwise invokes
    /// `fallback` exactly once and returns its value. `fallback` is not
    /// invoked on a hit.
    pub fn resolve<'a, F>(&'a self, op: CrudOperation, fallback: F) -> RepoResult<Cow<'a, str>>
    where
        F: FnOnce() -> RepoResult<String>,
    {
        match self.get(op) {
            Some(sql) => Ok(Cow::Borrowed(sql)),
            None => Ok(Cow::Owned(fallback()?)),
        }
    }
}
