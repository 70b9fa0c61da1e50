//! Person domain record.
//!
//! # Responsibility
//! - Define the canonical person shape persisted by the people table.
//!
//! # Invariants
//! - `dob_epoch_ms` is UTC epoch milliseconds.
//! - `salary_cents` stores money as integer cents; no floating point.

use crate::model::address::Address;
use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};

/// Person record with an optional linked home address.
///
/// The address is a dependent record: it is persisted before the owning
/// person so the person row can reference its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Store-assigned identity; `None` until first save.
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    /// Date of birth as UTC epoch milliseconds.
    pub dob_epoch_ms: i64,
    /// Annual salary in integer cents.
    pub salary_cents: i64,
    pub email: Option<String>,
    /// Linked home address, persisted before the person on save.
    pub home_address: Option<Address>,
}

impl Person {
    /// Creates a transient person with zero salary and no email/address.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        dob_epoch_ms: i64,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            dob_epoch_ms,
            salary_cents: 0,
            email: None,
            home_address: None,
        }
    }
}

impl Entity for Person {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
