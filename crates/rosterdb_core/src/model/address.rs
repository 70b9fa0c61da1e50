//! Postal address domain record.

use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};

/// Coarse geographic region used for reporting rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    South,
    East,
    West,
}

/// Postal address persisted as a dependent record of a person.
///
/// Addresses are saved through [`crate::AddressRepository`], usually
/// indirectly: saving a person with a home address persists the address
/// first and links its fresh identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Store-assigned identity; `None` until first save.
    pub id: Option<i64>,
    pub street_address: String,
    /// Second address line (apartment, suite), if any.
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub county: Option<String>,
    pub region: Region,
    pub country: String,
}

impl Address {
    /// Creates a transient address with the required fields set.
    pub fn new(
        street_address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postcode: impl Into<String>,
        region: Region,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            street_address: street_address.into(),
            address2: None,
            city: city.into(),
            state: state.into(),
            postcode: postcode.into(),
            county: None,
            region,
            country: country.into(),
        }
    }
}

impl Entity for Address {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
