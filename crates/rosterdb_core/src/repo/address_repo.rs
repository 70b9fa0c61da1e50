//! Address repository: dependent-record persistence for people.
//!
//! # Responsibility
//! - Persist and rehydrate address rows on behalf of the person repository.
//! - Reject invalid persisted region values instead of masking them.
//!
//! # Invariants
//! - Shares the owning repository's connection; never opens its own.
//! - Only save/update templates are registered; lookup kinds are served by
//!   the lazy SQL fallback.

use crate::model::address::{Address, Region};
use crate::repo::crud::{CrudRepository, RepoError, RepoResult};
use crate::repo::templates::{CrudOperation, SqlTemplates};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    street_address,
    address2,
    city,
    state,
    postcode,
    county,
    region,
    country
FROM addresses";

const SAVE_ADDRESS_SQL: &str = "INSERT INTO addresses
    (street_address, address2, city, state, postcode, county, region, country)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE_ADDRESS_SQL: &str = "UPDATE addresses SET
    street_address = ?, address2 = ?, city = ?, state = ?,
    postcode = ?, county = ?, region = ?, country = ?
    WHERE id = ?";

/// SQLite-backed address repository.
pub struct AddressRepository<'conn> {
    conn: &'conn Connection,
    templates: SqlTemplates,
}

impl<'conn> AddressRepository<'conn> {
    /// Builds the repository and registers its SQL templates.
    ///
    /// # Errors
    /// - `RepoError::Misconfiguration` on duplicate template registration.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let mut templates = SqlTemplates::new();
        templates.register(CrudOperation::Save, SAVE_ADDRESS_SQL)?;
        templates.register(CrudOperation::Update, UPDATE_ADDRESS_SQL)?;
        Ok(Self { conn, templates })
    }
}

impl CrudRepository for AddressRepository<'_> {
    type Entity = Address;

    fn connection(&self) -> &Connection {
        self.conn
    }

    fn templates(&self) -> &SqlTemplates {
        &self.templates
    }

    fn fallback_sql(&self, op: CrudOperation) -> RepoResult<String> {
        match op {
            CrudOperation::FindById => Ok(format!("{ADDRESS_SELECT_SQL} WHERE id = ?")),
            CrudOperation::FindAll => Ok(ADDRESS_SELECT_SQL.to_string()),
            CrudOperation::Count => Ok("SELECT COUNT(*) FROM addresses".to_string()),
            CrudOperation::DeleteOne => Ok("DELETE FROM addresses WHERE id = ?".to_string()),
            other => Err(RepoError::Misconfiguration(format!(
                "no SQL template or fallback for operation `{other}` on addresses"
            ))),
        }
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Address> {
        let id: i64 = row.get("id")?;
        address_from_row(row, id)
    }

    fn save_binding(&self, address: &mut Address) -> RepoResult<Vec<Value>> {
        Ok(address_column_values(address))
    }

    fn update_binding(&self, address: &Address) -> RepoResult<Vec<Value>> {
        Ok(address_column_values(address))
    }
}

/// Rehydrates an address from the shared column set.
///
/// The id column is caller-supplied because joined person queries alias it
/// to avoid colliding with the person id.
pub(crate) fn address_from_row(row: &Row<'_>, id: i64) -> RepoResult<Address> {
    let region_text: String = row.get("region")?;
    let region = parse_region(&region_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid region value `{region_text}` in addresses.region"
        ))
    })?;

    Ok(Address {
        id: Some(id),
        street_address: row.get("street_address")?,
        address2: row.get("address2")?,
        city: row.get("city")?,
        state: row.get("state")?,
        postcode: row.get("postcode")?,
        county: row.get("county")?,
        region,
        country: row.get("country")?,
    })
}

fn address_column_values(address: &Address) -> Vec<Value> {
    vec![
        Value::from(address.street_address.clone()),
        Value::from(address.address2.clone()),
        Value::from(address.city.clone()),
        Value::from(address.state.clone()),
        Value::from(address.postcode.clone()),
        Value::from(address.county.clone()),
        Value::from(region_to_db(address.region).to_string()),
        Value::from(address.country.clone()),
    ]
}

fn region_to_db(region: Region) -> &'static str {
    match region {
        Region::North => "north",
        Region::South => "south",
        Region::East => "east",
        Region::West => "west",
    }
}

fn parse_region(value: &str) -> Option<Region> {
    match value {
        "north" => Some(Region::North),
        "south" => Some(Region::South),
        "east" => Some(Region::East),
        "west" => Some(Region::West),
        _ => None,
    }
}
