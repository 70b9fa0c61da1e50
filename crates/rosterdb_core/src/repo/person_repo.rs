//! Person repository: CRUD over the people table with linked addresses.
//!
//! # Responsibility
//! - Register the SQL templates for every operation kind on people.
//! - Persist a present home address before the owning person row so the
//!   foreign key binds the fresh address identity.
//! - Rehydrate people together with their joined home address.

use crate::model::entity::Entity;
use crate::model::person::Person;
use crate::repo::address_repo::{address_from_row, AddressRepository};
use crate::repo::crud::{CrudRepository, RepoResult};
use crate::repo::templates::{CrudOperation, SqlTemplates};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    p.id AS person_id,
    p.first_name,
    p.last_name,
    p.dob,
    p.salary_cents,
    p.email,
    a.id AS address_id,
    a.street_address,
    a.address2,
    a.city,
    a.state,
    a.postcode,
    a.county,
    a.region,
    a.country
FROM people AS p
LEFT OUTER JOIN addresses AS a ON p.home_address = a.id";

const SAVE_PERSON_SQL: &str = "INSERT INTO people
    (first_name, last_name, dob, salary_cents, email, home_address)
    VALUES (?, ?, ?, ?, ?, ?)";

const UPDATE_PERSON_SQL: &str =
    "UPDATE people SET first_name = ?, last_name = ?, dob = ?, salary_cents = ? WHERE id = ?";

const COUNT_PEOPLE_SQL: &str = "SELECT COUNT(*) FROM people";

const DELETE_PERSON_SQL: &str = "DELETE FROM people WHERE id = ?";

const DELETE_PEOPLE_IN_SQL: &str = "DELETE FROM people WHERE id IN (:ids)";

/// SQLite-backed person repository; composes the address sub-repository on
/// the same connection.
pub struct PersonRepository<'conn> {
    conn: &'conn Connection,
    templates: SqlTemplates,
    addresses: AddressRepository<'conn>,
}

impl<'conn> PersonRepository<'conn> {
    /// Builds the repository and registers templates for all seven
    /// operation kinds.
    ///
    /// # Errors
    /// - `RepoError::Misconfiguration` on duplicate template registration.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let mut templates = SqlTemplates::new();
        templates.register(CrudOperation::Save, SAVE_PERSON_SQL)?;
        templates.register(CrudOperation::Update, UPDATE_PERSON_SQL)?;
        templates.register(
            CrudOperation::FindById,
            format!("{PERSON_SELECT_SQL} WHERE p.id = ?"),
        )?;
        templates.register(CrudOperation::FindAll, PERSON_SELECT_SQL)?;
        // The remaining kinds share the row-mapper-independent templates.
        templates.register_all(&[
            (CrudOperation::Count, COUNT_PEOPLE_SQL),
            (CrudOperation::DeleteOne, DELETE_PERSON_SQL),
            (CrudOperation::DeleteMany, DELETE_PEOPLE_IN_SQL),
        ])?;

        Ok(Self {
            conn,
            templates,
            addresses: AddressRepository::try_new(conn)?,
        })
    }
}

impl CrudRepository for PersonRepository<'_> {
    type Entity = Person;

    fn connection(&self) -> &Connection {
        self.conn
    }

    fn templates(&self) -> &SqlTemplates {
        &self.templates
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Person> {
        let home_address = match row.get::<_, Option<i64>>("address_id")? {
            Some(address_id) => Some(address_from_row(row, address_id)?),
            None => None,
        };

        Ok(Person {
            id: Some(row.get("person_id")?),
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            dob_epoch_ms: row.get("dob")?,
            salary_cents: row.get("salary_cents")?,
            email: row.get("email")?,
            home_address,
        })
    }

    fn save_binding(&self, person: &mut Person) -> RepoResult<Vec<Value>> {
        // Dependency before owner: the person row references the address id,
        // so a still-transient home address is persisted first. An address
        // that already carries an identity is linked as-is.
        let home_address_id = match person.home_address.as_mut() {
            Some(address) => match address.id() {
                Some(id) => Some(id),
                None => Some(self.addresses.save(address)?),
            },
            None => None,
        };

        Ok(vec![
            Value::from(person.first_name.clone()),
            Value::from(person.last_name.clone()),
            Value::Integer(person.dob_epoch_ms),
            Value::Integer(person.salary_cents),
            Value::from(person.email.clone()),
            Value::from(home_address_id),
        ])
    }

    fn update_binding(&self, person: &Person) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::from(person.first_name.clone()),
            Value::from(person.last_name.clone()),
            Value::Integer(person.dob_epoch_ms),
            Value::Integer(person.salary_cents),
        ])
    }
}
