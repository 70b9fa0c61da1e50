//! Generic entity-repository engine over SQLite.
//!
//! Persistence operations are parameterized over an entity type via the
//! [`CrudRepository`] trait: concrete repositories register SQL templates
//! per operation kind (with a lazy fallback for unregistered kinds) and
//! supply the row-mapping and parameter-binding callbacks; every operation
//! body lives in the engine.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging};
pub use model::address::{Address, Region};
pub use model::entity::Entity;
pub use model::person::Person;
pub use repo::address_repo::AddressRepository;
pub use repo::crud::{identity_of, CrudRepository, RepoError, RepoResult, IDS_MARKER};
pub use repo::person_repo::PersonRepository;
pub use repo::templates::{CrudOperation, SqlTemplates};
