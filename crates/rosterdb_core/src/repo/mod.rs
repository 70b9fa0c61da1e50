//! Repository layer: generic CRUD engine and concrete implementations.
//!
//! # Responsibility
//! - Define the generic CRUD lifecycle shared by every persisted type.
//! - Resolve per-operation SQL through an explicit registration table with a
//!   lazy fallback path.
//! - Isolate SQLite query details from domain code.
//!
//! # Invariants
//! - Each repository instance is bound to one connection for its lifetime.
//! - At most one SQL template exists per (repository, operation kind);
//!   duplicates are rejected at registration time.
//! - Transaction boundaries belong to the connection owner, never to the
//!   repository layer.

pub mod address_repo;
pub mod crud;
pub mod person_repo;
pub mod templates;
