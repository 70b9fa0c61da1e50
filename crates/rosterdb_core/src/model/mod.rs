//! Domain model for roster records.
//!
//! # Responsibility
//! - Define the data structures persisted through the repository layer.
//! - Expose the identity contract every persisted type must satisfy.
//!
//! # Invariants
//! - Identity is store-assigned, strictly positive, and set exactly once.
//! - Records carry `id: None` until their first successful save.

pub mod address;
pub mod entity;
pub mod person;
