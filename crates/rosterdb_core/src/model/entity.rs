//! Identity contract for persisted records.

use std::fmt::Debug;

/// Capability set required of every type persisted through the engine.
///
/// Identity is a store-assigned 64-bit row id: `None` while the value is
/// transient, assigned exactly once inside `save`, and never changed by the
/// engine afterwards.
///
/// The `Debug` bound exists so save failures can carry a snapshot of the
/// offending record.
pub trait Entity: Debug {
    /// Returns the assigned identity, or `None` while transient.
    fn id(&self) -> Option<i64>;

    /// Records the store-assigned identity.
    ///
    /// Called by the engine after a successful insert. Callers outside the
    /// engine have no reason to invoke this.
    fn set_id(&mut self, id: i64);
}
