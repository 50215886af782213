use super::{PlayerHandle, UnitHandle};
use crate::unit_id::UnitId;

/// Read access to the units and players known at some point in the stream.
///
/// Implemented by whatever owns the replay state. Event resolution only ever
/// borrows it.
pub trait Registry {
    fn lookup_unit(&self, id: UnitId) -> Option<UnitHandle>;

    fn lookup_player(&self, pid: u32) -> Option<PlayerHandle>;

    /// Unit currently occupying slot `index`, if the registry tracks slots.
    fn lookup_active_unit(&self, _index: u32) -> Option<UnitHandle> {
        None
    }
}

/// A registry that knows nothing. Resolving against it is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

impl Registry for EmptyRegistry {
    fn lookup_unit(&self, _id: UnitId) -> Option<UnitHandle> {
        None
    }

    fn lookup_player(&self, _pid: u32) -> Option<PlayerHandle> {
        None
    }
}
