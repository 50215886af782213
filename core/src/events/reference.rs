//! Late-bound references from events to units and players.
//!
//! Decoders only know raw ids. The processor later looks the ids up in a
//! [`Registry`](crate::state::Registry) and swaps in the handle. A reference
//! whose target never shows up stays unresolved for good, which is a normal
//! outcome and not an error.

use std::fmt;

use crate::state::{PlayerHandle, UnitHandle};
use crate::unit_id::UnitId;

/// A raw id, optionally paired with the handle it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<K, H> {
    Unresolved(K),
    Resolved { id: K, handle: H },
}

impl<K: Copy, H> Reference<K, H> {
    pub fn unresolved(id: K) -> Self {
        Self::Unresolved(id)
    }

    /// The raw id, available in both states.
    pub fn id(&self) -> K {
        match self {
            Self::Unresolved(id) | Self::Resolved { id, .. } => *id,
        }
    }

    pub fn handle(&self) -> Option<&H> {
        match self {
            Self::Unresolved(_) => None,
            Self::Resolved { handle, .. } => Some(handle),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Look the id up if not yet resolved. A resolved reference is never
    /// replaced or cleared. Returns whether the reference is now resolved.
    pub fn resolve_with(&mut self, lookup: impl FnOnce(K) -> Option<H>) -> bool {
        if let Self::Unresolved(id) = *self
            && let Some(handle) = lookup(id)
        {
            *self = Self::Resolved { id, handle };
        }
        self.is_resolved()
    }
}

pub type UnitRef = Reference<UnitId, UnitHandle>;
pub type PlayerRef = Reference<u32, PlayerHandle>;
/// Unit addressed by slot index only (position updates).
pub type UnitSlotRef = Reference<u32, UnitHandle>;

/// A reference still waiting for its target, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnresolvedRef {
    Unit(UnitId),
    UnitIndex(u32),
    Player(u32),
}

impl fmt::Display for UnresolvedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(id) => write!(f, "unit {}", id),
            Self::UnitIndex(index) => write!(f, "unit slot {}", index),
            Self::Player(pid) => write!(f, "player {}", pid),
        }
    }
}

impl UnitRef {
    pub(crate) fn pending(&self) -> Option<UnresolvedRef> {
        (!self.is_resolved()).then(|| UnresolvedRef::Unit(self.id()))
    }
}

impl PlayerRef {
    pub(crate) fn pending(&self) -> Option<UnresolvedRef> {
        (!self.is_resolved()).then(|| UnresolvedRef::Player(self.id()))
    }
}

impl UnitSlotRef {
    pub(crate) fn pending(&self) -> Option<UnresolvedRef> {
        (!self.is_resolved()).then(|| UnresolvedRef::UnitIndex(self.id()))
    }
}

// Rendering uses `pad` so callers can apply width/alignment.

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { handle, .. } => f.pad(&handle.to_string()),
            Self::Unresolved(id) => f.pad(&format!("Unit [{}]", id)),
        }
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { handle, .. } => f.pad(&handle.to_string()),
            Self::Unresolved(pid) => f.pad(&format!("Player {}", pid)),
        }
    }
}
