//! Composite unit identifiers.
//!
//! The engine addresses units by a slot index plus a recycle counter that is
//! bumped every time the slot is reused. Both are packed into one integer:
//! `index << 18 | recycle`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of the recycle counter in bits.
pub const RECYCLE_BITS: u32 = 18;

/// Mask selecting the recycle counter from a packed id.
pub const RECYCLE_MASK: u32 = (1 << RECYCLE_BITS) - 1;

/// Pack an index and recycle counter into a unit id.
///
/// Recycle values wider than 18 bits are masked, index bits shifted past the
/// top of the word are dropped.
#[inline]
pub const fn encode(index: u32, recycle: u32) -> u32 {
    (index << RECYCLE_BITS) | (recycle & RECYCLE_MASK)
}

/// Split a packed unit id into `(index, recycle)`.
#[inline]
pub const fn decode(id: u32) -> (u32, u32) {
    (id >> RECYCLE_BITS, id & RECYCLE_MASK)
}

/// A unit identity that stays unique across slot reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(u32);

impl UnitId {
    pub const fn new(index: u32, recycle: u32) -> Self {
        Self(encode(index, recycle))
    }

    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Slot index. Shared by every unit that ever occupied the slot.
    pub const fn index(self) -> u32 {
        decode(self.0).0
    }

    pub const fn recycle(self) -> u32 {
        decode(self.0).1
    }

    pub const fn parts(self) -> (u32, u32) {
        decode(self.0)
    }
}

impl From<UnitId> for u32 {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}
