//! Build-number gates for the tracker record layout.
//!
//! Two game patches changed the record shapes. Every decoder takes a
//! [`VersionPolicy`] instead of comparing build numbers itself.

/// First build with friendly-fire loss slots in the player stats vector.
pub const FRIENDLY_FIRE_BUILD: u32 = 26490;

/// First build with full-resolution coordinates and killer unit fields
/// (patch 2.1).
pub const COORDINATE_PATCH_BUILD: u32 = 27950;

/// Coordinate multiplier for builds recorded on the coarse 4-point grid.
const LEGACY_COORD_SCALE: u32 = 4;

/// Field layout rules for one build number.
///
/// Unknown or missing builds (including 0) fall on the older side of each
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPolicy {
    pub build: u32,
    /// Multiplier applied to raw coordinates.
    pub coord_scale: u32,
    /// Stats records carry the six `ff_*` slots.
    pub has_friendly_fire: bool,
    /// Unit died records carry the killer unit index/recycle pair.
    pub has_killer_unit_fields: bool,
}

impl VersionPolicy {
    pub const fn for_build(build: u32) -> Self {
        let patched = build >= COORDINATE_PATCH_BUILD;
        Self {
            build,
            coord_scale: if patched { 1 } else { LEGACY_COORD_SCALE },
            has_friendly_fire: build >= FRIENDLY_FIRE_BUILD,
            has_killer_unit_fields: patched,
        }
    }

    /// Scale a raw coordinate onto the post-patch grid. `None` on overflow.
    #[inline]
    pub const fn scale(&self, raw: u32) -> Option<u32> {
        raw.checked_mul(self.coord_scale)
    }
}

/// Shorthand for [`VersionPolicy::for_build`].
pub const fn policy(build: u32) -> VersionPolicy {
    VersionPolicy::for_build(build)
}
