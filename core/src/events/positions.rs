//! Periodic unit position updates.
//!
//! Every 15 seconds the game records the positions of up to 255 units that
//! took damage in the last interval. Positions arrive as a flat list of
//! `[index_delta, x, y]` triples relative to a starting unit index.

use std::fmt;

use super::reference::{Reference, UnitSlotRef, UnresolvedRef};
use super::{EventKind, Location};
use crate::error::{Result, TrackerError};
use crate::record::{Fields, scale_location};
use crate::state::{Registry, UnitHandle};
use crate::version::VersionPolicy;

/// Expand delta-encoded triples into `(unit_index, location)` pairs.
///
/// Output keeps input order and has exactly `items.len() / 3` entries.
pub fn decode_positions(
    first_unit_index: u32,
    items: &[i64],
    policy: &VersionPolicy,
) -> Result<Vec<(u32, Location)>> {
    let kind = EventKind::UnitPositions;
    if items.len() % 3 != 0 {
        return Err(TrackerError::malformed(
            kind,
            format!("position items length {} is not a multiple of 3", items.len()),
        ));
    }

    let to_u32 = |v: i64, what: &str| {
        u32::try_from(v)
            .map_err(|_| TrackerError::malformed(kind, format!("{} out of range: {}", what, v)))
    };

    let mut unit_index = first_unit_index;
    items
        .chunks_exact(3)
        .map(|triple| -> Result<(u32, Location)> {
            unit_index = unit_index
                .checked_add(to_u32(triple[0], "index delta")?)
                .ok_or_else(|| TrackerError::malformed(kind, "unit index overflow"))?;
            let x = to_u32(triple[1], "x")?;
            let y = to_u32(triple[2], "y")?;
            Ok((unit_index, scale_location(kind, x, y, policy)?))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitPositionsEvent {
    pub first_unit_index: u32,
    /// Raw delta-encoded triples.
    pub items: Vec<i64>,
    pub positions: Vec<(u32, Location)>,
    /// Unit occupying each position's slot, parallel to `positions`.
    pub units: Vec<UnitSlotRef>,
}

impl UnitPositionsEvent {
    pub(crate) fn decode(fields: &Fields<'_>, policy: &VersionPolicy) -> Result<Self> {
        fields.expect_len(2)?;
        let first_unit_index = fields.u32(0, "first_unit_index")?;
        let items = fields.ints(1, "items")?;
        let positions = decode_positions(first_unit_index, &items, policy)?;
        let units = positions
            .iter()
            .map(|&(index, _)| Reference::unresolved(index))
            .collect();
        Ok(Self {
            first_unit_index,
            items,
            positions,
            units,
        })
    }

    /// Resolved units paired with their reported location.
    pub fn unit_locations(&self) -> impl Iterator<Item = (&UnitHandle, Location)> + '_ {
        self.units
            .iter()
            .zip(&self.positions)
            .filter_map(|(unit, &(_, location))| unit.handle().map(|u| (u, location)))
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        self.units.iter_mut().fold(true, |all, unit| {
            unit.resolve_with(|index| registry.lookup_active_unit(index)) && all
        })
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.units.iter().filter_map(UnitSlotRef::pending));
    }
}

impl fmt::Display for UnitPositionsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit positions update ({} units)", self.positions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use crate::version::{COORDINATE_PATCH_BUILD, policy};

    const ITEMS: [i64; 6] = [5, 10, 20, 3, 15, 25];

    #[test]
    fn deltas_accumulate_from_first_index() {
        let out = decode_positions(100, &ITEMS, &policy(COORDINATE_PATCH_BUILD)).unwrap();
        assert_eq!(
            out,
            vec![
                (105, Location { x: 10, y: 20 }),
                (108, Location { x: 15, y: 25 }),
            ]
        );
    }

    #[test]
    fn legacy_builds_scale_positions() {
        let out = decode_positions(100, &ITEMS, &policy(COORDINATE_PATCH_BUILD - 1)).unwrap();
        assert_eq!(
            out,
            vec![
                (105, Location { x: 40, y: 80 }),
                (108, Location { x: 60, y: 100 }),
            ]
        );
    }

    #[test]
    fn order_is_preserved_not_sorted() {
        // Zero deltas repeat the same index, later entries keep input order
        let items = [0, 9, 9, 0, 1, 1, 4, 5, 5];
        let out = decode_positions(7, &items, &policy(COORDINATE_PATCH_BUILD)).unwrap();
        let indices: Vec<u32> = out.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![7, 7, 11]);
        assert_eq!(out[0].1, Location { x: 9, y: 9 });
        assert_eq!(out[1].1, Location { x: 1, y: 1 });
    }

    #[test]
    fn empty_items_yield_no_positions() {
        let out = decode_positions(3, &[], &policy(1)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn stride_mismatch_is_malformed() {
        let err = decode_positions(0, &[1, 2, 3, 4], &policy(1)).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::MalformedRecord {
                kind: EventKind::UnitPositions,
                ..
            }
        ));
    }

    #[test]
    fn negative_delta_is_malformed() {
        assert!(decode_positions(10, &[-1, 0, 0], &policy(1)).is_err());
    }

    #[test]
    fn event_starts_with_unresolved_slots() {
        let data = vec![Value::Int(100), Value::from(ITEMS.to_vec())];
        let ev = UnitPositionsEvent::decode(
            &Fields::new(EventKind::UnitPositions, &data),
            &policy(COORDINATE_PATCH_BUILD),
        )
        .unwrap();
        assert_eq!(ev.units.len(), 2);
        assert_eq!(ev.units[1].id(), 108);
        assert_eq!(ev.unit_locations().count(), 0);
        assert_eq!(ev.to_string(), "Unit positions update (2 units)");
    }
}
