//! Unit lifecycle records: born, init, done, died, owner and type changes.

use std::fmt;

use super::reference::{PlayerRef, Reference, UnitRef, UnresolvedRef};
use super::{EventKind, Location};
use crate::context::{IStr, intern, resolve};
use crate::error::Result;
use crate::record::Fields;
use crate::state::unit_class::{is_countable_death, is_counted_type};
use crate::state::{PlayerHandle, Registry};
use crate::unit_id::UnitId;
use crate::version::VersionPolicy;

fn unit_id(fields: &Fields<'_>, index_slot: usize) -> Result<UnitId> {
    let index = fields.u32(index_slot, "unit_id_index")?;
    let recycle = fields.u32(index_slot + 1, "unit_id_recycle")?;
    Ok(UnitId::new(index, recycle))
}

fn resolve_unit<R: Registry + ?Sized>(unit: &mut UnitRef, registry: &R) -> bool {
    unit.resolve_with(|id| registry.lookup_unit(id))
}

fn resolve_player<R: Registry + ?Sized>(player: &mut PlayerRef, registry: &R) -> bool {
    player.resolve_with(|pid| registry.lookup_player(pid))
}

/// Owner label for events that only know their player through the unit.
fn owner_label(unit: &UnitRef) -> String {
    unit.handle()
        .and_then(|u| u.owner.as_ref())
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// A unit created in a finished state (trained units, larva, map units).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitBornEvent {
    pub unit_id: UnitId,
    pub unit: UnitRef,
    pub unit_type_name: IStr,
    pub control_pid: u32,
    pub upkeep_pid: u32,
    pub unit_controller: PlayerRef,
    pub unit_upkeeper: PlayerRef,
    /// Center of the footprint, on the post-patch grid.
    pub location: Location,
}

impl UnitBornEvent {
    pub(crate) fn decode(fields: &Fields<'_>, policy: &VersionPolicy) -> Result<Self> {
        fields.expect_len(7)?;
        let unit_id = unit_id(fields, 0)?;
        let control_pid = fields.u32(3, "control_pid")?;
        let upkeep_pid = fields.u32(4, "upkeep_pid")?;
        Ok(Self {
            unit_id,
            unit: Reference::unresolved(unit_id),
            unit_type_name: intern(fields.text(2, "unit_type_name")?),
            control_pid,
            upkeep_pid,
            unit_controller: Reference::unresolved(control_pid),
            unit_upkeeper: Reference::unresolved(upkeep_pid),
            location: fields.location(5, 6, policy)?,
        })
    }

    pub fn unit_type_name(&self) -> &'static str {
        resolve(self.unit_type_name)
    }

    /// Born units are attributed to their controller.
    pub fn pid(&self) -> u32 {
        self.control_pid
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.unit_controller.handle()
    }

    /// Whether the upkeep payer is one of `pids`.
    pub fn is_player(&self, pids: &[u32]) -> bool {
        pids.contains(&self.upkeep_pid)
    }

    /// Target dummies are excluded. `None` until the unit resolves.
    pub fn is_counted(&self) -> Option<bool> {
        self.unit.handle().map(|u| is_counted_type(u.name()))
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        let unit = resolve_unit(&mut self.unit, registry);
        let controller = resolve_player(&mut self.unit_controller, registry);
        let upkeeper = resolve_player(&mut self.unit_upkeeper, registry);
        unit && controller && upkeeper
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.unit.pending());
        out.extend(self.unit_controller.pending());
        out.extend(self.unit_upkeeper.pending());
    }
}

impl fmt::Display for UnitBornEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>15} - Unit born {} at {}",
            self.unit_upkeeper, self.unit, self.location
        )
    }
}

/// A unit that enters the game unfinished (buildings, warp-ins).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInitEvent {
    pub unit_id: UnitId,
    pub unit: UnitRef,
    pub unit_type_name: IStr,
    pub control_pid: u32,
    pub upkeep_pid: u32,
    pub unit_controller: PlayerRef,
    pub unit_upkeeper: PlayerRef,
    pub location: Location,
}

impl UnitInitEvent {
    pub(crate) fn decode(fields: &Fields<'_>, policy: &VersionPolicy) -> Result<Self> {
        fields.expect_len(7)?;
        let unit_id = unit_id(fields, 0)?;
        let control_pid = fields.u32(3, "control_pid")?;
        let upkeep_pid = fields.u32(4, "upkeep_pid")?;
        Ok(Self {
            unit_id,
            unit: Reference::unresolved(unit_id),
            unit_type_name: intern(fields.text(2, "unit_type_name")?),
            control_pid,
            upkeep_pid,
            unit_controller: Reference::unresolved(control_pid),
            unit_upkeeper: Reference::unresolved(upkeep_pid),
            location: fields.location(5, 6, policy)?,
        })
    }

    pub fn unit_type_name(&self) -> &'static str {
        resolve(self.unit_type_name)
    }

    /// Initiated units are attributed to the upkeep payer, not the controller.
    pub fn pid(&self) -> u32 {
        self.upkeep_pid
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.unit_upkeeper.handle()
    }

    pub fn is_player(&self, pids: &[u32]) -> bool {
        pids.contains(&self.upkeep_pid)
    }

    /// Every initiated unit counts. `None` until the unit resolves.
    pub fn is_counted(&self) -> Option<bool> {
        self.unit.handle().map(|_| true)
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        let unit = resolve_unit(&mut self.unit, registry);
        let controller = resolve_player(&mut self.unit_controller, registry);
        let upkeeper = resolve_player(&mut self.unit_upkeeper, registry);
        unit && controller && upkeeper
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.unit.pending());
        out.extend(self.unit_controller.pending());
        out.extend(self.unit_upkeeper.pending());
    }
}

impl fmt::Display for UnitInitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>15} - Unit initiated {} at {}",
            self.unit_upkeeper, self.unit, self.location
        )
    }
}

/// Completion of a unit previously announced by [`UnitInitEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDoneEvent {
    pub unit_id: UnitId,
    pub unit: UnitRef,
}

impl UnitDoneEvent {
    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        fields.expect_len(2)?;
        let unit_id = unit_id(fields, 0)?;
        Ok(Self {
            unit_id,
            unit: Reference::unresolved(unit_id),
        })
    }

    /// Known only once the unit has resolved.
    pub fn pid(&self) -> Option<u32> {
        self.unit.handle().map(|u| u.owner_pid)
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.unit.handle().and_then(|u| u.owner.as_ref())
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        resolve_unit(&mut self.unit, registry)
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.unit.pending());
    }
}

impl fmt::Display for UnitDoneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>15} - Unit {} done", owner_label(&self.unit), self.unit)
    }
}

/// A unit removed from the game: killed, morphed, merged or otherwise gone.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDiedEvent {
    pub unit_id: UnitId,
    pub unit: UnitRef,
    /// `None` when the record leaves the killer slot empty.
    pub killing_player_id: Option<u32>,
    pub killing_player: Option<PlayerRef>,
    /// Present from patch 2.1 on, and only when the killer index is non-zero.
    pub killing_unit_id: Option<UnitId>,
    pub killing_unit: Option<UnitRef>,
    pub location: Location,
}

impl UnitDiedEvent {
    pub(crate) fn decode(fields: &Fields<'_>, policy: &VersionPolicy) -> Result<Self> {
        if policy.has_killer_unit_fields {
            fields.expect_len(7)?;
        } else if fields.len() != 5 && fields.len() != 7 {
            // Older layouts are five fields; trailing killer slots are tolerated
            // and ignored.
            fields.expect_len(5)?;
        }

        let unit_id = unit_id(fields, 0)?;
        let killing_player_id = fields.opt_u32(2, "killing_player_id")?;

        let killing_unit_id = if policy.has_killer_unit_fields {
            let index = fields.opt_u32(5, "killing_unit_index")?.unwrap_or(0);
            let recycle = fields.opt_u32(6, "killing_unit_recycle")?.unwrap_or(0);
            (index != 0).then(|| UnitId::new(index, recycle))
        } else {
            None
        };

        Ok(Self {
            unit_id,
            unit: Reference::unresolved(unit_id),
            killing_player_id,
            killing_player: killing_player_id.map(Reference::unresolved),
            killing_unit_id,
            killing_unit: killing_unit_id.map(Reference::unresolved),
            location: fields.location(3, 4, policy)?,
        })
    }

    /// Payer of the dead unit. Unknown until the unit reference resolves.
    pub fn pid(&self) -> Option<u32> {
        self.unit.handle().map(|u| u.owner_pid)
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.unit.handle().and_then(|u| u.owner.as_ref())
    }

    pub fn is_player(&self, pids: &[u32]) -> Option<bool> {
        self.pid().map(|pid| pids.contains(&pid))
    }

    /// Same as [`Self::countable_unit_death`].
    pub fn is_counted(&self) -> Option<bool> {
        self.countable_unit_death()
    }

    /// Army units and workers count; broodlings do not.
    pub fn countable_unit_death(&self) -> Option<bool> {
        self.unit.handle().map(|u| is_countable_death(u.name()))
    }

    pub fn building_death(&self) -> Option<bool> {
        self.unit.handle().map(|u| u.is_building())
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        let unit = resolve_unit(&mut self.unit, registry);
        let player = self
            .killing_player
            .as_mut()
            .is_none_or(|p| resolve_player(p, registry));
        let killer = self
            .killing_unit
            .as_mut()
            .is_none_or(|u| resolve_unit(u, registry));
        unit && player && killer
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.unit.pending());
        out.extend(self.killing_player.as_ref().and_then(PlayerRef::pending));
        out.extend(self.killing_unit.as_ref().and_then(UnitRef::pending));
    }
}

impl fmt::Display for UnitDiedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>15} - Unit {} died at {}",
            owner_label(&self.unit),
            self.unit,
            self.location
        )?;
        match (&self.killing_unit, &self.killing_player) {
            (Some(unit), Some(player)) => write!(f, ", killed by {} ({})", unit, player),
            (Some(unit), None) => write!(f, ", killed by {}", unit),
            (None, Some(player)) => write!(f, ", killed by {}", player),
            (None, None) => Ok(()),
        }
    }
}

/// Ownership or control of a unit changed hands (e.g. Neural Parasite).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOwnerChangeEvent {
    pub unit_id: UnitId,
    pub unit: UnitRef,
    pub control_pid: u32,
    pub upkeep_pid: u32,
    pub unit_controller: PlayerRef,
    pub unit_upkeeper: PlayerRef,
}

impl UnitOwnerChangeEvent {
    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        fields.expect_len(4)?;
        let unit_id = unit_id(fields, 0)?;
        let control_pid = fields.u32(2, "control_pid")?;
        let upkeep_pid = fields.u32(3, "upkeep_pid")?;
        Ok(Self {
            unit_id,
            unit: Reference::unresolved(unit_id),
            control_pid,
            upkeep_pid,
            unit_controller: Reference::unresolved(control_pid),
            unit_upkeeper: Reference::unresolved(upkeep_pid),
        })
    }

    /// Attributed to the new upkeep payer.
    pub fn pid(&self) -> u32 {
        self.upkeep_pid
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.unit_upkeeper.handle()
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        let unit = resolve_unit(&mut self.unit, registry);
        let controller = resolve_player(&mut self.unit_controller, registry);
        let upkeeper = resolve_player(&mut self.unit_upkeeper, registry);
        unit && controller && upkeeper
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.unit.pending());
        out.extend(self.unit_controller.pending());
        out.extend(self.unit_upkeeper.pending());
    }
}

impl fmt::Display for UnitOwnerChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>15} took {}", self.unit_upkeeper, self.unit)
    }
}

/// A unit switched type in place (Hatchery to Lair, sieging, burrowing).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTypeChangeEvent {
    pub unit_id: UnitId,
    pub unit: UnitRef,
    pub unit_type_name: IStr,
}

impl UnitTypeChangeEvent {
    pub(crate) fn decode(fields: &Fields<'_>) -> Result<Self> {
        fields.expect_len(3)?;
        let unit_id = unit_id(fields, 0)?;
        Ok(Self {
            unit_id,
            unit: Reference::unresolved(unit_id),
            unit_type_name: intern(fields.text(2, "unit_type_name")?),
        })
    }

    pub fn unit_type_name(&self) -> &'static str {
        resolve(self.unit_type_name)
    }

    pub fn pid(&self) -> Option<u32> {
        self.unit.handle().map(|u| u.owner_pid)
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.unit.handle().and_then(|u| u.owner.as_ref())
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        resolve_unit(&mut self.unit, registry)
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.unit.pending());
    }
}

impl fmt::Display for UnitTypeChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>15} - Unit {} type changed to {}",
            owner_label(&self.unit),
            self.unit,
            self.unit_type_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TrackerEvent;
    use crate::record::{TrackerRecord, Value};
    use crate::state::ReplayState;
    use crate::version::{COORDINATE_PATCH_BUILD, policy};

    fn born_data(x: i64, y: i64) -> Vec<Value> {
        vec![
            Value::Int(19),
            Value::Int(1),
            Value::from("Marine"),
            Value::Int(1),
            Value::Int(2),
            Value::Int(x),
            Value::Int(y),
        ]
    }

    #[test]
    fn born_scales_legacy_coordinates() {
        let data = born_data(30, 41);
        let fields = Fields::new(EventKind::UnitBorn, &data);

        let old = UnitBornEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD - 1)).unwrap();
        assert_eq!(old.location, Location { x: 120, y: 164 });

        let new = UnitBornEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD)).unwrap();
        assert_eq!(new.location, Location { x: 30, y: 41 });
    }

    #[test]
    fn init_scales_legacy_coordinates() {
        let data = born_data(30, 41);
        let fields = Fields::new(EventKind::UnitInit, &data);

        let old = UnitInitEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD - 1)).unwrap();
        assert_eq!(old.location, Location { x: 120, y: 164 });
        assert_eq!(old.pid(), 2);

        let new = UnitInitEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD)).unwrap();
        assert_eq!(new.location, Location { x: 30, y: 41 });
    }

    #[test]
    fn born_and_init_attribute_different_players() {
        let data = born_data(1, 1);
        let p = policy(COORDINATE_PATCH_BUILD);

        let born = UnitBornEvent::decode(&Fields::new(EventKind::UnitBorn, &data), &p).unwrap();
        let init = UnitInitEvent::decode(&Fields::new(EventKind::UnitInit, &data), &p).unwrap();

        assert_eq!(born.pid(), 1, "born follows the controller");
        assert_eq!(init.pid(), 2, "init follows the upkeep payer");
        assert_eq!(born.unit_id, UnitId::new(19, 1));
        assert_eq!(born.unit_type_name(), "Marine");
    }

    #[test]
    fn died_killer_fields_follow_build() {
        let data: Vec<Value> = [4, 2, 1, 10, 12, 7, 3].map(Value::Int).to_vec();
        let fields = Fields::new(EventKind::UnitDied, &data);

        let new = UnitDiedEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD)).unwrap();
        assert_eq!(new.killing_unit_id, Some(UnitId::new(7, 3)));
        assert_eq!(new.location, Location { x: 10, y: 12 });

        // Old layout ignores trailing killer slots and scales the location
        let old = UnitDiedEvent::decode(&fields, &policy(20000)).unwrap();
        assert_eq!(old.killing_unit_id, None);
        assert!(old.killing_unit.is_none());
        assert_eq!(old.location, Location { x: 40, y: 48 });
    }

    #[test]
    fn died_zero_killer_index_means_no_killer_unit() {
        let data: Vec<Value> = [4, 2, 1, 10, 12, 0, 9].map(Value::Int).to_vec();
        let fields = Fields::new(EventKind::UnitDied, &data);
        let ev = UnitDiedEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD)).unwrap();
        assert_eq!(ev.killing_unit_id, None);
    }

    #[test]
    fn died_empty_killer_player_slot() {
        let mut data: Vec<Value> = [4, 2, 0, 10, 12].map(Value::Int).to_vec();
        data[2] = Value::Null;
        let fields = Fields::new(EventKind::UnitDied, &data);
        let ev = UnitDiedEvent::decode(&fields, &policy(16000)).unwrap();
        assert_eq!(ev.killing_player_id, None);
        assert!(ev.killing_player.is_none());
    }

    #[test]
    fn died_shape_is_checked() {
        let short: Vec<Value> = [4, 2, 1, 10, 12].map(Value::Int).to_vec();
        let fields = Fields::new(EventKind::UnitDied, &short);
        assert!(UnitDiedEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD)).is_err());

        let odd: Vec<Value> = [4, 2, 1, 10, 12, 0].map(Value::Int).to_vec();
        let fields = Fields::new(EventKind::UnitDied, &odd);
        assert!(UnitDiedEvent::decode(&fields, &policy(100)).is_err());
    }

    #[test]
    fn died_pid_unknown_until_resolved() {
        let data: Vec<Value> = [4, 2, 1, 10, 12, 0, 0].map(Value::Int).to_vec();
        let fields = Fields::new(EventKind::UnitDied, &data);
        let ev = UnitDiedEvent::decode(&fields, &policy(COORDINATE_PATCH_BUILD)).unwrap();
        assert_eq!(ev.pid(), None);
        assert!(ev.player().is_none());
    }

    #[test]
    fn owner_change_layout() {
        let data: Vec<Value> = [4, 2, 3, 5].map(Value::Int).to_vec();
        let ev = UnitOwnerChangeEvent::decode(&Fields::new(EventKind::UnitOwnerChange, &data))
            .unwrap();
        assert_eq!(ev.control_pid, 3);
        assert_eq!(ev.upkeep_pid, 5);
        assert_eq!(ev.pid(), 5);
        assert_eq!(ev.to_string(), "       Player 5 took Unit [00100002]");
    }

    #[test]
    fn type_change_reads_name() {
        let data = vec![Value::Int(4), Value::Int(2), Value::from("Lair")];
        let ev =
            UnitTypeChangeEvent::decode(&Fields::new(EventKind::UnitTypeChange, &data)).unwrap();
        assert_eq!(ev.unit_type_name(), "Lair");
        assert_eq!(ev.pid(), None);
    }

    fn registry_with(units: &[(u32, u32, &str)]) -> ReplayState {
        let mut state = ReplayState::new();
        for &(index, recycle, name) in units {
            let data = vec![
                Value::Int(index as i64),
                Value::Int(recycle as i64),
                Value::from(name),
                Value::Int(1),
                Value::Int(1),
                Value::Int(0),
                Value::Int(0),
            ];
            let record =
                TrackerRecord::new(0, EventKind::UnitBorn, COORDINATE_PATCH_BUILD, data);
            state.apply(&TrackerEvent::decode(&record).unwrap());
        }
        state
    }

    fn died_event(index: i64) -> UnitDiedEvent {
        let data: Vec<Value> = [index, 1, 2, 10, 12, 0, 0].map(Value::Int).to_vec();
        UnitDiedEvent::decode(
            &Fields::new(EventKind::UnitDied, &data),
            &policy(COORDINATE_PATCH_BUILD),
        )
        .unwrap()
    }

    #[test]
    fn born_counts_everything_but_target_dummies() {
        let state = registry_with(&[(19, 1, "Marine"), (20, 1, "InvisibleTargetDummy")]);
        let p = policy(COORDINATE_PATCH_BUILD);

        let data = born_data(1, 1);
        let mut born = UnitBornEvent::decode(&Fields::new(EventKind::UnitBorn, &data), &p).unwrap();
        assert_eq!(born.is_counted(), None);
        born.resolve(&state);
        assert_eq!(born.is_counted(), Some(true));

        let mut data = born_data(1, 1);
        data[0] = Value::Int(20);
        data[2] = Value::from("InvisibleTargetDummy");
        let mut dummy =
            UnitBornEvent::decode(&Fields::new(EventKind::UnitBorn, &data), &p).unwrap();
        dummy.resolve(&state);
        assert_eq!(dummy.is_counted(), Some(false));
    }

    #[test]
    fn is_player_checks_upkeep_payer() {
        let data = born_data(1, 1);
        let p = policy(COORDINATE_PATCH_BUILD);
        let born = UnitBornEvent::decode(&Fields::new(EventKind::UnitBorn, &data), &p).unwrap();
        let init = UnitInitEvent::decode(&Fields::new(EventKind::UnitInit, &data), &p).unwrap();
        assert!(born.is_player(&[2, 3]));
        assert!(!born.is_player(&[1]));
        assert!(init.is_player(&[2]));
    }

    #[test]
    fn init_is_counted_once_resolved() {
        let state = registry_with(&[(19, 1, "Marine")]);
        let mut init = UnitInitEvent::decode(
            &Fields::new(EventKind::UnitInit, &born_data(1, 1)),
            &policy(COORDINATE_PATCH_BUILD),
        )
        .unwrap();
        assert_eq!(init.is_counted(), None);
        init.resolve(&state);
        assert_eq!(init.is_counted(), Some(true));
    }

    #[test]
    fn died_counting_follows_unit_type() {
        let state = registry_with(&[
            (4, 1, "Zergling"),
            (5, 1, "Drone"),
            (6, 1, "Broodling"),
            (7, 1, "SpineCrawler"),
            (8, 1, "Overlord"),
        ]);
        let check = |index: i64| {
            let mut ev = died_event(index);
            assert_eq!(ev.countable_unit_death(), None);
            assert_eq!(ev.building_death(), None);
            assert_eq!(ev.is_player(&[1]), None);
            ev.resolve(&state);
            (
                ev.is_counted().unwrap(),
                ev.building_death().unwrap(),
                ev.is_player(&[1]).unwrap(),
            )
        };

        assert_eq!(check(4), (true, false, true));
        assert_eq!(check(5), (true, false, true));
        assert_eq!(check(6), (false, false, true));
        assert_eq!(check(7), (false, true, true));
        assert_eq!(check(8), (false, false, true));
    }
}
