use std::sync::Arc;

use hashbrown::HashMap;

use super::entity::{Player, PlayerHandle, PlayerType, Unit, UnitHandle};
use super::registry::Registry;
use crate::context::IStr;
use crate::events::{EventBody, Location, TrackerEvent, UnresolvedRef};
use crate::unit_id::UnitId;

/// Units and players known so far in a replay's tracker stream.
///
/// Pure storage. The processor decides when to mutate it; events only read
/// it through [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct ReplayState {
    units: HashMap<UnitId, UnitHandle>,
    /// Live unit occupying each index slot.
    slots: HashMap<u32, UnitId>,
    players: HashMap<u32, PlayerHandle>,
    /// Deaths seen before their unit's born or init record.
    pending_deaths: HashMap<UnitId, PendingDeath>,
}

#[derive(Debug, Clone, Copy)]
struct PendingDeath {
    frame: u32,
    location: Location,
    killing_player_id: Option<u32>,
    killing_unit_id: Option<UnitId>,
}

impl ReplayState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Players ---

    /// Register or replace a player ahead of the stream, e.g. from replay details.
    ///
    /// Returns `true` if the pid was not known before.
    pub fn add_player(&mut self, player: Player) -> bool {
        let pid = player.pid;
        let is_new = !self.players.contains_key(&pid);
        self.players.insert(pid, Arc::new(player));
        self.link_owner_handles(pid);
        is_new
    }

    pub fn player(&self, pid: u32) -> Option<&PlayerHandle> {
        self.players.get(&pid)
    }

    /// Players ordered by pid.
    pub fn players(&self) -> Vec<&PlayerHandle> {
        let mut players: Vec<_> = self.players.values().collect();
        players.sort_by_key(|p| p.pid);
        players
    }

    fn setup_player(
        &mut self,
        pid: u32,
        player_type: PlayerType,
        uid: Option<u32>,
        sid: Option<u32>,
    ) -> bool {
        match self.players.get_mut(&pid) {
            Some(existing) => {
                let player = Arc::make_mut(existing);
                player.player_type = player_type;
                player.uid = uid;
                player.sid = sid;
                self.link_owner_handles(pid);
                false
            }
            None => {
                let mut player = Player::new(pid, "");
                player.player_type = player_type;
                player.uid = uid;
                player.sid = sid;
                self.add_player(player)
            }
        }
    }

    /// Point units owned or controlled by `pid` at its current handle.
    fn link_owner_handles(&mut self, pid: u32) {
        let Some(handle) = self.players.get(&pid).cloned() else {
            return;
        };
        for unit in self.units.values_mut() {
            if unit.owner_pid != pid && unit.controller_pid != pid {
                continue;
            }
            let unit = Arc::make_mut(unit);
            if unit.owner_pid == pid {
                unit.owner = Some(handle.clone());
            }
            if unit.controller_pid == pid {
                unit.controller = Some(handle.clone());
            }
        }
    }

    // --- Units ---

    pub fn unit(&self, id: UnitId) -> Option<&UnitHandle> {
        self.units.get(&id)
    }

    /// Every unit ever registered, ordered by id.
    pub fn units(&self) -> Vec<&UnitHandle> {
        let mut units: Vec<_> = self.units.values().collect();
        units.sort_by_key(|u| u.id);
        units
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn live_unit_count(&self) -> usize {
        self.slots.len()
    }

    fn register_unit(
        &mut self,
        id: UnitId,
        type_name: IStr,
        owner_pid: u32,
        controller_pid: u32,
        location: Location,
        frame: u32,
        finished: bool,
    ) {
        let death = self.pending_deaths.remove(&id);
        let unit = Unit {
            id,
            type_name,
            owner_pid,
            controller_pid,
            owner: self.players.get(&owner_pid).cloned(),
            controller: self.players.get(&controller_pid).cloned(),
            location: death.map_or(location, |d| d.location),
            started_at: frame,
            finished_at: finished.then_some(frame),
            died_at: death.map(|d| d.frame),
            killing_player_id: death.and_then(|d| d.killing_player_id),
            killing_unit_id: death.and_then(|d| d.killing_unit_id),
        };
        if let Some(death) = death {
            // Already dead, so it never occupies the slot
            tracing::debug!(%id, died_at = death.frame, "Unit registered after its death");
        } else if let Some(previous) = self.slots.insert(id.index(), id)
            && previous != id
        {
            tracing::debug!(slot = id.index(), %previous, %id, "Unit slot reused without death");
        }
        self.units.insert(id, Arc::new(unit));
    }

    fn update_unit(&mut self, id: UnitId, f: impl FnOnce(&mut Unit)) {
        match self.units.get_mut(&id) {
            Some(unit) => f(Arc::make_mut(unit)),
            None => tracing::debug!(%id, "Update for unknown unit"),
        }
    }

    /// Apply an event's lifecycle effects.
    ///
    /// Returns the keys that became resolvable because of it, so callers can
    /// retry only the events waiting on them.
    pub fn apply(&mut self, event: &TrackerEvent) -> Vec<UnresolvedRef> {
        let frame = event.frame;
        match &event.body {
            EventBody::PlayerSetup(e) => {
                if self.setup_player(e.pid, e.player_type, e.uid, e.sid) {
                    return vec![UnresolvedRef::Player(e.pid)];
                }
            }
            EventBody::UnitBorn(e) => {
                self.register_unit(
                    e.unit_id,
                    e.unit_type_name,
                    e.upkeep_pid,
                    e.control_pid,
                    e.location,
                    frame,
                    true,
                );
                return vec![UnresolvedRef::Unit(e.unit_id)];
            }
            EventBody::UnitInit(e) => {
                self.register_unit(
                    e.unit_id,
                    e.unit_type_name,
                    e.upkeep_pid,
                    e.control_pid,
                    e.location,
                    frame,
                    false,
                );
                return vec![UnresolvedRef::Unit(e.unit_id)];
            }
            EventBody::UnitDone(e) => {
                self.update_unit(e.unit_id, |u| u.finished_at = Some(frame));
            }
            EventBody::UnitTypeChange(e) => {
                let type_name = e.unit_type_name;
                self.update_unit(e.unit_id, |u| u.type_name = type_name);
            }
            EventBody::UnitOwnerChange(e) => {
                let owner = self.players.get(&e.upkeep_pid).cloned();
                let controller = self.players.get(&e.control_pid).cloned();
                self.update_unit(e.unit_id, |u| {
                    u.owner_pid = e.upkeep_pid;
                    u.controller_pid = e.control_pid;
                    u.owner = owner;
                    u.controller = controller;
                });
            }
            EventBody::UnitDied(e) if !self.units.contains_key(&e.unit_id) => {
                self.pending_deaths.insert(
                    e.unit_id,
                    PendingDeath {
                        frame,
                        location: e.location,
                        killing_player_id: e.killing_player_id,
                        killing_unit_id: e.killing_unit_id,
                    },
                );
            }
            EventBody::UnitDied(e) => {
                self.update_unit(e.unit_id, |u| {
                    u.died_at = Some(frame);
                    u.location = e.location;
                    u.killing_player_id = e.killing_player_id;
                    u.killing_unit_id = e.killing_unit_id;
                });
                let index = e.unit_id.index();
                if self.slots.get(&index) == Some(&e.unit_id) {
                    self.slots.remove(&index);
                }
            }
            EventBody::UnitPositions(e) => {
                for &(index, location) in &e.positions {
                    if let Some(id) = self.slots.get(&index).copied() {
                        self.update_unit(id, |u| u.location = location);
                    }
                }
            }
            EventBody::PlayerStats(_) | EventBody::Upgrade(_) => {}
        }
        Vec::new()
    }
}

impl Registry for ReplayState {
    fn lookup_unit(&self, id: UnitId) -> Option<UnitHandle> {
        self.units.get(&id).cloned()
    }

    fn lookup_player(&self, pid: u32) -> Option<PlayerHandle> {
        self.players.get(&pid).cloned()
    }

    fn lookup_active_unit(&self, index: u32) -> Option<UnitHandle> {
        self.slots
            .get(&index)
            .and_then(|id| self.units.get(id))
            .cloned()
    }
}
