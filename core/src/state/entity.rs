use std::fmt;
use std::sync::Arc;

use crate::context::{IStr, resolve};
use crate::events::Location;
use super::unit_class::UnitClass;
use crate::unit_id::UnitId;

pub type UnitHandle = Arc<Unit>;
pub type PlayerHandle = Arc<Player>;

/// Slot type announced by a player setup record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerType {
    Human,
    Computer,
    Neutral,
    Hostile,
    Other(u32),
}

impl PlayerType {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Human,
            2 => Self::Computer,
            3 => Self::Neutral,
            4 => Self::Hostile,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Human => 1,
            Self::Computer => 2,
            Self::Neutral => 3,
            Self::Hostile => 4,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => f.write_str("human"),
            Self::Computer => f.write_str("computer"),
            Self::Neutral => f.write_str("neutral"),
            Self::Hostile => f.write_str("hostile"),
            Self::Other(code) => write!(f, "type {}", code),
        }
    }
}

/// A player slot in the replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pid: u32,
    /// Display name. Empty when the replay details were not supplied.
    pub name: String,
    pub player_type: PlayerType,
    /// Battle.net user id. `None` for non-human slots.
    pub uid: Option<u32>,
    /// Lobby slot id. `None` for observers.
    pub sid: Option<u32>,
}

impl Player {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
            player_type: PlayerType::Human,
            uid: None,
            sid: None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.pad(&format!("Player {}", self.pid))
        } else {
            f.pad(&self.name)
        }
    }
}

/// Snapshot of a unit as tracked by the replay state.
///
/// Handles are shared snapshots: an event that resolved a unit keeps the state
/// the unit had at resolution time even if the registry updates it later.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub type_name: IStr,
    /// Player paying upkeep. 0 is neutral.
    pub owner_pid: u32,
    /// Player issuing orders. 0 is neutral.
    pub controller_pid: u32,
    pub owner: Option<PlayerHandle>,
    pub controller: Option<PlayerHandle>,
    pub location: Location,
    /// Frame of the born or init record that created the unit.
    pub started_at: u32,
    /// Frame the unit was completed. Born units are complete on arrival.
    pub finished_at: Option<u32>,
    pub died_at: Option<u32>,
    pub killing_player_id: Option<u32>,
    pub killing_unit_id: Option<UnitId>,
}

impl Unit {
    pub fn name(&self) -> &'static str {
        resolve(self.type_name)
    }

    pub fn is_alive(&self) -> bool {
        self.died_at.is_none()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Classification of the unit's current type.
    pub fn class(&self) -> UnitClass {
        UnitClass::of(self.name())
    }

    pub fn is_army(&self) -> bool {
        self.class() == UnitClass::Army
    }

    pub fn is_building(&self) -> bool {
        self.class() == UnitClass::Building
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{} [{}]", self.name(), self.id))
    }
}
