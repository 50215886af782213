//! Tracker events reconstructed from decoded records.
//!
//! Each record kind decodes into one [`EventBody`] variant. Decoding is pure
//! and only needs the record and its build number; links to units and players
//! start out unresolved and are filled in later by [`TrackerEvent::resolve`]
//! against a [`Registry`].
//!
//! ```text
//!  TrackerRecord ──decode──▶ TrackerEvent (Unresolved refs)
//!                                   │
//!                          resolve(&Registry)   (stream order, repeatable)
//!                                   ▼
//!                            TrackerEvent (Resolved refs)
//! ```

mod player;
mod positions;
mod reference;
mod stats;
mod unit;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracker_types::formatting::{FRAMES_PER_SECOND, format_game_time, frame_to_seconds};

use crate::error::{Result, TrackerError};
use crate::record::{Fields, TrackerRecord};
use crate::state::{PlayerHandle, Registry};
use crate::unit_id::UnitId;
use crate::version::VersionPolicy;

pub use player::{PlayerSetupEvent, UpgradeCompleteEvent};
pub use positions::{UnitPositionsEvent, decode_positions};
pub use reference::{PlayerRef, Reference, UnitRef, UnitSlotRef, UnresolvedRef};
pub use stats::{
    BASE_STAT_SLOTS, CategoryStats, FULL_STAT_SLOTS, FriendlyFireLosses, PlayerStatsEvent,
    ResourceGroup, StatsSummary, clamp,
};
pub use unit::{
    UnitBornEvent, UnitDiedEvent, UnitDoneEvent, UnitInitEvent, UnitOwnerChangeEvent,
    UnitTypeChangeEvent,
};

/// Map position on the post-patch coordinate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: u32,
    pub y: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tracker record kinds, with their wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    PlayerStats,
    UnitBorn,
    UnitDied,
    UnitOwnerChange,
    UnitTypeChange,
    Upgrade,
    UnitInit,
    UnitDone,
    UnitPositions,
    PlayerSetup,
}

impl EventKind {
    pub const COUNT: usize = 10;

    pub const ALL: [EventKind; Self::COUNT] = [
        Self::PlayerStats,
        Self::UnitBorn,
        Self::UnitDied,
        Self::UnitOwnerChange,
        Self::UnitTypeChange,
        Self::Upgrade,
        Self::UnitInit,
        Self::UnitDone,
        Self::UnitPositions,
        Self::PlayerSetup,
    ];

    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PlayerStats => "PlayerStatsEvent",
            Self::UnitBorn => "UnitBornEvent",
            Self::UnitDied => "UnitDiedEvent",
            Self::UnitOwnerChange => "UnitOwnerChangeEvent",
            Self::UnitTypeChange => "UnitTypeChangeEvent",
            Self::Upgrade => "UpgradeCompleteEvent",
            Self::UnitInit => "UnitInitEvent",
            Self::UnitDone => "UnitDoneEvent",
            Self::UnitPositions => "UnitPositionsEvent",
            Self::PlayerSetup => "PlayerSetupEvent",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a tracker event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    PlayerStats(PlayerStatsEvent),
    UnitBorn(UnitBornEvent),
    UnitDied(UnitDiedEvent),
    UnitOwnerChange(UnitOwnerChangeEvent),
    UnitTypeChange(UnitTypeChangeEvent),
    Upgrade(UpgradeCompleteEvent),
    UnitInit(UnitInitEvent),
    UnitDone(UnitDoneEvent),
    UnitPositions(UnitPositionsEvent),
    PlayerSetup(PlayerSetupEvent),
}

/// Whether every reference of an event has found its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Unresolved,
    Resolved,
}

/// One reconstructed tracker event.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerEvent {
    /// Game loop, wrapped to 32 bits.
    pub frame: u32,
    /// Game seconds at `frame`.
    pub second: f64,
    pub body: EventBody,
}

impl TrackerEvent {
    /// Wrap an already-built body. The frame keeps its low 32 bits.
    pub fn new(raw_frame: u64, body: EventBody) -> Self {
        let frame = raw_frame as u32;
        Self {
            frame,
            second: frame as f64 / FRAMES_PER_SECOND,
            body,
        }
    }

    /// Decode a record, applying the layout rules of its build.
    pub fn decode(record: &TrackerRecord) -> Result<Self> {
        let kind = EventKind::from_tag(record.kind)
            .ok_or(TrackerError::UnknownEventKind(record.kind))?;
        let policy = VersionPolicy::for_build(record.build);
        let fields = Fields::new(kind, &record.data);

        let body = match kind {
            EventKind::PlayerStats => {
                EventBody::PlayerStats(PlayerStatsEvent::decode(&fields, &policy)?)
            }
            EventKind::UnitBorn => EventBody::UnitBorn(UnitBornEvent::decode(&fields, &policy)?),
            EventKind::UnitDied => EventBody::UnitDied(UnitDiedEvent::decode(&fields, &policy)?),
            EventKind::UnitOwnerChange => {
                EventBody::UnitOwnerChange(UnitOwnerChangeEvent::decode(&fields)?)
            }
            EventKind::UnitTypeChange => {
                EventBody::UnitTypeChange(UnitTypeChangeEvent::decode(&fields)?)
            }
            EventKind::Upgrade => EventBody::Upgrade(UpgradeCompleteEvent::decode(&fields)?),
            EventKind::UnitInit => EventBody::UnitInit(UnitInitEvent::decode(&fields, &policy)?),
            EventKind::UnitDone => EventBody::UnitDone(UnitDoneEvent::decode(&fields)?),
            EventKind::UnitPositions => {
                EventBody::UnitPositions(UnitPositionsEvent::decode(&fields, &policy)?)
            }
            EventKind::PlayerSetup => EventBody::PlayerSetup(PlayerSetupEvent::decode(&fields)?),
        };

        Ok(Self::new(record.frame, body))
    }

    pub fn kind(&self) -> EventKind {
        match &self.body {
            EventBody::PlayerStats(_) => EventKind::PlayerStats,
            EventBody::UnitBorn(_) => EventKind::UnitBorn,
            EventBody::UnitDied(_) => EventKind::UnitDied,
            EventBody::UnitOwnerChange(_) => EventKind::UnitOwnerChange,
            EventBody::UnitTypeChange(_) => EventKind::UnitTypeChange,
            EventBody::Upgrade(_) => EventKind::Upgrade,
            EventBody::UnitInit(_) => EventKind::UnitInit,
            EventBody::UnitDone(_) => EventKind::UnitDone,
            EventBody::UnitPositions(_) => EventKind::UnitPositions,
            EventBody::PlayerSetup(_) => EventKind::PlayerSetup,
        }
    }

    /// Player the event is attributed to.
    ///
    /// Born units count for their controller, init and owner changes for the
    /// upkeep payer. Events that only know a unit report its owner once the
    /// unit has resolved. Position updates belong to nobody.
    pub fn pid(&self) -> Option<u32> {
        match &self.body {
            EventBody::PlayerStats(e) => Some(e.pid),
            EventBody::UnitBorn(e) => Some(e.pid()),
            EventBody::UnitDied(e) => e.pid(),
            EventBody::UnitOwnerChange(e) => Some(e.pid()),
            EventBody::UnitTypeChange(e) => e.pid(),
            EventBody::Upgrade(e) => Some(e.pid),
            EventBody::UnitInit(e) => Some(e.pid()),
            EventBody::UnitDone(e) => e.pid(),
            EventBody::UnitPositions(_) => None,
            EventBody::PlayerSetup(e) => Some(e.pid),
        }
    }

    /// Resolved player behind [`pid`](Self::pid).
    pub fn player(&self) -> Option<&PlayerHandle> {
        match &self.body {
            EventBody::PlayerStats(e) => e.player(),
            EventBody::UnitBorn(e) => e.player(),
            EventBody::UnitDied(e) => e.player(),
            EventBody::UnitOwnerChange(e) => e.player(),
            EventBody::UnitTypeChange(e) => e.player(),
            EventBody::Upgrade(e) => e.player(),
            EventBody::UnitInit(e) => e.player(),
            EventBody::UnitDone(e) => e.player(),
            EventBody::UnitPositions(_) => None,
            EventBody::PlayerSetup(e) => e.player.handle(),
        }
    }

    /// Primary unit the event is about.
    pub fn unit_id(&self) -> Option<UnitId> {
        match &self.body {
            EventBody::UnitBorn(e) => Some(e.unit_id),
            EventBody::UnitDied(e) => Some(e.unit_id),
            EventBody::UnitOwnerChange(e) => Some(e.unit_id),
            EventBody::UnitTypeChange(e) => Some(e.unit_id),
            EventBody::UnitInit(e) => Some(e.unit_id),
            EventBody::UnitDone(e) => Some(e.unit_id),
            EventBody::PlayerStats(_)
            | EventBody::Upgrade(_)
            | EventBody::UnitPositions(_)
            | EventBody::PlayerSetup(_) => None,
        }
    }

    /// Fill in every reference whose target the registry knows.
    ///
    /// Safe to call repeatedly: resolved references are never replaced, and
    /// targets still missing are simply left for a later call.
    pub fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> ResolveState {
        let resolved = match &mut self.body {
            EventBody::PlayerStats(e) => e.resolve(registry),
            EventBody::UnitBorn(e) => e.resolve(registry),
            EventBody::UnitDied(e) => e.resolve(registry),
            EventBody::UnitOwnerChange(e) => e.resolve(registry),
            EventBody::UnitTypeChange(e) => e.resolve(registry),
            EventBody::Upgrade(e) => e.resolve(registry),
            EventBody::UnitInit(e) => e.resolve(registry),
            EventBody::UnitDone(e) => e.resolve(registry),
            EventBody::UnitPositions(e) => e.resolve(registry),
            EventBody::PlayerSetup(e) => e.resolve(registry),
        };
        if resolved {
            ResolveState::Resolved
        } else {
            ResolveState::Unresolved
        }
    }

    /// References still waiting for their target.
    pub fn unresolved_references(&self) -> Vec<UnresolvedRef> {
        let mut out = Vec::new();
        match &self.body {
            EventBody::PlayerStats(e) => e.collect_unresolved(&mut out),
            EventBody::UnitBorn(e) => e.collect_unresolved(&mut out),
            EventBody::UnitDied(e) => e.collect_unresolved(&mut out),
            EventBody::UnitOwnerChange(e) => e.collect_unresolved(&mut out),
            EventBody::UnitTypeChange(e) => e.collect_unresolved(&mut out),
            EventBody::Upgrade(e) => e.collect_unresolved(&mut out),
            EventBody::UnitInit(e) => e.collect_unresolved(&mut out),
            EventBody::UnitDone(e) => e.collect_unresolved(&mut out),
            EventBody::UnitPositions(e) => e.collect_unresolved(&mut out),
            EventBody::PlayerSetup(e) => e.collect_unresolved(&mut out),
        }
        out
    }

    pub fn state(&self) -> ResolveState {
        if self.unresolved_references().is_empty() {
            ResolveState::Resolved
        } else {
            ResolveState::Unresolved
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state() == ResolveState::Resolved
    }

    /// Timestamp as rendered in event lines, `MM.SS` or `HH.MM.SS`.
    pub fn game_time(&self) -> String {
        format_game_time(frame_to_seconds(self.frame))
    }
}

impl fmt::Display for TrackerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t", self.game_time())?;
        match &self.body {
            EventBody::PlayerStats(e) => fmt::Display::fmt(e, f),
            EventBody::UnitBorn(e) => fmt::Display::fmt(e, f),
            EventBody::UnitDied(e) => fmt::Display::fmt(e, f),
            EventBody::UnitOwnerChange(e) => fmt::Display::fmt(e, f),
            EventBody::UnitTypeChange(e) => fmt::Display::fmt(e, f),
            EventBody::Upgrade(e) => fmt::Display::fmt(e, f),
            EventBody::UnitInit(e) => fmt::Display::fmt(e, f),
            EventBody::UnitDone(e) => fmt::Display::fmt(e, f),
            EventBody::UnitPositions(e) => fmt::Display::fmt(e, f),
            EventBody::PlayerSetup(e) => fmt::Display::fmt(e, f),
        }
    }
}
