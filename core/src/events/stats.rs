//! Player statistics snapshots and their derived totals.
//!
//! The game emits a stats vector for every player every 10 seconds, plus one
//! when a player leaves and one at game end. Raw slots are kept untouched;
//! every derived value is computed from floor-clamped slots because corrupt
//! negative values show up in real replays.

use std::fmt;

use tracker_types::formatting::{format_compact, format_supply};

use super::reference::{PlayerRef, Reference, UnresolvedRef};
use crate::error::Result;
use crate::record::Fields;
use crate::state::{PlayerHandle, Registry};
use crate::version::VersionPolicy;

/// Slots present in every stats vector.
pub const BASE_STAT_SLOTS: usize = 33;
/// Slots present once friendly-fire losses are recorded.
pub const FULL_STAT_SLOTS: usize = 39;

/// Supply values are fixed point with 12 fractional bits.
const FOOD_SCALE: f64 = 4096.0;

mod slot {
    pub const MINERALS_CURRENT: usize = 0;
    pub const VESPENE_CURRENT: usize = 1;
    pub const MINERALS_COLLECTION_RATE: usize = 2;
    pub const VESPENE_COLLECTION_RATE: usize = 3;
    pub const WORKERS_ACTIVE_COUNT: usize = 4;
    pub const MINERALS_USED_IN_PROGRESS: usize = 5;
    pub const VESPENE_USED_IN_PROGRESS: usize = 8;
    pub const MINERALS_USED_CURRENT: usize = 11;
    pub const VESPENE_USED_CURRENT: usize = 14;
    pub const MINERALS_LOST: usize = 17;
    pub const VESPENE_LOST: usize = 20;
    pub const MINERALS_KILLED: usize = 23;
    pub const VESPENE_KILLED: usize = 26;
    pub const FOOD_USED: usize = 29;
    pub const FOOD_MADE: usize = 30;
    pub const MINERALS_USED_ACTIVE_FORCES: usize = 31;
    pub const VESPENE_USED_ACTIVE_FORCES: usize = 32;
    pub const FF_MINERALS_LOST: usize = 33;
    pub const FF_VESPENE_LOST: usize = 36;
}

/// Floor a raw stat at zero.
#[inline]
pub fn clamp(raw: i64) -> u64 {
    raw.max(0) as u64
}

/// One resource split by spending category, with its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryStats {
    pub army: u64,
    pub economy: u64,
    pub technology: u64,
    /// `army + economy + technology`.
    pub total: u64,
}

impl CategoryStats {
    /// Build from three consecutive raw slots starting at `start`.
    fn from_slots(stats: &[i64], start: usize) -> Self {
        let army = clamp(stats[start]);
        let economy = clamp(stats[start + 1]);
        let technology = clamp(stats[start + 2]);
        Self {
            army,
            economy,
            technology,
            total: army.saturating_add(economy).saturating_add(technology),
        }
    }
}

/// Minerals and vespene for one stat group, plus their combined total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceGroup {
    pub minerals: CategoryStats,
    pub vespene: CategoryStats,
    /// `minerals.total + vespene.total`.
    pub resources: u64,
}

impl ResourceGroup {
    fn from_slots(stats: &[i64], minerals_start: usize, vespene_start: usize) -> Self {
        let minerals = CategoryStats::from_slots(stats, minerals_start);
        let vespene = CategoryStats::from_slots(stats, vespene_start);
        Self {
            minerals,
            vespene,
            resources: minerals.total.saturating_add(vespene.total),
        }
    }
}

/// Friendly-fire losses, recorded from build 26490 on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FriendlyFireLosses {
    pub minerals: CategoryStats,
    pub vespene: CategoryStats,
}

/// Everything derived from one raw stats vector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSummary {
    pub minerals_current: u64,
    pub vespene_current: u64,
    pub minerals_collection_rate: u64,
    pub vespene_collection_rate: u64,
    pub workers_active_count: u64,
    /// Cost of everything currently being built or researched.
    pub used_in_progress: ResourceGroup,
    /// Cost of everything currently alive or completed.
    pub used_current: ResourceGroup,
    pub lost: ResourceGroup,
    /// Value of enemy assets destroyed.
    pub killed: ResourceGroup,
    pub food_used: f64,
    pub food_made: f64,
    pub minerals_used_active_forces: u64,
    pub vespene_used_active_forces: u64,
    /// `None` for builds that predate friendly-fire tracking.
    pub friendly_fire: Option<FriendlyFireLosses>,
}

impl StatsSummary {
    /// Derive the summary from a raw vector.
    ///
    /// The vector must hold at least [`BASE_STAT_SLOTS`] entries, or
    /// [`FULL_STAT_SLOTS`] when the policy has friendly-fire slots.
    pub fn from_raw(stats: &[i64], policy: &VersionPolicy) -> Option<Self> {
        let needed = if policy.has_friendly_fire {
            FULL_STAT_SLOTS
        } else {
            BASE_STAT_SLOTS
        };
        if stats.len() < needed {
            return None;
        }

        let friendly_fire = policy.has_friendly_fire.then(|| FriendlyFireLosses {
            minerals: CategoryStats::from_slots(stats, slot::FF_MINERALS_LOST),
            vespene: CategoryStats::from_slots(stats, slot::FF_VESPENE_LOST),
        });

        Some(Self {
            minerals_current: clamp(stats[slot::MINERALS_CURRENT]),
            vespene_current: clamp(stats[slot::VESPENE_CURRENT]),
            minerals_collection_rate: clamp(stats[slot::MINERALS_COLLECTION_RATE]),
            vespene_collection_rate: clamp(stats[slot::VESPENE_COLLECTION_RATE]),
            workers_active_count: clamp(stats[slot::WORKERS_ACTIVE_COUNT]),
            used_in_progress: ResourceGroup::from_slots(
                stats,
                slot::MINERALS_USED_IN_PROGRESS,
                slot::VESPENE_USED_IN_PROGRESS,
            ),
            used_current: ResourceGroup::from_slots(
                stats,
                slot::MINERALS_USED_CURRENT,
                slot::VESPENE_USED_CURRENT,
            ),
            lost: ResourceGroup::from_slots(stats, slot::MINERALS_LOST, slot::VESPENE_LOST),
            killed: ResourceGroup::from_slots(stats, slot::MINERALS_KILLED, slot::VESPENE_KILLED),
            food_used: clamp(stats[slot::FOOD_USED]) as f64 / FOOD_SCALE,
            food_made: clamp(stats[slot::FOOD_MADE]) as f64 / FOOD_SCALE,
            minerals_used_active_forces: clamp(stats[slot::MINERALS_USED_ACTIVE_FORCES]),
            vespene_used_active_forces: clamp(stats[slot::VESPENE_USED_ACTIVE_FORCES]),
            friendly_fire,
        })
    }

    /// Combined mineral and vespene value of the current army.
    pub fn army_value(&self) -> u64 {
        self.used_current
            .minerals
            .army
            .saturating_add(self.used_current.vespene.army)
    }
}

/// Periodic economy snapshot for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatsEvent {
    pub pid: u32,
    pub player: PlayerRef,
    /// The raw vector exactly as recorded, negative values included.
    pub stats: Vec<i64>,
    pub summary: StatsSummary,
}

impl PlayerStatsEvent {
    pub(crate) fn decode(fields: &Fields<'_>, policy: &VersionPolicy) -> Result<Self> {
        fields.expect_len(2)?;
        let pid = fields.u32(0, "pid")?;
        let stats = fields.ints(1, "stats")?;
        let summary = StatsSummary::from_raw(&stats, policy).ok_or_else(|| {
            fields.malformed(format!(
                "stats vector has {} slots, build {} needs {}",
                stats.len(),
                policy.build,
                if policy.has_friendly_fire {
                    FULL_STAT_SLOTS
                } else {
                    BASE_STAT_SLOTS
                }
            ))
        })?;

        Ok(Self {
            pid,
            player: Reference::unresolved(pid),
            stats,
            summary,
        })
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        self.player.handle()
    }

    pub(crate) fn resolve<R: Registry + ?Sized>(&mut self, registry: &R) -> bool {
        self.player.resolve_with(|pid| registry.lookup_player(pid))
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<UnresolvedRef>) {
        out.extend(self.player.pending());
    }
}

impl fmt::Display for PlayerStatsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        write!(
            f,
            "{:>15} - Stats: {} minerals, {} vespene, {} workers, supply {}/{}",
            self.player,
            format_compact(s.minerals_current),
            format_compact(s.vespene_current),
            s.workers_active_count,
            format_supply(s.food_used),
            format_supply(s.food_made)
        )
    }
}
