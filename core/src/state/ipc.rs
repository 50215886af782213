//! Output contract of the parse worker.
//!
//! Plain serde types so callers can read the worker's stdout without linking
//! against the internal state types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{PlayerStatsEvent, StatsSummary};

/// Last stats snapshot of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerPlayerSummary {
    pub pid: u32,
    /// Resolved name, or `Player N` when the player never resolved.
    pub name: String,
    /// Frame of the snapshot.
    pub frame: u32,
    pub minerals_current: u64,
    pub vespene_current: u64,
    pub minerals_collection_rate: u64,
    pub vespene_collection_rate: u64,
    pub workers_active_count: u64,
    pub food_used: f64,
    pub food_made: f64,
    pub army_value: u64,
    /// Resources lost, minerals plus vespene.
    pub resources_lost: u64,
    /// Resources killed, minerals plus vespene.
    pub resources_killed: u64,
}

impl WorkerPlayerSummary {
    pub fn from_stats(frame: u32, event: &PlayerStatsEvent) -> Self {
        let name = match event.player() {
            Some(player) => player.to_string(),
            None => format!("Player {}", event.pid),
        };
        Self::from_summary(event.pid, name, frame, &event.summary)
    }

    pub fn from_summary(pid: u32, name: String, frame: u32, s: &StatsSummary) -> Self {
        Self {
            pid,
            name,
            frame,
            minerals_current: s.minerals_current,
            vespene_current: s.vespene_current,
            minerals_collection_rate: s.minerals_collection_rate,
            vespene_collection_rate: s.vespene_collection_rate,
            workers_active_count: s.workers_active_count,
            food_used: s.food_used,
            food_made: s.food_made,
            army_value: s.army_value(),
            resources_lost: s.lost.resources,
            resources_killed: s.killed.resources,
        }
    }
}

/// Output from the parse worker process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerOutput {
    /// Build of the last record processed, 0 for an empty stream.
    pub build: u32,
    /// Lines or records read from the input.
    pub records_read: usize,
    /// Records dropped because they failed to parse or decode.
    pub skipped: usize,
    /// Events still holding an unresolved reference at end of stream.
    pub unresolved: usize,
    /// Event count keyed by kind name.
    pub events_by_kind: BTreeMap<String, usize>,
    /// One entry per player seen in stats events, ordered by pid.
    pub players: Vec<WorkerPlayerSummary>,
    pub elapsed_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serializes_as_json() {
        let output = WorkerOutput {
            build: 80188,
            records_read: 3,
            skipped: 1,
            unresolved: 0,
            events_by_kind: BTreeMap::from([("UnitBornEvent".to_string(), 2)]),
            players: vec![],
            elapsed_ms: 5,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"events_by_kind\":{\"UnitBornEvent\":2}"));
        let back: WorkerOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }
}
