//! Stream driver: decodes records, keeps the replay state current and links
//! events to it.
//!
//! Records are handled strictly in stream order. Decoding is pure, so batches
//! are decoded in parallel first and then applied one by one.

#[cfg(test)]
mod processor_tests;

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use hashbrown::HashMap;
use rayon::prelude::*;
use tracker_types::ProcessorConfig;

use crate::error::{Result, TrackerError};
use crate::events::{EventBody, EventKind, ResolveState, TrackerEvent, UnresolvedRef};
use crate::reader::read_record_file;
use crate::record::TrackerRecord;
use crate::state::{Player, ReplayState, WorkerOutput, WorkerPlayerSummary};

/// Counters collected while processing a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    /// Records offered to the processor, skipped ones included.
    pub records: usize,
    pub skipped: usize,
    /// Pending events evicted because the pending list was full.
    pub dropped_pending: usize,
    /// Resolution attempts made on pending events.
    pub retries: usize,
    /// Build of the most recent record.
    pub build: u32,
    by_kind: [usize; EventKind::COUNT],
}

impl ProcessorStats {
    pub fn count(&self, kind: EventKind) -> usize {
        self.by_kind[kind.tag() as usize]
    }

    pub fn events(&self) -> usize {
        self.by_kind.iter().sum()
    }

    /// Non-zero counts keyed by kind name.
    pub fn by_kind(&self) -> BTreeMap<String, usize> {
        EventKind::ALL
            .iter()
            .filter(|kind| self.count(**kind) > 0)
            .map(|kind| (kind.name().to_string(), self.count(*kind)))
            .collect()
    }
}

/// Owns the replay state and the reconstructed event sequence.
#[derive(Debug, Default)]
pub struct TrackerProcessor {
    config: ProcessorConfig,
    state: ReplayState,
    events: Vec<TrackerEvent>,
    /// Pending event indices keyed by the reference they wait on.
    waiting: HashMap<UnresolvedRef, Vec<usize>>,
    /// Pending event index -> keys it is filed under.
    pending: HashMap<usize, Vec<UnresolvedRef>>,
    /// Insertion order of pending events, oldest first. May hold stale indices.
    pending_order: VecDeque<usize>,
    stats: ProcessorStats,
}

impl TrackerProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Register a player known from outside the tracker stream.
    pub fn add_player(&mut self, player: Player) {
        let pid = player.pid;
        if self.state.add_player(player) {
            self.retry(&[UnresolvedRef::Player(pid)]);
        }
    }

    /// Decode and process a single record.
    ///
    /// Returns the index of the appended event, or `None` if the record was
    /// skipped.
    pub fn process_record(&mut self, record: &TrackerRecord) -> Result<Option<usize>> {
        self.stats.records += 1;
        match TrackerEvent::decode(record) {
            Ok(event) => {
                self.stats.build = record.build;
                Ok(Some(self.process_event(event)))
            }
            Err(e) => {
                self.reject(self.stats.records, e)?;
                Ok(None)
            }
        }
    }

    /// Decode a batch in parallel, then process it in order.
    pub fn process_records(&mut self, records: &[TrackerRecord]) -> Result<()> {
        let decoded: Vec<Result<(u32, TrackerEvent)>> = records
            .par_iter()
            .map(|record| -> Result<(u32, TrackerEvent)> {
                Ok((record.build, TrackerEvent::decode(record)?))
            })
            .collect();
        self.ingest(decoded)
    }

    /// Read a JSON-lines record file and process every record in it.
    pub fn process_file(&mut self, path: &Path) -> Result<()> {
        let lines = read_record_file(path)?;
        tracing::debug!(path = %path.display(), lines = lines.len(), "Read record file");
        let decoded: Vec<Result<(u32, TrackerEvent)>> = lines
            .into_par_iter()
            .map(|line| -> Result<(u32, TrackerEvent)> {
                let record = line?;
                Ok((record.build, TrackerEvent::decode(&record)?))
            })
            .collect();
        self.ingest(decoded)
    }

    fn ingest(&mut self, decoded: Vec<Result<(u32, TrackerEvent)>>) -> Result<()> {
        for item in decoded {
            self.stats.records += 1;
            match item {
                Ok((build, event)) => {
                    self.stats.build = build;
                    self.process_event(event);
                }
                Err(e) => self.reject(self.stats.records, e)?,
            }
        }
        tracing::info!(
            records = self.stats.records,
            events = self.events.len(),
            skipped = self.stats.skipped,
            unresolved = self.unresolved_count(),
            "Processed tracker stream"
        );
        Ok(())
    }

    /// Skip a failed record, or hand the error back when skipping is off.
    fn reject(&mut self, record: usize, error: TrackerError) -> Result<()> {
        let skippable =
            error.is_record_scoped() || matches!(error, TrackerError::Json { .. });
        if self.config.skip_malformed && skippable {
            tracing::warn!(record, error = %error, "Skipping malformed tracker record");
            self.stats.skipped += 1;
            Ok(())
        } else {
            Err(error)
        }
    }

    /// Apply, resolve and append an already decoded event.
    ///
    /// Returns the event's index in [`events`](Self::events).
    pub fn process_event(&mut self, mut event: TrackerEvent) -> usize {
        let available = self.state.apply(&event);
        let state = event.resolve(&self.state);
        self.retry(&available);

        let index = self.events.len();
        self.stats.by_kind[event.kind().tag() as usize] += 1;
        // Slot lookups are only meaningful at the event's own frame, so a
        // later occupant of the slot must not satisfy them.
        let waiting_on: Vec<UnresolvedRef> = match state {
            ResolveState::Resolved => Vec::new(),
            ResolveState::Unresolved => event
                .unresolved_references()
                .into_iter()
                .filter(|r| !matches!(r, UnresolvedRef::UnitIndex(_)))
                .collect(),
        };
        self.events.push(event);
        if !waiting_on.is_empty() {
            self.track(index, waiting_on);
        }
        index
    }

    /// Re-resolve pending events waiting on any of `keys`.
    fn retry(&mut self, keys: &[UnresolvedRef]) {
        for key in keys {
            let Some(indices) = self.waiting.remove(key) else {
                continue;
            };
            for index in indices {
                if !self.pending.contains_key(&index) {
                    continue;
                }
                self.stats.retries += 1;
                let Some(event) = self.events.get_mut(index) else {
                    continue;
                };
                if event.resolve(&self.state) == ResolveState::Resolved {
                    tracing::debug!(index, %key, "Resolved pending event");
                    self.untrack(index);
                }
            }
        }
    }

    fn track(&mut self, index: usize, keys: Vec<UnresolvedRef>) {
        if !self.config.retry_unresolved || self.config.max_pending == 0 {
            return;
        }
        while self.pending.len() >= self.config.max_pending {
            let Some(oldest) = self.pending_order.pop_front() else {
                break;
            };
            if self.untrack(oldest) {
                self.stats.dropped_pending += 1;
                tracing::debug!(index = oldest, "Pending list full, dropping oldest event");
            }
        }
        if self.pending_order.len() > self.config.max_pending.saturating_mul(2) {
            let pending = &self.pending;
            self.pending_order.retain(|i| pending.contains_key(i));
        }

        for key in &keys {
            self.waiting.entry(*key).or_default().push(index);
        }
        self.pending.insert(index, keys);
        self.pending_order.push_back(index);
    }

    /// Forget a pending event. Returns `false` if it was not pending.
    fn untrack(&mut self, index: usize) -> bool {
        let Some(keys) = self.pending.remove(&index) else {
            return false;
        };
        for key in keys {
            if let Some(indices) = self.waiting.get_mut(&key) {
                indices.retain(|&i| i != index);
                if indices.is_empty() {
                    self.waiting.remove(&key);
                }
            }
        }
        true
    }

    pub fn events(&self) -> &[TrackerEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TrackerEvent> {
        self.events
    }

    pub fn state(&self) -> &ReplayState {
        &self.state
    }

    pub fn stats(&self) -> &ProcessorStats {
        &self.stats
    }

    /// Events currently on the retry list.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Events holding at least one unresolved reference.
    pub fn unresolved_count(&self) -> usize {
        self.events.iter().filter(|e| !e.is_resolved()).count()
    }

    /// Summarize the stream for the worker's output.
    pub fn to_worker_output(&self, elapsed_ms: u128) -> WorkerOutput {
        let mut players: BTreeMap<u32, WorkerPlayerSummary> = BTreeMap::new();
        for event in &self.events {
            if let EventBody::PlayerStats(stats) = &event.body {
                players.insert(stats.pid, WorkerPlayerSummary::from_stats(event.frame, stats));
            }
        }

        WorkerOutput {
            build: self.stats.build,
            records_read: self.stats.records,
            skipped: self.stats.skipped,
            unresolved: self.unresolved_count(),
            events_by_kind: self.stats.by_kind(),
            players: players.into_values().collect(),
            elapsed_ms,
        }
    }
}
