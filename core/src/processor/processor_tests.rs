//! End-to-end tests for the tracker processor
//!
//! Drives short record streams through the processor and checks how events
//! link to the replay state, including forward references and bad input.

use std::sync::Arc;

use tracker_types::ProcessorConfig;

use super::TrackerProcessor;
use crate::error::TrackerError;
use crate::events::{EventBody, EventKind, Location, ResolveState, UnresolvedRef};
use crate::record::{TrackerRecord, Value};
use crate::state::{Player, Registry};
use crate::unit_id::UnitId;

const BUILD: u32 = 80188;

fn record(frame: u64, kind: EventKind, data: Vec<Value>) -> TrackerRecord {
    TrackerRecord::new(frame, kind, BUILD, data)
}

fn born(frame: u64, index: i64, recycle: i64, name: &str, pid: i64) -> TrackerRecord {
    record(
        frame,
        EventKind::UnitBorn,
        vec![
            Value::Int(index),
            Value::Int(recycle),
            Value::from(name),
            Value::Int(pid),
            Value::Int(pid),
            Value::Int(50),
            Value::Int(60),
        ],
    )
}

/// Death of `index/recycle`, optionally credited to a killing unit.
fn died(
    frame: u64,
    index: i64,
    recycle: i64,
    killer_pid: Option<i64>,
    killer: Option<(i64, i64)>,
) -> TrackerRecord {
    let (killer_index, killer_recycle) = killer.unwrap_or((0, 0));
    record(
        frame,
        EventKind::UnitDied,
        vec![
            Value::Int(index),
            Value::Int(recycle),
            killer_pid.map_or(Value::Null, Value::Int),
            Value::Int(70),
            Value::Int(80),
            Value::Int(killer_index),
            Value::Int(killer_recycle),
        ],
    )
}

fn stats(frame: u64, pid: i64, minerals: i64) -> TrackerRecord {
    let mut slots = vec![0i64; 39];
    slots[0] = minerals;
    slots[29] = 12 * 4096;
    slots[30] = 15 * 4096;
    record(
        frame,
        EventKind::PlayerStats,
        vec![Value::Int(pid), Value::from(slots)],
    )
}

fn processor_with_players() -> TrackerProcessor {
    let mut processor = TrackerProcessor::default();
    processor.add_player(Player::new(1, "Serral"));
    processor.add_player(Player::new(2, "Maru"));
    processor
}

fn process(processor: &mut TrackerProcessor, record: &TrackerRecord) -> usize {
    processor
        .process_record(record)
        .unwrap()
        .expect("record should not be skipped")
}

#[test]
fn born_event_resolves_immediately() {
    let mut processor = processor_with_players();
    let idx = process(&mut processor, &born(10, 4, 1, "Probe", 1));

    let event = &processor.events()[idx];
    assert!(event.is_resolved());
    assert_eq!(event.pid(), Some(1));
    assert_eq!(event.player().unwrap().name, "Serral");
    assert_eq!(processor.pending_count(), 0);
    assert_eq!(
        event.to_string(),
        "00.00\t         Serral - Unit born Probe [00100001] at (50, 60)"
    );
}

#[test]
fn forward_killer_reference_resolves_later() {
    let mut processor = processor_with_players();
    process(&mut processor, &born(0, 10, 1, "Marine", 2));
    let died_idx = process(&mut processor, &died(100, 10, 1, Some(1), Some((20, 1))));

    assert_eq!(
        processor.events()[died_idx].unresolved_references(),
        vec![UnresolvedRef::Unit(UnitId::new(20, 1))],
        "only the killer is missing"
    );
    assert_eq!(processor.pending_count(), 1);

    process(&mut processor, &born(120, 20, 1, "Zergling", 1));

    let event = &processor.events()[died_idx];
    assert!(event.is_resolved(), "killer born later must be linked");
    let EventBody::UnitDied(died) = &event.body else {
        panic!("expected UnitDied, got {:?}", event.body);
    };
    let killer = died.killing_unit.as_ref().unwrap().handle().unwrap();
    assert_eq!(killer.name(), "Zergling");
    assert_eq!(died.killing_player.as_ref().unwrap().handle().unwrap().name, "Serral");
    assert_eq!(processor.pending_count(), 0);
    assert_eq!(processor.stats().retries, 1);
}

#[test]
fn died_event_pid_follows_victim_owner() {
    let mut processor = processor_with_players();
    // Death arrives before the victim is known
    let died_idx = process(&mut processor, &died(50, 7, 1, None, None));
    assert_eq!(processor.events()[died_idx].pid(), None);

    process(&mut processor, &born(60, 7, 1, "Drone", 2));
    let event = &processor.events()[died_idx];
    assert_eq!(event.pid(), Some(2));
    assert_eq!(event.player().unwrap().name, "Maru");
}

#[test]
fn death_before_birth_keeps_unit_dead() {
    let mut processor = processor_with_players();
    let died_idx = process(&mut processor, &died(50, 7, 1, Some(1), None));
    process(&mut processor, &born(60, 7, 1, "Drone", 2));

    let id = UnitId::new(7, 1);
    let unit = processor.state().unit(id).unwrap();
    assert_eq!(unit.died_at, Some(50));
    assert_eq!(unit.location, Location { x: 70, y: 80 });
    assert!(processor.state().lookup_active_unit(7).is_none());

    let EventBody::UnitDied(died) = &processor.events()[died_idx].body else {
        panic!("expected UnitDied");
    };
    assert!(!died.unit.handle().unwrap().is_alive());
    assert_eq!(died.countable_unit_death(), Some(true));

    // Position updates for the freed slot must not move the dead drone
    let idx = process(
        &mut processor,
        &record(
            336,
            EventKind::UnitPositions,
            vec![Value::Int(7), Value::from(vec![0, 90, 91])],
        ),
    );
    assert_eq!(
        processor.events()[idx].unresolved_references(),
        vec![UnresolvedRef::UnitIndex(7)]
    );
    assert_eq!(
        processor.state().unit(id).unwrap().location,
        Location { x: 70, y: 80 }
    );
}

#[test]
fn resolution_is_idempotent() {
    let mut processor = processor_with_players();
    let idx = process(&mut processor, &born(0, 3, 1, "SCV", 2));
    let handle = match &processor.events()[idx].body {
        EventBody::UnitBorn(e) => e.unit.handle().cloned().unwrap(),
        other => panic!("unexpected body {other:?}"),
    };

    process(&mut processor, &died(40, 3, 1, None, None));

    // Re-resolving an already linked event keeps its original snapshot
    let mut event = processor.events()[idx].clone();
    assert_eq!(event.resolve(processor.state()), ResolveState::Resolved);
    assert_eq!(event.resolve(processor.state()), ResolveState::Resolved);
    let EventBody::UnitBorn(born) = &event.body else {
        panic!("expected UnitBorn");
    };
    let kept = born.unit.handle().unwrap();
    assert!(Arc::ptr_eq(kept, &handle));
    assert!(kept.is_alive());
    assert!(
        !processor
            .state()
            .lookup_unit(UnitId::new(3, 1))
            .unwrap()
            .is_alive()
    );
}

#[test]
fn pending_list_drops_oldest_when_full() {
    let config = ProcessorConfig {
        max_pending: 1,
        ..ProcessorConfig::default()
    };
    let mut processor = TrackerProcessor::new(config);
    processor.add_player(Player::new(1, "Serral"));
    process(&mut processor, &born(0, 1, 1, "Marine", 1));
    process(&mut processor, &born(0, 2, 1, "Marine", 1));

    let first = process(&mut processor, &died(10, 1, 1, Some(1), Some((30, 1))));
    let second = process(&mut processor, &died(11, 2, 1, Some(1), Some((31, 1))));
    assert_eq!(processor.pending_count(), 1);
    assert_eq!(processor.stats().dropped_pending, 1);

    process(&mut processor, &born(20, 30, 1, "Baneling", 1));
    process(&mut processor, &born(21, 31, 1, "Baneling", 1));

    assert!(
        !processor.events()[first].is_resolved(),
        "evicted event stays unresolved"
    );
    assert!(processor.events()[second].is_resolved());
    assert_eq!(processor.unresolved_count(), 1);
}

#[test]
fn retry_can_be_disabled() {
    let config = ProcessorConfig {
        retry_unresolved: false,
        ..ProcessorConfig::default()
    };
    let mut processor = TrackerProcessor::new(config);
    let idx = process(&mut processor, &stats(0, 1, 100));
    processor.add_player(Player::new(1, "Serral"));

    assert_eq!(processor.pending_count(), 0);
    assert!(!processor.events()[idx].is_resolved());
}

#[test]
fn late_player_resolves_pending_stats() {
    let mut processor = TrackerProcessor::default();
    let idx = process(&mut processor, &stats(160, 3, 100));
    assert!(!processor.events()[idx].is_resolved());

    process(
        &mut processor,
        &record(
            200,
            EventKind::PlayerSetup,
            vec![Value::Int(3), Value::Int(2), Value::Null, Value::Int(2)],
        ),
    );
    assert!(processor.events()[idx].is_resolved());
    assert_eq!(processor.events()[idx].pid(), Some(3));
}

#[test]
fn malformed_records_are_skipped_by_default() {
    let mut processor = processor_with_players();
    let mut bad = born(0, 1, 1, "Probe", 1);
    bad.data.truncate(3);
    let unknown = TrackerRecord {
        frame: 0,
        kind: 99,
        build: BUILD,
        data: vec![],
    };

    assert_eq!(processor.process_record(&bad).unwrap(), None);
    assert_eq!(processor.process_record(&unknown).unwrap(), None);
    process(&mut processor, &born(1, 2, 1, "Probe", 1));

    assert_eq!(processor.stats().skipped, 2);
    assert_eq!(processor.stats().records, 3);
    assert_eq!(processor.events().len(), 1);
}

#[test]
fn malformed_record_aborts_when_configured() {
    let config = ProcessorConfig {
        skip_malformed: false,
        ..ProcessorConfig::default()
    };
    let mut processor = TrackerProcessor::new(config);
    let mut bad = born(0, 1, 1, "Probe", 1);
    bad.data.truncate(3);

    let err = processor.process_records(&[born(0, 2, 1, "Probe", 1), bad]).unwrap_err();
    assert!(matches!(
        err,
        TrackerError::MalformedRecord {
            kind: EventKind::UnitBorn,
            ..
        }
    ));
    assert_eq!(processor.events().len(), 1, "records before the failure are kept");
}

#[test]
fn batch_processing_preserves_stream_order() {
    let mut processor = processor_with_players();
    let records: Vec<TrackerRecord> = (0..64)
        .map(|i| born(i as u64, i + 1, 1, "Zergling", 1 + i % 2))
        .collect();
    processor.process_records(&records).unwrap();

    let frames: Vec<u32> = processor.events().iter().map(|e| e.frame).collect();
    assert_eq!(frames, (0..64).collect::<Vec<u32>>());
    assert_eq!(processor.stats().count(EventKind::UnitBorn), 64);
    assert_eq!(processor.state().live_unit_count(), 64);
}

#[test]
fn positions_link_to_live_slots_only() {
    let mut processor = processor_with_players();
    process(&mut processor, &born(0, 5, 1, "Stalker", 1));
    let idx = process(
        &mut processor,
        &record(
            336,
            EventKind::UnitPositions,
            vec![Value::Int(0), Value::from(vec![5, 11, 12, 4, 13, 14])],
        ),
    );

    let event = &processor.events()[idx];
    let EventBody::UnitPositions(positions) = &event.body else {
        panic!("expected UnitPositions");
    };
    let linked: Vec<_> = positions
        .unit_locations()
        .map(|(unit, loc)| (unit.id, loc))
        .collect();
    assert_eq!(linked, vec![(UnitId::new(5, 1), Location { x: 11, y: 12 })]);
    assert_eq!(
        event.unresolved_references(),
        vec![UnresolvedRef::UnitIndex(9)]
    );
    assert_eq!(processor.pending_count(), 0, "slot lookups are not retried");
    assert_eq!(
        processor.state().unit(UnitId::new(5, 1)).unwrap().location,
        Location { x: 11, y: 12 }
    );
}

#[test]
fn worker_output_keeps_last_stats_per_player() {
    let mut processor = processor_with_players();
    process(&mut processor, &stats(160, 2, 50));
    process(&mut processor, &stats(160, 1, 100));
    process(&mut processor, &stats(320, 1, 250));

    let output = processor.to_worker_output(7);
    assert_eq!(output.build, BUILD);
    assert_eq!(output.records_read, 3);
    assert_eq!(output.unresolved, 0);
    assert_eq!(output.events_by_kind.get("PlayerStatsEvent"), Some(&3));
    assert_eq!(output.players.len(), 2);
    assert_eq!(output.players[0].name, "Serral");
    assert_eq!(output.players[0].frame, 320);
    assert_eq!(output.players[0].minerals_current, 250);
    assert_eq!(output.players[0].food_used, 12.0);
    assert_eq!(output.players[1].pid, 2);
}

#[test]
fn record_file_skips_bad_lines() {
    let path = std::env::temp_dir().join(format!("tracker-records-{}.jsonl", std::process::id()));
    let contents = [
        r#"{"frame":0,"kind":9,"build":80188,"data":[1,1,1234,0]}"#,
        "garbage",
        r#"{"frame":10,"kind":1,"build":80188,"data":[4,1,"Probe",1,1,50,60]}"#,
    ]
    .join("\n");
    std::fs::write(&path, contents).unwrap();

    let mut processor = TrackerProcessor::default();
    let result = processor.process_file(&path);
    std::fs::remove_file(&path).ok();
    result.unwrap();

    assert_eq!(processor.stats().records, 3);
    assert_eq!(processor.stats().skipped, 1);
    assert_eq!(processor.events().len(), 2);
    assert!(processor.events().iter().all(|e| e.is_resolved()));
}
