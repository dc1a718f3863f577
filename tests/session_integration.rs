//! Session workflow through the channel bridge

mod common;

use common::builders::{sample_dataset, FlowRecordBuilder};
use common::session_helpers::{calibrated_session, last_snapshot};
use flowvis_rs::pipeline::{FilterCommand, FilterEvent, FilterUpdate, RangeField, TopMode};
use std::time::Duration;

#[test]
fn test_calibrated_session_shows_latest_quarter() {
    let (session, _bridge, ids) = calibrated_session(sample_dataset());

    let bounds = session.range_bounds();
    let quarter = bounds.iter().find(|b| b.id == ids.quarter).unwrap();
    assert_eq!(quarter.field, RangeField::Time);
    assert_eq!((quarter.min, quarter.max), (20152.0, 20152.0));

    // Entity totals within 20152: Ministry A 50, City C 10. Bank B's only row
    // carries the excluded attribute, so it never reaches the entity range.
    let entity = bounds.iter().find(|b| b.id == ids.entity_euro).unwrap();
    common::assert_float_eq(entity.min, 10.0, 1e-9);
    common::assert_float_eq(entity.max, 50.0, 1e-9);
}

#[test]
fn test_search_via_bridge_deactivates_top() {
    let (mut session, bridge, _) = calibrated_session(sample_dataset());

    bridge.set_top_mode(Some(TopMode::Top));
    bridge.set_entity_search_term("city");
    assert!(session.process_pending());

    let events = bridge.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, FilterEvent::TopFilterDeactivated)));

    let snapshot = last_snapshot(&events).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.records[0].source_node(), "City C");
    assert_eq!(snapshot.total, 4);
}

#[test]
fn test_generation_increments_per_run() {
    let (mut session, bridge, ids) = calibrated_session(sample_dataset());
    let start = session.generation();

    bridge.set_range(ids.payment_euro, 0.0, 1000.0);
    bridge.set_media_search_term("radio");
    session.process_pending();

    assert_eq!(session.generation(), start + 2);
    let snapshot = last_snapshot(&bridge.drain()).unwrap();
    assert_eq!(snapshot.generation, start + 2);
}

#[test]
fn test_calibrate_range_resets_to_stage_extent() {
    let (mut session, bridge, ids) = calibrated_session(sample_dataset());

    bridge.set_range(ids.payment_euro, 50.0, 60.0);
    bridge
        .send_command(FilterCommand::CalibrateRange(ids.payment_euro))
        .unwrap();
    session.process_pending();

    // Payments reaching the range: latest quarter, attribute "31" excluded
    let bounds = session.range_bounds();
    let payment = bounds.iter().find(|b| b.id == ids.payment_euro).unwrap();
    assert_eq!((payment.min, payment.max), (10.0, 50.0));
    assert_eq!(last_snapshot(&bridge.drain()).unwrap().len(), 2);
}

#[test]
fn test_calibrated_entity_range_keeps_every_visible_record() {
    let (mut session, bridge, ids) = calibrated_session(vec![
        FlowRecordBuilder::new("Agency A", "Weekly").time(20151).value(100.0).build(),
        FlowRecordBuilder::new("Agency A", "Weekly").time(20152).value(1.0).build(),
        FlowRecordBuilder::new("Agency B", "Weekly").time(20152).value(50.0).build(),
        FlowRecordBuilder::new("Agency B", "Weekly")
            .time(20152)
            .value(500.0)
            .attribute("31")
            .build(),
    ]);

    bridge.set_range(ids.entity_euro, 2.0, 3.0);
    bridge
        .send_command(FilterCommand::CalibrateRange(ids.entity_euro))
        .unwrap();
    session.process_pending();

    let snapshot = last_snapshot(&bridge.drain()).unwrap();
    let values: Vec<_> = snapshot.records.iter().map(|r| r.value_node()).collect();
    assert_eq!(values, vec![1.0, 50.0]);
}

#[test]
fn test_calibrate_unknown_range_reports_error() {
    let (mut session, bridge, _) = calibrated_session(sample_dataset());

    bridge
        .send_command(FilterCommand::CalibrateRange(flowvis_rs::pipeline::FilterId(99)))
        .unwrap();
    session.process_pending();

    match bridge.drain().as_slice() {
        [FilterEvent::Error(message)] => assert!(message.contains("#99")),
        other => panic!("unexpected events {:?}", other),
    }
}

#[test]
fn test_interaction_log_records_updates() {
    let (mut session, bridge, ids) = calibrated_session(sample_dataset());

    bridge.update(FilterUpdate::AddAttribute {
        id: ids.paragraph,
        value: "31".to_string(),
    });
    bridge.clear_filters();
    bridge.submit_log();
    session.process_pending();

    let entries = bridge
        .drain()
        .into_iter()
        .find_map(|e| match e {
            FilterEvent::LogSubmitted(entries) => Some(entries),
            _ => None,
        })
        .unwrap();
    let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["attribute selected", "clear filters"]);
    assert_eq!(entries[0].values, vec!["31".to_string()]);
}

#[test]
fn test_replace_dataset_recalibrates() {
    let (mut session, bridge, ids) = calibrated_session(sample_dataset());

    let snapshot = session.replace_dataset(vec![
        FlowRecordBuilder::new("Agency D", "Weekly").time(20163).value(7.0).build(),
        FlowRecordBuilder::new("Agency D", "Weekly").time(20164).value(8.0).build(),
    ]);

    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.records[0].time_node().to_string(), "2016Q4");

    let bounds = session.range_bounds();
    let quarter = bounds.iter().find(|b| b.id == ids.quarter).unwrap();
    assert_eq!(quarter.min, 20164.0);
    assert!(bridge
        .drain()
        .iter()
        .any(|e| matches!(e, FilterEvent::SliderRangesChanged(_))));
}

#[test]
fn test_session_thread_stops_on_shutdown() {
    let (mut session, bridge, _) = calibrated_session(sample_dataset());
    let handle = std::thread::spawn(move || session.run());

    bridge.print_filters();
    bridge.shutdown();

    let mut printed = None;
    loop {
        match bridge
            .event_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("session should answer")
        {
            FilterEvent::FiltersPrinted(lines) => printed = Some(lines),
            FilterEvent::Shutdown => break,
            _ => {}
        }
    }
    handle.join().unwrap();

    let printed = printed.unwrap();
    assert_eq!(printed[0], "Filter Count: 10");
    assert_eq!(printed[1], "Top Filter: disabled");
}

#[test]
fn test_session_stops_when_bridge_dropped() {
    let (mut session, bridge, _) = calibrated_session(sample_dataset());
    let handle = std::thread::spawn(move || session.run());

    drop(bridge);
    handle.join().unwrap();
}
