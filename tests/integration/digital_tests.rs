//! Digital and analog change detection through the engine.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::PinState;
use scout::app::events::NodeEvent;
use scout::config::EngineConfig;
use scout::roles::PinConfig;
use scout::EventEngine;

use super::mock_hw::{MockBoard, RecordingSink, analog_recorder, digital_recorder, new_log};

/// Engine with only the digital timer running, 50 ms period, started at 0.
fn digital_engine() -> EventEngine {
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.start_digital_events(0).expect("start digital");
    engine
}

#[test]
fn level_flip_dispatches_exactly_once() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);

    board.set_level(4, PinState::Low);
    assert_eq!(engine.tick(50, &mut board, &mut sink), 1);
    assert_eq!(
        *log.borrow(),
        vec![NodeEvent::Digital { pin: 4, level: PinState::Low }]
    );

    // Unchanged on the next tick: nothing new.
    assert_eq!(engine.tick(100, &mut board, &mut sink), 0);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn pin_four_low_to_high_reports_one() {
    let mut board = MockBoard::new();
    board.set_level(4, PinState::Low);
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);

    board.set_level(4, PinState::High);
    engine.tick(50, &mut board, &mut sink);

    assert_eq!(
        *log.borrow(),
        vec![NodeEvent::Digital { pin: 4, level: PinState::High }]
    );
    assert_eq!(engine.digital_state()[2], Some(PinState::High));
}

#[test]
fn simultaneous_flips_dispatch_in_ascending_pin_order() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);

    board.set_level(7, PinState::Low);
    board.set_level(2, PinState::Low);
    engine.tick(50, &mut board, &mut sink);

    let pins: Vec<u8> = log
        .borrow()
        .iter()
        .filter_map(|e| match e {
            NodeEvent::Digital { pin, .. } => Some(*pin),
            _ => None,
        })
        .collect();
    assert_eq!(pins, vec![2, 7]);
}

#[test]
fn entering_lead_role_marks_reserved_pins_without_dispatch() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);
    assert!(engine.digital_state().iter().all(Option::is_some));

    board.set_lead(true);
    engine.tick(50, &mut board, &mut sink);

    let state = engine.digital_state();
    assert!(state[4..].iter().all(Option::is_none));
    assert!(state[..4].iter().all(Option::is_some));
    assert!(log.borrow().is_empty());
    assert_eq!(board.digital_reads[6] + board.digital_reads[7] + board.digital_reads[8], 3);
}

#[test]
fn lead_role_leaves_pin_four_working() {
    let mut board = MockBoard::new();
    board.set_level(4, PinState::Low);
    board.set_lead(true);
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);

    board.set_level(4, PinState::High);
    board.set_level(7, PinState::Low);
    engine.tick(50, &mut board, &mut sink);

    assert_eq!(
        *log.borrow(),
        vec![NodeEvent::Digital { pin: 4, level: PinState::High }]
    );
    assert_eq!(engine.digital_state()[5], None);
}

#[test]
fn leaving_lead_role_reports_first_read_of_returned_pins() {
    let mut board = MockBoard::new();
    board.set_lead(true);
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);

    board.set_lead(false);
    engine.tick(50, &mut board, &mut sink);

    let pins: Vec<u8> = log
        .borrow()
        .iter()
        .filter_map(|e| match e {
            NodeEvent::Digital { pin, .. } => Some(*pin),
            _ => None,
        })
        .collect();
    assert_eq!(pins, vec![6, 7, 8]);
}

#[test]
fn non_pullup_pins_are_unavailable() {
    let mut board = MockBoard::new();
    board.configs[3] = Some(PinConfig::OUTPUT);
    board.configs[5] = Some(PinConfig::INPUT);
    board.configs[2] = None;
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);

    board.set_level(3, PinState::Low);
    board.set_level(5, PinState::Low);
    board.set_level(2, PinState::Low);
    engine.tick(50, &mut board, &mut sink);

    assert!(log.borrow().is_empty());
    let state = engine.digital_state();
    assert_eq!(state[0], None);
    assert_eq!(state[1], None);
    assert_eq!(state[3], None);
}

#[test]
fn missing_digital_handler_skips_reads() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let mut engine = digital_engine();
    engine.capture_snapshot(&mut board);
    let reads_after_snapshot = board.total_digital_reads();

    board.set_level(4, PinState::Low);
    assert_eq!(engine.tick(50, &mut board, &mut sink), 0);
    assert_eq!(board.total_digital_reads(), reads_after_snapshot);
    // The slot keeps the snapshot value; the change is seen once a handler exists.
    assert_eq!(engine.digital_state()[2], Some(PinState::High));
}

#[test]
fn deregistered_handler_stops_reads_and_dispatch() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(digital_recorder(&log)));
    engine.capture_snapshot(&mut board);
    engine.tick(50, &mut board, &mut sink);

    engine.set_digital_handler(None);
    let reads = board.total_digital_reads();
    board.set_level(4, PinState::Low);
    engine.tick(100, &mut board, &mut sink);

    assert_eq!(board.total_digital_reads(), reads);
    assert!(log.borrow().is_empty());
}

#[test]
fn verbose_announces_before_each_dispatch() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let lines = Rc::clone(&sink.lines);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_by_handler = Rc::clone(&seen);
    let mut engine = digital_engine();
    engine.set_digital_handler(Some(Box::new(move |_pin: u8, _level: PinState| {
        seen_by_handler.borrow_mut().push(lines.borrow().len());
    })));
    engine.set_verbose(true);
    engine.capture_snapshot(&mut board);

    board.set_level(4, PinState::Low);
    engine.tick(50, &mut board, &mut sink);

    assert_eq!(
        *sink.lines.borrow(),
        vec!["Running: digitalPinEventHandler(4,0)".to_owned()]
    );
    // The handler already saw the line when it ran.
    assert_eq!(*seen.borrow(), vec![1]);

    engine.set_verbose(false);
    board.set_level(4, PinState::High);
    engine.tick(100, &mut board, &mut sink);
    assert_eq!(sink.lines.borrow().len(), 1);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn analog_change_dispatches_channel_index() {
    let mut board = MockBoard::new();
    board.analog = [100; 8];
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.set_analog_handler(Some(analog_recorder(&log)));
    engine.capture_snapshot(&mut board);
    engine.start_analog_events(0).expect("start analog");

    board.analog[3] = 512;
    engine.tick(60_000, &mut board, &mut sink);

    assert_eq!(
        *log.borrow(),
        vec![NodeEvent::Analog { channel: 3, value: 512 }]
    );
    assert_eq!(engine.analog_state()[3], 512);
}

#[test]
fn analog_without_handler_reads_nothing() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.start_analog_events(0).expect("start analog");

    board.analog[0] = 900;
    engine.tick(60_000, &mut board, &mut sink);
    assert_eq!(board.analog_reads, 0);
    assert_eq!(engine.tick_counters().analog, 1);
}

#[test]
fn deregistered_analog_handler_stops_reads_and_dispatch() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let log = new_log();
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.set_analog_handler(Some(analog_recorder(&log)));
    engine.start_analog_events(0).expect("start analog");

    board.analog[1] = 300;
    engine.tick(60_000, &mut board, &mut sink);
    assert_eq!(board.analog_reads, 8);
    assert_eq!(log.borrow().len(), 1);

    engine.set_analog_handler(None);
    board.analog[1] = 700;
    engine.tick(120_000, &mut board, &mut sink);

    assert_eq!(board.analog_reads, 8);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(engine.analog_state()[1], 300);
}
