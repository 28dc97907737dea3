//! Timer start/stop/re-period behaviour seen through the engine.

use scout::config::EngineConfig;
use scout::error::{Error, TimerError};
use scout::scheduler::TimerId;
use scout::EventEngine;

use super::mock_hw::{MockBoard, RecordingSink};

#[test]
fn double_start_is_rejected() {
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.start_analog_events(0).expect("first start");
    assert_eq!(
        engine.start_analog_events(10),
        Err(Error::Timer(TimerError::AlreadyRunning(TimerId::Analog)))
    );
}

#[test]
fn stop_on_stopped_timer_is_noop() {
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.stop_digital_events();
    assert!(!engine.is_running(TimerId::Digital));
    engine.start_digital_events(0).expect("start after stop");
}

#[test]
fn stopped_category_never_ticks() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.start_all(0).expect("start all");
    engine.stop_analog_events();

    engine.tick(60_000, &mut board, &mut sink);
    let counters = engine.tick_counters();
    assert_eq!(counters.analog, 0);
    assert_eq!(counters.peripheral, 1);
}

#[test]
fn set_periods_restarts_without_extra_tick() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.start_all(0).expect("start all");

    // Digital was due at 50; re-period at 40 pushes it to 140.
    engine.set_periods(100, 5000, 10_000, 40).expect("set periods");
    assert_eq!(engine.interval_ms(TimerId::Digital), 100);
    assert_eq!(engine.interval_ms(TimerId::Analog), 5000);
    assert_eq!(engine.interval_ms(TimerId::Peripheral), 10_000);

    engine.tick(50, &mut board, &mut sink);
    engine.tick(139, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 0);

    engine.tick(140, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 1);
}

#[test]
fn set_periods_starts_paused_timers() {
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.set_periods(10, 20, 30, 0).expect("set periods");
    for id in TimerId::ALL {
        assert!(engine.is_running(id));
    }
}

#[test]
fn late_poll_fires_once_then_resyncs() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.start_digital_events(0).expect("start digital");

    // Five periods late: one tick, not five.
    engine.tick(250, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 1);
    engine.tick(299, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 1);
    engine.tick(300, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 2);
}

#[test]
fn timers_survive_clock_wraparound() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let mut engine = EventEngine::new(&EngineConfig::default());
    let start = u32::MAX - 20;
    engine.start_digital_events(start).expect("start digital");

    engine.tick(u32::MAX, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 0);
    engine.tick(start.wrapping_add(50), &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 1);
}

#[test]
fn lead_role_checked_only_for_digital_ticks() {
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::default();
    let mut engine = EventEngine::new(&EngineConfig::default());
    engine.start_analog_events(0).expect("start analog");
    engine.start_peripheral_events(0).expect("start peripheral");

    engine.tick(60_000, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().analog, 1);
    assert_eq!(engine.tick_counters().peripheral, 1);
    assert_eq!(board.slave_id_queries.get(), 0);

    engine.start_digital_events(60_000).expect("start digital");
    engine.tick(60_050, &mut board, &mut sink);
    assert_eq!(engine.tick_counters().digital, 1);
    assert_eq!(board.slave_id_queries.get(), 1);
}
