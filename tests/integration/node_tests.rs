//! Node lifecycle: setup sequence, main cycle, cooperative delay.

use embedded_hal::digital::PinState;
use scout::config::EngineConfig;
use scout::error::BusError;
use scout::pins::{BATT_ALARM_PIN, CHG_STATUS_PIN, VCC_ENABLE_PIN};
use scout::roles::{PinConfig, WIFI_BACKPACK};
use scout::scheduler::TimerId;
use scout::ScoutNode;

use super::mock_hw::{
    CountingTask, MockBoard, RecordingSink, TestClock, digital_recorder, new_log,
};

fn node_with(board: MockBoard) -> (ScoutNode<MockBoard, TestClock>, TestClock) {
    let clock = TestClock::stepping(1_000, 1);
    let node = ScoutNode::new(&EngineConfig::default(), board, clock.clone());
    (node, clock)
}

#[test]
fn setup_configures_power_path_and_starts_timers() {
    let mut board = MockBoard::new();
    board.attached.push(WIFI_BACKPACK);
    let (mut node, _clock) = node_with(board);
    let task = CountingTask::default();
    node.add_task(Box::new(task.clone()));

    node.setup().expect("setup");

    let board = node.board();
    assert_eq!(
        &board.mode_changes[..3],
        &[
            (CHG_STATUS_PIN, PinConfig::INPUT_PULLUP),
            (BATT_ALARM_PIN, PinConfig::INPUT_PULLUP),
            (VCC_ENABLE_PIN, PinConfig::OUTPUT),
        ]
    );
    let vcc: Vec<PinState> = board
        .writes
        .iter()
        .filter(|(pin, _)| *pin == VCC_ENABLE_PIN)
        .map(|(_, level)| *level)
        .collect();
    assert_eq!(vcc, vec![PinState::Low, PinState::High]);
    assert!(node.is_backpack_vcc_enabled());
    assert_eq!(board.alert_percent, Some(20));

    assert!(node.is_lead_scout());
    assert_eq!(task.setups.get(), 1);
    for id in TimerId::ALL {
        assert!(node.engine().is_running(id));
    }
}

#[test]
fn setup_power_cycle_waits_before_enumerating() {
    let (mut node, clock) = node_with(MockBoard::new());
    let before = clock.peek();
    node.setup().expect("setup");
    // 100 ms off, 5 ms settle.
    assert!(clock.peek().wrapping_sub(before) >= 105);
}

#[test]
fn enumeration_failure_is_not_fatal() {
    let mut board = MockBoard::new();
    board.attached.push(WIFI_BACKPACK);
    board.enumerate_error = Some(BusError::NoResponse);
    let (mut node, _clock) = node_with(board);

    node.setup().expect("setup");
    assert!(!node.is_lead_scout());
    assert!(node.engine().is_running(TimerId::Digital));
}

#[test]
fn setup_snapshot_feeds_telemetry_getters() {
    let mut board = MockBoard::new();
    board.soc_raw = 150;
    board.voltage = 4100;
    board.temperature = 27;
    board.charging_line = PinState::Low;
    let (mut node, _clock) = node_with(board);

    node.setup().expect("setup");

    assert_eq!(node.battery_percentage(), 100);
    assert_eq!(node.battery_voltage(), 4100);
    assert_eq!(node.temperature(), 27);
    assert!(node.is_battery_charging());
    assert!(!node.is_battery_alarm_triggered());
}

#[test]
fn delay_keeps_sampling_at_new_periods() {
    let (mut node, _clock) = node_with(MockBoard::new());

    node.set_periods(100, 5000, 10_000).expect("set periods");
    node.delay(250);

    let counters = node.engine().tick_counters();
    assert_eq!(counters.digital, 2);
    assert_eq!(counters.analog, 0);
    assert_eq!(counters.peripheral, 0);
}

#[test]
fn delay_dispatches_changes_while_waiting() {
    let (mut node, _clock) = node_with(MockBoard::new());
    let log = new_log();
    node.engine_mut().set_digital_handler(Some(digital_recorder(&log)));
    node.setup().expect("setup");

    node.board_mut().set_level(5, PinState::Low);
    node.delay(60);

    assert_eq!(log.borrow().len(), 1);
    assert_eq!(node.engine().digital_state()[3], Some(PinState::Low));
}

#[test]
fn lead_only_tasks_wait_for_wifi_backpack() {
    let (mut node, _clock) = node_with(MockBoard::new());
    let shell = CountingTask::default();
    let wifi = CountingTask {
        lead_only: true,
        ..CountingTask::default()
    };
    node.add_task(Box::new(shell.clone()));
    node.add_task(Box::new(wifi.clone()));

    node.loop_once();
    node.loop_once();
    assert_eq!(shell.polls.get(), 2);
    assert_eq!(wifi.polls.get(), 0);

    node.board_mut().set_lead(true);
    node.loop_once();
    assert_eq!(shell.polls.get(), 3);
    assert_eq!(wifi.polls.get(), 1);
}

#[test]
fn backpack_vcc_follows_enable_disable() {
    let (mut node, _clock) = node_with(MockBoard::new());
    node.enable_backpack_vcc();
    assert_eq!(node.board().last_write(VCC_ENABLE_PIN), Some(PinState::High));
    assert!(node.is_backpack_vcc_enabled());

    node.disable_backpack_vcc();
    assert_eq!(node.board().last_write(VCC_ENABLE_PIN), Some(PinState::Low));
    assert!(!node.is_backpack_vcc_enabled());
}

#[test]
fn factory_reset_needs_confirmation() {
    let (mut node, _clock) = node_with(MockBoard::new());
    assert!(!node.factory_reset());
    assert!(node.factory_reset());
    assert!(node.factory_reset());
}

#[test]
fn verbose_node_announces_through_custom_sink() {
    let sink = RecordingSink::default();
    let config = EngineConfig {
        verbose: true,
        ..EngineConfig::default()
    };
    let clock = TestClock::stepping(0, 1);
    let mut node = ScoutNode::new(&config, MockBoard::new(), clock)
        .with_diagnostic_sink(Box::new(sink.clone()));
    let log = new_log();
    node.engine_mut().set_digital_handler(Some(digital_recorder(&log)));
    node.setup().expect("setup");

    node.board_mut().set_level(8, PinState::Low);
    node.delay(60);

    assert_eq!(
        *sink.lines.borrow(),
        vec!["Running: digitalPinEventHandler(8,0)".to_owned()]
    );
}
