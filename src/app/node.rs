//! The Scout node, the object the host program owns and loops on.
//!
//! [`ScoutNode`] glues the [`EventEngine`] to its collaborators: the board
//! (pins, gauge, backpack bus), the clock, the diagnostic sink, and the
//! cooperative loop tasks (shell, script handler, Wi-Fi).
//!
//! ## Cooperative delay
//!
//! Nothing in the firmware may truly sleep; a sleeping call stack starves
//! the timers.  Code that needs to wait calls [`ScoutNode::delay`], which
//! keeps running [`ScoutNode::loop_once`] until the deadline passes, so
//! sampling and dispatch continue underneath the wait.  Handlers cannot
//! reach the node while it is running them, so a handler can never start a
//! nested delay.

use embedded_hal::digital::PinState;
use log::{info, warn};

use crate::adapters::log_sink::LogDiagnosticSink;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::pins::{BATT_ALARM_PIN, CHG_STATUS_PIN, VCC_ENABLE_PIN};
use crate::roles::{PinConfig, is_lead_role};
use crate::scheduler::Deadline;
use crate::sensors::TelemetrySnapshot;

use super::engine::EventEngine;
use super::ports::{Board, Clock, DiagnosticSink, LoopTask};

/// Backpack rail off-time during the power cycle in `setup` (ms).
const BACKPACK_POWER_CYCLE_MS: u32 = 100;
/// Settle time before the first enumeration; slaves need ~1 ms.
const BACKPACK_SETTLE_MS: u32 = 5;

pub struct ScoutNode<B: Board, C: Clock> {
    engine: EventEngine,
    board: B,
    clock: C,
    sink: Box<dyn DiagnosticSink>,
    tasks: Vec<Box<dyn LoopTask<B>>>,
    battery_alert_percent: u8,
    vcc_enabled: bool,
    factory_reset_armed: bool,
}

impl<B: Board, C: Clock> ScoutNode<B, C> {
    /// Construct the node.  Nothing touches hardware until [`setup`].
    ///
    /// [`setup`]: ScoutNode::setup
    pub fn new(config: &EngineConfig, board: B, clock: C) -> Self {
        Self {
            engine: EventEngine::new(config),
            board,
            clock,
            sink: Box::new(LogDiagnosticSink::new()),
            tasks: Vec::new(),
            battery_alert_percent: config.battery_alert_percent,
            vcc_enabled: false,
            factory_reset_armed: false,
        }
    }

    /// Replace the default log-backed announcement sink.
    pub fn with_diagnostic_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Append a task to the main cycle.  Tasks run in insertion order.
    pub fn add_task(&mut self, task: Box<dyn LoopTask<B>>) {
        self.tasks.push(task);
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the node up: power path pins, backpack power cycle and
    /// enumeration, task setup, gauge alert, state snapshot, timers.
    pub fn setup(&mut self) -> Result<()> {
        self.board.set_pin_mode(CHG_STATUS_PIN, PinConfig::INPUT_PULLUP);
        self.board.set_pin_mode(BATT_ALARM_PIN, PinConfig::INPUT_PULLUP);
        self.board.set_pin_mode(VCC_ENABLE_PIN, PinConfig::OUTPUT);

        self.disable_backpack_vcc();
        self.delay(BACKPACK_POWER_CYCLE_MS);
        self.enable_backpack_vcc();

        self.delay(BACKPACK_SETTLE_MS);
        match self.board.enumerate() {
            Ok(count) => info!("Backpack bus: {} slave(s), lead={}", count, self.is_lead_scout()),
            // Not fatal: the node runs without backpacks.
            Err(e) => warn!("Backpack enumeration failed: {}", e),
        }

        for task in &mut self.tasks {
            task.setup(&mut self.board);
        }

        self.board.configure_battery_alert(self.battery_alert_percent);

        self.engine.capture_snapshot(&mut self.board);
        self.engine.start_all(self.clock.now_ms())?;
        info!("Scout node ready");
        Ok(())
    }

    /// One iteration of the main cycle: engine tick, then every task.
    /// Lead-only tasks are skipped unless the node is lead scout.
    ///
    /// Returns the number of events the engine dispatched.
    pub fn loop_once(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let dispatched = self.engine.tick(now, &mut self.board, &mut *self.sink);

        let lead = self.is_lead_scout();
        for task in &mut self.tasks {
            if lead || !task.lead_only() {
                task.poll(&mut self.board);
            }
        }
        dispatched
    }

    /// Busy-wait `ms` milliseconds while still running the main cycle.
    pub fn delay(&mut self, ms: u32) {
        let deadline = Deadline::after(self.clock.now_ms(), ms);
        while deadline.pending(self.clock.now_ms()) {
            self.loop_once();
        }
    }

    // ── Event control ─────────────────────────────────────────

    pub fn set_periods(&mut self, digital_ms: u32, analog_ms: u32, peripheral_ms: u32) -> Result<()> {
        let now = self.clock.now_ms();
        self.engine.set_periods(digital_ms, analog_ms, peripheral_ms, now)
    }

    pub fn start_digital_events(&mut self) -> Result<()> {
        self.engine.start_digital_events(self.clock.now_ms())
    }

    pub fn stop_digital_events(&mut self) {
        self.engine.stop_digital_events();
    }

    pub fn start_analog_events(&mut self) -> Result<()> {
        self.engine.start_analog_events(self.clock.now_ms())
    }

    pub fn stop_analog_events(&mut self) {
        self.engine.stop_analog_events();
    }

    pub fn start_peripheral_events(&mut self) -> Result<()> {
        self.engine.start_peripheral_events(self.clock.now_ms())
    }

    pub fn stop_peripheral_events(&mut self) {
        self.engine.stop_peripheral_events();
    }

    // ── Backpack power ────────────────────────────────────────

    pub fn enable_backpack_vcc(&mut self) {
        self.vcc_enabled = true;
        self.board.digital_write(VCC_ENABLE_PIN, PinState::High);
    }

    pub fn disable_backpack_vcc(&mut self) {
        self.vcc_enabled = false;
        self.board.digital_write(VCC_ENABLE_PIN, PinState::Low);
    }

    pub fn is_backpack_vcc_enabled(&self) -> bool {
        self.vcc_enabled
    }

    // ── Queries ───────────────────────────────────────────────

    /// True while a Wi-Fi backpack is attached.
    pub fn is_lead_scout(&self) -> bool {
        is_lead_role(self.board.slave_ids())
    }

    pub fn telemetry(&self) -> &TelemetrySnapshot {
        self.engine.snapshot()
    }

    pub fn battery_percentage(&self) -> u8 {
        self.engine.snapshot().battery_percentage
    }

    pub fn battery_voltage(&self) -> u16 {
        self.engine.snapshot().battery_voltage
    }

    pub fn is_battery_charging(&self) -> bool {
        self.engine.snapshot().is_charging
    }

    pub fn is_battery_alarm_triggered(&self) -> bool {
        self.engine.snapshot().is_alarm_triggered
    }

    pub fn temperature(&self) -> i16 {
        self.engine.snapshot().temperature
    }

    /// Two-step factory reset confirmation: the first call arms and
    /// returns `false`, every later call returns `true`.
    pub fn factory_reset(&mut self) -> bool {
        if self.factory_reset_armed {
            true
        } else {
            warn!("Factory reset armed; call again to confirm");
            self.factory_reset_armed = true;
            false
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn engine(&self) -> &EventEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EventEngine {
        &mut self.engine
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}
