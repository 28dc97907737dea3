//! State-change engine: timers, samplers and handler slots in one owned
//! object.
//!
//! [`EventEngine`] is held by the host program (normally through
//! [`ScoutNode`](super::node::ScoutNode)); only one instance should drive a
//! given set of physical pins.  It performs I/O only inside [`tick`] and
//! [`capture_snapshot`], through the port traits passed in.
//!
//! ```text
//!   PinPort ──────┐   ┌───────────────────────────────┐
//!  TelemetryPort ─┼──▶│          EventEngine          │──▶ handlers
//!  ExpansionBus ──┘   │ TimerSet · 3 samplers · slots │──▶ DiagnosticSink
//!                     └───────────────────────────────┘     (verbose)
//! ```
//!
//! [`tick`]: EventEngine::tick
//! [`capture_snapshot`]: EventEngine::capture_snapshot

use log::info;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::roles::is_lead_role;
use crate::scheduler::{TimerId, TimerSet};
use crate::sensors::{
    AnalogPinState, AnalogSampler, DigitalPinState, DigitalSampler, TelemetrySampler,
    TelemetrySnapshot,
};

use super::events::EventCategory;
use super::handlers::{
    AnalogHandler, DigitalHandler, Dispatcher, EventHandlers, FlagHandler, PercentageHandler,
    TemperatureHandler, VoltageHandler,
};
use super::ports::{Board, DiagnosticSink};

/// Sampler ticks executed per timer since construction (wrapping).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounters {
    pub digital: u32,
    pub analog: u32,
    pub peripheral: u32,
}

// ───────────────────────────────────────────────────────────────
// EventEngine
// ───────────────────────────────────────────────────────────────

pub struct EventEngine {
    timers: TimerSet,
    digital: DigitalSampler,
    analog: AnalogSampler,
    telemetry: TelemetrySampler,
    handlers: EventHandlers,
    verbose: bool,
    counters: TickCounters,
}

impl EventEngine {
    /// Build an engine with all timers stopped and no handlers registered.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            timers: TimerSet::new(
                config.digital_interval_ms,
                config.analog_interval_ms,
                config.peripheral_interval_ms,
            ),
            digital: DigitalSampler::new(),
            analog: AnalogSampler::new(),
            telemetry: TelemetrySampler::new(),
            handlers: EventHandlers::default(),
            verbose: config.verbose,
            counters: TickCounters::default(),
        }
    }

    // ── Registration ──────────────────────────────────────────

    pub fn set_digital_handler(&mut self, handler: Option<DigitalHandler>) {
        self.handlers.digital = handler;
        log_registration(EventCategory::Digital, self.handlers.digital.is_some());
    }

    pub fn set_analog_handler(&mut self, handler: Option<AnalogHandler>) {
        self.handlers.analog = handler;
        log_registration(EventCategory::Analog, self.handlers.analog.is_some());
    }

    pub fn set_battery_percentage_handler(&mut self, handler: Option<PercentageHandler>) {
        self.handlers.battery_percentage = handler;
        log_registration(
            EventCategory::BatteryPercentage,
            self.handlers.battery_percentage.is_some(),
        );
    }

    pub fn set_battery_voltage_handler(&mut self, handler: Option<VoltageHandler>) {
        self.handlers.battery_voltage = handler;
        log_registration(EventCategory::BatteryVoltage, self.handlers.battery_voltage.is_some());
    }

    pub fn set_charging_handler(&mut self, handler: Option<FlagHandler>) {
        self.handlers.charging = handler;
        log_registration(EventCategory::Charging, self.handlers.charging.is_some());
    }

    pub fn set_alarm_handler(&mut self, handler: Option<FlagHandler>) {
        self.handlers.alarm = handler;
        log_registration(EventCategory::Alarm, self.handlers.alarm.is_some());
    }

    pub fn set_temperature_handler(&mut self, handler: Option<TemperatureHandler>) {
        self.handlers.temperature = handler;
        log_registration(EventCategory::Temperature, self.handlers.temperature.is_some());
    }

    pub fn is_registered(&self, category: EventCategory) -> bool {
        self.handlers.is_registered(category)
    }

    /// Echo every dispatch to the diagnostic sink.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Seed all state from the live hardware without dispatching anything.
    pub fn capture_snapshot(&mut self, board: &mut impl Board) {
        let lead = is_lead_role(board.slave_ids());
        self.digital.capture(board, lead);
        self.analog.capture(board);
        self.telemetry.capture(board);
        info!(
            "Snapshot: battery {}% {}, charging={} alarm={} temp={}",
            self.telemetry.snapshot().battery_percentage,
            self.telemetry.snapshot().battery_voltage,
            self.telemetry.snapshot().is_charging,
            self.telemetry.snapshot().is_alarm_triggered,
            self.telemetry.snapshot().temperature,
        );
    }

    pub fn start_digital_events(&mut self, now: u32) -> Result<()> {
        Ok(self.timers.start(TimerId::Digital, now)?)
    }

    pub fn stop_digital_events(&mut self) {
        self.timers.stop(TimerId::Digital);
    }

    pub fn start_analog_events(&mut self, now: u32) -> Result<()> {
        Ok(self.timers.start(TimerId::Analog, now)?)
    }

    pub fn stop_analog_events(&mut self) {
        self.timers.stop(TimerId::Analog);
    }

    pub fn start_peripheral_events(&mut self, now: u32) -> Result<()> {
        Ok(self.timers.start(TimerId::Peripheral, now)?)
    }

    pub fn stop_peripheral_events(&mut self) {
        self.timers.stop(TimerId::Peripheral);
    }

    /// Start all three timers (digital, analog, peripheral).
    pub fn start_all(&mut self, now: u32) -> Result<()> {
        self.start_digital_events(now)?;
        self.start_analog_events(now)?;
        self.start_peripheral_events(now)
    }

    /// Stop, re-period and restart each timer in turn: digital, analog,
    /// peripheral.  Intervals are not validated here.
    ///
    /// Every timer ends up running afterwards, including one that was
    /// paused before the call.
    pub fn set_periods(
        &mut self,
        digital_ms: u32,
        analog_ms: u32,
        peripheral_ms: u32,
        now: u32,
    ) -> Result<()> {
        self.timers.reconfigure(TimerId::Digital, digital_ms, now)?;
        self.timers.reconfigure(TimerId::Analog, analog_ms, now)?;
        self.timers.reconfigure(TimerId::Peripheral, peripheral_ms, now)?;
        Ok(())
    }

    // ── Per-cycle work ────────────────────────────────────────

    /// Poll the timers and run every sampler that came due.
    ///
    /// Returns the number of events dispatched.
    pub fn tick(&mut self, now: u32, board: &mut impl Board, sink: &mut dyn DiagnosticSink) -> u32 {
        let fired = self.timers.poll(now);
        if fired.is_empty() {
            return 0;
        }

        let sink = if self.verbose { Some(sink) } else { None };
        let mut out = Dispatcher::new(&mut self.handlers, sink);

        for id in fired {
            match id {
                TimerId::Digital => {
                    self.counters.digital = self.counters.digital.wrapping_add(1);
                    let lead = is_lead_role(board.slave_ids());
                    self.digital.tick(board, lead, &mut out);
                }
                TimerId::Analog => {
                    self.counters.analog = self.counters.analog.wrapping_add(1);
                    self.analog.tick(board, &mut out);
                }
                TimerId::Peripheral => {
                    self.counters.peripheral = self.counters.peripheral.wrapping_add(1);
                    self.telemetry.tick(board, &mut out);
                }
            }
        }
        out.dispatched()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    pub fn digital_state(&self) -> &DigitalPinState {
        self.digital.state()
    }

    pub fn analog_state(&self) -> &AnalogPinState {
        self.analog.state()
    }

    pub fn tick_counters(&self) -> TickCounters {
        self.counters
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.timers.get(id).is_running()
    }

    pub fn interval_ms(&self, id: TimerId) -> u32 {
        self.timers.get(id).interval_ms()
    }
}

fn log_registration(category: EventCategory, present: bool) {
    if present {
        info!("Handler registered: {}", category.handler_name());
    } else {
        info!("Handler cleared: {}", category.handler_name());
    }
}
