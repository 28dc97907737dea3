//! Battery and temperature sampler.
//!
//! Five independent change detectors share one timer.  Each one reads its
//! source only when its own handler is registered, and each owns a
//! disjoint field of the [`TelemetrySnapshot`], so their fixed order
//! (percentage, voltage, charging, alarm, temperature) never affects
//! the outcome.
//!
//! ## Status lines
//!
//! The charger STAT and gauge ALRT outputs are open drain with pull-ups:
//! LOW means asserted.

use embedded_hal::digital::PinState;

use crate::app::events::{EventCategory, NodeEvent};
use crate::app::handlers::Dispatcher;
use crate::app::ports::{StatusLine, TelemetryPort};

/// Last-dispatched telemetry values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// State of charge, always within 0–100.
    pub battery_percentage: u8,
    pub battery_voltage: u16,
    pub is_charging: bool,
    pub is_alarm_triggered: bool,
    pub temperature: i16,
}

/// Gauge state-of-charge clamped into 0–100.
pub fn clamp_percentage(raw: i16) -> u8 {
    raw.clamp(0, 100) as u8
}

fn is_asserted(level: PinState) -> bool {
    level == PinState::Low
}

#[derive(Debug, Clone, Default)]
pub struct TelemetrySampler {
    snapshot: TelemetrySnapshot,
}

impl TelemetrySampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    /// Read all five quantities unconditionally (startup seeding).
    pub fn capture(&mut self, source: &mut impl TelemetryPort) {
        self.snapshot = TelemetrySnapshot {
            battery_percentage: clamp_percentage(source.battery_percent_raw()),
            battery_voltage: source.battery_voltage(),
            is_charging: is_asserted(source.status_line(StatusLine::Charging)),
            is_alarm_triggered: is_asserted(source.status_line(StatusLine::BatteryAlarm)),
            temperature: source.temperature(),
        };
    }

    pub fn tick(&mut self, source: &mut impl TelemetryPort, out: &mut Dispatcher<'_, '_>) {
        let snap = &mut self.snapshot;

        if out.wants(EventCategory::BatteryPercentage) {
            let pct = clamp_percentage(source.battery_percent_raw());
            if snap.battery_percentage != pct {
                snap.battery_percentage = pct;
                out.emit(NodeEvent::BatteryPercentage(pct));
            }
        }

        if out.wants(EventCategory::BatteryVoltage) {
            let volts = source.battery_voltage();
            if snap.battery_voltage != volts {
                snap.battery_voltage = volts;
                out.emit(NodeEvent::BatteryVoltage(volts));
            }
        }

        if out.wants(EventCategory::Charging) {
            let charging = is_asserted(source.status_line(StatusLine::Charging));
            if snap.is_charging != charging {
                snap.is_charging = charging;
                out.emit(NodeEvent::Charging(charging));
            }
        }

        if out.wants(EventCategory::Alarm) {
            let alarm = is_asserted(source.status_line(StatusLine::BatteryAlarm));
            if snap.is_alarm_triggered != alarm {
                snap.is_alarm_triggered = alarm;
                out.emit(NodeEvent::Alarm(alarm));
            }
        }

        if out.wants(EventCategory::Temperature) {
            let temp = source.temperature();
            if snap.temperature != temp {
                snap.temperature = temp;
                out.emit(NodeEvent::Temperature(temp));
            }
        }
    }
}
