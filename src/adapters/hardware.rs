//! Hardware adapter: bridges the board's peripherals to the domain ports.
//!
//! Owns the header pin driver, the power path and the backpack bus, and
//! exposes them as a single [`Board`](crate::app::ports::Board).  Each part
//! is itself a port implementation, so the same adapter assembles the real
//! board and mixed setups (real pins, simulated bus) alike.

use embedded_hal::digital::PinState;

use crate::app::ports::{ExpansionBus, PinPort, StatusLine, TelemetryPort};
use crate::error::BusError;
use crate::roles::{PinConfig, SlaveIdentity};

/// Concrete adapter that combines all hardware behind the port traits.
pub struct HardwareAdapter<P, T, X> {
    pins: P,
    power: T,
    bus: X,
}

impl<P, T, X> HardwareAdapter<P, T, X>
where
    P: PinPort,
    T: TelemetryPort,
    X: ExpansionBus,
{
    pub fn new(pins: P, power: T, bus: X) -> Self {
        Self { pins, power, bus }
    }

    /// The backpack bus, for hot-plug handling outside the ports.
    pub fn bus_mut(&mut self) -> &mut X {
        &mut self.bus
    }
}

// ── PinPort implementation ────────────────────────────────────

impl<P: PinPort, T, X> PinPort for HardwareAdapter<P, T, X> {
    fn digital_read(&mut self, pin: u8) -> PinState {
        self.pins.digital_read(pin)
    }

    fn analog_read(&mut self, channel: u8) -> u16 {
        self.pins.analog_read(channel)
    }

    fn pin_config(&self, pin: u8) -> Option<PinConfig> {
        self.pins.pin_config(pin)
    }

    fn set_pin_mode(&mut self, pin: u8, config: PinConfig) {
        self.pins.set_pin_mode(pin, config);
    }

    fn digital_write(&mut self, pin: u8, level: PinState) {
        self.pins.digital_write(pin, level);
    }
}

// ── TelemetryPort implementation ──────────────────────────────

impl<P, T: TelemetryPort, X> TelemetryPort for HardwareAdapter<P, T, X> {
    fn battery_percent_raw(&mut self) -> i16 {
        self.power.battery_percent_raw()
    }

    fn battery_voltage(&mut self) -> u16 {
        self.power.battery_voltage()
    }

    fn temperature(&mut self) -> i16 {
        self.power.temperature()
    }

    fn status_line(&mut self, line: StatusLine) -> PinState {
        self.power.status_line(line)
    }

    fn configure_battery_alert(&mut self, percent: u8) {
        self.power.configure_battery_alert(percent);
    }
}

// ── ExpansionBus implementation ───────────────────────────────

impl<P, T, X: ExpansionBus> ExpansionBus for HardwareAdapter<P, T, X> {
    fn slave_ids(&self) -> &[SlaveIdentity] {
        self.bus.slave_ids()
    }

    fn enumerate(&mut self) -> Result<usize, BusError> {
        self.bus.enumerate()
    }
}
