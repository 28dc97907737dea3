//! Port traits: the boundary between the sampling engine and the board.
//!
//! ```text
//!   Board adapter ──▶ Port trait ──▶ EventEngine / ScoutNode (domain)
//! ```
//!
//! Pin I/O, the fuel gauge, the expansion bus and the clock are all
//! collaborators.  The engine consumes them through generics, so the core
//! never touches registers directly and runs unchanged against the mock
//! board in `tests/`.

use embedded_hal::digital::PinState;

use crate::error::BusError;
use crate::roles::{PinConfig, SlaveIdentity};

// ───────────────────────────────────────────────────────────────
// Pin I/O port
// ───────────────────────────────────────────────────────────────

/// GPIO / ADC access for the header pins.
pub trait PinPort {
    /// Current logic level of `pin`.
    fn digital_read(&mut self, pin: u8) -> PinState;

    /// Raw ADC reading of analog channel `channel` (0–7).
    fn analog_read(&mut self, channel: u8) -> u16;

    /// Live direction and pull-up state of `pin`, or `None` if the
    /// collaborator cannot tell.
    fn pin_config(&self, pin: u8) -> Option<PinConfig>;

    /// Reconfigure `pin`.
    fn set_pin_mode(&mut self, pin: u8, config: PinConfig);

    /// Drive an output pin.
    fn digital_write(&mut self, pin: u8, level: PinState);
}

// ───────────────────────────────────────────────────────────────
// Telemetry port
// ───────────────────────────────────────────────────────────────

/// Open-drain status outputs of the power path.  Both are active-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine {
    /// Charger STAT output.
    Charging,
    /// Fuel-gauge ALRT output.
    BatteryAlarm,
}

/// Battery and temperature readings.  Every call is synchronous and
/// returns *a* value, possibly stale.
pub trait TelemetryPort {
    /// State of charge as reported by the gauge; may fall outside 0–100.
    fn battery_percent_raw(&mut self) -> i16;

    /// Cell voltage (gauge units, millivolt scale).
    fn battery_voltage(&mut self) -> u16;

    /// Board temperature (whole degrees).
    fn temperature(&mut self) -> i16;

    /// Raw level of a power-path status line.
    fn status_line(&mut self, line: StatusLine) -> PinState;

    /// Program the gauge's low-battery alert threshold.
    fn configure_battery_alert(&mut self, percent: u8);
}

// ───────────────────────────────────────────────────────────────
// Expansion bus port
// ───────────────────────────────────────────────────────────────

/// The backpack bus as seen after enumeration.
pub trait ExpansionBus {
    /// Identities of the slaves found by the last enumeration, in bus order.
    fn slave_ids(&self) -> &[SlaveIdentity];

    /// Re-scan the bus. Returns the number of slaves found.
    fn enumerate(&mut self) -> Result<usize, BusError>;
}

/// Everything the engine needs from the board, in one bound.
pub trait Board: PinPort + TelemetryPort + ExpansionBus {}

impl<T: PinPort + TelemetryPort + ExpansionBus> Board for T {}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Diagnostic sink port
// ───────────────────────────────────────────────────────────────

/// Destination for verbose event announcements.
pub trait DiagnosticSink {
    fn announce(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Main-cycle collaborators
// ───────────────────────────────────────────────────────────────

/// A cooperative task that runs once per main-cycle iteration (the command
/// shell, the scripting handler, the Wi-Fi loop).
///
/// Tasks run on the same call stack as the samplers and must return
/// promptly; a slow task delays every timer.
pub trait LoopTask<B> {
    /// One-time initialisation during node setup.
    fn setup(&mut self, _board: &mut B) {}

    /// One slice of work.
    fn poll(&mut self, board: &mut B);

    /// Tasks that only make sense while the node is lead scout.
    fn lead_only(&self) -> bool {
        false
    }
}
