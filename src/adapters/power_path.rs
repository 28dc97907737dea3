//! Power-path adapter: fuel gauge plus charger/alarm status lines.
//!
//! Implements [`TelemetryPort`] over any [`FuelGauge`] driver and two
//! `embedded-hal` input pins.  Bus and pin errors never reach the engine:
//! the adapter logs them and hands back the last good reading, so a
//! flaky I²C transaction shows up as "no change" instead of a bogus event.

use embedded_hal::digital::{InputPin, PinState};
use log::warn;

use crate::app::ports::{StatusLine, TelemetryPort};

/// Register-level access to the battery fuel gauge.
pub trait FuelGauge {
    type Error: core::fmt::Debug;

    /// State of charge in percent; the raw register can over- or undershoot.
    fn state_of_charge(&mut self) -> Result<i16, Self::Error>;

    /// Cell voltage in millivolts.
    fn voltage(&mut self) -> Result<u16, Self::Error>;

    /// Die temperature in whole degrees.
    fn temperature(&mut self) -> Result<i16, Self::Error>;

    /// Program the ALRT threshold (1–32 %).
    fn set_alert_threshold(&mut self, percent: u8) -> Result<(), Self::Error>;
}

/// Last good value of every reading.
#[derive(Debug, Clone, Copy)]
struct Cached {
    soc: i16,
    voltage: u16,
    temperature: i16,
    charging: PinState,
    alarm: PinState,
}

impl Default for Cached {
    fn default() -> Self {
        // Status lines are active-low; idle is High.
        Self {
            soc: 0,
            voltage: 0,
            temperature: 0,
            charging: PinState::High,
            alarm: PinState::High,
        }
    }
}

pub struct PowerPath<G, CHG, ALM> {
    gauge: G,
    charging: CHG,
    alarm: ALM,
    cached: Cached,
    read_errors: u32,
}

impl<G, CHG, ALM> PowerPath<G, CHG, ALM>
where
    G: FuelGauge,
    CHG: InputPin,
    ALM: InputPin,
{
    pub fn new(gauge: G, charging: CHG, alarm: ALM) -> Self {
        Self {
            gauge,
            charging,
            alarm,
            cached: Cached::default(),
            read_errors: 0,
        }
    }

    /// Failed reads since construction (wrapping).
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    fn note_error(&mut self, what: &str, err: &dyn core::fmt::Debug) {
        self.read_errors = self.read_errors.wrapping_add(1);
        warn!("Power path: {} read failed ({:?}), using last value", what, err);
    }
}

fn level(high: bool) -> PinState {
    if high { PinState::High } else { PinState::Low }
}

impl<G, CHG, ALM> TelemetryPort for PowerPath<G, CHG, ALM>
where
    G: FuelGauge,
    CHG: InputPin,
    ALM: InputPin,
{
    fn battery_percent_raw(&mut self) -> i16 {
        match self.gauge.state_of_charge() {
            Ok(v) => self.cached.soc = v,
            Err(e) => self.note_error("state of charge", &e),
        }
        self.cached.soc
    }

    fn battery_voltage(&mut self) -> u16 {
        match self.gauge.voltage() {
            Ok(v) => self.cached.voltage = v,
            Err(e) => self.note_error("voltage", &e),
        }
        self.cached.voltage
    }

    fn temperature(&mut self) -> i16 {
        match self.gauge.temperature() {
            Ok(v) => self.cached.temperature = v,
            Err(e) => self.note_error("temperature", &e),
        }
        self.cached.temperature
    }

    fn status_line(&mut self, line: StatusLine) -> PinState {
        match line {
            StatusLine::Charging => match self.charging.is_high() {
                Ok(high) => self.cached.charging = level(high),
                Err(e) => self.note_error("charge status", &e),
            },
            StatusLine::BatteryAlarm => match self.alarm.is_high() {
                Ok(high) => self.cached.alarm = level(high),
                Err(e) => self.note_error("battery alarm", &e),
            },
        }
        match line {
            StatusLine::Charging => self.cached.charging,
            StatusLine::BatteryAlarm => self.cached.alarm,
        }
    }

    fn configure_battery_alert(&mut self, percent: u8) {
        if let Err(e) = self.gauge.set_alert_threshold(percent) {
            warn!("Power path: could not set alert threshold {}% ({:?})", percent, e);
        }
    }
}
