//! Host simulation of a Scout board.
//!
//! Everything is derived from wall-clock time since construction so the
//! simulator produces a steady stream of state changes:
//!
//! | Source          | Behaviour                                   |
//! |-----------------|---------------------------------------------|
//! | D4              | toggles every second                        |
//! | D5              | toggles every three seconds                 |
//! | other inputs    | idle High (pulled up)                       |
//! | A0              | sawtooth, 0–1023 over ~10 s                 |
//! | fuel gauge      | drains 1 % every 6 s from 100 %            |
//! | charge status   | asserted (Low) for the first 30 s           |
//! | battery alarm   | asserted (Low) after 90 s                   |
//! | backpack bus    | optional Wi-Fi backpack (lead scout)        |

use core::convert::Infallible;
use std::time::Instant;

use embedded_hal::digital::{ErrorType, InputPin, PinState};
use log::info;

use crate::app::ports::{ExpansionBus, PinPort};
use crate::error::BusError;
use crate::roles::{PinConfig, SlaveIdentity, WIFI_BACKPACK};

use super::hardware::HardwareAdapter;
use super::power_path::{FuelGauge, PowerPath};

const PIN_TABLE: usize = 40;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

// ── Header pins ───────────────────────────────────────────────

pub struct SimPins {
    start: Instant,
    modes: [Option<PinConfig>; PIN_TABLE],
    outputs: [PinState; PIN_TABLE],
}

impl SimPins {
    /// Header pins D2–D8 come up as pulled-up inputs, D3 as an output.
    pub fn new(start: Instant) -> Self {
        let mut modes = [None; PIN_TABLE];
        for pin in crate::pins::DIGITAL_PINS {
            modes[pin as usize] = Some(PinConfig::INPUT_PULLUP);
        }
        modes[3] = Some(PinConfig::OUTPUT);
        Self {
            start,
            modes,
            outputs: [PinState::Low; PIN_TABLE],
        }
    }
}

impl PinPort for SimPins {
    fn digital_read(&mut self, pin: u8) -> PinState {
        let idx = pin as usize;
        if idx < PIN_TABLE && self.modes[idx] == Some(PinConfig::OUTPUT) {
            return self.outputs[idx];
        }
        let t = elapsed_ms(self.start);
        let high = match pin {
            4 => (t / 1000) % 2 == 0,
            5 => (t / 3000) % 2 == 0,
            _ => true,
        };
        if high { PinState::High } else { PinState::Low }
    }

    fn analog_read(&mut self, channel: u8) -> u16 {
        match channel {
            0 => ((elapsed_ms(self.start) / 10) % 1024) as u16,
            ch => 512 + u16::from(ch),
        }
    }

    fn pin_config(&self, pin: u8) -> Option<PinConfig> {
        self.modes.get(pin as usize).copied().flatten()
    }

    fn set_pin_mode(&mut self, pin: u8, config: PinConfig) {
        if let Some(slot) = self.modes.get_mut(pin as usize) {
            *slot = Some(config);
        }
    }

    fn digital_write(&mut self, pin: u8, level: PinState) {
        if let Some(slot) = self.outputs.get_mut(pin as usize) {
            *slot = level;
        }
    }
}

// ── Power path ────────────────────────────────────────────────

pub struct SimGauge {
    start: Instant,
}

impl SimGauge {
    pub fn new(start: Instant) -> Self {
        Self { start }
    }
}

impl FuelGauge for SimGauge {
    type Error = Infallible;

    fn state_of_charge(&mut self) -> Result<i16, Infallible> {
        let drained = (elapsed_ms(self.start) / 6000).min(100) as i16;
        Ok(100 - drained)
    }

    fn voltage(&mut self) -> Result<u16, Infallible> {
        let soc = self.state_of_charge()?;
        Ok(3300 + 9 * soc as u16)
    }

    fn temperature(&mut self) -> Result<i16, Infallible> {
        Ok(22 + ((elapsed_ms(self.start) / 30_000) % 3) as i16)
    }

    fn set_alert_threshold(&mut self, percent: u8) -> Result<(), Infallible> {
        info!("Sim gauge: alert threshold {}%", percent);
        Ok(())
    }
}

/// Status line that switches level once, `switch_ms` after start.
pub struct SimLine {
    start: Instant,
    switch_ms: u64,
    initial: PinState,
}

impl SimLine {
    pub fn new(start: Instant, initial: PinState, switch_ms: u64) -> Self {
        Self {
            start,
            switch_ms,
            initial,
        }
    }

    fn level(&self) -> PinState {
        if elapsed_ms(self.start) < self.switch_ms {
            self.initial
        } else {
            !self.initial
        }
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level() == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.level() == PinState::Low)
    }
}

// ── Backpack bus ──────────────────────────────────────────────

pub struct SimBus {
    attached: Vec<SlaveIdentity>,
    found: Vec<SlaveIdentity>,
}

impl SimBus {
    pub fn new(wifi_backpack: bool) -> Self {
        let attached = if wifi_backpack {
            vec![WIFI_BACKPACK]
        } else {
            Vec::new()
        };
        Self {
            attached,
            found: Vec::new(),
        }
    }

    /// Plug in another backpack; visible after the next enumeration.
    pub fn attach(&mut self, id: SlaveIdentity) {
        self.attached.push(id);
    }
}

impl ExpansionBus for SimBus {
    fn slave_ids(&self) -> &[SlaveIdentity] {
        &self.found
    }

    fn enumerate(&mut self) -> Result<usize, BusError> {
        self.found.clone_from(&self.attached);
        Ok(self.found.len())
    }
}

// ── Assembled board ───────────────────────────────────────────

pub type SimPowerPath = PowerPath<SimGauge, SimLine, SimLine>;
pub type SimBoard = HardwareAdapter<SimPins, SimPowerPath, SimBus>;

/// Build a simulated board; `wifi_backpack` makes the node lead scout.
pub fn sim_board(wifi_backpack: bool) -> SimBoard {
    let start = Instant::now();
    let power = PowerPath::new(
        SimGauge::new(start),
        SimLine::new(start, PinState::Low, 30_000),
        SimLine::new(start, PinState::High, 90_000),
    );
    HardwareAdapter::new(SimPins::new(start), power, SimBus::new(wifi_backpack))
}
