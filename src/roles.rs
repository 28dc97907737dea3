//! Lead-role resolution and pin classification.
//!
//! A node becomes the *lead scout* when a Wi-Fi backpack shows up in the
//! expansion-bus slave table.  The backpack then owns D6–D8, so the
//! classifier withholds those pins from sampling for as long as the role
//! holds.  Both queries are pure and cheap enough to run on every tick;
//! there is no caching, so a role change is visible on the very next call.

use crate::pins::{ANALOG_PINS, DIGITAL_PINS, LEAD_RESERVED_PINS};

// ---------------------------------------------------------------------------
// Role resolver
// ---------------------------------------------------------------------------

/// Identity block reported by one expansion-bus slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlaveIdentity {
    pub address_space: u8,
    pub model: u8,
}

impl SlaveIdentity {
    pub const fn new(address_space: u8, model: u8) -> Self {
        Self { address_space, model }
    }
}

/// Signature of the Wi-Fi backpack (model id 0x0001).
pub const WIFI_BACKPACK: SlaveIdentity = SlaveIdentity::new(0x00, 0x01);

/// True if any attached slave is a Wi-Fi backpack.
pub fn is_lead_role(slaves: &[SlaveIdentity]) -> bool {
    slaves.iter().any(|id| *id == WIFI_BACKPACK)
}

// ---------------------------------------------------------------------------
// Pin classifier
// ---------------------------------------------------------------------------

/// Static role of a pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinClass {
    GeneralDigital,
    /// Owned by the backpack while the lead role is active.
    Reserved,
    Analog,
    /// Not on either monitored header.
    Unknown,
}

pub fn is_digital_pin(pin: u8) -> bool {
    DIGITAL_PINS.contains(&pin)
}

pub fn is_analog_pin(pin: u8) -> bool {
    ANALOG_PINS.contains(&pin)
}

pub fn classify(pin: u8, lead: bool) -> PinClass {
    if is_analog_pin(pin) {
        PinClass::Analog
    } else if lead && LEAD_RESERVED_PINS.contains(&pin) {
        PinClass::Reserved
    } else if is_digital_pin(pin) {
        PinClass::GeneralDigital
    } else {
        PinClass::Unknown
    }
}

// ---------------------------------------------------------------------------
// Live pin mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Electrical configuration of a pin as reported by the pin collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig {
    pub direction: Direction,
    pub pull_up: bool,
}

impl PinConfig {
    pub const INPUT: Self = Self { direction: Direction::Input, pull_up: false };
    pub const INPUT_PULLUP: Self = Self { direction: Direction::Input, pull_up: true };
    pub const OUTPUT: Self = Self { direction: Direction::Output, pull_up: false };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
    InputPullup,
    Reserved,
}

impl PinMode {
    /// Only pulled-up inputs are treated as meaningful signal sources.
    pub fn is_sampleable(self) -> bool {
        self == PinMode::InputPullup
    }
}

/// Resolve the live mode of `pin`.
///
/// `config` is `None` when the collaborator cannot describe the pin; such
/// pins are reported as `Reserved` so they are never sampled.
pub fn pin_mode(pin: u8, config: Option<PinConfig>, lead: bool) -> PinMode {
    if classify(pin, lead) == PinClass::Reserved {
        return PinMode::Reserved;
    }
    match config {
        Some(PinConfig { direction: Direction::Output, .. }) => PinMode::Output,
        Some(PinConfig { direction: Direction::Input, pull_up: true }) => PinMode::InputPullup,
        Some(PinConfig { direction: Direction::Input, pull_up: false }) => PinMode::Input,
        None => PinMode::Reserved,
    }
}
