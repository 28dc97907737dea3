//! Pin assignments for the Scout main board.
//!
//! Single source of truth: the classifier, the samplers and the node setup
//! reference this module rather than hard-coding pin numbers.

use core::ops::RangeInclusive;

// ---------------------------------------------------------------------------
// General-purpose digital header (D2 – D8)
// ---------------------------------------------------------------------------

/// Digital pins watched by the digital sampler, in dispatch order.
pub const DIGITAL_PINS: RangeInclusive<u8> = 2..=8;
/// Number of digital state slots (one per pin in [`DIGITAL_PINS`]).
pub const DIGITAL_SLOT_COUNT: usize = 7;

/// Pins handed to the Wi-Fi backpack while the node holds the lead role.
pub const LEAD_RESERVED_PINS: RangeInclusive<u8> = 6..=8;

// ---------------------------------------------------------------------------
// Analog header (A0 – A7 → pins 24 – 31)
// ---------------------------------------------------------------------------

/// Pin numbers of the analog header.
pub const ANALOG_PINS: RangeInclusive<u8> = 24..=31;
/// Number of analog channels sampled by the analog sampler.
pub const ANALOG_CHANNEL_COUNT: usize = 8;

// ---------------------------------------------------------------------------
// Power path
// ---------------------------------------------------------------------------

/// Charger status output (open drain). LOW = charging.
pub const CHG_STATUS_PIN: u8 = 34;
/// Fuel-gauge alert output (open drain). LOW = alarm asserted.
pub const BATT_ALARM_PIN: u8 = 35;
/// Digital output: HIGH powers the backpack bus VCC rail.
pub const VCC_ENABLE_PIN: u8 = 36;

/// Pin number for digital slot `index` (slot 0 = D2).
pub const fn digital_slot_pin(index: usize) -> u8 {
    *DIGITAL_PINS.start() + index as u8
}
