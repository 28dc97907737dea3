//! Outbound state-change events.
//!
//! Every detected transition is described by a [`NodeEvent`] before it is
//! handed to the registered handler.  The `Display` form is the verbose
//! announcement body, e.g. `digitalPinEventHandler(4,1)`, which keeps the
//! serial log compatible with the scripting layer's existing tooling.

use core::fmt;

use embedded_hal::digital::PinState;

/// Handler category; one registration slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Digital,
    Analog,
    BatteryPercentage,
    BatteryVoltage,
    Charging,
    Alarm,
    Temperature,
}

impl EventCategory {
    pub const ALL: [EventCategory; 7] = [
        EventCategory::Digital,
        EventCategory::Analog,
        EventCategory::BatteryPercentage,
        EventCategory::BatteryVoltage,
        EventCategory::Charging,
        EventCategory::Alarm,
        EventCategory::Temperature,
    ];

    /// Name the scripting layer knows this handler by.
    pub fn handler_name(self) -> &'static str {
        match self {
            Self::Digital => "digitalPinEventHandler",
            Self::Analog => "analogPinEventHandler",
            Self::BatteryPercentage => "batteryPercentageEventHandler",
            Self::BatteryVoltage => "batteryVoltageEventHandler",
            Self::Charging => "batteryChargingEventHandler",
            Self::Alarm => "batteryAlarmTriggeredEventHandler",
            Self::Temperature => "temperatureEventHandler",
        }
    }
}

/// A detected state change, carrying the new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    Digital { pin: u8, level: PinState },
    Analog { channel: u8, value: u16 },
    BatteryPercentage(u8),
    BatteryVoltage(u16),
    Charging(bool),
    Alarm(bool),
    Temperature(i16),
}

impl NodeEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            Self::Digital { .. } => EventCategory::Digital,
            Self::Analog { .. } => EventCategory::Analog,
            Self::BatteryPercentage(_) => EventCategory::BatteryPercentage,
            Self::BatteryVoltage(_) => EventCategory::BatteryVoltage,
            Self::Charging(_) => EventCategory::Charging,
            Self::Alarm(_) => EventCategory::Alarm,
            Self::Temperature(_) => EventCategory::Temperature,
        }
    }
}

/// Logic level as 0 / 1.
pub fn level_bit(level: PinState) -> u8 {
    match level {
        PinState::Low => 0,
        PinState::High => 1,
    }
}

impl fmt::Display for NodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.category().handler_name();
        match *self {
            Self::Digital { pin, level } => write!(f, "{name}({pin},{})", level_bit(level)),
            Self::Analog { channel, value } => write!(f, "{name}({channel},{value})"),
            Self::BatteryPercentage(pct) => write!(f, "{name}({pct})"),
            Self::BatteryVoltage(v) => write!(f, "{name}({v})"),
            Self::Charging(on) | Self::Alarm(on) => write!(f, "{name}({})", u8::from(on)),
            Self::Temperature(t) => write!(f, "{name}({t})"),
        }
    }
}
