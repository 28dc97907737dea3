//! Handler registrations and the dispatch path.
//!
//! One optional slot per [`EventCategory`].  An empty slot does more than
//! silence dispatch: the samplers check [`Dispatcher::wants`] before they
//! touch the hardware, so an unregistered category costs no I/O at all.

use embedded_hal::digital::PinState;
use log::debug;

use super::events::{EventCategory, NodeEvent};
use super::ports::DiagnosticSink;
use crate::diagnostics::announcement;

pub type DigitalHandler = Box<dyn FnMut(u8, PinState)>;
pub type AnalogHandler = Box<dyn FnMut(u8, u16)>;
pub type PercentageHandler = Box<dyn FnMut(u8)>;
pub type VoltageHandler = Box<dyn FnMut(u16)>;
pub type FlagHandler = Box<dyn FnMut(bool)>;
pub type TemperatureHandler = Box<dyn FnMut(i16)>;

/// The seven registration slots.  Re-registering overwrites.
#[derive(Default)]
pub struct EventHandlers {
    pub digital: Option<DigitalHandler>,
    pub analog: Option<AnalogHandler>,
    pub battery_percentage: Option<PercentageHandler>,
    pub battery_voltage: Option<VoltageHandler>,
    pub charging: Option<FlagHandler>,
    pub alarm: Option<FlagHandler>,
    pub temperature: Option<TemperatureHandler>,
}

impl EventHandlers {
    pub fn is_registered(&self, category: EventCategory) -> bool {
        match category {
            EventCategory::Digital => self.digital.is_some(),
            EventCategory::Analog => self.analog.is_some(),
            EventCategory::BatteryPercentage => self.battery_percentage.is_some(),
            EventCategory::BatteryVoltage => self.battery_voltage.is_some(),
            EventCategory::Charging => self.charging.is_some(),
            EventCategory::Alarm => self.alarm.is_some(),
            EventCategory::Temperature => self.temperature.is_some(),
        }
    }

    /// Call the handler for `event`'s category, if any.
    pub fn dispatch(&mut self, event: NodeEvent) {
        match event {
            NodeEvent::Digital { pin, level } => {
                if let Some(h) = self.digital.as_mut() {
                    h(pin, level);
                }
            }
            NodeEvent::Analog { channel, value } => {
                if let Some(h) = self.analog.as_mut() {
                    h(channel, value);
                }
            }
            NodeEvent::BatteryPercentage(pct) => {
                if let Some(h) = self.battery_percentage.as_mut() {
                    h(pct);
                }
            }
            NodeEvent::BatteryVoltage(v) => {
                if let Some(h) = self.battery_voltage.as_mut() {
                    h(v);
                }
            }
            NodeEvent::Charging(on) => {
                if let Some(h) = self.charging.as_mut() {
                    h(on);
                }
            }
            NodeEvent::Alarm(on) => {
                if let Some(h) = self.alarm.as_mut() {
                    h(on);
                }
            }
            NodeEvent::Temperature(t) => {
                if let Some(h) = self.temperature.as_mut() {
                    h(t);
                }
            }
        }
    }
}

/// Borrowed view handed to the samplers for one tick.
///
/// `sink` is `Some` only while verbose output is enabled.
pub struct Dispatcher<'a, 's> {
    handlers: &'a mut EventHandlers,
    sink: Option<&'a mut (dyn DiagnosticSink + 's)>,
    dispatched: u32,
}

impl<'a, 's> Dispatcher<'a, 's> {
    pub fn new(
        handlers: &'a mut EventHandlers,
        sink: Option<&'a mut (dyn DiagnosticSink + 's)>,
    ) -> Self {
        Self {
            handlers,
            sink,
            dispatched: 0,
        }
    }

    /// Whether the category has a handler, i.e. whether it is worth sampling.
    pub fn wants(&self, category: EventCategory) -> bool {
        self.handlers.is_registered(category)
    }

    /// Announce (when verbose) and run the handler.  The caller has already
    /// stored the new value in its state slot.
    pub fn emit(&mut self, event: NodeEvent) {
        debug!("dispatch {}", event);
        if let Some(sink) = self.sink.as_mut() {
            sink.announce(&announcement(&event));
        }
        self.handlers.dispatch(event);
        self.dispatched = self.dispatched.wrapping_add(1);
    }

    /// Events emitted through this dispatcher.
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }
}
