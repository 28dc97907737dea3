//! Analog header sampler (A0 – A7).
//!
//! Raw ADC counts are compared exactly; any change, however small, is a
//! transition.  Events carry the channel index, not the pin number.

use crate::app::events::{EventCategory, NodeEvent};
use crate::app::handlers::Dispatcher;
use crate::app::ports::PinPort;
use crate::pins::ANALOG_CHANNEL_COUNT;

/// Last-dispatched raw reading per analog channel.
pub type AnalogPinState = [u16; ANALOG_CHANNEL_COUNT];

#[derive(Debug, Clone, Default)]
pub struct AnalogSampler {
    channels: AnalogPinState,
}

impl AnalogSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalogPinState {
        &self.channels
    }

    pub fn capture(&mut self, pins: &mut impl PinPort) {
        for (ch, value) in self.channels.iter_mut().enumerate() {
            *value = pins.analog_read(ch as u8);
        }
    }

    pub fn tick(&mut self, pins: &mut impl PinPort, out: &mut Dispatcher<'_, '_>) {
        if !out.wants(EventCategory::Analog) {
            return;
        }

        for (ch, stored) in self.channels.iter_mut().enumerate() {
            let channel = ch as u8;
            let value = pins.analog_read(channel);
            if *stored != value {
                *stored = value;
                out.emit(NodeEvent::Analog { channel, value });
            }
        }
    }
}
