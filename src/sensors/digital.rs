//! Digital header sampler (D2 – D8).
//!
//! Each slot holds the last level that was dispatched, or `None` while the
//! pin is unavailable (reserved by the backpack, or not a pulled-up input).
//! A pin that drops out loses its last level; when it comes back the first
//! read is always reported.

use embedded_hal::digital::PinState;

use crate::app::events::{EventCategory, NodeEvent};
use crate::app::handlers::Dispatcher;
use crate::app::ports::PinPort;
use crate::pins::{DIGITAL_SLOT_COUNT, digital_slot_pin};
use crate::roles::{PinClass, classify, pin_mode};

/// Last-dispatched level per digital slot.
pub type DigitalPinState = [Option<PinState>; DIGITAL_SLOT_COUNT];

#[derive(Debug, Clone, Default)]
pub struct DigitalSampler {
    slots: DigitalPinState,
}

impl DigitalSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DigitalPinState {
        &self.slots
    }

    /// Seed every slot from the live pins without dispatching.
    ///
    /// Pins the backpack owns start unavailable; the others are read
    /// regardless of their pin mode, the first tick sorts that out.
    pub fn capture(&mut self, pins: &mut impl PinPort, lead: bool) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let pin = digital_slot_pin(i);
            *slot = if classify(pin, lead) == PinClass::Reserved {
                None
            } else {
                Some(pins.digital_read(pin))
            };
        }
    }

    /// One digital tick.  Slots are visited in ascending pin order.
    pub fn tick(&mut self, pins: &mut impl PinPort, lead: bool, out: &mut Dispatcher<'_, '_>) {
        if !out.wants(EventCategory::Digital) {
            return;
        }

        for (i, slot) in self.slots.iter_mut().enumerate() {
            let pin = digital_slot_pin(i);

            if !pin_mode(pin, pins.pin_config(pin), lead).is_sampleable() {
                *slot = None;
                continue;
            }

            let level = pins.digital_read(pin);
            if *slot != Some(level) {
                *slot = Some(level);
                out.emit(NodeEvent::Digital { pin, level });
            }
        }
    }
}
