//! Samplers, one per timer.
//!
//! Each sampler owns the "last dispatched" state for its category and is
//! driven by the [`EventEngine`](crate::app::engine::EventEngine) when its
//! timer fires.  A sampler compares, stores, then emits; the handler never
//! observes a slot that has not yet been updated.

pub mod analog;
pub mod digital;
pub mod telemetry;

pub use analog::{AnalogPinState, AnalogSampler};
pub use digital::{DigitalPinState, DigitalSampler};
pub use telemetry::{TelemetrySampler, TelemetrySnapshot};
