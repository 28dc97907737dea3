//! Application core: the event engine and the node around it.
//!
//! Sampling, change detection and dispatch live in [`engine`]; the
//! lifecycle (setup, main cycle, cooperative delay, backpack power) lives
//! in [`node`].  All interaction with hardware happens through the **port
//! traits** defined in [`ports`], so this layer is fully testable without
//! real peripherals.

pub mod engine;
pub mod events;
pub mod handlers;
pub mod node;
pub mod ports;
