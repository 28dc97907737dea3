//! Scout node firmware library.
//!
//! State-change detection and event dispatch for a battery-powered sensor
//! node: three timers drive samplers over the digital header, the analog
//! channels and the power path, and every observed change is delivered to
//! a user-registered handler.
//!
//! The core runs against the port traits in [`app::ports`]; [`adapters`]
//! holds the concrete implementations (including the host simulator).

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pins;
pub mod roles;
pub mod scheduler;
pub mod sensors;

pub use app::engine::EventEngine;
pub use app::node::ScoutNode;
pub use config::EngineConfig;
pub use error::{Error, Result};
