//! Unified error types for the Scout firmware.
//!
//! Sampling itself is infallible: a failed hardware read simply produces no
//! dispatch.  The few operations that can be refused (double timer start,
//! expansion-bus enumeration, configuration loading) funnel into [`Error`].
//! All variants are `Copy` so they can be logged and passed around without
//! allocation.

use core::fmt;

use crate::scheduler::TimerId;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A periodic timer operation was refused.
    Timer(TimerError),
    /// The expansion-bus collaborator reported a failure.
    Bus(BusError),
    /// Configuration is invalid or could not be (de)serialised.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(e) => write!(f, "timer: {e}"),
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Timer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// `start` was called on a timer that is already running.
    AlreadyRunning(TimerId),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning(id) => write!(f, "{id:?} timer already running"),
        }
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}

// ---------------------------------------------------------------------------
// Expansion-bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// A slave did not answer during enumeration.
    NoResponse,
    /// An identity block failed its CRC check.
    Crc,
    /// More slaves answered than the identity table can hold.
    TableFull,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response from slave"),
            Self::Crc => write!(f, "identity CRC mismatch"),
            Self::TableFull => write!(f, "slave table full"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A sampling interval was zero. Carries the field name.
    ZeroInterval(&'static str),
    /// Fuel-gauge alert threshold outside the supported 1–32 % window.
    AlertOutOfRange(u8),
    /// Serialising the config failed.
    Encode,
    /// A stored config blob could not be decoded.
    Decode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval(field) => write!(f, "{field} must be non-zero"),
            Self::AlertOutOfRange(pct) => write!(f, "battery alert {pct}% outside 1-32%"),
            Self::Encode => write!(f, "encode failed"),
            Self::Decode => write!(f, "decode failed"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
