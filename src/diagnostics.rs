//! Verbose event announcements.
//!
//! When verbose output is on, every dispatch is echoed to the diagnostic
//! sink as `Running: <handler>(<args>)` just before the handler runs.  The
//! line is built in a fixed-capacity buffer so the dispatch path never
//! allocates.

use core::fmt::Write;

use heapless::String;

use crate::app::events::NodeEvent;

/// Longest announcement is ~45 bytes (`batteryAlarmTriggeredEventHandler`).
pub const ANNOUNCEMENT_CAP: usize = 64;

pub const ANNOUNCEMENT_PREFIX: &str = "Running: ";

/// Render the announcement line for `event`.
pub fn announcement(event: &NodeEvent) -> String<ANNOUNCEMENT_CAP> {
    let mut line = String::new();
    // Capacity covers every variant; on overflow the line is just truncated.
    let _ = write!(line, "{ANNOUNCEMENT_PREFIX}{event}");
    line
}
