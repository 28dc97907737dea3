//! Log-based diagnostic sink adapter.
//!
//! Implements [`DiagnosticSink`] by forwarding verbose announcements to the
//! `log` facade (UART console on the board, `env_logger` in the simulator).
//! A shell-attached adapter would implement the same trait.

use log::info;

use crate::app::ports::DiagnosticSink;

/// Adapter that logs every announcement at `info` level.
#[derive(Debug, Default)]
pub struct LogDiagnosticSink {
    announced: u32,
}

impl LogDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines announced so far.
    pub fn announced(&self) -> u32 {
        self.announced
    }
}

impl DiagnosticSink for LogDiagnosticSink {
    fn announce(&mut self, line: &str) {
        self.announced = self.announced.wrapping_add(1);
        info!("EVENT | {}", line);
    }
}
