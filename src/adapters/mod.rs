//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements          | Connects to                      |
//! |--------------|---------------------|----------------------------------|
//! | `hardware`   | PinPort             | header pin driver                |
//! |              | TelemetryPort       | power path                       |
//! |              | ExpansionBus        | backpack bus                     |
//! | `power_path` | TelemetryPort       | fuel gauge + STAT/ALRT lines     |
//! | `log_sink`   | DiagnosticSink      | `log` output                     |
//! | `time`       | Clock               | host monotonic clock             |
//! | `sim`        | PinPort, FuelGauge, | simulated board for `scout-sim`  |
//! |              | ExpansionBus        |                                  |

pub mod hardware;
pub mod log_sink;
pub mod power_path;
pub mod sim;
pub mod time;
