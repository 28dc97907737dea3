//! Scout simulator: the node firmware running against a simulated board.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                    │
//! │                                                          │
//! │  HardwareAdapter<SimPins, PowerPath, SimBus>             │
//! │  MonotonicClock    LogDiagnosticSink                     │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ────────────────   │
//! │                                                          │
//! │  ┌──────────────────────────────────────────────────┐    │
//! │  │  ScoutNode ─▶ EventEngine                        │    │
//! │  │  TimerSet · Digital/Analog/Telemetry samplers    │    │
//! │  └──────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `scout-sim [CONFIG.json] [--lead] [--seconds N]`
#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use embedded_hal::digital::PinState;
use log::info;

use scout::adapters::sim::{SimBoard, sim_board};
use scout::adapters::time::MonotonicClock;
use scout::app::events::level_bit;
use scout::app::ports::LoopTask;
use scout::{EngineConfig, ScoutNode};

/// Default run time when `--seconds` is not given.
const DEFAULT_RUN_SECS: u32 = 20;
/// Slice handed to the cooperative delay per outer-loop turn (ms).
const MAIN_SLICE_MS: u32 = 1000;

struct Options {
    config_path: Option<String>,
    lead: bool,
    run_secs: u32,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        config_path: None,
        lead: false,
        run_secs: DEFAULT_RUN_SECS,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lead" => opts.lead = true,
            "--seconds" => {
                let value = args.next().context("--seconds needs a value")?;
                opts.run_secs = value
                    .parse()
                    .with_context(|| format!("invalid --seconds value '{value}'"))?;
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
            path => opts.config_path = Some(path.to_owned()),
        }
    }
    Ok(opts)
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
    let config = EngineConfig::from_json(&text)
        .map_err(scout::Error::from)
        .with_context(|| format!("parsing config '{path}'"))?;
    Ok(config)
}

// ── Wi-Fi loop task ───────────────────────────────────────────
//
// Stands in for the backpack's network loop; only polled while the node
// is lead scout.

struct WifiLoop {
    last_report: Instant,
    polls: u64,
}

impl WifiLoop {
    fn new() -> Self {
        Self {
            last_report: Instant::now(),
            polls: 0,
        }
    }
}

impl LoopTask<SimBoard> for WifiLoop {
    fn setup(&mut self, _board: &mut SimBoard) {
        info!("Wi-Fi loop: backpack link up");
    }

    fn poll(&mut self, _board: &mut SimBoard) {
        self.polls += 1;
        if self.last_report.elapsed() >= Duration::from_secs(5) {
            info!("Wi-Fi loop: {} polls since last report", self.polls);
            self.polls = 0;
            self.last_report = Instant::now();
        }
    }

    fn lead_only(&self) -> bool {
        true
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args()?;
    let config = load_config(opts.config_path.as_deref())?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Scout simulator v{:<19}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!("Config: {:?}", config);

    let mut node = ScoutNode::new(&config, sim_board(opts.lead), MonotonicClock::new());
    node.add_task(Box::new(WifiLoop::new()));

    let engine = node.engine_mut();
    engine.set_digital_handler(Some(Box::new(|pin: u8, level: PinState| {
        info!("D{} -> {}", pin, level_bit(level));
    })));
    engine.set_analog_handler(Some(Box::new(|channel: u8, value: u16| {
        info!("A{} -> {}", channel, value);
    })));
    engine.set_battery_percentage_handler(Some(Box::new(|percent: u8| {
        info!("Battery {}%", percent);
    })));
    engine.set_battery_voltage_handler(Some(Box::new(|mv: u16| {
        info!("Battery {} mV", mv);
    })));
    engine.set_charging_handler(Some(Box::new(|charging: bool| {
        info!("Charging: {}", charging);
    })));
    engine.set_alarm_handler(Some(Box::new(|alarm: bool| {
        info!("Battery alarm: {}", alarm);
    })));
    engine.set_temperature_handler(Some(Box::new(|celsius: i16| {
        info!("Temperature {} C", celsius);
    })));

    node.setup().context("node setup")?;
    info!("Lead scout: {}", node.is_lead_scout());

    for _ in 0..opts.run_secs {
        node.delay(MAIN_SLICE_MS);
    }

    let counters = node.engine().tick_counters();
    info!(
        "Done: {} digital, {} analog, {} peripheral ticks; battery {}% {} mV",
        counters.digital,
        counters.analog,
        counters.peripheral,
        node.battery_percentage(),
        node.battery_voltage()
    );
    Ok(())
}
