//! Cooperative timer engine.
//!
//! Three periodic timers drive the samplers.  Nothing here preempts: the
//! engine calls [`TimerSet::poll`] from its `tick()` and runs whichever
//! samplers came due, so the latency between "interval elapsed" and
//! "sampler ran" is bounded by how often the host loop yields.
//!
//! ```text
//!   host loop ──▶ ScoutNode::loop_once ──▶ EventEngine::tick(now)
//!                                              │
//!                                     TimerSet::poll(now)
//!                                              │
//!                  ┌───────────────┬───────────┴───────────┐
//!                  ▼               ▼                       ▼
//!           DigitalSampler   AnalogSampler        TelemetrySampler
//! ```
//!
//! All times are `u32` milliseconds since boot and wrap after ~49 days;
//! every comparison goes through [`deadline_passed`].

use heapless::Vec;
use log::info;

use crate::error::TimerError;

// ═══════════════════════════════════════════════════════════════
//  Time helpers
// ═══════════════════════════════════════════════════════════════

/// Wraparound-safe "has `deadline` been reached at `now`".
///
/// Valid as long as the two instants are less than 2^31 ms apart.
pub const fn deadline_passed(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// A point in time the cooperative delay spins towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(u32);

impl Deadline {
    /// Deadline `ms` milliseconds after `now`.
    pub const fn after(now: u32, ms: u32) -> Self {
        Self(now.wrapping_add(ms))
    }

    pub const fn at(self) -> u32 {
        self.0
    }

    /// True while `now` is still strictly before the deadline.
    pub const fn pending(self, now: u32) -> bool {
        !deadline_passed(now, self.0)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Timer types
// ═══════════════════════════════════════════════════════════════

/// Identifies which sampler a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    Digital,
    Analog,
    Peripheral,
}

impl TimerId {
    /// Poll order when several timers come due in the same tick.
    pub const ALL: [TimerId; 3] = [TimerId::Digital, TimerId::Analog, TimerId::Peripheral];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Fire once, then stop.
    OneShot,
    /// Fire every `interval_ms` until stopped.
    Periodic,
}

/// A single cooperative timer.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    id: TimerId,
    interval_ms: u32,
    mode: TimerMode,
    running: bool,
    /// Next firing time; meaningful only while running.
    due_ms: u32,
}

impl PeriodicTimer {
    pub const fn new(id: TimerId, interval_ms: u32, mode: TimerMode) -> Self {
        Self {
            id,
            interval_ms,
            mode,
            running: false,
            due_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arm the timer; first firing is one interval after `now`.
    ///
    /// Refuses to start a timer that is already running, which would
    /// otherwise reset its phase and look like a duplicate firing.
    pub fn start(&mut self, now: u32) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::AlreadyRunning(self.id));
        }
        self.running = true;
        self.due_ms = now.wrapping_add(self.interval_ms);
        Ok(())
    }

    /// Disarm the timer. Stopping a stopped timer is a no-op.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop, change the interval, start again from `now`.
    pub fn reconfigure(&mut self, interval_ms: u32, now: u32) -> Result<(), TimerError> {
        self.stop();
        self.interval_ms = interval_ms;
        self.start(now)
    }

    /// Returns `true` if the timer fired at `now`.
    ///
    /// A late periodic timer fires once and keeps its phase; if it has
    /// fallen more than a whole interval behind it re-phases on `now`
    /// instead of bursting to catch up.
    pub fn poll(&mut self, now: u32) -> bool {
        if !self.running || !deadline_passed(now, self.due_ms) {
            return false;
        }
        match self.mode {
            TimerMode::OneShot => self.running = false,
            TimerMode::Periodic => {
                let next = self.due_ms.wrapping_add(self.interval_ms);
                self.due_ms = if deadline_passed(now, next) {
                    now.wrapping_add(self.interval_ms)
                } else {
                    next
                };
            }
        }
        true
    }
}

// ═══════════════════════════════════════════════════════════════
//  Timer set
// ═══════════════════════════════════════════════════════════════

/// The engine's three sampling timers.
#[derive(Debug, Clone)]
pub struct TimerSet {
    digital: PeriodicTimer,
    analog: PeriodicTimer,
    peripheral: PeriodicTimer,
}

impl TimerSet {
    pub fn new(digital_ms: u32, analog_ms: u32, peripheral_ms: u32) -> Self {
        Self {
            digital: PeriodicTimer::new(TimerId::Digital, digital_ms, TimerMode::Periodic),
            analog: PeriodicTimer::new(TimerId::Analog, analog_ms, TimerMode::Periodic),
            peripheral: PeriodicTimer::new(TimerId::Peripheral, peripheral_ms, TimerMode::Periodic),
        }
    }

    pub fn get(&self, id: TimerId) -> &PeriodicTimer {
        match id {
            TimerId::Digital => &self.digital,
            TimerId::Analog => &self.analog,
            TimerId::Peripheral => &self.peripheral,
        }
    }

    fn get_mut(&mut self, id: TimerId) -> &mut PeriodicTimer {
        match id {
            TimerId::Digital => &mut self.digital,
            TimerId::Analog => &mut self.analog,
            TimerId::Peripheral => &mut self.peripheral,
        }
    }

    pub fn start(&mut self, id: TimerId, now: u32) -> Result<(), TimerError> {
        let timer = self.get_mut(id);
        timer.start(now)?;
        info!("Scheduler: {:?} timer started ({} ms)", id, timer.interval_ms());
        Ok(())
    }

    pub fn stop(&mut self, id: TimerId) {
        let timer = self.get_mut(id);
        if timer.is_running() {
            info!("Scheduler: {:?} timer stopped", id);
        }
        timer.stop();
    }

    pub fn reconfigure(&mut self, id: TimerId, interval_ms: u32, now: u32) -> Result<(), TimerError> {
        self.get_mut(id).reconfigure(interval_ms, now)?;
        info!("Scheduler: {:?} timer period now {} ms", id, interval_ms);
        Ok(())
    }

    /// Poll all timers in [`TimerId::ALL`] order and return the ones that fired.
    pub fn poll(&mut self, now: u32) -> Vec<TimerId, 3> {
        let mut fired = Vec::new();
        for id in TimerId::ALL {
            if self.get_mut(id).poll(now) {
                // Capacity equals the number of timers.
                let _ = fired.push(id);
            }
        }
        fired
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
