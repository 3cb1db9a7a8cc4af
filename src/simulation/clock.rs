//! Time acceleration with epoch bookkeeping
//!
//! Converts wall-clock elapsed time into simulated hours under a dynamically
//! adjustable acceleration factor. Every span of constant acceleration is an
//! "epoch"; closed epochs accumulate real milliseconds in per-acceleration
//! buckets, so total simulated time is the sum of (real time spent at each
//! acceleration) / (that acceleration), continuous across any number of
//! speed changes. A naive reset-on-change would make simulated time jump.

use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Simulated hour of day at which every simulation begins (06:00)
pub const SIMULATION_START_HOUR: f64 = 6.0;

/// Acceleration at the baseline speed multiplier (one simulated hour per
/// real second), in real milliseconds per simulated hour
pub const DEFAULT_ACCELERATION_MS_PER_HOUR: f64 = 1000.0;

/// Convert an external speed multiplier into an acceleration value
///
/// A multiplier of 3600 is the baseline (one simulated hour per real
/// second); smaller multipliers run the simulation faster.
pub fn acceleration_for_multiplier(multiplier: f64) -> f64 {
    DEFAULT_ACCELERATION_MS_PER_HOUR * (multiplier / 3600.0)
}

/// Source of wall-clock time, in milliseconds
///
/// The clock never reads the system time directly so tests can drive it with
/// a manual source and verify continuity properties without real waits.
pub trait WallClock: fmt::Debug + Send {
    /// Current wall-clock time in milliseconds
    fn now_ms(&self) -> i64;
}

/// Production wall clock reading the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually advanced wall clock for tests and batch runs
///
/// Clones share the same underlying instant, so a driver can hold one handle
/// while the simulation clock holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualWallClock {
    ms: Arc<AtomicI64>,
}

impl ManualWallClock {
    /// Create a manual clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by the given number of milliseconds
    pub fn advance_ms(&self, ms: i64) {
        self.ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Set the clock to an absolute millisecond value
    pub fn set_ms(&self, ms: i64) {
        self.ms.store(ms, Ordering::SeqCst);
    }
}

impl WallClock for ManualWallClock {
    fn now_ms(&self) -> i64 {
        self.ms.load(Ordering::SeqCst)
    }
}

/// Real milliseconds accumulated while a given acceleration was in effect
#[derive(Debug, Clone, PartialEq)]
struct EpochBucket {
    /// Acceleration in effect for this bucket, in ms per simulated hour
    acceleration: f64,
    /// Real milliseconds logged under this acceleration
    real_ms: f64,
}

/// Maps wall-clock time to simulated hours under a changeable acceleration
#[derive(Debug)]
pub struct TimeAccelerationClock {
    wall: Box<dyn WallClock>,
    /// Real milliseconds per simulated hour for the open epoch
    acceleration: f64,
    /// Wall-clock instant at which the open epoch began
    epoch_start_ms: i64,
    /// Closed epochs, bucketed by their acceleration value
    epochs: Vec<EpochBucket>,
    paused: bool,
}

impl TimeAccelerationClock {
    /// Create a clock over the given wall-time source
    pub fn new(wall: Box<dyn WallClock>, acceleration: f64) -> Self {
        let acceleration = if acceleration > 0.0 {
            acceleration
        } else {
            warn!(acceleration, "Non-positive acceleration, falling back to default");
            DEFAULT_ACCELERATION_MS_PER_HOUR
        };
        let epoch_start_ms = wall.now_ms();
        Self { wall, acceleration, epoch_start_ms, epochs: Vec::new(), paused: false }
    }

    /// Create a clock over the system wall clock
    pub fn system(acceleration: f64) -> Self {
        Self::new(Box::new(SystemWallClock), acceleration)
    }

    /// The acceleration currently in effect, in ms per simulated hour
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Whether the clock is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Switch to a new acceleration, preserving simulated-time continuity
    ///
    /// The open epoch is closed under the old acceleration before the new
    /// one takes effect. Non-positive values are rejected with a warning.
    pub fn set_acceleration(&mut self, acceleration: f64) {
        if acceleration <= 0.0 || acceleration.is_nan() {
            warn!(acceleration, "Rejecting non-positive acceleration");
            return;
        }
        self.close_epoch();
        info!(
            old = self.acceleration,
            new = acceleration,
            "Time acceleration changed"
        );
        self.acceleration = acceleration;
    }

    /// Fold the open epoch's elapsed real time into its bucket and re-base
    ///
    /// On clock skew (now earlier than the epoch start) the accumulation is
    /// skipped with a warning; elapsed time is never negative.
    fn close_epoch(&mut self) {
        let now = self.wall.now_ms();
        let elapsed = now - self.epoch_start_ms;
        if elapsed < 0 {
            warn!(elapsed, "Wall clock moved backwards, skipping epoch accumulation");
        } else if elapsed > 0 && !self.paused {
            let acceleration = self.acceleration;
            match self.epochs.iter_mut().find(|bucket| bucket.acceleration == acceleration) {
                Some(bucket) => bucket.real_ms += elapsed as f64,
                None => self.epochs.push(EpochBucket { acceleration, real_ms: elapsed as f64 }),
            }
        }
        self.epoch_start_ms = now;
    }

    /// Unbounded simulated hours elapsed since the simulation started
    ///
    /// Sums every closed bucket converted at its own acceleration plus the
    /// open epoch at the current acceleration. Used for day counting and
    /// meal aging; see [`Self::hour_of_day`] for the display value.
    pub fn elapsed_hours(&self) -> f64 {
        let closed: f64 =
            self.epochs.iter().map(|bucket| bucket.real_ms / bucket.acceleration).sum();

        if self.paused {
            return closed;
        }

        let open_ms = self.wall.now_ms() - self.epoch_start_ms;
        if open_ms < 0 {
            warn!(open_ms, "Wall clock moved backwards, ignoring open epoch");
            return closed;
        }
        closed + open_ms as f64 / self.acceleration
    }

    /// Simulated hour of day in [0, 24), offset by the 06:00 start
    pub fn hour_of_day(&self) -> f64 {
        (SIMULATION_START_HOUR + self.elapsed_hours()) % 24.0
    }

    /// Completed simulated days since the simulation started
    pub fn day_count(&self) -> u64 {
        (self.elapsed_hours() / 24.0) as u64
    }

    /// Stop accumulating simulated time
    ///
    /// The open epoch is folded into its bucket so that no real time passing
    /// during the pause leaks into simulated time.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.close_epoch();
        self.paused = true;
        debug!(elapsed_hours = self.elapsed_hours(), "Clock paused");
    }

    /// Resume accumulating simulated time from the current wall instant
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.epoch_start_ms = self.wall.now_ms();
        self.paused = false;
        debug!("Clock resumed");
    }

    /// Discard all accumulated time and start over from now
    pub fn reset(&mut self) {
        self.epochs.clear();
        self.epoch_start_ms = self.wall.now_ms();
        debug!("Clock reset");
    }
}
