//! Archetype-driven meal scheduling state machine
//!
//! Decides when the simulated eater has a meal and how large it is, based on
//! the archetype's eating window, meal interval, and adaptive size
//! distribution. Driven once per tick with the current hour of day.

use crate::scheduler::distribution::MealDistribution;
use crate::scheduler::jitter::draw_jitter;
use crate::types::{ArchetypeParams, MealSize};
use rand::Rng;
use tracing::{debug, info};

/// Lifecycle states of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created but not started
    Idle,
    /// Actively scheduling meals
    Running,
    /// Suspended; ticks are not delivered while paused
    Paused,
}

/// Meal scheduling state machine for one archetype
#[derive(Debug)]
pub struct MealScheduler {
    params: ArchetypeParams,
    distribution: MealDistribution,
    state: SchedulerState,
    day_started: bool,
    next_meal_time: Option<f64>,
}

impl MealScheduler {
    /// Create an idle scheduler for the given archetype parameters
    pub fn new(params: ArchetypeParams) -> Self {
        let distribution = MealDistribution::new(params.meal_distribution);
        Self { params, distribution, state: SchedulerState::Idle, day_started: false, next_meal_time: None }
    }

    /// The resolved archetype parameters driving this scheduler
    pub fn params(&self) -> &ArchetypeParams {
        &self.params
    }

    /// The adaptive meal-size distribution
    pub fn distribution(&self) -> &MealDistribution {
        &self.distribution
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Hour of day at which the next meal is due, if one is scheduled
    pub fn next_meal_time(&self) -> Option<f64> {
        self.next_meal_time
    }

    /// Start scheduling
    ///
    /// Schedules the first meal one interval (plus jitter) after the eating
    /// window opens; if that lands past the window, no meal is scheduled
    /// until the next day begins.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let jitter = draw_jitter(rng);
        let first_meal = self.params.start_eating_hour + self.params.meal_interval + jitter;
        self.next_meal_time =
            if first_meal >= self.params.stop_eating_hour { None } else { Some(first_meal) };
        self.day_started = false;
        self.state = SchedulerState::Running;

        info!(
            archetype = %self.params.name,
            next_meal = ?self.next_meal_time,
            "Meal scheduler started"
        );
    }

    /// Suspend scheduling
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
        }
    }

    /// Resume scheduling after a pause
    pub fn resume(&mut self) {
        if self.state == SchedulerState::Paused {
            self.state = SchedulerState::Running;
        }
    }

    /// Advance the state machine to the given hour of day
    ///
    /// Returns the size of a meal to emit, if one came due this tick. The
    /// eating window is closed-open: at exactly `stop_eating_hour` the day's
    /// eating is over.
    pub fn step<R: Rng + ?Sized>(&mut self, hour: f64, rng: &mut R) -> Option<MealSize> {
        if self.state != SchedulerState::Running {
            return None;
        }

        if hour >= self.params.start_eating_hour && !self.day_started {
            self.begin_day(hour, rng);
        }

        if hour >= self.params.stop_eating_hour {
            // Prepares the day-start branch for the next morning
            self.day_started = false;
        }

        if hour >= self.params.stop_eating_hour || hour < self.params.start_eating_hour {
            return None;
        }

        match self.next_meal_time {
            Some(next_meal) if hour >= next_meal => Some(self.emit_meal(hour, rng)),
            _ => None,
        }
    }

    /// Mark a new eating day: schedule the first meal and evaluate drift
    fn begin_day<R: Rng + ?Sized>(&mut self, hour: f64, rng: &mut R) {
        self.day_started = true;
        let jitter = draw_jitter(rng);
        self.next_meal_time = Some(self.params.start_eating_hour + jitter);

        debug!(
            archetype = %self.params.name,
            hour,
            next_meal = ?self.next_meal_time,
            "New eating day started"
        );
        self.distribution.check_and_reset();
    }

    /// Draw a meal, drift the distribution, and schedule the next one
    fn emit_meal<R: Rng + ?Sized>(&mut self, hour: f64, rng: &mut R) -> MealSize {
        let size = self.distribution.draw(rng);
        self.distribution.adjust(size);

        let jitter = draw_jitter(rng);
        let next_meal = hour + self.params.meal_interval + jitter;
        if next_meal >= self.params.stop_eating_hour {
            debug!(archetype = %self.params.name, "End of eating hours, meals resume tomorrow");
            self.next_meal_time = None;
        } else {
            debug!(archetype = %self.params.name, next_meal, "Next meal scheduled");
            self.next_meal_time = Some(next_meal);
        }

        info!(archetype = %self.params.name, hour, size = %size, "Meal emitted");
        size
    }
}
