//! Simulation controller and command/event surface
//!
//! The controller owns the whole simulation state (clock, digestion model,
//! scheduler, sample buffer) and advances it on a periodic tick. External
//! collaborators talk to it exclusively through [`Command`] messages and
//! observe it through [`Event`] messages, drained in order between ticks so
//! no command ever interleaves with a tick's computation.

use crate::digestion::{DigestionModel, Meal};
use crate::scheduler::MealScheduler;
use crate::simulation::clock::{
    acceleration_for_multiplier, SystemWallClock, TimeAccelerationClock, WallClock,
};
use crate::simulation::error::SimulationResult;
use crate::simulation::samples::{FullnessSample, SampleBuffer};
use crate::simulation::tick::{TickSource, TICK_PERIOD_MS};
use crate::types::{ArchetypeConfig, ArchetypeParams, SimulationId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use tracing::{debug, info, instrument, warn};

/// Ticks between periodic `StoreData` persistence signals
const STORE_DATA_INTERVAL_TICKS: u64 = 600;

/// Commands accepted from the collaborator layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Inject a meal directly, bypassing the scheduler
    AddMeal {
        /// Base fullness contribution in (0, 1]
        amount: f64,
    },
    /// Clear time accumulation, meals, and samples
    Reset,
    /// Halt ticking; simulated time stops advancing
    Pause,
    /// Resume ticking after a pause
    Resume,
    /// Change the speed multiplier (3600 = baseline; smaller = faster)
    SetSpeed {
        /// New speed multiplier
        multiplier: f64,
    },
    /// Start (or restart after reset) simulating an archetype
    InitializeArchetype {
        /// Archetype to simulate
        archetype: ArchetypeConfig,
    },
}

/// Events produced for the collaborator layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Emitted every tick while running
    UpdateData {
        /// Unbounded simulated hours since start
        time: f64,
        /// Fullness level in [0, 1]
        fullness: f64,
        /// Snapshot of the active meal set
        data: Vec<Meal>,
    },
    /// Periodic signal for the persistence collaborator
    StoreData {
        /// Snapshot of the retained samples
        data: Vec<FullnessSample>,
    },
    /// Acknowledges a completed reset
    ResetComplete,
}

/// Owns and advances the state of one simulation
///
/// Construct one controller per concurrent simulation; nothing here is
/// process-global.
#[derive(Debug)]
pub struct SimulationController {
    id: SimulationId,
    clock: TimeAccelerationClock,
    digestion: DigestionModel,
    scheduler: Option<MealScheduler>,
    samples: SampleBuffer,
    rng: StdRng,
    paused: bool,
    tick_count: u64,
}

impl SimulationController {
    /// Create a controller over the system wall clock
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_wall_clock(Box::new(SystemWallClock), seed)
    }

    /// Create a controller over a caller-supplied wall clock
    ///
    /// Tests and the batch driver pass a [`ManualWallClock`] here so ticks
    /// can cover simulated days without real waits.
    ///
    /// [`ManualWallClock`]: crate::simulation::clock::ManualWallClock
    pub fn with_wall_clock(wall: Box<dyn WallClock>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                info!(seed, "Using deterministic seed");
                StdRng::seed_from_u64(seed)
            }
            None => {
                debug!("Using entropy-based random seed");
                StdRng::from_entropy()
            }
        };
        let digestion = match seed {
            Some(seed) => DigestionModel::with_seed(seed),
            None => DigestionModel::new(),
        };

        Self {
            id: SimulationId::new(),
            clock: TimeAccelerationClock::new(
                wall,
                acceleration_for_multiplier(3600.0),
            ),
            digestion,
            scheduler: None,
            samples: SampleBuffer::new(),
            rng,
            paused: false,
            tick_count: 0,
        }
    }

    /// Replace the digestion model (test seam for deterministic decay)
    pub fn set_digestion_model(&mut self, digestion: DigestionModel) {
        self.digestion = digestion;
    }

    /// This controller's identifier
    pub fn id(&self) -> SimulationId {
        self.id
    }

    /// Whether an archetype has been started
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Whether the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Unbounded simulated hours since the simulation started
    pub fn simulated_time(&self) -> f64 {
        self.clock.elapsed_hours()
    }

    /// Snapshot of the active meal set
    pub fn active_meals(&self) -> Vec<Meal> {
        self.digestion.active_meals().to_vec()
    }

    /// The retained fullness samples
    pub fn samples(&self) -> Vec<FullnessSample> {
        self.samples.to_vec()
    }

    /// The scheduler driving meal emission, if started
    pub fn scheduler(&self) -> Option<&MealScheduler> {
        self.scheduler.as_ref()
    }

    /// Start simulating an archetype
    ///
    /// Idempotent: a second start while running is a logged no-op. An
    /// unresolvable archetype configuration is a hard error and leaves the
    /// controller stopped.
    #[instrument(skip(self, archetype), fields(sim = %self.id, archetype = %archetype.name))]
    pub fn start(&mut self, archetype: &ArchetypeConfig) -> SimulationResult<()> {
        if self.scheduler.is_some() {
            debug!("Start ignored, simulation already running");
            return Ok(());
        }

        let params = ArchetypeParams::resolve(archetype)?;

        info!(archetype = %params.name, "Starting simulation");
        let mut scheduler = MealScheduler::new(params);
        scheduler.start(&mut self.rng);
        self.scheduler = Some(scheduler);
        Ok(())
    }

    /// Apply one command from the inbox
    ///
    /// Commands arriving in an invalid state are rejected with a log notice,
    /// never an error: the collaborator layer fires and forgets.
    #[instrument(skip(self, command), fields(sim = %self.id))]
    pub fn handle_command(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::AddMeal { amount } => {
                self.add_meal(amount);
                Vec::new()
            }
            Command::Reset => self.reset(),
            Command::Pause => {
                self.pause();
                Vec::new()
            }
            Command::Resume => {
                self.resume();
                Vec::new()
            }
            Command::SetSpeed { multiplier } => {
                self.set_speed(multiplier);
                Vec::new()
            }
            Command::InitializeArchetype { archetype } => {
                if let Err(error) = self.start(&archetype) {
                    warn!(%error, "INITIALIZE_ARCHETYPE rejected");
                }
                Vec::new()
            }
        }
    }

    /// Inject a meal directly, bypassing the scheduler
    pub fn add_meal(&mut self, amount: f64) {
        if self.paused {
            info!(amount, "ADD_MEAL rejected while paused");
            return;
        }
        if !(0.0..=1.0).contains(&amount) || amount == 0.0 || amount.is_nan() {
            warn!(amount, "ADD_MEAL rejected, amount must be in (0, 1]");
            return;
        }
        let time_eaten = self.clock.elapsed_hours();
        self.digestion.add_meal(Meal::new(amount, time_eaten));
    }

    /// Halt the simulation; simulated time stops advancing
    pub fn pause(&mut self) {
        if self.paused {
            debug!("Pause ignored, already paused");
            return;
        }
        self.clock.pause();
        if let Some(scheduler) = &mut self.scheduler {
            scheduler.pause();
        }
        self.paused = true;
        info!("Simulation paused");
    }

    /// Resume after a pause
    ///
    /// The clock re-bases its epoch on the current wall instant, so the real
    /// time spent paused never leaks into simulated time.
    pub fn resume(&mut self) {
        if !self.paused {
            debug!("Resume ignored, not paused");
            return;
        }
        self.clock.resume();
        if let Some(scheduler) = &mut self.scheduler {
            scheduler.resume();
        }
        self.paused = false;
        info!("Simulation resumed");
    }

    /// Clear time accumulation, active meals, and samples
    pub fn reset(&mut self) -> Vec<Event> {
        self.clock.reset();
        self.digestion.clear();
        self.samples.clear();
        self.tick_count = 0;
        info!("Simulation reset");
        vec![Event::ResetComplete]
    }

    /// Change the speed multiplier, preserving simulated-time continuity
    pub fn set_speed(&mut self, multiplier: f64) {
        if multiplier <= 0.0 || multiplier.is_nan() {
            warn!(multiplier, "SET_SPEED rejected, multiplier must be positive");
            return;
        }
        self.clock.set_acceleration(acceleration_for_multiplier(multiplier));
    }

    /// Advance the simulation by one tick
    ///
    /// No-op while paused or before an archetype has been started. Returns
    /// the events to deliver to the observer: an `UpdateData` every tick and
    /// a periodic `StoreData`.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.paused {
            return Vec::new();
        }
        let Some(scheduler) = &mut self.scheduler else {
            return Vec::new();
        };

        let now = self.clock.elapsed_hours();
        let hour = self.clock.hour_of_day();
        let params = scheduler.params().clone();

        if let Some(size) = scheduler.step(hour, &mut self.rng) {
            self.digestion.add_meal(Meal::new(size.amount(), now));
        }

        let fullness = self.digestion.total_fullness(
            now,
            hour,
            params.full_sedentarism_start_hour,
            params.full_sedentarism_end_hour,
        );
        self.samples.push(now, fullness);
        self.tick_count += 1;

        let mut events = vec![Event::UpdateData {
            time: now,
            fullness,
            data: self.digestion.active_meals().to_vec(),
        }];
        if self.tick_count % STORE_DATA_INTERVAL_TICKS == 0 {
            events.push(Event::StoreData { data: self.samples.to_vec() });
        }
        events
    }
}

/// Drive a controller from a command inbox until the inbox disconnects
///
/// Commands are drained in arrival order strictly between ticks, which is
/// the ordering guarantee the collaborator layer relies on. Events that find
/// no listener end the loop.
pub fn run_simulation<T: TickSource>(
    mut controller: SimulationController,
    commands: Receiver<Command>,
    events: Sender<Event>,
    mut ticker: T,
) -> SimulationController {
    info!(sim = %controller.id(), "Simulation loop started");
    loop {
        // Drain the inbox between ticks
        loop {
            match commands.try_recv() {
                Ok(command) => {
                    for event in controller.handle_command(command) {
                        if events.send(event).is_err() {
                            info!(sim = %controller.id(), "Observer gone, stopping");
                            return controller;
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!(sim = %controller.id(), "Command channel closed, stopping");
                    return controller;
                }
            }
        }

        for event in controller.tick() {
            if events.send(event).is_err() {
                info!(sim = %controller.id(), "Observer gone, stopping");
                return controller;
            }
        }

        ticker.wait();
    }
}

/// Spawn a simulation on its own thread behind a command/event channel pair
///
/// The returned handle is the entire external surface of the running
/// simulation. Dropping the handle closes the command channel, which stops
/// the loop and joins cleanly.
#[derive(Debug)]
pub struct SimulationHandle {
    commands: Sender<Command>,
    events: Receiver<Event>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SimulationHandle {
    /// Spawn a real-time simulation for the given archetype
    pub fn spawn(archetype: ArchetypeConfig, seed: Option<u64>) -> Self {
        let (command_tx, command_rx) = std::sync::mpsc::channel();
        let (event_tx, event_rx) = std::sync::mpsc::channel();

        let thread = std::thread::spawn(move || {
            let mut controller = SimulationController::new(seed);
            if let Err(error) = controller.start(&archetype) {
                warn!(%error, "Spawned simulation could not start");
            }
            run_simulation(
                controller,
                command_rx,
                event_tx,
                crate::simulation::tick::IntervalTicker::new(TICK_PERIOD_MS),
            );
        });

        Self { commands: command_tx, events: event_rx, thread: Some(thread) }
    }

    /// Send a command to the simulation
    pub fn send(&self, command: Command) -> Result<(), std::sync::mpsc::SendError<Command>> {
        self.commands.send(command)
    }

    /// The event stream receiver
    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        // Closing the command channel stops the loop
        let (orphan_tx, _) = std::sync::mpsc::channel();
        drop(std::mem::replace(&mut self.commands, orphan_tx));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::clock::ManualWallClock;

    fn manual_controller() -> (ManualWallClock, SimulationController) {
        let wall = ManualWallClock::new();
        let controller =
            SimulationController::with_wall_clock(Box::new(wall.clone()), Some(7));
        (wall, controller)
    }

    fn started_controller() -> (ManualWallClock, SimulationController) {
        let (wall, mut controller) = manual_controller();
        controller.start(&ArchetypeConfig::named("ModernMan")).unwrap();
        (wall, controller)
    }

    #[test]
    fn test_tick_before_start_is_a_no_op() {
        let (_wall, mut controller) = manual_controller();
        assert!(controller.tick().is_empty());
    }

    #[test]
    fn test_start_is_idempotent() {
        let (_wall, mut controller) = started_controller();
        let first_params = controller.scheduler().unwrap().params().clone();
        controller.start(&ArchetypeConfig::named("Lao")).unwrap();
        assert_eq!(controller.scheduler().unwrap().params(), &first_params);
    }

    #[test]
    fn test_start_rejects_invalid_archetype() {
        let (_wall, mut controller) = manual_controller();
        let result = controller.start(&ArchetypeConfig {
            name: "Backwards".to_string(),
            start_eating_hour: Some(20.0),
            stop_eating_hour: Some(4.0),
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(!controller.is_running());
    }

    #[test]
    fn test_tick_emits_update_data() {
        let (wall, mut controller) = started_controller();
        wall.advance_ms(100);
        let events = controller.tick();
        assert!(matches!(events.as_slice(), [Event::UpdateData { .. }]));
    }

    #[test]
    fn test_add_meal_appears_in_active_set() {
        let (_wall, mut controller) = started_controller();
        controller.add_meal(0.5);
        assert_eq!(controller.active_meals().len(), 1);
        assert_eq!(controller.active_meals()[0].amount, 0.5);
    }

    #[test]
    fn test_add_meal_rejected_while_paused() {
        let (_wall, mut controller) = started_controller();
        controller.pause();
        controller.add_meal(0.5);
        assert!(controller.active_meals().is_empty());
    }

    #[test]
    fn test_add_meal_rejects_out_of_range_amounts() {
        let (_wall, mut controller) = started_controller();
        controller.add_meal(0.0);
        controller.add_meal(-0.2);
        controller.add_meal(1.5);
        assert!(controller.active_meals().is_empty());
    }

    #[test]
    fn test_pause_freezes_simulated_time() {
        let (wall, mut controller) = started_controller();
        wall.advance_ms(500);
        controller.pause();
        let frozen = controller.simulated_time();

        wall.advance_ms(10_000);
        assert!(controller.tick().is_empty());
        assert_eq!(controller.simulated_time(), frozen);

        controller.resume();
        assert!((controller.simulated_time() - frozen).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_state_and_acknowledges() {
        let (wall, mut controller) = started_controller();
        controller.add_meal(0.7);
        wall.advance_ms(1000);
        controller.tick();
        assert!(!controller.samples().is_empty());

        let events = controller.handle_command(Command::Reset);
        assert!(matches!(events.as_slice(), [Event::ResetComplete]));
        assert_eq!(controller.simulated_time(), 0.0);
        assert!(controller.active_meals().is_empty());
        assert!(controller.samples().is_empty());
    }

    #[test]
    fn test_set_speed_preserves_continuity() {
        let (wall, mut controller) = started_controller();
        wall.advance_ms(1000); // 1 h at baseline
        controller.handle_command(Command::SetSpeed { multiplier: 1800.0 });
        wall.advance_ms(1000); // 2 h at 500 ms/h
        assert!((controller.simulated_time() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_speed_rejects_non_positive() {
        let (wall, mut controller) = started_controller();
        controller.handle_command(Command::SetSpeed { multiplier: 0.0 });
        wall.advance_ms(1000);
        // Still at the baseline acceleration
        assert!((controller.simulated_time() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fullness_stays_bounded_over_days() {
        let (wall, mut controller) = started_controller();
        // Two simulated days at 0.1 h per tick
        for _ in 0..480 {
            wall.advance_ms(100);
            for event in controller.tick() {
                if let Event::UpdateData { fullness, .. } = event {
                    assert!((0.0..=1.0).contains(&fullness), "fullness {} out of bounds", fullness);
                }
            }
        }
        assert!(!controller.samples().is_empty());
    }

    #[test]
    fn test_store_data_emitted_periodically() {
        let (wall, mut controller) = started_controller();
        let mut store_events = 0;
        for _ in 0..STORE_DATA_INTERVAL_TICKS + 1 {
            wall.advance_ms(10);
            for event in controller.tick() {
                if matches!(event, Event::StoreData { .. }) {
                    store_events += 1;
                }
            }
        }
        assert_eq!(store_events, 1);
    }

    #[test]
    fn test_command_serde_round_trip() {
        let command = Command::SetSpeed { multiplier: 1800.0 };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.contains("\"type\":\"SetSpeed\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Command::SetSpeed { multiplier } if multiplier == 1800.0));
    }
}
