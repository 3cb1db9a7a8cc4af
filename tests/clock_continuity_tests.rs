//! Integration tests for time acceleration and continuity across speed changes

use fullness_simulator::simulation::{
    acceleration_for_multiplier, ManualWallClock, TimeAccelerationClock, SIMULATION_START_HOUR,
};

fn clock_over(wall: &ManualWallClock, acceleration: f64) -> TimeAccelerationClock {
    TimeAccelerationClock::new(Box::new(wall.clone()), acceleration)
}

/// Switching A1 -> A2 -> A1 must yield exactly r1/A1 + r2/A2 + r3/A1
#[test]
fn test_speed_continuity_across_switch_and_back() {
    let wall = ManualWallClock::new();
    let mut clock = clock_over(&wall, 1000.0);

    let r1 = 4200;
    let r2 = 1800;
    let r3 = 950;

    wall.advance_ms(r1);
    clock.set_acceleration(250.0);
    wall.advance_ms(r2);
    clock.set_acceleration(1000.0);
    wall.advance_ms(r3);

    let expected = r1 as f64 / 1000.0 + r2 as f64 / 250.0 + r3 as f64 / 1000.0;
    assert!(
        (clock.elapsed_hours() - expected).abs() < 1e-9,
        "expected {} simulated hours, got {}",
        expected,
        clock.elapsed_hours()
    );
}

/// Many rapid speed changes must not lose or duplicate simulated time
#[test]
fn test_no_drift_over_many_speed_changes() {
    let wall = ManualWallClock::new();
    let mut clock = clock_over(&wall, 1000.0);

    let accelerations = [1000.0, 500.0, 2000.0, 125.0, 1000.0, 750.0];
    let mut expected = 0.0;
    for round in 0..100 {
        let acceleration = accelerations[round % accelerations.len()];
        clock.set_acceleration(acceleration);
        let real_ms = 100 + (round as i64 % 7) * 37;
        wall.advance_ms(real_ms);
        expected += real_ms as f64 / acceleration;
    }

    assert!((clock.elapsed_hours() - expected).abs() < 1e-9);
}

/// Simulated time before pause equals simulated time after resume
#[test]
fn test_pause_resume_idempotence() {
    let wall = ManualWallClock::new();
    let mut clock = clock_over(&wall, 1000.0);

    wall.advance_ms(3456);
    let before_pause = clock.elapsed_hours();

    clock.pause();
    // Arbitrary real time passes while paused
    wall.advance_ms(987_654);
    clock.resume();

    let after_resume = clock.elapsed_hours();
    assert!(
        (before_pause - after_resume).abs() < 1e-12,
        "paused duration leaked into simulated time: {} vs {}",
        before_pause,
        after_resume
    );
}

/// Speed changes while paused take effect without jumping time
#[test]
fn test_speed_change_while_paused() {
    let wall = ManualWallClock::new();
    let mut clock = clock_over(&wall, 1000.0);

    wall.advance_ms(1000);
    clock.pause();
    clock.set_acceleration(500.0);
    wall.advance_ms(5000);
    clock.resume();
    wall.advance_ms(1000);

    // 1 h at 1000 ms/h before the pause, 2 h at 500 ms/h after the resume
    assert!((clock.elapsed_hours() - 3.0).abs() < 1e-9);
}

/// The display hour wraps at midnight while the accumulator keeps counting
#[test]
fn test_display_hour_wraps_but_accumulator_does_not() {
    let wall = ManualWallClock::new();
    let clock = clock_over(&wall, 1000.0);

    // 100 simulated hours: more than four days
    wall.advance_ms(100_000);
    assert!((clock.elapsed_hours() - 100.0).abs() < 1e-9);
    let expected_hour = (SIMULATION_START_HOUR + 100.0) % 24.0;
    assert!((clock.hour_of_day() - expected_hour).abs() < 1e-9);
    assert_eq!(clock.day_count(), 4);
}

/// The multiplier conversion matches the baseline definition
#[test]
fn test_multiplier_baseline() {
    // 3600 = one simulated hour per real second
    assert_eq!(acceleration_for_multiplier(3600.0), 1000.0);
    // Halving the multiplier doubles the simulation speed
    let faster = acceleration_for_multiplier(1800.0);
    assert_eq!(faster, 500.0);
}
