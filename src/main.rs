// Fullness Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/fullness-simulator --archetype ModernMan --days 2
// ```
//
// The binary drives the engine in batch mode: virtual wall time advances one
// tick period per iteration, so simulated days complete in milliseconds and
// runs are reproducible under --seed.

use clap::Parser;
use fullness_simulator::simulation::{
    Event, FullnessSample, LoggingConfig, ManualWallClock, SimulationController, TickSource,
    VirtualTicker, TICK_PERIOD_MS,
};
use fullness_simulator::types::{known_archetype_names, CliArgs, OutputFormat, SimulationConfig};
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        let default_config = SimulationConfig::default();
        match default_config.print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        // Default: minimal logging for normal users
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Fullness Simulator");

    // Load configuration from CLI arguments and optional config file
    let config = match SimulationConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    if let Err(e) = run_simulation(&config) {
        error!("Simulation failed: {}", e);
        process::exit(1);
    }

    info!("Fullness Simulator completed successfully");
}

/// Run the batch simulation and write the resulting samples
fn run_simulation(config: &SimulationConfig) -> Result<(), String> {
    use std::time::Instant;

    let start_time = Instant::now();

    // Virtual wall clock: each tick advances it by one tick period, so the
    // run covers the requested simulated days without real waits
    let wall = ManualWallClock::new();
    let mut controller =
        SimulationController::with_wall_clock(Box::new(wall.clone()), config.seed);
    let mut ticker = VirtualTicker::new(wall, TICK_PERIOD_MS as i64);

    controller.start(&config.archetype).map_err(|e| {
        format!("Archetype '{}' could not be started: {}", config.archetype.name, e)
    })?;
    controller.set_speed(config.speed_multiplier);

    let target_hours = config.days * 24.0;
    let mut ticks: u64 = 0;
    let mut meals_seen: usize = 0;
    let mut last_meal_count = 0;
    let mut final_fullness = 0.0;

    eprintln!("Simulating {} days of {}...", config.days, config.archetype.name);
    while controller.simulated_time() < target_hours {
        ticker.wait();
        for event in controller.tick() {
            if let Event::UpdateData { fullness, data, .. } = event {
                final_fullness = fullness;
                if data.len() > last_meal_count {
                    meals_seen += data.len() - last_meal_count;
                }
                last_meal_count = data.len();
            }
        }
        ticks += 1;
    }

    let samples = controller.samples();
    write_samples(&samples, config)?;

    eprintln!("\nSimulation complete:");
    eprintln!("  Ticks: {}", ticks);
    eprintln!("  Simulated hours: {:.2}", controller.simulated_time());
    eprintln!("  Meals observed: {}", meals_seen);
    eprintln!("  Final fullness: {:.3}", final_fullness);
    eprintln!("  Samples retained: {}", samples.len());
    eprintln!("  Runtime: {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Write samples to the configured destination in the configured format
fn write_samples(samples: &[FullnessSample], config: &SimulationConfig) -> Result<(), String> {
    use std::fs::File;
    use std::io::{BufWriter, Write};

    let mut writer: Box<dyn Write> = match &config.samples_output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Failed to create samples output '{}': {}", path, e))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    };

    match config.output_format {
        OutputFormat::Json => {
            for sample in samples {
                let line = serde_json::to_string(sample)
                    .map_err(|e| format!("Failed to serialize sample: {}", e))?;
                writeln!(writer, "{}", line)
                    .map_err(|e| format!("Failed to write sample line: {}", e))?;
            }
        }
        OutputFormat::Csv => {
            writeln!(writer, "time,fullness")
                .map_err(|e| format!("Failed to write CSV header: {}", e))?;
            for sample in samples {
                writeln!(writer, "{:.5},{:.5}", sample.time, sample.fullness)
                    .map_err(|e| format!("Failed to write CSV row: {}", e))?;
            }
        }
    }

    writer.flush().map_err(|e| format!("Failed to flush samples output: {}", e))?;

    if let Some(path) = &config.samples_output {
        info!("Wrote {} samples to {}", samples.len(), path);
        eprintln!("Samples written to: {}", path);
    }
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Fullness Simulator");
    eprintln!("==================");
    eprintln!("Models stomach fullness over simulated time for an eating archetype");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Archetype: {}", config.archetype.name);
    eprintln!("  Known Archetypes: {}", known_archetype_names().join(", "));
    eprintln!("  Speed Multiplier: {}", config.speed_multiplier);
    eprintln!("  Simulated Days: {}", config.days);
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    if let Some(path) = &config.samples_output {
        eprintln!("  Samples Output: {}", path);
    }
    eprintln!();
}
