//! BlueMind Headless Simulation Harness
//!
//! Drives the engine the way an external scheduler would, calling `step`
//! on a fixed cadence, and validates its invariants along the way.
//! Runs entirely in-process — no UI, no networking.
//!
//! Usage:
//!   cargo run -p bluemind-simtest
//!   cargo run -p bluemind-simtest -- --verbose
//!   cargo run -p bluemind-simtest -- --config bluemind.json --weeks 104 --scenario warming
//!   cargo run -p bluemind-simtest -- --json > run.json
//!
//! Logging goes through `RUST_LOG` (default `info`).

use std::path::PathBuf;

use bluemind_logic::advisory::Advisory;
use bluemind_logic::metrics;
use bluemind_logic::parameters::{EnvironmentalParameters, ParameterUpdate};
use bluemind_logic::population::PopulationState;
use bluemind_logic::sensors::{SensorEvent, SensorGenerator, SensorReading, SensorSite};
use bluemind_logic::settings::{presets, validate_settings, SimulationSettings};
use bluemind_logic::{SimulationRecord, SimulationSnapshot};
use bluemind_server::{
    ControllerError, DashboardStats, FileStore, InMemoryStore, RecordStore, SimulationController,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

// ── Command line ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Options {
    verbose: bool,
    json: bool,
    config: Option<PathBuf>,
    weeks: Option<u32>,
    scenario: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" | "-v" => opts.verbose = true,
            "--json" => opts.json = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                opts.config = Some(PathBuf::from(path));
            }
            "--weeks" => {
                let raw = args.next().ok_or("--weeks needs a number")?;
                let weeks = raw
                    .parse()
                    .map_err(|e| format!("invalid --weeks '{}': {}", raw, e))?;
                opts.weeks = Some(weeks);
            }
            "--scenario" => {
                opts.scenario = Some(args.next().ok_or("--scenario needs a name")?);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(opts)
}

fn load_settings(opts: &Options) -> Result<SimulationSettings, String> {
    let mut settings = match &opts.config {
        Some(path) => SimulationSettings::from_file(path).map_err(|e| e.to_string())?,
        None => SimulationSettings::default(),
    };
    if let Some(weeks) = opts.weeks {
        settings.weeks = weeks;
    }
    if let Some(scenario) = &opts.scenario {
        settings.scenario = scenario.clone();
        settings.initial_parameters = None;
    }
    let errors = validate_settings(&settings);
    if errors.is_empty() {
        Ok(settings)
    } else {
        Err(errors.join("; "))
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

/// Machine-readable run output for `--json`.
#[derive(Serialize)]
struct RunReport<'a> {
    settings: &'a SimulationSettings,
    record: Option<&'a SimulationRecord>,
    forecast: &'a [SimulationSnapshot],
    recommendations: Vec<&'static str>,
    stats: Option<DashboardStats>,
    sensor_readings: &'a [SensorReading],
    passed: usize,
    failed: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    let settings = match load_settings(&opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    let verbose = opts.verbose;

    if !opts.json {
        println!("=== BlueMind Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Reference regression values
    results.extend(validate_reference_step());

    // 2. Parameter clamping
    results.extend(validate_clamping());

    // 3. Driven run through the controller
    let run = match &settings.store_path {
        Some(path) => match FileStore::open(path) {
            Ok(store) => drive(SimulationController::new(store), &settings, verbose),
            Err(e) => {
                results.push(TestResult::check("store_open", false, e.to_string()));
                ScenarioRun::default()
            }
        },
        None => drive(
            SimulationController::new(InMemoryStore::new()),
            &settings,
            verbose,
        ),
    };
    results.extend(run.results);

    // 4. Determinism and reset across every preset
    results.extend(validate_presets(&settings));

    // 5. Sensor readings
    let (sensor_results, readings) = validate_sensors(&settings);
    results.extend(sensor_results);

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();

    if opts.json {
        let report = RunReport {
            settings: &settings,
            record: run.record.as_ref(),
            forecast: &run.forecast,
            recommendations: run.advice.iter().map(|a| a.message()).collect(),
            stats: run.stats,
            sensor_readings: &readings,
            passed,
            failed,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to serialize report: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        if let Some(record) = &run.record {
            println!(
                "\n  Final week {}: phyto={:.1} zoo={:.1} bact={:.1} health={:.1}",
                record.week,
                record.populations.phytoplankton,
                record.populations.zooplankton,
                record.populations.bacteria,
                record.metrics.ecosystem_health_score
            );
        }
        for advice in &run.advice {
            println!("  → {}", advice.message());
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Reference step ───────────────────────────────────────────────────

fn validate_reference_step() -> Vec<TestResult> {
    let mut record = SimulationRecord::new(
        "simtest",
        "reference",
        EnvironmentalParameters {
            temperature: 20.0,
            nutrients: 50.0,
            light: 75.0,
            salinity: 35.0,
        },
    );
    record.advance(1);

    let expected = [
        ("reference_phytoplankton", record.populations.phytoplankton, 990.0),
        ("reference_zooplankton", record.populations.zooplankton, 474.85),
        ("reference_bacteria", record.populations.bacteria, 1994.0),
        ("reference_nutrients", record.parameters.nutrients, 50.401),
    ];
    expected
        .iter()
        .map(|&(name, got, want)| {
            TestResult::check(
                name,
                (got - want).abs() < 1e-6,
                format!("got {:.6}, expected {:.6}", got, want),
            )
        })
        .collect()
}

// ── 2. Clamping ─────────────────────────────────────────────────────────

fn validate_clamping() -> Vec<TestResult> {
    let mut record = SimulationRecord::new("simtest", "clamp", EnvironmentalParameters::default());
    record.apply_parameters(&ParameterUpdate {
        temperature: Some(1000.0),
        nutrients: Some(-20.0),
        light: Some(250.0),
        salinity: Some(5.0),
    });
    let p = record.parameters;
    vec![
        TestResult::check(
            "clamp_temperature",
            p.temperature == 35.0,
            format!("1000 → {}", p.temperature),
        ),
        TestResult::check(
            "clamp_nutrients",
            p.nutrients == 0.0,
            format!("-20 → {}", p.nutrients),
        ),
        TestResult::check("clamp_light", p.light == 100.0, format!("250 → {}", p.light)),
        TestResult::check(
            "clamp_salinity",
            p.salinity == 30.0,
            format!("5 → {}", p.salinity),
        ),
    ]
}

// ── 3. Driven scenario ──────────────────────────────────────────────────

#[derive(Default)]
struct ScenarioRun {
    results: Vec<TestResult>,
    record: Option<SimulationRecord>,
    forecast: Vec<SimulationSnapshot>,
    advice: Vec<Advisory>,
    stats: Option<DashboardStats>,
}

fn drive<S: RecordStore>(
    mut controller: SimulationController<S>,
    settings: &SimulationSettings,
    verbose: bool,
) -> ScenarioRun {
    let mut run = ScenarioRun::default();
    let initial = settings.resolved_parameters();

    let record = match controller.create(&settings.owner, &settings.scenario, initial) {
        Ok(r) => r,
        Err(e) => {
            run.results
                .push(TestResult::check("scenario_create", false, e.to_string()));
            return run;
        }
    };
    let id = record.id;
    log::info!(
        "Driving '{}' for {} step(s) of {} week(s)",
        settings.scenario,
        settings.weeks,
        settings.weeks_per_step
    );

    let mut floor_violations = 0;
    let mut bound_violations = 0;
    let mut last = record;
    for _ in 0..settings.weeks {
        match controller.step(id, settings.weeks_per_step) {
            Ok(r) => {
                if !r.populations.respects_floors() {
                    floor_violations += 1;
                }
                if !r.metrics.is_within_bounds() {
                    bound_violations += 1;
                }
                if verbose && r.week % 13 == 0 {
                    log::info!(
                        "week {:>4}: phyto={:>8.1} zoo={:>7.1} bact={:>7.1} N={:>5.1} health={:>5.1}",
                        r.week,
                        r.populations.phytoplankton,
                        r.populations.zooplankton,
                        r.populations.bacteria,
                        r.parameters.nutrients,
                        r.metrics.ecosystem_health_score
                    );
                }
                last = r;
            }
            Err(e) => {
                run.results
                    .push(TestResult::check("scenario_step", false, e.to_string()));
                return run;
            }
        }
    }

    run.results.push(TestResult::check(
        "scenario_floors",
        floor_violations == 0,
        format!("{} floor violation(s) over {} steps", floor_violations, settings.weeks),
    ));
    run.results.push(TestResult::check(
        "scenario_metric_bounds",
        bound_violations == 0,
        format!("{} out-of-range metric set(s)", bound_violations),
    ));

    let history_len = last.history.len();
    let ordered = last
        .history
        .iter()
        .enumerate()
        .all(|(i, s)| s.week == i as u32 * settings.weeks_per_step);
    run.results.push(TestResult::check(
        "scenario_history",
        history_len == settings.weeks as usize && ordered,
        format!("{} pre-step snapshot(s), ordered: {}", history_len, ordered),
    ));

    let recomputed = metrics::compute(&last.parameters, &last.populations);
    run.results.push(TestResult::check(
        "scenario_metrics_fresh",
        recomputed == last.metrics,
        "stored metrics match a fresh computation",
    ));

    match controller.forecast(id, settings.forecast_weeks) {
        Ok(f) => {
            let untouched = controller.get(id).map(|r| r == last).unwrap_or(false);
            run.results.push(TestResult::check(
                "scenario_forecast_read_only",
                untouched && f.len() == settings.forecast_weeks as usize,
                format!("{} projected week(s), record untouched: {}", f.len(), untouched),
            ));
            run.forecast = f;
        }
        Err(e) => run
            .results
            .push(TestResult::check("scenario_forecast", false, e.to_string())),
    }

    match controller.recommendations(id) {
        Ok(a) => run.advice = a,
        Err(e) => run
            .results
            .push(TestResult::check("scenario_recommendations", false, e.to_string())),
    }

    match controller.stats(&settings.owner) {
        Ok(stats) => {
            run.results.push(TestResult::check(
                "scenario_stats",
                stats.total_simulations >= 1
                    && stats.total_microbe_populations >= last.populations.total()
                    && (0.0..=100.0).contains(&stats.average_ecosystem_health),
                format!(
                    "{} simulation(s), avg health {:.1}",
                    stats.total_simulations, stats.average_ecosystem_health
                ),
            ));
            run.stats = Some(stats);
        }
        Err(e) => run
            .results
            .push(TestResult::check("scenario_stats", false, e.to_string())),
    }

    run.record = Some(last);
    run
}

// ── 4. Presets: determinism and reset ───────────────────────────────────

fn validate_presets(settings: &SimulationSettings) -> Vec<TestResult> {
    let mut results = Vec::new();
    let weeks = settings.weeks.min(104);

    for preset in presets() {
        let replay = || -> Result<SimulationRecord, ControllerError> {
            let mut c = SimulationController::new(InMemoryStore::new());
            let id = c.create("simtest", preset.name, preset.parameters)?.id;
            for _ in 0..weeks {
                c.step(id, 1)?;
            }
            c.get(id)
        };
        let deterministic = match (replay(), replay()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        results.push(TestResult::check(
            &format!("determinism_{}", preset.name),
            deterministic,
            format!("{} weeks replayed twice", weeks),
        ));

        let mut c = SimulationController::new(InMemoryStore::new());
        let reset_ok = c
            .create("simtest", preset.name, preset.parameters)
            .and_then(|r| {
                for _ in 0..weeks {
                    c.step(r.id, 1)?;
                }
                let first = c.reset(r.id)?;
                let second = c.reset(r.id)?;
                Ok(first == second
                    && first.week == 0
                    && first.history.is_empty()
                    && first.populations == PopulationState::baseline())
            })
            .unwrap_or(false);
        results.push(TestResult::check(
            &format!("reset_{}", preset.name),
            reset_ok,
            "reset is idempotent and returns to baseline",
        ));
    }

    results
}

// ── 5. Sensors ──────────────────────────────────────────────────────────

fn validate_sensors(settings: &SimulationSettings) -> (Vec<TestResult>, Vec<SensorReading>) {
    let mut results = Vec::new();
    let site = SensorSite::at_latitude(settings.sensor_latitude, settings.sensor_depth);
    let rng = || match settings.sensor_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut generator = SensorGenerator::new(site, rng());
    let readings: Vec<SensorReading> = (0..24).map(|_| generator.next_reading()).collect();

    if settings.sensor_seed.is_some() {
        let mut again = SensorGenerator::new(site, rng());
        let replay: Vec<SensorReading> = (0..24).map(|_| again.next_reading()).collect();
        results.push(TestResult::check(
            "sensors_seeded_replay",
            replay == readings,
            "same seed yields the same 24h series",
        ));
    }

    let floors_ok = readings
        .iter()
        .all(|r| r.dissolved_oxygen >= 4.0 && r.turbidity >= 0.1 && r.bacteria_count >= 0.0);
    results.push(TestResult::check(
        "sensors_floors",
        floors_ok,
        format!("{} hourly readings", readings.len()),
    ));

    let storm = generator.reading_with_event(SensorEvent::Storm);
    results.push(TestResult::check(
        "sensors_storm_event",
        storm.turbidity >= 0.4,
        format!("storm turbidity {:.2}", storm.turbidity),
    ));

    (results, readings)
}
