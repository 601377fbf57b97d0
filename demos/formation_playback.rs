//! Generates a layered formation around an ISS-like reference orbit,
//! propagates it for one orbit with the J2-corrected Hill equations,
//! records the trajectories and plays them back at 60x speed.
//!
//! Run with `RUST_LOG=debug` to see what the library logs.

use glam::{DQuat, DVec3};
use hill_formation::{
    FormationConfig, FormationGenerator, HillSolver, Pattern, PlaybackEngine, ReferenceOrbit,
    RelativeState, Scale, TrajectoryData, TrajectorySample,
};
use std::io::{self, Write};

const RECORD_INTERVAL: f64 = 60.0;
const STEPS_PER_RECORD: usize = 60;
const PLAYBACK_FRAMES: usize = 20;
const FRAME_SECONDS: f64 = 0.5;

fn main() -> io::Result<()> {
    env_logger::init();

    let orbit = ReferenceOrbit::iss();
    if let Err(err) = orbit.validate() {
        eprintln!("Unsupported reference orbit: {err}");
        return Ok(());
    }

    let mut solver = HillSolver::new(orbit.mean_motion());
    solver.set_orbit_parameters(orbit.radius(), orbit.inclination);
    solver.set_j2_enabled(true);

    let config = build_config();
    if let Err(err) = config.validate() {
        eprintln!("Invalid formation: {err}");
        return Ok(());
    }

    let generator = FormationGenerator::from_solver(&solver);
    let stats = generator.statistics(&config);
    let satellites = generator.generate(&config);

    let mut lock = io::stdout().lock();
    writeln!(
        &mut lock,
        "Formation '{}': {} satellites in {} layers (period {:.1} min, c = {:.6})",
        config.name,
        stats.total_satellites,
        stats.enabled_layers,
        orbit.period() / 60.0,
        solver.ss_coefficients().1,
    )?;
    for (name, count) in &stats.satellites_by_layer {
        writeln!(&mut lock, "  {name}: {count}")?;
    }

    let records = (orbit.period() / RECORD_INTERVAL).ceil() as usize + 1;
    let trajectories: Vec<Vec<TrajectorySample>> = satellites
        .iter()
        .map(|satellite| record(&solver, satellite.state, records))
        .collect();

    let data = match TrajectoryData::new(trajectories) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Recorded trajectories are malformed: {err}");
            return Ok(());
        }
    };

    let mut engine = PlaybackEngine::new();
    engine.load(data);
    engine.set_speed(60.0);
    engine.set_loop_enabled(false);
    engine.play();

    let mut states = vec![RelativeState::default(); satellites.len()];
    for _ in 0..PLAYBACK_FRAMES {
        engine.update(FRAME_SECONDS);
        engine.apply_to_states(&mut states);

        let max_distance = states
            .iter()
            .map(|state| state.position.length())
            .fold(0.0, f64::max);
        writeln!(
            &mut lock,
            "t = {:7.1} s ({:5.1}%): farthest satellite at {:.2} m",
            engine.current_time(),
            100.0 * engine.progress(),
            max_distance,
        )?;
    }

    Ok(())
}

fn build_config() -> FormationConfig {
    let mut config = FormationConfig::new("Demo formation");
    config.description = "A hexagonal core surrounded by a circular ring".to_string();

    let inner = config.add_layer(Some("Core"));
    inner.pattern = Pattern::HexagonalDisk;
    inner.scale = Scale::Spacing(10.0);
    inner.satellite_count = 37;

    let ring = config.add_layer(Some("Ring"));
    ring.pattern = Pattern::CircularOrbit;
    ring.scale = Scale::Radius(200.0);
    ring.satellite_count = 12;

    config
}

/// Propagates a satellite, sampling it every [`RECORD_INTERVAL`] seconds.
/// The recorded attitude keeps the satellite pointed along its velocity.
fn record(solver: &HillSolver, initial: RelativeState, records: usize) -> Vec<TrajectorySample> {
    let dt = RECORD_INTERVAL / STEPS_PER_RECORD as f64;
    let mut state = initial;

    (0..records)
        .map(|i| {
            if i > 0 {
                solver.propagate(&mut state, dt, STEPS_PER_RECORD);
            }
            let heading = if state.velocity.length_squared() > 0.0 {
                DQuat::from_rotation_arc(DVec3::X, state.velocity.normalize())
            } else {
                DQuat::IDENTITY
            };
            TrajectorySample::new(i as f64 * RECORD_INTERVAL, state.position, heading)
        })
        .collect()
}
