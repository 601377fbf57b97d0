use core::f64::consts::TAU;

use crate::{HillSolver, ReferenceOrbit};

mod assertions;
mod polling;

mod frame;
mod hill;

/// Mean motion of a roughly 400 km orbit, in rad/s.
const LEO_MEAN_MOTION: f64 = 0.0011;

/// Integration steps per reference orbit period.
const STEPS_PER_PERIOD: usize = 6000;

fn leo_solver() -> HillSolver {
    HillSolver::new(LEO_MEAN_MOTION)
}

fn iss_j2_solver() -> HillSolver {
    let orbit = ReferenceOrbit::iss();
    let mut solver = HillSolver::new(orbit.mean_motion());
    solver.set_orbit_parameters(orbit.radius(), orbit.inclination);
    solver.set_j2_enabled(true);
    solver
}

/// Time step that splits one period of `solver`'s reference orbit
/// into [`STEPS_PER_PERIOD`] steps.
fn period_step(solver: &HillSolver) -> f64 {
    TAU / solver.parameters().mean_motion() / STEPS_PER_PERIOD as f64
}
