use crate::{HillSolver, RelativeState};

/// Propagates `state` for `steps` steps of `dt`, recording every
/// intermediate state (the initial one included).
pub(super) fn poll_trajectory(
    solver: &HillSolver,
    state: RelativeState,
    dt: f64,
    steps: usize,
) -> Vec<RelativeState> {
    let mut current = state;
    let mut states = Vec::with_capacity(steps + 1);
    states.push(current);

    for _ in 0..steps {
        solver.step(&mut current, dt);
        states.push(current);
    }

    states
}

/// The largest along-track excursion over a trajectory.
pub(super) fn max_along_track(states: &[RelativeState]) -> f64 {
    states
        .iter()
        .map(|state| state.position.y.abs())
        .fold(0.0, f64::max)
}
