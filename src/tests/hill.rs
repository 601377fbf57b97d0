use glam::DVec3;

use super::{
    assertions::*, iss_j2_solver, leo_solver, period_step, polling::*, seeders::*,
    LEO_MEAN_MOTION, STEPS_PER_PERIOD,
};
use crate::{
    FormationInitializer, FormationSpec, HillSolver, OrbitalFrameParameters, Pattern,
    PeriodicCoefficients, ReferenceOrbit, RelativeState, Scale,
};

#[test]
fn origin_stays_at_origin() {
    let solver = leo_solver();
    let mut state = RelativeState::default();

    solver.propagate(&mut state, 10.0, 100);

    assert_eq!(state, RelativeState::default());
}

#[test]
fn classical_derivatives() {
    let n = LEO_MEAN_MOTION;
    let solver = leo_solver();
    let state = RelativeState::new(DVec3::new(2.0, 5.0, 3.0), DVec3::new(0.5, 0.25, -1.0));

    let derivative = solver.compute_derivatives(&state);

    assert_eq!(derivative.velocity, state.velocity);
    assert_almost_eq(
        derivative.acceleration.x,
        2.0 * n * 0.25 + 3.0 * n * n * 2.0,
        "radial acceleration",
    );
    assert_almost_eq(derivative.acceleration.y, -2.0 * n * 0.5, "along-track acceleration");
    assert_almost_eq(derivative.acceleration.z, -n * n * 3.0, "cross-track acceleration");
}

#[test]
fn along_track_position_does_not_matter() {
    let solver = iss_j2_solver();
    let a = RelativeState::new(DVec3::new(1.0, 0.0, 1.0), DVec3::new(0.1, 0.2, 0.3));
    let b = RelativeState::new(DVec3::new(1.0, 1e4, 1.0), DVec3::new(0.1, 0.2, 0.3));

    assert_eq!(
        solver.compute_derivatives(&a).acceleration,
        solver.compute_derivatives(&b).acceleration
    );
}

#[test]
fn j2_derivatives() {
    let solver = iss_j2_solver();
    let n = solver.parameters().mean_motion();
    let (_, c) = solver.ss_coefficients();
    let state = RelativeState::new(DVec3::new(2.0, 0.0, 3.0), DVec3::new(0.5, 0.25, 0.0));

    let acceleration = solver.compute_derivatives(&state).acceleration;

    assert_almost_eq(
        acceleration.x,
        2.0 * n * c * 0.25 + (5.0 * c * c - 2.0) * n * n * 2.0,
        "radial acceleration",
    );
    assert_almost_eq(acceleration.y, -2.0 * n * c * 0.5, "along-track acceleration");
    assert_almost_eq(
        acceleration.z,
        -(3.0 * c * c - 2.0) * n * n * 3.0,
        "cross-track acceleration",
    );
}

#[test]
fn disabled_j2_matches_classical() {
    let mut solver = iss_j2_solver();
    solver.set_j2_enabled(false);
    let classical = HillSolver::new(solver.parameters().mean_motion());

    for _ in 0..100 {
        let state = random_state();
        assert_eq!(
            solver.compute_derivatives(&state),
            classical.compute_derivatives(&state),
            "derivatives of {state:?}"
        );
    }
}

#[test]
fn ss_coefficients_for_leo() {
    let solver = iss_j2_solver();
    let (s, c) = solver.ss_coefficients();

    assert!(s > 0.0, "s = {s}");
    assert!(c > 1.0 && c < 1.01, "c = {c}");
    assert_almost_eq(c, (1.0 + s).sqrt(), "c = sqrt(1 + s)");
}

#[test]
fn ss_coefficients_reset_when_j2_disabled() {
    let mut solver = iss_j2_solver();
    solver.set_j2_enabled(false);
    assert_eq!(solver.ss_coefficients(), (0.0, 1.0));

    solver.set_j2_enabled(true);
    assert_ne!(solver.ss_coefficients(), (0.0, 1.0));
}

#[test]
fn ss_coefficients_need_a_radius() {
    let mut params = OrbitalFrameParameters::new(LEO_MEAN_MOTION);
    params.set_j2_enabled(true);
    assert_eq!(params.ss_coefficients(), (0.0, 1.0));

    params.set_orbit_parameters(0.0, 0.5);
    assert_eq!(params.ss_coefficients(), (0.0, 1.0));
}

#[test]
fn ss_coefficients_follow_inclination() {
    let orbit = ReferenceOrbit::iss();
    let equatorial = OrbitalFrameParameters::from_reference_orbit(
        &ReferenceOrbit::new(orbit.altitude, 0.0),
        true,
    );
    let polar = OrbitalFrameParameters::from_reference_orbit(
        &ReferenceOrbit::new(orbit.altitude, core::f64::consts::FRAC_PI_2),
        true,
    );

    // (1 + 3cos²i) is 4 at the equator and 1 at the poles
    let (s_equatorial, _) = equatorial.ss_coefficients();
    let (s_polar, _) = polar.ss_coefficients();
    assert_almost_eq(s_equatorial / s_polar, 4.0, "equatorial to polar s ratio");
}

#[test]
fn stable_vy0_has_no_drift_constant() {
    for solver in [leo_solver(), iss_j2_solver()] {
        for _ in 0..100 {
            let x0 = rand::random_range(-1e4..1e4);
            let vy0 = solver.compute_stable_vy0(x0);

            assert_almost_eq_within(
                solver.compute_drift_constant(x0, vy0),
                0.0,
                1e-15,
                &format!("drift constant for x0 = {x0}"),
            );
            assert!(solver.verify_stable_initial_velocity(x0, vy0, 1e-9));
        }
    }
}

#[test]
fn stable_velocity_check_is_strict() {
    let solver = leo_solver();
    let x0 = 100.0;
    let vy0 = solver.compute_stable_vy0(x0);

    assert!(solver.verify_stable_initial_velocity(x0, vy0 + 0.05, 0.1));
    assert!(!solver.verify_stable_initial_velocity(x0, vy0 + 0.5, 0.1));
}

#[test]
fn periodic_orbit_closes_after_one_period() {
    let solver = leo_solver();
    let dt = period_step(&solver);
    let spec = FormationSpec {
        pattern: Pattern::PeriodicOrbit,
        count: 8,
        scale: Scale::Radius(100.0),
        z_amplitude: 0.5,
        ..Default::default()
    };

    for condition in FormationInitializer::from_solver(&solver).generate(&spec) {
        let initial = RelativeState::from(condition);
        let mut state = initial;
        solver.propagate(&mut state, dt, STEPS_PER_PERIOD);

        assert_almost_eq_state(&state, &initial, 1e-6, "periodic orbit after one period");
    }
}

#[test]
fn general_periodic_orbit_closes_after_one_period() {
    let solver = leo_solver();
    let dt = period_step(&solver);
    let spec = FormationSpec {
        pattern: Pattern::PeriodicOrbit,
        count: 5,
        periodic: Some(PeriodicCoefficients {
            a: 40.0,
            b: -25.0,
            d: 300.0,
            e: 10.0,
            f: 60.0,
        }),
        ..Default::default()
    };

    for condition in FormationInitializer::from_solver(&solver).generate(&spec) {
        let initial = RelativeState::from(condition);
        let mut state = initial;
        solver.propagate(&mut state, dt, STEPS_PER_PERIOD);

        assert_almost_eq_state(&state, &initial, 1e-6, "general periodic orbit");
    }
}

#[test]
fn cross_track_oscillates_at_mean_motion() {
    let solver = leo_solver();
    let dt = period_step(&solver);
    let mut state = RelativeState::new(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO);

    solver.propagate(&mut state, dt, STEPS_PER_PERIOD / 2);

    assert_almost_eq_vec3(state.position, DVec3::new(0.0, 0.0, -10.0), "half a period later");
}

#[test]
fn radial_offset_at_rest_drifts_behind() {
    let solver = leo_solver();
    let dt = period_step(&solver);
    let x0 = 10.0;
    let mut state = RelativeState::new(DVec3::new(x0, 0.0, 0.0), DVec3::ZERO);

    solver.propagate(&mut state, dt, STEPS_PER_PERIOD);

    // y drifts by -6 n x0 per unit time, i.e. -12π x0 per period
    assert_almost_eq_within(
        state.position.y,
        -12.0 * core::f64::consts::PI * x0,
        1e-4,
        "along-track drift after one period",
    );
}

#[test]
fn j2_stable_velocity_stays_bounded() {
    let solver = iss_j2_solver();
    let dt = period_step(&solver);
    let x0 = 50.0;
    let initial = RelativeState::new(
        DVec3::new(x0, 0.0, 0.0),
        DVec3::new(0.0, solver.compute_stable_vy0(x0), 0.0),
    );

    let compensated = poll_trajectory(&solver, initial, dt, 10 * STEPS_PER_PERIOD);

    let classical_vy0 = -2.0 * solver.parameters().mean_motion() * x0;
    let uncompensated = poll_trajectory(
        &solver,
        RelativeState::new(initial.position, DVec3::new(0.0, classical_vy0, 0.0)),
        dt,
        10 * STEPS_PER_PERIOD,
    );

    let bounded = max_along_track(&compensated);
    let drifting = max_along_track(&uncompensated);

    assert!(bounded < 4.0 * x0, "compensated excursion {bounded}");
    assert!(drifting > bounded, "{drifting} <= {bounded}");
}

#[test]
fn step_is_shared_between_states() {
    let solver = leo_solver();
    let mut a = random_state();
    let mut b = a;
    let mut other = random_state();

    solver.step(&mut a, 3.0);
    solver.step(&mut other, 3.0);
    solver.step(&mut b, 3.0);

    assert_eq!(a, b);
}

#[test]
fn drift_free_ellipse_stays_bounded() {
    for _ in 0..10 {
        let n = random_mean_motion();
        let solver = HillSolver::new(n);
        let x0 = 100.0;
        let initial = RelativeState::new(
            DVec3::new(x0, 0.0, 0.0),
            DVec3::new(0.0, solver.compute_stable_vy0(x0), 0.0),
        );

        let states = poll_trajectory(&solver, initial, period_step(&solver), STEPS_PER_PERIOD);

        // The drift-free ellipse has a semi-minor axis of x0 and
        // a semi-major axis of 2 x0
        assert!(max_along_track(&states) <= 2.0 * x0 + 1e-6);
    }
}

#[test]
fn solver_setters_update_parameters() {
    let mut solver = HillSolver::default();
    let default_n = ReferenceOrbit::default().mean_motion();
    assert_almost_eq(solver.parameters().mean_motion(), default_n, "default n");
    assert!(!solver.parameters().j2_enabled());

    solver.set_mean_motion(2.0 * LEO_MEAN_MOTION);
    assert_eq!(solver.parameters().mean_motion(), 2.0 * LEO_MEAN_MOTION);
}
