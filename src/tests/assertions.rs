use glam::{DQuat, DVec3};

use crate::{InitialCondition, RelativeState};

const ALMOST_EQ_TOLERANCE: f64 = 1e-6;

pub(super) fn assert_almost_eq(a: f64, b: f64, what: &str) {
    assert_almost_eq_within(a, b, ALMOST_EQ_TOLERANCE, what);
}

pub(super) fn assert_almost_eq_within(a: f64, b: f64, tolerance: f64, what: &str) {
    if a.is_nan() && b.is_nan() {
        return;
    }

    let dist = (a - b).abs();
    let msg = format!(
        "Almost-eq assertion failed for '{what}'!\n\
        {a} and {b} has distance {dist}, which is more than max of {tolerance}"
    );

    assert!(dist < tolerance, "{msg}");
}

pub(super) fn assert_almost_eq_vec3(a: DVec3, b: DVec3, what: &str) {
    assert_almost_eq_vec3_within(a, b, ALMOST_EQ_TOLERANCE, what);
}

pub(super) fn assert_almost_eq_vec3_within(a: DVec3, b: DVec3, tolerance: f64, what: &str) {
    let desc = format!("{a:?} vs {b:?}; {what}");
    assert_almost_eq_within(a.x, b.x, tolerance, &format!("x coord of {desc}"));
    assert_almost_eq_within(a.y, b.y, tolerance, &format!("y coord of {desc}"));
    assert_almost_eq_within(a.z, b.z, tolerance, &format!("z coord of {desc}"));
}

/// Quaternions `q` and `-q` describe the same rotation, so either
/// sign is accepted.
pub(super) fn assert_same_rotation(a: DQuat, b: DQuat, what: &str) {
    let b = if a.dot(b) < 0.0 { -b } else { b };
    let desc = format!("{a:?} vs {b:?}; {what}");
    assert_almost_eq(a.x, b.x, &format!("x of {desc}"));
    assert_almost_eq(a.y, b.y, &format!("y of {desc}"));
    assert_almost_eq(a.z, b.z, &format!("z of {desc}"));
    assert_almost_eq(a.w, b.w, &format!("w of {desc}"));
}

pub(super) fn assert_almost_eq_state(
    a: &RelativeState,
    b: &RelativeState,
    tolerance: f64,
    what: &str,
) {
    assert_almost_eq_vec3_within(
        a.position,
        b.position,
        tolerance,
        &format!("position of {what}"),
    );
    assert_almost_eq_vec3_within(
        a.velocity,
        b.velocity,
        tolerance,
        &format!("velocity of {what}"),
    );
}

/// Checks `vy0 = -2 n c x0` on every condition.
pub(super) fn assert_drift_free(conditions: &[InitialCondition], n: f64, c: f64, what: &str) {
    for (i, condition) in conditions.iter().enumerate() {
        assert_almost_eq_within(
            condition.velocity.y,
            -2.0 * n * c * condition.position.x,
            1e-12,
            &format!("drift-free vy0 of satellite {i} in {what}"),
        );
    }
}

pub(super) fn assert_all_finite(conditions: &[InitialCondition], what: &str) {
    for (i, condition) in conditions.iter().enumerate() {
        assert!(
            condition.position.is_finite() && condition.velocity.is_finite(),
            "satellite {i} of {what} is not finite: {condition:?}"
        );
    }
}
