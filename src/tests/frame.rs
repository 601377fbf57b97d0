use core::f64::consts::FRAC_PI_2;

use glam::DVec3;

use super::{assertions::*, seeders::*};
use crate::RswFrame;

fn random_reference_state() -> (DVec3, DVec3) {
    loop {
        let position = random_vec3(7e6);
        let velocity = random_vec3(7.5e3);
        if position.length() > 1e3 && position.cross(velocity).length() > 1e3 {
            return (position, velocity);
        }
    }
}

#[test]
fn equatorial_frame() {
    let frame = RswFrame::from_eci(DVec3::new(7e6, 0.0, 0.0), DVec3::new(0.0, 7.5e3, 0.0));

    assert_almost_eq_vec3(frame.radial, DVec3::X, "radial");
    assert_almost_eq_vec3(frame.along_track, DVec3::Y, "along-track");
    assert_almost_eq_vec3(frame.cross_track, DVec3::Z, "cross-track");
}

#[test]
fn frame_is_orthonormal_and_right_handed() {
    for _ in 0..1000 {
        let (position, velocity) = random_reference_state();
        let frame = RswFrame::from_eci(position, velocity);

        assert_almost_eq(frame.radial.length(), 1.0, "|R|");
        assert_almost_eq(frame.along_track.length(), 1.0, "|S|");
        assert_almost_eq(frame.cross_track.length(), 1.0, "|W|");
        assert_almost_eq(frame.radial.dot(frame.along_track), 0.0, "R.S");
        assert_almost_eq(frame.radial.dot(frame.cross_track), 0.0, "R.W");
        assert_almost_eq_vec3(
            frame.radial.cross(frame.along_track),
            frame.cross_track,
            "R x S = W",
        );

        // The velocity has no cross-track component
        assert_almost_eq_within(
            frame.to_rsw(velocity).z,
            0.0,
            1e-6,
            "cross-track velocity",
        );
    }
}

#[test]
fn conversions_round_trip() {
    for _ in 0..1000 {
        let (position, velocity) = random_reference_state();
        let frame = RswFrame::from_eci(position, velocity);
        let vector = random_vec3(100.0);

        let rsw = frame.to_rsw(vector);
        assert_almost_eq_vec3(frame.from_rsw(rsw), vector, "RSW round trip");
        assert_almost_eq_vec3(frame.to_rsw_matrix() * vector, rsw, "matrix form");
        assert_almost_eq_vec3(frame.to_rsw_quat() * vector, rsw, "quaternion form");
        assert_almost_eq_vec3(frame.from_rsw_matrix() * rsw, vector, "inverse matrix form");
    }
}

#[test]
fn position_is_purely_radial() {
    let (position, velocity) = random_reference_state();
    let frame = RswFrame::from_eci(position, velocity);

    assert_almost_eq_vec3_within(
        frame.to_rsw(position),
        DVec3::new(position.length(), 0.0, 0.0),
        1e-6,
        "reference position in RSW",
    );
}

#[test]
fn ecef_frame_rotates_with_the_earth() {
    let position = DVec3::new(7e6, 0.0, 0.0);
    let velocity = DVec3::new(0.0, 7.5e3, 0.0);

    let at_epoch = RswFrame::from_ecef(0.0, position, velocity);
    let eci = RswFrame::from_eci(position, velocity);
    assert_almost_eq_vec3(at_epoch.radial, eci.radial, "radial at gmst 0");

    let rotated = RswFrame::from_ecef(FRAC_PI_2, position, velocity);
    assert_almost_eq_vec3(rotated.radial, DVec3::new(0.0, -1.0, 0.0), "radial at gmst π/2");
    assert_almost_eq_vec3(rotated.along_track, DVec3::X, "along-track at gmst π/2");
    assert_almost_eq_vec3(rotated.cross_track, DVec3::Z, "cross-track at gmst π/2");
}
