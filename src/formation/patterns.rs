use core::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use super::{InitialCondition, PeriodicCoefficients, Scale};
use crate::lattice::{self, LatticePoint};

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Random velocity components are bounded by `3 n R`.
const RANDOM_VELOCITY_FACTOR: f64 = 3.0;

/// Distance between successive satellites of an approach string,
/// as a fraction of the base distance.
const APPROACH_STAGGER: f64 = 0.5;

/// Along-track closing rate of the V-bar approach, as a fraction of `n d`.
const VBAR_CLOSING_RATE: f64 = 0.5;

/// Radial closing rate of the R-bar approach, as a fraction of `n d`.
const RBAR_CLOSING_RATE: f64 = 0.3;

/// Distance between lattice steps for the axis and grid patterns.
fn lattice_step(count: usize, scale: Scale) -> f64 {
    match scale {
        Scale::Radius(radius) => radius / count as f64,
        Scale::Spacing(spacing) => spacing,
    }
}

/// Half-width of the cube the random patterns fill.
///
/// In spacing mode, the cube is sized so each satellite gets
/// roughly a `spacing³` cell.
fn random_extent(count: usize, scale: Scale) -> f64 {
    match scale {
        Scale::Radius(radius) => radius,
        Scale::Spacing(spacing) => 0.5 * spacing * (count as f64).cbrt(),
    }
}

/// Radial amplitude of the single-ellipse patterns.
///
/// In spacing mode, the reference circle's circumference is
/// `count` times the spacing.
fn ellipse_amplitude(count: usize, scale: Scale) -> f64 {
    match scale {
        Scale::Radius(radius) => radius,
        Scale::Spacing(spacing) => spacing * count as f64 / TAU,
    }
}

/// Distance of the first satellite of an approach string.
///
/// In spacing mode, consecutive satellites end up `spacing` apart.
fn approach_base(scale: Scale) -> f64 {
    match scale {
        Scale::Radius(radius) => radius,
        Scale::Spacing(spacing) => spacing / APPROACH_STAGGER,
    }
}

fn phase(index: usize, count: usize) -> f64 {
    TAU * index as f64 / count as f64
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    rng.random_range(-1.0_f64..=1.0) * bound
}

fn random_vec<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> DVec3 {
    DVec3::new(
        symmetric(rng, bound),
        symmetric(rng, bound),
        symmetric(rng, bound),
    )
}

pub(super) fn axis(count: usize, scale: Scale) -> Vec<InitialCondition> {
    let step = lattice_step(count, scale);

    // -1, +1, -2, +2, ... steps away from the origin
    let offsets: Vec<f64> = (1..=count)
        .flat_map(|k| {
            let offset = step * k as f64;
            [-offset, offset]
        })
        .collect();

    [DVec3::X, DVec3::Y, DVec3::Z]
        .into_iter()
        .flat_map(|axis| {
            offsets
                .iter()
                .map(move |&offset| InitialCondition::at_rest(axis * offset))
        })
        .collect()
}

pub(super) fn grid(count: usize, scale: Scale) -> Vec<InitialCondition> {
    let step = lattice_step(count, scale);
    let half = count as i64;
    let side = count.saturating_mul(2).saturating_add(1);
    let cells = side.saturating_mul(side).saturating_mul(side);
    let mut conditions = Vec::with_capacity(cells - 1);

    for i in -half..=half {
        for j in -half..=half {
            for k in -half..=half {
                if i == 0 && j == 0 && k == 0 {
                    continue;
                }
                let position = DVec3::new(i as f64, j as f64, k as f64) * step;
                conditions.push(InitialCondition::at_rest(position));
            }
        }
    }

    conditions
}

pub(super) fn random_position<R: Rng + ?Sized>(
    count: usize,
    scale: Scale,
    rng: &mut R,
) -> Vec<InitialCondition> {
    let extent = random_extent(count, scale);
    (0..count)
        .map(|_| InitialCondition::at_rest(random_vec(rng, extent)))
        .collect()
}

pub(super) fn random_position_velocity<R: Rng + ?Sized>(
    count: usize,
    scale: Scale,
    n: f64,
    rng: &mut R,
) -> Vec<InitialCondition> {
    let extent = random_extent(count, scale);
    let max_velocity = RANDOM_VELOCITY_FACTOR * n * extent;

    (0..count)
        .map(|_| InitialCondition {
            position: random_vec(rng, extent),
            velocity: random_vec(rng, max_velocity),
        })
        .collect()
}

pub(super) fn random_periodic<R: Rng + ?Sized>(
    count: usize,
    scale: Scale,
    n: f64,
    rng: &mut R,
) -> Vec<InitialCondition> {
    let extent = random_extent(count, scale);
    let max_velocity = RANDOM_VELOCITY_FACTOR * n * extent;

    (0..count)
        .map(|_| {
            let position = random_vec(rng, extent);
            let vx0 = symmetric(rng, max_velocity);
            let vz0 = symmetric(rng, max_velocity);
            InitialCondition {
                position,
                // Classical drift-free condition, no J2 correction
                velocity: DVec3::new(vx0, -2.0 * n * position.x, vz0),
            }
        })
        .collect()
}

/// Samples the closed Hill solution at `count` evenly spaced phases.
///
/// The velocities are the θ-derivatives scaled by `n`.
pub(super) fn periodic_orbit(
    count: usize,
    coefficients: &PeriodicCoefficients,
    n: f64,
) -> Vec<InitialCondition> {
    let PeriodicCoefficients { a, b, d, e, f } = *coefficients;

    (0..count)
        .map(|i| {
            let (sin, cos) = phase(i, count).sin_cos();
            InitialCondition::new(
                a * cos + b * sin,
                -2.0 * a * sin + 2.0 * b * cos + d,
                e * cos + f * sin,
                n * (-a * sin + b * cos),
                n * (-2.0 * a * cos - 2.0 * b * sin),
                n * (-e * sin + f * cos),
            )
        })
        .collect()
}

/// The single-amplitude ellipse used when no coefficients are given.
pub(super) fn legacy_periodic_orbit(
    count: usize,
    scale: Scale,
    z_amplitude: f64,
    n: f64,
) -> Vec<InitialCondition> {
    let rho = ellipse_amplitude(count, scale);
    let z_amp = z_amplitude * rho;

    (0..count)
        .map(|i| {
            let (sin, cos) = phase(i, count).sin_cos();
            InitialCondition::new(
                rho * cos,
                -2.0 * rho * sin,
                z_amp * cos,
                -rho * n * sin,
                -2.0 * rho * n * cos,
                -n * z_amp * sin,
            )
        })
        .collect()
}

pub(super) fn circular_orbit(
    count: usize,
    scale: Scale,
    positive_z: bool,
    n: f64,
) -> Vec<InitialCondition> {
    let rho = ellipse_amplitude(count, scale);
    let sign = if positive_z { 1.0 } else { -1.0 };
    let z_amp = SQRT_3 * rho * sign;

    (0..count)
        .map(|i| {
            let (sin, cos) = phase(i, count).sin_cos();
            let x0 = rho * cos;
            InitialCondition::new(
                x0,
                -2.0 * rho * sin,
                z_amp * cos,
                -n * rho * sin,
                -2.0 * n * x0,
                -n * z_amp * sin,
            )
        })
        .collect()
}

/// A string of satellites trailing the target along -S, closing in
/// along-track. The velocities only roughly follow the Hill coupling;
/// these are not closed orbits.
pub(super) fn vbar_approach(count: usize, scale: Scale, n: f64) -> Vec<InitialCondition> {
    let base = approach_base(scale);

    (0..count)
        .map(|i| {
            let distance = base * (1.0 + APPROACH_STAGGER * i as f64);
            InitialCondition::new(0.0, -distance, 0.0, 0.0, VBAR_CLOSING_RATE * n * distance, 0.0)
        })
        .collect()
}

/// A string of satellites below the target (towards the Earth), closing
/// in radially, with the along-track velocity from the Hill coupling term.
pub(super) fn rbar_approach(count: usize, scale: Scale, n: f64) -> Vec<InitialCondition> {
    let base = approach_base(scale);

    (0..count)
        .map(|i| {
            let distance = base * (1.0 + APPROACH_STAGGER * i as f64);
            let x0 = -distance;
            InitialCondition::new(
                x0,
                0.0,
                0.0,
                RBAR_CLOSING_RATE * n * distance,
                -2.0 * n * x0,
                0.0,
            )
        })
        .collect()
}

/// Maps unit-lattice points onto drift-free relative ellipses.
///
/// A point at lattice radius `r` and angle `θ` becomes
/// ```text
/// x = r/√5 cos θ         vx = r n/√5 sin θ
/// y = 2r/√5 sin θ        vy = -2 r n c/√5 cos θ
/// z = √3 r/√5 cos θ      vz = √3 r n/√5 sin θ
/// ```
/// The resulting relative orbits all have a constant distance of
/// `2r/√5` from the centre and satisfy `vy = -2 n c x`.
pub(super) fn lattice_disk(
    points: &[LatticePoint],
    scale: Scale,
    n: f64,
    c: f64,
) -> Vec<InitialCondition> {
    let unit = match scale {
        Scale::Spacing(spacing) => spacing,
        Scale::Radius(radius) => {
            let max_radius = lattice::max_radius(points);
            if max_radius > 0.0 {
                radius / max_radius
            } else {
                0.0
            }
        }
    };

    points
        .iter()
        .map(|point| {
            let r = point.radius * unit;
            let (sin, cos) = point.angle.sin_cos();
            let r_norm = r / SQRT_5;
            InitialCondition::new(
                r_norm * cos,
                2.0 * r_norm * sin,
                SQRT_3 * r_norm * cos,
                r_norm * n * sin,
                -2.0 * r_norm * n * c * cos,
                SQRT_3 * r_norm * n * sin,
            )
        })
        .collect()
}
