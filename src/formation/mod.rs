//! Formation patterns and their initial conditions.
//!
//! A formation is described by a [`FormationSpec`]: which [`Pattern`]
//! to use, how many satellites, how large, and a handful of
//! pattern-specific knobs. The [`FormationInitializer`] turns a spec
//! into a list of [`InitialCondition`]s, one per satellite.
//!
//! The reference satellite at the centre of the formation is never part
//! of the output; see [`FormationGenerator`][layers::FormationGenerator]
//! for a generator that adds it.

use core::fmt;
use core::str::FromStr;

use glam::DVec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::HillSolver;

pub mod layers;
mod patterns;

/// The largest number of initial conditions a single spec may produce
/// when checked through [`FormationSpec::validate`].
pub const MAX_GENERATED_SATELLITES: usize = 1_000_000;

/// The catalogue of formation patterns.
///
/// Each variant has a stable snake_case name, used by [`FromStr`],
/// [`Display`][fmt::Display] and (with the `serde` feature) serialization.
///
/// # Example
/// ```
/// use hill_formation::Pattern;
///
/// let pattern: Pattern = "hexagonal_disk".parse().unwrap();
/// assert_eq!(pattern, Pattern::HexagonalDisk);
/// assert_eq!(pattern.to_string(), "hexagonal_disk");
///
/// assert!("pentagonal_disk".parse::<Pattern>().is_err());
/// assert_eq!(Pattern::from_name_lenient("pentagonal_disk"), Pattern::Axis);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Pattern {
    /// Points along the three coordinate axes, on both sides of the origin.
    ///
    /// `count` is the number of points on each half-axis, so the pattern
    /// produces `6 * count` points.
    #[default]
    Axis,
    /// A full cubic lattice around the origin, origin excluded.
    ///
    /// `count` is the number of lattice steps on each half-axis, so the
    /// pattern produces `(2 * count + 1)³ - 1` points.
    Grid,
    /// Uniformly random positions, at rest.
    RandomPosition,
    /// Uniformly random positions and velocities.
    RandomPositionVelocity,
    /// Uniformly random positions and velocities, with the along-track
    /// velocity forced to the (classical) drift-free value.
    RandomPeriodic,
    /// Satellites evenly phased along one closed Hill ellipse.
    PeriodicOrbit,
    /// Satellites evenly phased along a tilted closed relative orbit
    /// with a cross-track amplitude of `√3` times the radius.
    CircularOrbit,
    /// A string of satellites approaching along the along-track axis (V-bar).
    VbarApproach,
    /// A string of satellites approaching along the radial axis (R-bar).
    RbarApproach,
    /// The points of a hexagonal lattice nearest to the centre,
    /// mapped onto drift-free relative orbits.
    HexagonalDisk,
    /// The points of a square lattice nearest to the centre,
    /// mapped onto drift-free relative orbits.
    SquareLatticeDisk,
    /// Concentric rings of points, mapped onto drift-free relative orbits.
    ConcentricDisk,
}

impl Pattern {
    /// Every pattern, in catalogue order.
    pub const ALL: [Pattern; 12] = [
        Pattern::Axis,
        Pattern::Grid,
        Pattern::RandomPosition,
        Pattern::RandomPositionVelocity,
        Pattern::RandomPeriodic,
        Pattern::PeriodicOrbit,
        Pattern::CircularOrbit,
        Pattern::VbarApproach,
        Pattern::RbarApproach,
        Pattern::HexagonalDisk,
        Pattern::SquareLatticeDisk,
        Pattern::ConcentricDisk,
    ];

    /// Gets the snake_case name of the pattern.
    pub const fn name(self) -> &'static str {
        match self {
            Pattern::Axis => "axis",
            Pattern::Grid => "grid",
            Pattern::RandomPosition => "random_position",
            Pattern::RandomPositionVelocity => "random_position_velocity",
            Pattern::RandomPeriodic => "random_periodic",
            Pattern::PeriodicOrbit => "periodic_orbit",
            Pattern::CircularOrbit => "circular_orbit",
            Pattern::VbarApproach => "vbar_approach",
            Pattern::RbarApproach => "rbar_approach",
            Pattern::HexagonalDisk => "hexagonal_disk",
            Pattern::SquareLatticeDisk => "square_lattice_disk",
            Pattern::ConcentricDisk => "concentric_disk",
        }
    }

    /// Looks a pattern up by name, falling back to [`Pattern::Axis`]
    /// when the name is not recognized.
    ///
    /// A warning is logged on fallback. Use [`str::parse`] instead if
    /// an unknown name should be an error.
    pub fn from_name_lenient(name: &str) -> Pattern {
        match name.parse() {
            Ok(pattern) => pattern,
            Err(err) => {
                log::warn!("{err}; falling back to '{}'", Pattern::Axis);
                Pattern::Axis
            }
        }
    }

    /// Whether the pattern draws random numbers.
    pub const fn is_random(self) -> bool {
        matches!(
            self,
            Pattern::RandomPosition | Pattern::RandomPositionVelocity | Pattern::RandomPeriodic
        )
    }
}

impl FromStr for Pattern {
    type Err = FormationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|pattern| pattern.name() == s)
            .ok_or_else(|| FormationError::UnknownPattern(s.to_string()))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The size of a formation.
///
/// A formation is sized either by the extent of the whole pattern,
/// or by the distance between neighbouring satellites.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scale {
    /// The radius of the region the pattern fills, in meters.
    Radius(f64),
    /// The distance between neighbouring satellites, in meters.
    Spacing(f64),
}

impl Scale {
    /// Gets the raw value in meters, regardless of the mode.
    pub fn value(self) -> f64 {
        match self {
            Scale::Radius(value) | Scale::Spacing(value) => value,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Radius(10.0)
    }
}

/// The coefficients of a closed Hill-equation solution.
///
/// ```text
/// x(θ) = A cos θ + B sin θ
/// y(θ) = -2A sin θ + 2B cos θ + D
/// z(θ) = E cos θ + F sin θ
/// ```
///
/// All coefficients are in meters.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodicCoefficients {
    pub a: f64,
    pub b: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl PeriodicCoefficients {
    /// An in-plane ellipse with radial amplitude `a` and nothing else.
    pub fn in_plane(a: f64) -> Self {
        Self {
            a,
            ..Default::default()
        }
    }
}

/// How drift-free along-track velocities are computed for the
/// disk patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DriftCompensation {
    /// `vy0 = -2 n x0`.
    #[default]
    Classical,
    /// `vy0 = -2 n c x0`, stable under the Schweighart-Sedwick J2 model.
    J2 {
        /// The Schweighart-Sedwick coefficient `c`.
        c: f64,
    },
}

impl DriftCompensation {
    /// Picks the compensation matching a solver's current settings.
    ///
    /// This is [`J2`][Self::J2] with the solver's `c` when the J2
    /// correction is enabled, and [`Classical`][Self::Classical] otherwise.
    pub fn from_solver(solver: &HillSolver) -> Self {
        if solver.parameters().j2_enabled() {
            DriftCompensation::J2 {
                c: solver.parameters().ss_c(),
            }
        } else {
            DriftCompensation::Classical
        }
    }

    /// Gets the coefficient `c` (1 for the classical case).
    pub fn c(self) -> f64 {
        match self {
            DriftCompensation::Classical => 1.0,
            DriftCompensation::J2 { c } => c,
        }
    }
}

/// Everything needed to generate one formation.
///
/// # Example
/// ```
/// use hill_formation::{FormationSpec, Pattern, Scale};
///
/// let spec = FormationSpec {
///     pattern: Pattern::Grid,
///     count: 1,
///     scale: Scale::Spacing(2.0),
///     ..Default::default()
/// };
/// assert_eq!(spec.expected_len(), 26);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormationSpec {
    /// Which pattern to generate.
    pub pattern: Pattern,
    /// The number of satellites (per half-axis for [`Pattern::Axis`]
    /// and [`Pattern::Grid`]).
    pub count: usize,
    /// The size of the formation.
    pub scale: Scale,
    /// Cross-track amplitude, as a multiple of the radius, for the
    /// legacy [`Pattern::PeriodicOrbit`] ellipse.
    pub z_amplitude: f64,
    /// Explicit ellipse coefficients for [`Pattern::PeriodicOrbit`].
    pub periodic: Option<PeriodicCoefficients>,
    /// Whether [`Pattern::CircularOrbit`] tilts towards +W (true) or -W.
    pub positive_z: bool,
    /// Drift compensation for the disk patterns.
    pub drift: DriftCompensation,
}

impl Default for FormationSpec {
    fn default() -> Self {
        Self {
            pattern: Pattern::default(),
            count: 3,
            scale: Scale::default(),
            z_amplitude: 0.0,
            periodic: None,
            positive_z: true,
            drift: DriftCompensation::default(),
        }
    }
}

impl FormationSpec {
    /// Gets the number of initial conditions this spec generates.
    pub fn expected_len(&self) -> usize {
        let count = self.count;
        match self.pattern {
            Pattern::Axis => count.saturating_mul(6),
            Pattern::Grid => {
                let side = count.saturating_mul(2).saturating_add(1);
                side.saturating_mul(side).saturating_mul(side) - 1
            }
            _ => count,
        }
    }

    /// Checks the spec for values that cannot produce a sensible formation.
    ///
    /// # Errors
    /// - [`FormationError::InvalidScale`] if the radius or spacing is not
    ///   a positive finite number.
    /// - [`FormationError::InvalidParameter`] if the z amplitude or a
    ///   periodic coefficient is not finite.
    /// - [`FormationError::TooManySatellites`] if the spec would produce
    ///   more than [`MAX_GENERATED_SATELLITES`] points.
    pub fn validate(&self) -> Result<(), FormationError> {
        let scale = self.scale.value();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(FormationError::InvalidScale(self.scale));
        }

        if !self.z_amplitude.is_finite() {
            return Err(FormationError::InvalidParameter("z_amplitude"));
        }

        if let Some(coefficients) = self.periodic {
            let PeriodicCoefficients { a, b, d, e, f } = coefficients;
            if ![a, b, d, e, f].iter().all(|v| v.is_finite()) {
                return Err(FormationError::InvalidParameter("periodic coefficients"));
            }
        }

        if let DriftCompensation::J2 { c } = self.drift {
            if !c.is_finite() || c <= 0.0 {
                return Err(FormationError::InvalidParameter("drift compensation c"));
            }
        }

        let len = self.expected_len();
        if len > MAX_GENERATED_SATELLITES {
            return Err(FormationError::TooManySatellites(len));
        }

        Ok(())
    }
}

/// The initial relative state of one satellite in a formation.
///
/// Vectors are expressed in the RSW frame (radial, along-track,
/// cross-track), in meters and meters per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InitialCondition {
    /// `(x0, y0, z0)`, in meters.
    pub position: DVec3,
    /// `(vx0, vy0, vz0)`, in meters per second.
    pub velocity: DVec3,
}

impl InitialCondition {
    /// Creates an initial condition from its six components.
    pub fn new(x0: f64, y0: f64, z0: f64, vx0: f64, vy0: f64, vz0: f64) -> Self {
        Self {
            position: DVec3::new(x0, y0, z0),
            velocity: DVec3::new(vx0, vy0, vz0),
        }
    }

    /// An initial condition at `position`, at rest.
    pub fn at_rest(position: DVec3) -> Self {
        Self {
            position,
            velocity: DVec3::ZERO,
        }
    }

    /// Gets the six components `[x0, y0, z0, vx0, vy0, vz0]`.
    pub fn to_array(self) -> [f64; 6] {
        let [x0, y0, z0] = self.position.to_array();
        let [vx0, vy0, vz0] = self.velocity.to_array();
        [x0, y0, z0, vx0, vy0, vz0]
    }
}

/// Generates the initial conditions of a formation.
///
/// # Example
/// ```
/// use hill_formation::{FormationInitializer, FormationSpec, Pattern, Scale};
///
/// let n = 0.0011;
/// let initializer = FormationInitializer::new(n);
///
/// let spec = FormationSpec {
///     pattern: Pattern::PeriodicOrbit,
///     count: 4,
///     scale: Scale::Radius(50.0),
///     ..Default::default()
/// };
///
/// let conditions = initializer.generate(&spec);
/// assert_eq!(conditions.len(), 4);
/// assert!((conditions[0].position.x - 50.0).abs() < 1e-12);
/// assert!((conditions[0].velocity.y + 2.0 * n * 50.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormationInitializer {
    mean_motion: f64,
}

impl FormationInitializer {
    /// Creates a new initializer for a reference orbit with the
    /// given mean motion (rad/s).
    pub fn new(mean_motion: f64) -> Self {
        Self { mean_motion }
    }

    /// Creates an initializer sharing a solver's mean motion.
    pub fn from_solver(solver: &HillSolver) -> Self {
        Self::new(solver.parameters().mean_motion())
    }

    /// Gets the mean motion, in rad/s.
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Sets the mean motion, in rad/s.
    pub fn set_mean_motion(&mut self, mean_motion: f64) {
        self.mean_motion = mean_motion;
    }

    /// Generates the initial conditions for a formation, drawing random
    /// numbers (for the random patterns) from the thread-local generator.
    ///
    /// This never fails; degenerate specs produce degenerate formations.
    /// See [`try_generate`][Self::try_generate] for a checked version.
    pub fn generate(&self, spec: &FormationSpec) -> Vec<InitialCondition> {
        self.generate_with_rng(spec, &mut rand::rng())
    }

    /// Generates the initial conditions for a formation, drawing random
    /// numbers from `rng`.
    ///
    /// With a seeded generator, the random patterns become reproducible.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        spec: &FormationSpec,
        rng: &mut R,
    ) -> Vec<InitialCondition> {
        let n = self.mean_motion;
        let count = spec.count;

        let conditions = match spec.pattern {
            Pattern::Axis => patterns::axis(count, spec.scale),
            Pattern::Grid => patterns::grid(count, spec.scale),
            Pattern::RandomPosition => patterns::random_position(count, spec.scale, rng),
            Pattern::RandomPositionVelocity => {
                patterns::random_position_velocity(count, spec.scale, n, rng)
            }
            Pattern::RandomPeriodic => patterns::random_periodic(count, spec.scale, n, rng),
            Pattern::PeriodicOrbit => match spec.periodic {
                Some(coefficients) => patterns::periodic_orbit(count, &coefficients, n),
                None => patterns::legacy_periodic_orbit(count, spec.scale, spec.z_amplitude, n),
            },
            Pattern::CircularOrbit => {
                patterns::circular_orbit(count, spec.scale, spec.positive_z, n)
            }
            Pattern::VbarApproach => patterns::vbar_approach(count, spec.scale, n),
            Pattern::RbarApproach => patterns::rbar_approach(count, spec.scale, n),
            Pattern::HexagonalDisk => patterns::lattice_disk(
                &crate::lattice::hexagonal_points(count),
                spec.scale,
                n,
                spec.drift.c(),
            ),
            Pattern::SquareLatticeDisk => patterns::lattice_disk(
                &crate::lattice::square_points(count),
                spec.scale,
                n,
                spec.drift.c(),
            ),
            Pattern::ConcentricDisk => patterns::lattice_disk(
                &crate::lattice::concentric_points(count),
                spec.scale,
                n,
                spec.drift.c(),
            ),
        };

        log::debug!(
            "generated {} initial conditions for pattern '{}' (count {}, {:?})",
            conditions.len(),
            spec.pattern,
            count,
            spec.scale
        );

        conditions
    }

    /// Validates the spec and the mean motion, then generates the formation.
    ///
    /// # Errors
    /// - [`FormationError::InvalidMeanMotion`] if the mean motion is not a
    ///   positive finite number.
    /// - Any error from [`FormationSpec::validate`].
    pub fn try_generate(&self, spec: &FormationSpec) -> Result<Vec<InitialCondition>, FormationError> {
        if !self.mean_motion.is_finite() || self.mean_motion <= 0.0 {
            return Err(FormationError::InvalidMeanMotion(self.mean_motion));
        }
        spec.validate()?;
        Ok(self.generate(spec))
    }
}

/// An error to describe why a formation cannot be generated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormationError {
    /// The pattern name is not part of the catalogue.
    #[error("unknown formation pattern '{0}'")]
    UnknownPattern(String),
    /// The radius or spacing is not a positive finite number.
    #[error("formation scale must be positive and finite, got {0:?}")]
    InvalidScale(Scale),
    /// The mean motion is not a positive finite number.
    #[error("mean motion must be positive and finite, got {0} rad/s")]
    InvalidMeanMotion(f64),
    /// A pattern parameter is not finite (or otherwise out of range).
    #[error("invalid formation parameter: {0}")]
    InvalidParameter(&'static str),
    /// The spec would produce an unreasonable number of satellites.
    #[error("formation would produce {0} satellites, more than the supported maximum")]
    TooManySatellites(usize),
}
