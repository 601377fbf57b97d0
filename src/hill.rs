use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{InitialCondition, ReferenceOrbit, EARTH_RADIUS, J2};

/// The parameters of the reference orbit that the Hill equations need.
///
/// This holds the mean motion of the reference orbit and, when the J2
/// correction is enabled, the reference radius and inclination used
/// to derive the Schweighart-Sedwick coefficients `s` and `c`.
///
/// The coefficients are cached and recomputed every time one of
/// their inputs changes, so reading them is free.
///
/// # Example
/// ```
/// use hill_formation::OrbitalFrameParameters;
///
/// let mut params = OrbitalFrameParameters::new(0.0011);
/// assert_eq!(params.ss_coefficients(), (0.0, 1.0));
///
/// params.set_orbit_parameters(6_378_137.0 + 400_000.0, 51.6_f64.to_radians());
/// // Still disabled, so nothing changes
/// assert_eq!(params.ss_coefficients(), (0.0, 1.0));
///
/// params.set_j2_enabled(true);
/// let (s, c) = params.ss_coefficients();
/// assert!(s > 0.0);
/// assert!(c > 1.0 && c < 1.01);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalFrameParameters {
    /// Mean motion of the reference orbit, in rad/s.
    mean_motion: f64,

    /// Reference orbit radius, in meters.
    reference_radius: Option<f64>,

    /// Reference orbit inclination, in radians.
    inclination: f64,

    j2_enabled: bool,

    /// Cached Schweighart-Sedwick `s`.
    ss_s: f64,

    /// Cached Schweighart-Sedwick `c = sqrt(1 + s)`.
    ss_c: f64,
}

impl OrbitalFrameParameters {
    /// Creates a new set of parameters with the J2 correction disabled.
    ///
    /// `mean_motion` is in radians per second and is expected to be positive.
    pub fn new(mean_motion: f64) -> Self {
        Self {
            mean_motion,
            reference_radius: None,
            inclination: 0.0,
            j2_enabled: false,
            ss_s: 0.0,
            ss_c: 1.0,
        }
    }

    /// Creates the parameters matching a circular reference orbit.
    ///
    /// The reference radius and inclination are always recorded,
    /// but they only affect the dynamics when `j2_enabled` is true.
    pub fn from_reference_orbit(orbit: &ReferenceOrbit, j2_enabled: bool) -> Self {
        let mut params = Self::new(orbit.mean_motion());
        params.reference_radius = Some(orbit.radius());
        params.inclination = orbit.inclination;
        params.j2_enabled = j2_enabled;
        params.update_ss_coefficients();
        params
    }

    /// Gets the mean motion of the reference orbit, in rad/s.
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Gets the reference orbit radius in meters, if one was set.
    pub fn reference_radius(&self) -> Option<f64> {
        self.reference_radius
    }

    /// Gets the reference orbit inclination in radians.
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// Whether the Schweighart-Sedwick J2 correction is enabled.
    pub fn j2_enabled(&self) -> bool {
        self.j2_enabled
    }

    /// Sets the mean motion of the reference orbit, in rad/s.
    pub fn set_mean_motion(&mut self, mean_motion: f64) {
        self.mean_motion = mean_motion;
        self.update_ss_coefficients();
    }

    /// Sets the reference orbit radius (meters) and inclination (radians).
    pub fn set_orbit_parameters(&mut self, reference_radius: f64, inclination: f64) {
        self.reference_radius = Some(reference_radius);
        self.inclination = inclination;
        self.update_ss_coefficients();
    }

    /// Enables or disables the J2 correction.
    pub fn set_j2_enabled(&mut self, enabled: bool) {
        self.j2_enabled = enabled;
        self.update_ss_coefficients();
    }

    /// Gets the Schweighart-Sedwick coefficients `(s, c)`.
    ///
    /// When the J2 correction is disabled or no reference radius
    /// is set, this returns `(0.0, 1.0)`, which reduces the
    /// corrected equations to the classical ones.
    pub fn ss_coefficients(&self) -> (f64, f64) {
        (self.ss_s, self.ss_c)
    }

    /// Gets the Schweighart-Sedwick coefficient `c` alone.
    pub fn ss_c(&self) -> f64 {
        self.ss_c
    }

    fn update_ss_coefficients(&mut self) {
        let r0 = match self.reference_radius {
            Some(r0) if self.j2_enabled && r0 != 0.0 => r0,
            _ => {
                self.ss_s = 0.0;
                self.ss_c = 1.0;
                return;
            }
        };

        // s = (3 J2 Re^2 / (8 r0^2)) (1 + 3 cos^2 i)
        // Schweighart & Sedwick, "High-Fidelity Linearized J2 Model
        // for Satellite Formation Flight", JGCD 25(6), 2002
        let cos_i = self.inclination.cos();
        let s = (3.0 * J2 * EARTH_RADIUS * EARTH_RADIUS / (8.0 * r0 * r0))
            * (1.0 + 3.0 * cos_i * cos_i);

        self.ss_s = s;
        self.ss_c = (1.0 + s).sqrt();
    }
}

impl Default for OrbitalFrameParameters {
    /// Creates parameters for the default reference orbit.
    ///
    /// See [`ReferenceOrbit::default`].
    fn default() -> Self {
        Self::from_reference_orbit(&ReferenceOrbit::default(), false)
    }
}

/// The state of a satellite relative to the reference point.
///
/// Both vectors are expressed in the RSW frame:
/// `x` is radial, `y` is along-track and `z` is cross-track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelativeState {
    /// The relative position, in meters.
    pub position: DVec3,
    /// The relative velocity, in meters per second.
    pub velocity: DVec3,
}

impl RelativeState {
    /// Creates a new relative state from its position and velocity.
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    #[inline]
    fn advanced(&self, derivative: &StateDerivative, dt: f64) -> Self {
        Self {
            position: self.position + derivative.velocity * dt,
            velocity: self.velocity + derivative.acceleration * dt,
        }
    }
}

impl From<InitialCondition> for RelativeState {
    fn from(ic: InitialCondition) -> Self {
        Self {
            position: ic.position,
            velocity: ic.velocity,
        }
    }
}

/// The time derivative of a [`RelativeState`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateDerivative {
    /// Rate of change of the position, in m/s.
    pub velocity: DVec3,
    /// Rate of change of the velocity, in m/s^2.
    pub acceleration: DVec3,
}

/// A fixed-step integrator for the Hill (Clohessy-Wiltshire) equations.
///
/// The solver itself holds no per-satellite state; it only knows about
/// the reference orbit through its [`OrbitalFrameParameters`].
/// This means a single solver can be shared (even across threads) to
/// advance any number of satellites.
///
/// The solver is also the single source of truth for the
/// Schweighart-Sedwick coefficient `c`, which formation patterns
/// need in order to produce drift-free initial velocities.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use hill_formation::{HillSolver, RelativeState};
///
/// let n = 0.0011;
/// let solver = HillSolver::new(n);
///
/// // Drift-free: vy0 = -2 n x0
/// let x0 = 100.0;
/// let mut state = RelativeState::new(
///     DVec3::new(x0, 0.0, 0.0),
///     DVec3::new(0.0, solver.compute_stable_vy0(x0), 0.0),
/// );
///
/// let period = std::f64::consts::TAU / n;
/// let steps = 2000;
/// solver.propagate(&mut state, period / steps as f64, steps);
///
/// assert!((state.position - DVec3::new(x0, 0.0, 0.0)).length() < 1e-3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HillSolver {
    params: OrbitalFrameParameters,
}

impl HillSolver {
    /// Creates a new solver for the classical Hill equations.
    pub fn new(mean_motion: f64) -> Self {
        Self {
            params: OrbitalFrameParameters::new(mean_motion),
        }
    }

    /// Creates a new solver from a full set of orbital frame parameters.
    pub fn with_parameters(params: OrbitalFrameParameters) -> Self {
        Self { params }
    }

    /// Gets the orbital frame parameters used by this solver.
    pub fn parameters(&self) -> &OrbitalFrameParameters {
        &self.params
    }

    /// Sets the mean motion of the reference orbit, in rad/s.
    pub fn set_mean_motion(&mut self, mean_motion: f64) {
        self.params.set_mean_motion(mean_motion);
    }

    /// Sets the reference orbit radius (meters) and inclination (radians).
    ///
    /// These only matter when the J2 correction is enabled.
    pub fn set_orbit_parameters(&mut self, reference_radius: f64, inclination: f64) {
        self.params.set_orbit_parameters(reference_radius, inclination);
    }

    /// Enables or disables the Schweighart-Sedwick J2 correction.
    pub fn set_j2_enabled(&mut self, enabled: bool) {
        self.params.set_j2_enabled(enabled);
    }

    /// Gets the Schweighart-Sedwick coefficients `(s, c)`.
    pub fn ss_coefficients(&self) -> (f64, f64) {
        self.params.ss_coefficients()
    }

    /// Computes the along-track initial velocity that cancels the
    /// secular drift for a given radial offset.
    ///
    /// `vy0 = -2 n c x0`
    pub fn compute_stable_vy0(&self, x0: f64) -> f64 {
        -2.0 * self.params.mean_motion() * self.params.ss_c() * x0
    }

    /// Checks whether `vy0` satisfies the drift-free condition
    /// for `x0` within `tolerance` (in m/s).
    pub fn verify_stable_initial_velocity(&self, x0: f64, vy0: f64, tolerance: f64) -> bool {
        (vy0 - self.compute_stable_vy0(x0)).abs() < tolerance
    }

    /// Computes the drift constant `K = vy0 + 2 n c x0`.
    ///
    /// The relative orbit is free of secular along-track drift
    /// if and only if `K = 0`.
    pub fn compute_drift_constant(&self, x0: f64, vy0: f64) -> f64 {
        vy0 + 2.0 * self.params.mean_motion() * self.params.ss_c() * x0
    }

    /// Evaluates the right-hand side of the equations of motion.
    ///
    /// Classical Hill equations:
    /// ```text
    /// ẍ = 2n ẏ + 3n² x
    /// ÿ = -2n ẋ
    /// z̈ = -n² z
    /// ```
    ///
    /// Schweighart-Sedwick equations (J2 enabled):
    /// ```text
    /// ẍ = 2nc ẏ + (5c² - 2) n² x
    /// ÿ = -2nc ẋ
    /// z̈ = -(3c² - 2) n² z
    /// ```
    ///
    /// The along-track position does not appear on the right-hand side.
    ///
    /// # Performance
    /// This function is very performant and should not be the cause of any
    /// performance issues.
    pub fn compute_derivatives(&self, state: &RelativeState) -> StateDerivative {
        let n = self.params.mean_motion();
        let n_sq = n * n;
        let DVec3 { x, z, .. } = state.position;
        let DVec3 {
            x: vx, y: vy, ..
        } = state.velocity;

        let acceleration = if self.params.j2_enabled() {
            let c = self.params.ss_c();
            let c_sq = c * c;
            DVec3::new(
                2.0 * n * c * vy + (5.0 * c_sq - 2.0) * n_sq * x,
                -2.0 * n * c * vx,
                -(3.0 * c_sq - 2.0) * n_sq * z,
            )
        } else {
            DVec3::new(2.0 * n * vy + 3.0 * n_sq * x, -2.0 * n * vx, -n_sq * z)
        };

        StateDerivative {
            velocity: state.velocity,
            acceleration,
        }
    }

    /// Advances the state by `dt` seconds using one classical
    /// 4th-order Runge-Kutta step.
    ///
    /// There is no sub-stepping: if you need a large time step,
    /// split it into several calls (see [`propagate`][Self::propagate]).
    ///
    /// Non-finite inputs are not checked and will propagate.
    pub fn step(&self, state: &mut RelativeState, dt: f64) {
        let half_dt = 0.5 * dt;
        let state0 = *state;

        let k1 = self.compute_derivatives(&state0);
        let k2 = self.compute_derivatives(&state0.advanced(&k1, half_dt));
        let k3 = self.compute_derivatives(&state0.advanced(&k2, half_dt));
        let k4 = self.compute_derivatives(&state0.advanced(&k3, dt));

        let sixth_dt = dt / 6.0;
        state.position +=
            (k1.velocity + 2.0 * k2.velocity + 2.0 * k3.velocity + k4.velocity) * sixth_dt;
        state.velocity += (k1.acceleration
            + 2.0 * k2.acceleration
            + 2.0 * k3.acceleration
            + k4.acceleration)
            * sixth_dt;
    }

    /// Advances the state by `steps` consecutive steps of `dt` seconds.
    pub fn propagate(&self, state: &mut RelativeState, dt: f64, steps: usize) {
        for _ in 0..steps {
            self.step(state, dt);
        }
    }
}

impl Default for HillSolver {
    fn default() -> Self {
        Self::with_parameters(OrbitalFrameParameters::default())
    }
}
