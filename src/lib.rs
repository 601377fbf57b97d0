//! # Relative Motion & Formation Synthesis
//! This library crate contains the orbital-dynamics kernel for visualizing
//! satellite formations flying around a circular reference orbit.
//!
//! Instead of propagating every satellite around the Earth, the satellites
//! are described *relative* to a reference point travelling along a circular
//! orbit. Close to that point, the motion is well approximated by the
//! linearized Hill (Clohessy-Wiltshire) equations, expressed in the
//! RSW frame:
//! - **R**: radial, pointing away from the Earth
//! - **S**: along-track, in the direction of motion
//! - **W**: cross-track, along the orbit normal
//!
//! Optionally, the secular effect of the Earth's oblateness (J2) can be
//! folded into the equations using the Schweighart-Sedwick coefficients.
//!
//! ## Getting started
//! This crate provides three main components:
//! - [`HillSolver`]: A 4th-order Runge-Kutta integrator for the Hill
//!   equations (with or without the J2 correction). It advances a single
//!   [`RelativeState`] by a time step.
//! - [`FormationInitializer`]: A catalogue of formation patterns
//!   ([`Pattern`]) which produces the [`InitialCondition`]s of every
//!   satellite in a formation from a [`FormationSpec`].
//! - [`PlaybackEngine`]: A playback engine which reconstructs continuous
//!   positions, velocities and orientations from externally recorded
//!   trajectory samples.
//!
//! We also provide [`FormationConfig`] and [`FormationGenerator`] to describe
//! multi-layer formations, and [`ReferenceOrbit`] / [`RswFrame`] for the
//! reference orbit itself.
//!
//! ## Example
//!
//! ```rust
//! use hill_formation::{FormationInitializer, FormationSpec, HillSolver, Pattern, RelativeState, Scale};
//!
//! # fn main() {
//! let n = 0.0011;
//! let initializer = FormationInitializer::new(n);
//! let spec = FormationSpec {
//!     pattern: Pattern::PeriodicOrbit,
//!     count: 4,
//!     scale: Scale::Radius(100.0),
//!     ..Default::default()
//! };
//!
//! let mut states: Vec<RelativeState> = initializer
//!     .generate(&spec)
//!     .into_iter()
//!     .map(RelativeState::from)
//!     .collect();
//!
//! let solver = HillSolver::new(n);
//! for state in &mut states {
//!     solver.step(state, 1.0);
//! }
//! assert_eq!(states.len(), 4);
//! # }
//! ```

#![warn(missing_docs)]

pub mod formation;
mod frame;
mod hill;
pub mod lattice;
mod playback;
mod priority_queue;
mod reference_orbit;

pub use formation::{
    layers::{
        ConfigError, FormationConfig, FormationGenerator, FormationLayer, FormationStatistics,
        GeneratedSatellite,
    },
    DriftCompensation, FormationError, FormationInitializer, FormationSpec, InitialCondition,
    Pattern, PeriodicCoefficients, Scale,
};
pub use frame::RswFrame;
pub use hill::{HillSolver, OrbitalFrameParameters, RelativeState, StateDerivative};
pub use playback::{
    slerp, InterpolatedState, PlaybackEngine, PlaybackError, PlaybackStatus, TimeRange,
    TrajectoryData, TrajectorySample, MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED,
};
pub use priority_queue::PriorityQueue;
pub use reference_orbit::{OrbitError, ReferenceOrbit};

/// The equatorial radius of the Earth, in meters.
///
/// Source: WGS 84.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// The gravitational parameter of the Earth (GM), in m^3 s^-2.
pub const EARTH_MU: f64 = 3.986004418e14;

/// The second zonal harmonic coefficient of the Earth's gravity field.
///
/// This is the dominant term describing the Earth's oblateness.
pub const J2: f64 = 1.08262668e-3;

#[cfg(test)]
mod tests;
