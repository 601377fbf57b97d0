use core::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EARTH_MU, EARTH_RADIUS};

/// The lowest supported reference orbit altitude, in meters.
const MIN_ALTITUDE: f64 = 200e3;

/// The highest supported reference orbit altitude, in meters.
const MAX_ALTITUDE: f64 = 36_000e3;

/// A circular reference orbit around the Earth.
///
/// The relative motion of every satellite in a formation is described
/// around a point travelling along this orbit. The reference orbit is
/// passed explicitly to whatever needs it; there is no global instance.
///
/// # Example
/// ```
/// use hill_formation::ReferenceOrbit;
///
/// let iss = ReferenceOrbit::iss();
/// let period_minutes = iss.period() / 60.0;
/// assert!(period_minutes > 92.0 && period_minutes < 93.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceOrbit {
    /// Altitude above the Earth's equatorial radius, in meters.
    pub altitude: f64,
    /// Inclination of the orbital plane, in radians.
    pub inclination: f64,
}

impl ReferenceOrbit {
    /// Creates a new circular reference orbit.
    ///
    /// `altitude` is in meters, `inclination` in radians.
    pub fn new(altitude: f64, inclination: f64) -> Self {
        Self {
            altitude,
            inclination,
        }
    }

    /// A reference orbit resembling the International Space Station's:
    /// 408 km altitude, 51.6° inclination.
    pub fn iss() -> Self {
        Self::new(408e3, 51.6_f64.to_radians())
    }

    /// Gets the orbit radius (semi-major axis), in meters.
    pub fn radius(&self) -> f64 {
        EARTH_RADIUS + self.altitude
    }

    /// Gets the mean motion, in radians per second.
    ///
    /// `n = sqrt(μ / a³)`
    pub fn mean_motion(&self) -> f64 {
        (EARTH_MU / self.radius().powi(3)).sqrt()
    }

    /// Gets the orbital period, in seconds.
    pub fn period(&self) -> f64 {
        TAU / self.mean_motion()
    }

    /// Checks that the orbit is within the supported range.
    ///
    /// # Errors
    /// - [`OrbitError::AltitudeOutOfRange`] if the altitude is outside
    ///   200–36000 km.
    /// - [`OrbitError::InclinationOutOfRange`] if the inclination is
    ///   outside 0–180°.
    pub fn validate(&self) -> Result<(), OrbitError> {
        if !(MIN_ALTITUDE..=MAX_ALTITUDE).contains(&self.altitude) {
            return Err(OrbitError::AltitudeOutOfRange(self.altitude));
        }

        if !(0.0..=core::f64::consts::PI).contains(&self.inclination) {
            return Err(OrbitError::InclinationOutOfRange(
                self.inclination.to_degrees(),
            ));
        }

        Ok(())
    }
}

impl Default for ReferenceOrbit {
    /// Creates a default reference orbit.
    ///
    /// Currently, this function returns the ISS-like orbit from [`ReferenceOrbit::iss`].
    /// However, do not rely on this behavior, as it may change in the future.
    fn default() -> Self {
        Self::iss()
    }
}

/// An error to describe why a reference orbit is not supported.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum OrbitError {
    /// The altitude (meters) is outside the supported 200–36000 km band.
    #[error("altitude {0} m is outside the supported range of 200-36000 km")]
    AltitudeOutOfRange(f64),
    /// The inclination (degrees) is outside 0–180°.
    #[error("inclination {0}° is outside the range of 0-180°")]
    InclinationOutOfRange(f64),
}
