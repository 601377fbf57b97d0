use glam::{DMat3, DQuat, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The local RSW (Radial, along-track, cross-track) frame of a
/// reference satellite.
///
/// The basis vectors are stored as unit vectors expressed in the
/// frame the reference state was given in (ECI, or ECEF when built
/// through [`from_ecef`][Self::from_ecef]).
///
/// - `radial` points from the Earth's centre through the satellite.
/// - `cross_track` is along the orbital angular momentum `r × v`.
/// - `along_track` completes the right-handed triad, `W × R`.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use hill_formation::RswFrame;
///
/// let frame = RswFrame::from_eci(DVec3::new(7e6, 0.0, 0.0), DVec3::new(0.0, 7.5e3, 0.0));
///
/// let rsw = frame.to_rsw(DVec3::new(0.0, 0.0, 1.0));
/// assert!((rsw - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RswFrame {
    /// Unit radial direction.
    pub radial: DVec3,
    /// Unit along-track direction.
    pub along_track: DVec3,
    /// Unit cross-track direction.
    pub cross_track: DVec3,
}

impl RswFrame {
    /// Builds the RSW frame from the reference satellite's inertial
    /// position and velocity.
    ///
    /// # Constraints
    /// The position must not be zero, and the velocity must not be
    /// parallel to it. If this constraint is breached, you may get
    /// NaNs.
    pub fn from_eci(position: DVec3, velocity: DVec3) -> Self {
        let radial = position.normalize();
        let cross_track = position.cross(velocity).normalize();
        let along_track = cross_track.cross(radial);

        Self {
            radial,
            along_track,
            cross_track,
        }
    }

    /// Builds the RSW frame with its basis expressed in Earth-fixed
    /// (ECEF) coordinates.
    ///
    /// `gmst` is the Greenwich mean sidereal time in radians; the
    /// reference state is given in ECI.
    pub fn from_ecef(gmst: f64, position_eci: DVec3, velocity_eci: DVec3) -> Self {
        let eci_frame = Self::from_eci(position_eci, velocity_eci);
        let eci_to_ecef = DMat3::from_rotation_z(-gmst);

        Self {
            radial: eci_to_ecef * eci_frame.radial,
            along_track: eci_to_ecef * eci_frame.along_track,
            cross_track: eci_to_ecef * eci_frame.cross_track,
        }
    }

    /// The rotation matrix taking source-frame vectors into RSW.
    ///
    /// Its rows are the R, S and W basis vectors.
    pub fn to_rsw_matrix(&self) -> DMat3 {
        self.from_rsw_matrix().transpose()
    }

    /// The rotation matrix taking RSW vectors back into the source frame.
    pub fn from_rsw_matrix(&self) -> DMat3 {
        DMat3::from_cols(self.radial, self.along_track, self.cross_track)
    }

    /// The rotation taking source-frame vectors into RSW, as a quaternion.
    pub fn to_rsw_quat(&self) -> DQuat {
        DQuat::from_mat3(&self.to_rsw_matrix())
    }

    /// Expresses a source-frame vector in RSW components.
    pub fn to_rsw(&self, vector: DVec3) -> DVec3 {
        DVec3::new(
            vector.dot(self.radial),
            vector.dot(self.along_track),
            vector.dot(self.cross_track),
        )
    }

    /// Expresses an RSW vector in source-frame components.
    pub fn from_rsw(&self, vector: DVec3) -> DVec3 {
        self.radial * vector.x + self.along_track * vector.y + self.cross_track * vector.z
    }
}
