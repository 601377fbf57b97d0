//! Playback of recorded relative trajectories.
//!
//! Instead of integrating the Hill equations, a [`PlaybackEngine`] can
//! drive a formation from pre-recorded samples. It keeps a clock that is
//! advanced by the caller, and reconstructs every satellite's position,
//! velocity and orientation at the current time.

use glam::{DQuat, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RelativeState;

/// The slowest playback speed, as a multiple of real time.
pub const MIN_PLAYBACK_SPEED: f64 = 1.0;

/// The fastest playback speed, as a multiple of real time.
pub const MAX_PLAYBACK_SPEED: f64 = 960.0;

/// Above this quaternion dot product, [`slerp`] falls back to a
/// normalized linear interpolation.
const SLERP_LINEAR_THRESHOLD: f64 = 0.9995;

/// Quaternions whose norm is further than this from 1 are re-normalized.
const QUATERNION_NORM_TOLERANCE: f64 = 0.01;

/// One recorded sample of a satellite's trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectorySample {
    /// Time of the sample, in seconds.
    pub time: f64,
    /// Position in the RSW frame, in meters.
    pub position: DVec3,
    /// Attitude of the satellite.
    pub orientation: DQuat,
}

impl TrajectorySample {
    /// Creates a sample, re-normalizing the orientation if its norm
    /// deviates from 1 by more than 1%.
    ///
    /// A zero (or non-finite) quaternion is replaced by the identity.
    pub fn new(time: f64, position: DVec3, orientation: DQuat) -> Self {
        Self {
            time,
            position,
            orientation: sanitize_quaternion(orientation),
        }
    }

    /// Creates a sample from a scalar-first quaternion `[w, x, y, z]`.
    ///
    /// # Example
    /// ```
    /// use glam::{DQuat, DVec3};
    /// use hill_formation::TrajectorySample;
    ///
    /// let sample = TrajectorySample::from_scalar_first(0.0, DVec3::ZERO, [2.0, 0.0, 0.0, 0.0]);
    /// assert_eq!(sample.orientation, DQuat::IDENTITY);
    /// ```
    pub fn from_scalar_first(time: f64, position: DVec3, [w, x, y, z]: [f64; 4]) -> Self {
        Self::new(time, position, DQuat::from_xyzw(x, y, z, w))
    }
}

fn sanitize_quaternion(q: DQuat) -> DQuat {
    let norm = q.length();

    if !norm.is_finite() || norm == 0.0 {
        log::warn!("degenerate orientation quaternion {q:?}, using identity");
        return DQuat::IDENTITY;
    }

    if (norm - 1.0).abs() > QUATERNION_NORM_TOLERANCE {
        log::debug!("re-normalizing orientation quaternion (norm = {norm:.3})");
        return q / norm;
    }

    q
}

/// A closed time interval, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeRange {
    /// Start of the interval.
    pub min: f64,
    /// End of the interval.
    pub max: f64,
}

impl TimeRange {
    /// Gets the length of the interval.
    pub fn duration(&self) -> f64 {
        self.max - self.min
    }

    /// Clamps a time into the interval.
    pub fn clamp(&self, time: f64) -> f64 {
        time.max(self.min).min(self.max)
    }
}

/// Recorded trajectories of a whole formation.
///
/// Build this with [`TrajectoryData::new`], which checks the samples
/// and derives the other fields.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryData {
    /// One time-ordered series of samples per satellite.
    pub satellites: Vec<Vec<TrajectorySample>>,
    /// The earliest and latest sample time.
    pub time_range: TimeRange,
    /// The number of satellites.
    pub satellite_count: usize,
}

impl TrajectoryData {
    /// Creates trajectory data from per-satellite sample series.
    ///
    /// Every satellite must have the same number of samples, and each
    /// series must have strictly increasing times.
    ///
    /// # Errors
    /// - [`PlaybackError::InconsistentSatelliteCount`] if the series
    ///   have different lengths.
    /// - [`PlaybackError::NonIncreasingTime`] if a series goes back in
    ///   time, stalls, or has a non-finite time.
    pub fn new(satellites: Vec<Vec<TrajectorySample>>) -> Result<Self, PlaybackError> {
        let expected = satellites.first().map_or(0, Vec::len);
        let mut time_range: Option<TimeRange> = None;

        for (satellite, samples) in satellites.iter().enumerate() {
            if samples.len() != expected {
                return Err(PlaybackError::InconsistentSatelliteCount {
                    satellite,
                    expected,
                    actual: samples.len(),
                });
            }

            for (index, sample) in samples.iter().enumerate() {
                let increasing = match index.checked_sub(1) {
                    Some(previous) => sample.time > samples[previous].time,
                    None => true,
                };
                if !sample.time.is_finite() || !increasing {
                    return Err(PlaybackError::NonIncreasingTime { satellite, index });
                }
            }

            if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
                time_range = Some(match time_range {
                    Some(range) => TimeRange {
                        min: range.min.min(first.time),
                        max: range.max.max(last.time),
                    },
                    None => TimeRange {
                        min: first.time,
                        max: last.time,
                    },
                });
            }
        }

        Ok(Self {
            satellite_count: satellites.len(),
            time_range: time_range.unwrap_or_default(),
            satellites,
        })
    }

    /// Gets the average time between samples, or 1 with fewer
    /// than two samples per satellite.
    pub fn sample_interval(&self) -> f64 {
        let samples = self.satellites.first().map_or(0, Vec::len);
        if samples > 1 {
            self.time_range.duration() / (samples - 1) as f64
        } else {
            1.0
        }
    }
}

/// A satellite's reconstructed state at some time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterpolatedState {
    /// Position in the RSW frame, in meters.
    pub position: DVec3,
    /// Velocity from finite differences, in meters per second.
    pub velocity: DVec3,
    /// Attitude of the satellite.
    pub orientation: DQuat,
}

impl Default for InterpolatedState {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

impl InterpolatedState {
    fn at_sample(sample: &TrajectorySample, velocity: DVec3) -> Self {
        Self {
            position: sample.position,
            velocity,
            orientation: sample.orientation,
        }
    }

    /// Reconstructs a satellite's state at `time` from its samples.
    ///
    /// - No samples: the origin, at rest, with the identity orientation.
    /// - One sample: that sample, at rest.
    /// - A NaN `time`: the first sample, as if before the start.
    /// - Outside the samples: the nearest end sample, with a one-sided
    ///   finite-difference velocity.
    /// - Otherwise, linear interpolation of the position, SLERP of the
    ///   orientation, and the velocity of the bracketing segment.
    ///   Exactly on an interior sample, the velocity is the central
    ///   difference around it.
    pub fn interpolate(samples: &[TrajectorySample], time: f64) -> Self {
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Self::default(),
        };

        if samples.len() == 1 {
            return Self::at_sample(first, DVec3::ZERO);
        }

        if time.is_nan() || time <= first.time {
            return Self::at_sample(first, sample_velocity(samples, 0));
        }
        if time >= last.time {
            return Self::at_sample(last, sample_velocity(samples, samples.len() - 1));
        }

        // first.time < time < last.time, so 1 <= after <= len - 1
        let after = samples.partition_point(|sample| sample.time <= time);
        let before = after - 1;
        let (a, b) = (&samples[before], &samples[after]);

        if time == a.time {
            return Self::at_sample(a, sample_velocity(samples, before));
        }

        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };

        Self {
            position: a.position.lerp(b.position, t),
            velocity: finite_difference(a, b),
            orientation: slerp(a.orientation, b.orientation, t),
        }
    }
}

fn finite_difference(before: &TrajectorySample, after: &TrajectorySample) -> DVec3 {
    let dt = after.time - before.time;
    if dt == 0.0 {
        return DVec3::ZERO;
    }
    (after.position - before.position) / dt
}

/// Velocity at a sample: forward difference at the start, backward at
/// the end, central in between.
fn sample_velocity(samples: &[TrajectorySample], index: usize) -> DVec3 {
    let len = samples.len();
    if len < 2 {
        return DVec3::ZERO;
    }

    let (before, after) = if index == 0 {
        (0, 1)
    } else if index >= len - 1 {
        (len - 2, len - 1)
    } else {
        (index - 1, index + 1)
    };

    finite_difference(&samples[before], &samples[after])
}

/// Spherical linear interpolation between two unit quaternions.
///
/// Always takes the shortest path: if `q1 · q2 < 0`, `q2` is negated
/// first. When the quaternions are nearly parallel (dot above 0.9995),
/// this falls back to a normalized linear interpolation.
///
/// # Example
/// ```
/// use glam::DQuat;
/// use hill_formation::slerp;
///
/// let q = DQuat::from_rotation_z(1.0);
/// assert!(slerp(q, q, 0.3).abs_diff_eq(q, 1e-12));
///
/// let half = slerp(DQuat::IDENTITY, DQuat::from_rotation_z(1.0), 0.5);
/// assert!(half.abs_diff_eq(DQuat::from_rotation_z(0.5), 1e-12));
/// ```
pub fn slerp(q1: DQuat, q2: DQuat, t: f64) -> DQuat {
    let mut dot = q1.dot(q2);
    let mut q2 = q2;

    if dot < 0.0 {
        q2 = -q2;
        dot = -dot;
    }

    if dot > SLERP_LINEAR_THRESHOLD {
        let lerped = q1 + (q2 - q1) * t;
        let norm = lerped.length();
        return if norm > 0.0 { lerped / norm } else { lerped };
    }

    let theta_0 = dot.acos();
    let theta = theta_0 * t;
    let (sin_theta, cos_theta) = theta.sin_cos();
    let sin_theta_0 = theta_0.sin();

    let s0 = cos_theta - dot * sin_theta / sin_theta_0;
    let s1 = sin_theta / sin_theta_0;

    q1 * s0 + q2 * s1
}

/// Whether a [`PlaybackEngine`] is advancing its clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaybackStatus {
    /// Not playing, with the clock at the start.
    #[default]
    Stopped,
    /// Advancing the clock on every update.
    Playing,
    /// Not playing, with the clock wherever it was left.
    Paused,
}

/// Plays recorded trajectories back.
///
/// The engine does not own a timer: call [`update`][Self::update] with
/// the elapsed wall-clock time on every frame.
///
/// # Example
/// ```
/// use glam::{DQuat, DVec3};
/// use hill_formation::{PlaybackEngine, TrajectoryData, TrajectorySample};
///
/// let samples = vec![
///     TrajectorySample::new(0.0, DVec3::ZERO, DQuat::IDENTITY),
///     TrajectorySample::new(10.0, DVec3::new(10.0, 0.0, 0.0), DQuat::IDENTITY),
/// ];
/// let data = TrajectoryData::new(vec![samples]).unwrap();
///
/// let mut engine = PlaybackEngine::new();
/// engine.load(data);
/// engine.play();
/// engine.update(2.5);
///
/// let state = engine.interpolated_states()[0];
/// assert!((state.position.x - 2.5).abs() < 1e-12);
/// assert!((state.velocity.x - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackEngine {
    data: Option<TrajectoryData>,
    current_time: f64,
    status: PlaybackStatus,
    speed: f64,
    loop_enabled: bool,
    states: Vec<InterpolatedState>,
}

impl Default for PlaybackEngine {
    /// Creates an empty engine.
    ///
    /// Currently, the engine starts stopped at time 0 with a speed of 1
    /// and looping enabled.
    fn default() -> Self {
        Self {
            data: None,
            current_time: 0.0,
            status: PlaybackStatus::Stopped,
            speed: MIN_PLAYBACK_SPEED,
            loop_enabled: true,
            states: Vec::new(),
        }
    }
}

impl PlaybackEngine {
    /// Creates an empty engine. See [`Default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads trajectories, moving the clock to their start.
    ///
    /// The play status, speed and loop flag are kept.
    pub fn load(&mut self, data: TrajectoryData) {
        log::info!(
            "loaded {} satellite trajectories over [{}, {}] s",
            data.satellite_count,
            data.time_range.min,
            data.time_range.max
        );
        self.current_time = data.time_range.min;
        self.data = Some(data);
        self.refresh();
    }

    /// Whether trajectories are loaded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Gets the loaded trajectories.
    pub fn data(&self) -> Option<&TrajectoryData> {
        self.data.as_ref()
    }

    /// Advances the clock by `delta_seconds` of wall-clock time,
    /// scaled by the playback speed.
    ///
    /// Does nothing unless playing, or if `delta_seconds` is not finite.
    /// Past the end, the clock wraps to the start when looping, or stops
    /// at the end and pauses.
    pub fn update(&mut self, delta_seconds: f64) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        let Some(range) = self.data.as_ref().map(|data| data.time_range) else {
            return;
        };

        if !delta_seconds.is_finite() {
            log::warn!("ignoring non-finite playback step {delta_seconds}");
            return;
        }

        self.current_time += delta_seconds * self.speed;

        if self.current_time > range.max {
            if self.loop_enabled {
                log::debug!("playback reached the end, looping");
                self.current_time = range.min;
            } else {
                log::info!("playback reached the end, pausing");
                self.current_time = range.max;
                self.status = PlaybackStatus::Paused;
            }
        }

        self.refresh();
    }

    /// Moves the clock to `time`, clamped into the loaded time range.
    ///
    /// Works in any status. Does nothing if no trajectories are loaded
    /// or `time` is NaN.
    pub fn seek(&mut self, time: f64) {
        let Some(range) = self.data.as_ref().map(|data| data.time_range) else {
            return;
        };
        if time.is_nan() {
            log::warn!("ignoring seek to NaN");
            return;
        }
        self.current_time = range.clamp(time);
        self.refresh();
    }

    /// Starts (or resumes) playback.
    pub fn play(&mut self) {
        if self.status != PlaybackStatus::Playing {
            log::info!("playback started at t = {} s", self.current_time);
        }
        self.status = PlaybackStatus::Playing;
    }

    /// Pauses playback, keeping the clock where it is.
    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            log::info!("playback paused at t = {} s", self.current_time);
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Stops playback and rewinds the clock to the start.
    pub fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
        if let Some(range) = self.data.as_ref().map(|data| data.time_range) {
            self.current_time = range.min;
            self.refresh();
        }
        log::info!("playback stopped");
    }

    /// Pauses if playing, plays otherwise.
    pub fn toggle_play_pause(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Sets the playback speed, clamped to
    /// [`MIN_PLAYBACK_SPEED`]..=[`MAX_PLAYBACK_SPEED`]. A NaN speed is ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_nan() {
            log::warn!("ignoring NaN playback speed, keeping {}", self.speed);
            return;
        }
        let clamped = speed.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED);
        if clamped != speed {
            log::warn!("playback speed {speed} clamped to {clamped}");
        }
        self.speed = clamped;
    }

    /// Gets the playback speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Sets whether playback wraps around at the end.
    pub fn set_loop_enabled(&mut self, loop_enabled: bool) {
        self.loop_enabled = loop_enabled;
    }

    /// Whether playback wraps around at the end.
    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Gets the play status.
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Whether the clock is advancing.
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Gets the playback clock, in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Gets how far through the time range the clock is, from 0 to 1.
    ///
    /// This is 0 with nothing loaded, and 1 for a zero-length range.
    pub fn progress(&self) -> f64 {
        let Some(range) = self.time_range() else {
            return 0.0;
        };
        let duration = range.duration();
        if duration == 0.0 {
            return 1.0;
        }
        (self.current_time - range.min) / duration
    }

    /// Gets the loaded time range.
    pub fn time_range(&self) -> Option<TimeRange> {
        self.data.as_ref().map(|data| data.time_range)
    }

    /// Gets the number of loaded satellites.
    pub fn satellite_count(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.satellite_count)
    }

    /// Gets the states computed at the last clock change.
    ///
    /// This does not recompute anything.
    pub fn interpolated_states(&self) -> &[InterpolatedState] {
        &self.states
    }

    /// Copies the interpolated positions and velocities into `states`,
    /// returning the matching orientations.
    ///
    /// Only the first `min(states.len(), satellite_count)` entries
    /// are touched.
    pub fn apply_to_states(&self, states: &mut [RelativeState]) -> Vec<DQuat> {
        states
            .iter_mut()
            .zip(&self.states)
            .map(|(state, interpolated)| {
                state.position = interpolated.position;
                state.velocity = interpolated.velocity;
                interpolated.orientation
            })
            .collect()
    }

    /// Unloads the trajectories and restores the default settings.
    pub fn reset(&mut self) {
        *self = Self::default();
        log::debug!("playback engine reset");
    }

    fn refresh(&mut self) {
        let time = self.current_time;
        let Some(data) = &self.data else {
            self.states.clear();
            return;
        };

        self.states.clear();
        self.states.extend(
            data.satellites
                .iter()
                .map(|samples| InterpolatedState::interpolate(samples, time)),
        );
    }
}

/// An error to describe why trajectory data is malformed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    /// A satellite has a different number of samples than the first one.
    #[error("satellite {satellite} has {actual} samples, expected {expected}")]
    InconsistentSatelliteCount {
        /// Index of the offending satellite.
        satellite: usize,
        /// Number of samples of the first satellite.
        expected: usize,
        /// Number of samples of this satellite.
        actual: usize,
    },
    /// A sample's time is not after the previous sample's.
    #[error("sample {index} of satellite {satellite} is not after the previous one")]
    NonIncreasingTime {
        /// Index of the offending satellite.
        satellite: usize,
        /// Index of the offending sample.
        index: usize,
    },
}
