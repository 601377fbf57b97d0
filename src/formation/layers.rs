//! Multi-layer formation configurations.
//!
//! A [`FormationConfig`] stacks several [`FormationLayer`]s, each one a
//! pattern with its own size and satellite count. The
//! [`FormationGenerator`] turns the enabled layers into one flat list of
//! satellites, with the reference satellite first.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    DriftCompensation, FormationError, FormationInitializer, FormationSpec, Pattern,
    PeriodicCoefficients, Scale,
};
use crate::{HillSolver, RelativeState};

/// The smallest satellite count a layer may have.
pub const MIN_LAYER_SATELLITES: usize = 1;

/// The largest satellite count a layer may have.
pub const MAX_LAYER_SATELLITES: usize = 100_000;

/// The configuration format version written by this crate.
pub const CONFIG_VERSION: &str = "1.0";

const LAYER_ID_PREFIX: &str = "layer-";

/// One pattern of a multi-layer formation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormationLayer {
    /// Unique identifier within the configuration.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Disabled layers are kept in the configuration but generate nothing.
    pub enabled: bool,
    /// The pattern of this layer.
    pub pattern: Pattern,
    /// The size of this layer.
    pub scale: Scale,
    /// The pattern's satellite count (see [`FormationSpec::count`]).
    pub satellite_count: usize,
    /// See [`FormationSpec::z_amplitude`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub z_amplitude: f64,
    /// See [`FormationSpec::periodic`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub periodic: Option<PeriodicCoefficients>,
    /// See [`FormationSpec::positive_z`].
    #[cfg_attr(feature = "serde", serde(default = "default_positive_z"))]
    pub positive_z: bool,
}

#[cfg(feature = "serde")]
fn default_positive_z() -> bool {
    true
}

impl FormationLayer {
    /// Creates a layer with default settings.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            pattern: Pattern::Axis,
            scale: Scale::Spacing(1.0),
            satellite_count: 3,
            z_amplitude: 0.0,
            periodic: None,
            positive_z: true,
        }
    }

    /// Builds the formation spec for this layer.
    pub fn spec(&self, drift: DriftCompensation) -> FormationSpec {
        FormationSpec {
            pattern: self.pattern,
            count: self.satellite_count,
            scale: self.scale,
            z_amplitude: self.z_amplitude,
            periodic: self.periodic,
            positive_z: self.positive_z,
            drift,
        }
    }

    /// Gets every problem with this layer. `index` is only used to
    /// label the errors.
    fn validation_errors(&self, index: usize) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.id.trim().is_empty() {
            errors.push(ConfigError::MissingLayerId { index });
        }
        if self.name.trim().is_empty() {
            errors.push(ConfigError::MissingLayerName { index });
        }

        if !(MIN_LAYER_SATELLITES..=MAX_LAYER_SATELLITES).contains(&self.satellite_count) {
            errors.push(ConfigError::SatelliteCountOutOfRange {
                layer: self.label(index),
                count: self.satellite_count,
            });
        }

        if let Err(source) = self.spec(DriftCompensation::Classical).validate() {
            errors.push(ConfigError::InvalidLayer {
                layer: self.label(index),
                source,
            });
        }

        errors
    }

    fn label(&self, index: usize) -> String {
        format!("layer {} ({})", index + 1, self.name)
    }
}

/// A complete multi-layer formation.
///
/// # Example
/// ```
/// use hill_formation::{FormationConfig, Pattern, Scale};
///
/// let mut config = FormationConfig::default();
/// let id = config.add_layer(Some("Ring")).id.clone();
///
/// config.update_layer(&id, |layer| {
///     layer.pattern = Pattern::ConcentricDisk;
///     layer.scale = Scale::Spacing(5.0);
///     layer.satellite_count = 19;
/// });
///
/// assert_eq!(config.layers.len(), 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormationConfig {
    /// Configuration format version.
    pub version: String,
    /// Name of the formation.
    pub name: String,
    /// Free-form description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// The layers, in order.
    pub layers: Vec<FormationLayer>,
    #[cfg_attr(feature = "serde", serde(skip))]
    next_layer_id: usize,
}

impl FormationConfig {
    /// Creates an empty configuration with no layers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            name: name.into(),
            description: String::new(),
            layers: Vec::new(),
            next_layer_id: 1,
        }
    }

    /// Adds a layer with default settings at the end.
    ///
    /// Without a name, the layer is named after its position.
    pub fn add_layer(&mut self, name: Option<&str>) -> &mut FormationLayer {
        self.sync_next_layer_id();
        let id = format!("{LAYER_ID_PREFIX}{}", self.next_layer_id);
        self.next_layer_id += 1;

        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Layer {}", self.layers.len() + 1),
        };

        self.layers.push(FormationLayer::new(id, name));
        let index = self.layers.len() - 1;
        &mut self.layers[index]
    }

    /// Removes a layer, returning it if it existed.
    pub fn remove_layer(&mut self, id: &str) -> Option<FormationLayer> {
        let index = self.position(id)?;
        Some(self.layers.remove(index))
    }

    /// Gets a layer by ID.
    pub fn layer(&self, id: &str) -> Option<&FormationLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Applies `update` to a layer. Returns false if there is no such layer.
    pub fn update_layer(&mut self, id: &str, update: impl FnOnce(&mut FormationLayer)) -> bool {
        match self.layers.iter_mut().find(|layer| layer.id == id) {
            Some(layer) => {
                update(layer);
                true
            }
            None => false,
        }
    }

    /// Swaps a layer with the one before it.
    ///
    /// Returns false if there is no such layer or it is already first.
    pub fn move_layer_up(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) if index > 0 => {
                self.layers.swap(index - 1, index);
                true
            }
            _ => false,
        }
    }

    /// Swaps a layer with the one after it.
    ///
    /// Returns false if there is no such layer or it is already last.
    pub fn move_layer_down(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) if index + 1 < self.layers.len() => {
                self.layers.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Flips a layer's `enabled` flag. Returns false if there is no such layer.
    pub fn toggle_layer(&mut self, id: &str) -> bool {
        self.update_layer(id, |layer| layer.enabled = !layer.enabled)
    }

    /// Iterates over the enabled layers, in order.
    pub fn enabled_layers(&self) -> impl Iterator<Item = &FormationLayer> {
        self.layers.iter().filter(|layer| layer.enabled)
    }

    /// Gets the number of satellites the enabled layers generate,
    /// not counting the reference satellite.
    ///
    /// This is the actual generated count, so an axis layer with a
    /// satellite count of 3 contributes 18.
    pub fn total_satellite_count(&self) -> usize {
        self.enabled_layers()
            .map(|layer| layer.spec(DriftCompensation::Classical).expected_len())
            .sum()
    }

    /// Gets every problem with this configuration.
    pub fn validation_errors(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.version.trim().is_empty() {
            errors.push(ConfigError::MissingVersion);
        }
        if self.name.trim().is_empty() {
            errors.push(ConfigError::EmptyName);
        }

        for (index, layer) in self.layers.iter().enumerate() {
            errors.extend(layer.validation_errors(index));

            if self.layers[..index].iter().any(|other| other.id == layer.id) {
                errors.push(ConfigError::DuplicateLayerId(layer.id.clone()));
            }
        }

        errors
    }

    /// Checks the configuration, returning the first problem found.
    ///
    /// # Errors
    /// See [`ConfigError`]. Use [`validation_errors`][Self::validation_errors]
    /// to get all of them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.validation_errors().into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// [`ConfigError::Json`] if serialization fails.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    /// [`ConfigError::Json`] if the JSON is malformed, or the first
    /// validation error otherwise.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: FormationConfig = serde_json::from_str(json)?;
        config.validate()?;
        config.sync_next_layer_id();
        log::debug!(
            "imported formation '{}' with {} layers",
            config.name,
            config.layers.len()
        );
        Ok(config)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    /// Makes sure freshly minted IDs never collide with `layer-N` IDs
    /// already present.
    fn sync_next_layer_id(&mut self) {
        let max_existing = self
            .layers
            .iter()
            .filter_map(|layer| layer.id.strip_prefix(LAYER_ID_PREFIX)?.parse::<usize>().ok())
            .max()
            .unwrap_or(0);

        self.next_layer_id = self.next_layer_id.max(max_existing + 1);
    }
}

impl Default for FormationConfig {
    /// Creates the default formation: a single axis layer of
    /// 5 satellites per half-axis, 2 meters apart.
    fn default() -> Self {
        let mut config = Self::new("Default formation");
        let layer = config.add_layer(Some("Default layer"));
        layer.scale = Scale::Spacing(2.0);
        layer.satellite_count = 5;
        config
    }
}

/// A satellite produced by a [`FormationGenerator`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratedSatellite {
    /// The layer that produced this satellite, or `None` for
    /// the reference satellite.
    pub layer_id: Option<String>,
    /// The initial relative state.
    pub state: RelativeState,
}

/// Summary figures of a configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormationStatistics {
    /// Number of layers, enabled or not.
    pub total_layers: usize,
    /// Number of enabled layers.
    pub enabled_layers: usize,
    /// Number of generated satellites, including the reference satellite.
    pub total_satellites: usize,
    /// `(layer name, generated satellites)` for each enabled layer.
    pub satellites_by_layer: Vec<(String, usize)>,
}

/// Turns a [`FormationConfig`] into satellites.
///
/// # Example
/// ```
/// use hill_formation::{FormationConfig, FormationGenerator};
///
/// let config = FormationConfig::default();
/// let generator = FormationGenerator::new(0.0011);
///
/// let satellites = generator.generate(&config);
/// // The reference satellite, then 6 * 5 axis satellites
/// assert_eq!(satellites.len(), 31);
/// assert!(satellites[0].layer_id.is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationGenerator {
    initializer: FormationInitializer,
    drift: DriftCompensation,
}

impl FormationGenerator {
    /// Creates a generator with classical drift compensation.
    pub fn new(mean_motion: f64) -> Self {
        Self {
            initializer: FormationInitializer::new(mean_motion),
            drift: DriftCompensation::Classical,
        }
    }

    /// Creates a generator matching a solver's mean motion and J2 setting.
    pub fn from_solver(solver: &HillSolver) -> Self {
        Self {
            initializer: FormationInitializer::from_solver(solver),
            drift: DriftCompensation::from_solver(solver),
        }
    }

    /// Sets the mean motion, in rad/s.
    pub fn set_mean_motion(&mut self, mean_motion: f64) {
        self.initializer.set_mean_motion(mean_motion);
    }

    /// Sets how drift-free velocities are computed for the disk patterns.
    pub fn set_drift_compensation(&mut self, drift: DriftCompensation) {
        self.drift = drift;
    }

    /// Generates the satellites of every enabled layer, preceded by
    /// the reference satellite at rest at the origin.
    pub fn generate(&self, config: &FormationConfig) -> Vec<GeneratedSatellite> {
        self.generate_with_rng(config, &mut rand::rng())
    }

    /// Like [`generate`][Self::generate], drawing random numbers from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        config: &FormationConfig,
        rng: &mut R,
    ) -> Vec<GeneratedSatellite> {
        let mut satellites = Vec::with_capacity(config.total_satellite_count() + 1);
        satellites.push(GeneratedSatellite {
            layer_id: None,
            state: RelativeState::default(),
        });

        for layer in config.enabled_layers() {
            let spec = layer.spec(self.drift);
            let conditions = self.initializer.generate_with_rng(&spec, rng);
            satellites.extend(conditions.into_iter().map(|condition| GeneratedSatellite {
                layer_id: Some(layer.id.clone()),
                state: condition.into(),
            }));
        }

        log::debug!(
            "generated {} satellites for formation '{}'",
            satellites.len(),
            config.name
        );

        satellites
    }

    /// Summarizes a configuration.
    pub fn statistics(&self, config: &FormationConfig) -> FormationStatistics {
        let satellites_by_layer: Vec<(String, usize)> = config
            .enabled_layers()
            .map(|layer| {
                (
                    layer.name.clone(),
                    layer.spec(self.drift).expected_len(),
                )
            })
            .collect();

        FormationStatistics {
            total_layers: config.layers.len(),
            enabled_layers: satellites_by_layer.len(),
            total_satellites: satellites_by_layer.iter().map(|(_, n)| n).sum::<usize>() + 1,
            satellites_by_layer,
        }
    }
}

/// An error to describe why a formation configuration is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The version string is empty.
    #[error("configuration has no version")]
    MissingVersion,
    /// The formation name is empty.
    #[error("formation name is empty")]
    EmptyName,
    /// A layer has an empty ID.
    #[error("layer {} has no id", index + 1)]
    MissingLayerId {
        /// Zero-based position of the layer.
        index: usize,
    },
    /// A layer has an empty name.
    #[error("layer {} has no name", index + 1)]
    MissingLayerName {
        /// Zero-based position of the layer.
        index: usize,
    },
    /// Two layers share an ID.
    #[error("duplicate layer id '{0}'")]
    DuplicateLayerId(String),
    /// A layer's satellite count is outside the supported range.
    #[error("{layer}: satellite count {count} is outside 1-100000")]
    SatelliteCountOutOfRange {
        /// Label of the offending layer.
        layer: String,
        /// The rejected count.
        count: usize,
    },
    /// A layer's pattern parameters are invalid.
    #[error("{layer}: {source}")]
    InvalidLayer {
        /// Label of the offending layer.
        layer: String,
        /// What is wrong with it.
        source: FormationError,
    },
    /// The configuration could not be (de)serialized.
    #[cfg(feature = "serde")]
    #[error("invalid formation JSON: {0}")]
    Json(#[from] serde_json::Error),
}
