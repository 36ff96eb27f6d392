//! Documented defaults for the optional calibrator inputs.
//!
//! The form and the model disagree on the drag coefficient default; both
//! values are kept under separate names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{Environment, FRESH_WATER};

pub const DEFAULT_DEPTH: f64 = 10.0;
pub const DEFAULT_EQUIP_WEIGHT: f64 = 3.0;
pub const DEFAULT_DENSITY: f64 = FRESH_WATER.density;
pub const DEFAULT_GRAVITY: f64 = FRESH_WATER.gravity;
pub const DEFAULT_P0: f64 = FRESH_WATER.p0;

/// Drag coefficient pre-filled in the input form.
pub const DEFAULT_FORM_DRAG_COEFFICIENT: f64 = 0.4;

/// Drag coefficient used when the model is called without one.
pub const DEFAULT_MODEL_DRAG_COEFFICIENT: f64 = 0.3;

pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Upper end of the sampled velocity range, in m/s.
pub const MAX_VELOCITY: f64 = 1.4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read defaults file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("defaults file {path} is not valid JSON")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Values substituted for empty optional form fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub depth: f64,
    pub equip_weight: f64,
    pub density: f64,
    pub gravity: f64,
    pub drag_coefficient: f64,
    pub p0: f64,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            equip_weight: DEFAULT_EQUIP_WEIGHT,
            density: DEFAULT_DENSITY,
            gravity: DEFAULT_GRAVITY,
            drag_coefficient: DEFAULT_FORM_DRAG_COEFFICIENT,
            p0: DEFAULT_P0,
        }
    }
}

impl FormDefaults {
    /// Read defaults from a JSON file. Keys missing from the file keep their
    /// documented value.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Replace the fluid and surface pressure defaults with `env`.
    pub fn with_environment(self, env: Environment) -> Self {
        Self {
            density: env.density,
            gravity: env.gravity,
            p0: env.p0,
            ..self
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Like [`FormDefaults::load`], falling back to the documented defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(defaults) => {
                log::debug!("Loaded form defaults: {:?}", defaults);
                defaults
            }
            Err(err) => {
                log::warn!("{err}, using built-in defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_water_preset_keeps_diver_defaults() {
        let defaults = FormDefaults::default().with_environment(crate::units::SEA_WATER);
        assert_eq!(defaults.density, 1025.0);
        assert_eq!(defaults.p0, 101_325.0);
        assert_eq!(defaults.depth, 10.0);
        assert_eq!(defaults.drag_coefficient, 0.4);
    }

    #[test]
    fn documented_defaults() {
        let defaults = FormDefaults::default();
        assert_eq!(defaults.depth, 10.0);
        assert_eq!(defaults.equip_weight, 3.0);
        assert_eq!(defaults.density, 1000.0);
        assert_eq!(defaults.gravity, 9.8);
        assert_eq!(defaults.drag_coefficient, 0.4);
        assert_eq!(defaults.p0, 101_325.0);
    }

    #[test]
    fn drag_defaults_stay_distinct() {
        assert_ne!(DEFAULT_FORM_DRAG_COEFFICIENT, DEFAULT_MODEL_DRAG_COEFFICIENT);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let defaults = FormDefaults::from_json(r#"{ "density": 1025.0, "depth": 18 }"#).unwrap();
        assert_eq!(defaults.density, 1025.0);
        assert_eq!(defaults.depth, 18.0);
        assert_eq!(defaults.gravity, 9.8);
        assert_eq!(defaults.drag_coefficient, 0.4);
    }

    #[test]
    fn missing_file_falls_back() {
        let path = std::env::temp_dir().join("nbcalibrator-no-such-defaults.json");
        assert!(matches!(FormDefaults::load(&path), Err(ConfigError::Read { .. })));
        assert_eq!(FormDefaults::load_or_default(&path), FormDefaults::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = std::env::temp_dir().join("nbcalibrator-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ depth: ").unwrap();
        assert!(matches!(FormDefaults::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(FormDefaults::load_or_default(&path), FormDefaults::default());
    }
}
