use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bvh::DEFAULT_LEAF_SIZE;
use crate::camera::CameraSettings;

/// Limits and tuning of the scene pipeline.
///
/// Missing fields in a settings file take their default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Imports are truncated to this many triangles in total.
    pub max_triangles: usize,
    pub leaf_size: usize,
    /// Largest texture side the GPU accepts.
    pub max_texture_dimension: u32,
    /// Render resolution relative to the client area.
    pub render_scale: f64,
    pub noise_size: u32,
    pub noise_seed: u64,
    pub camera: CameraSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_triangles: 65536,
            leaf_size: DEFAULT_LEAF_SIZE,
            max_texture_dimension: 4096,
            render_scale: 1.0,
            noise_size: 64,
            noise_seed: 0x5eed,
            camera: CameraSettings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting `{what}`: {reason}")]
    Invalid {
        what: &'static str,
        reason: &'static str,
    },
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |what, reason| Err(ConfigError::Invalid { what, reason });

        if self.leaf_size == 0 {
            return invalid("leaf_size", "must be at least 1");
        }
        if self.max_texture_dimension == 0 {
            return invalid("max_texture_dimension", "must be at least 1");
        }
        if !(self.render_scale.is_finite() && self.render_scale > 0.0) {
            return invalid("render_scale", "must be a positive number");
        }
        if self.noise_size == 0 {
            return invalid("noise_size", "must be at least 1");
        }
        let camera = &self.camera;
        if ![camera.rotation_speed, camera.zoom_step, camera.move_speed]
            .iter()
            .all(|x| x.is_finite() && *x >= 0.0)
        {
            return invalid("camera", "speeds must be finite and non-negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::{assert, let_assert};

    #[test]
    fn defaults() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert!(settings.max_triangles == 65536);
        assert!(settings.leaf_size == 16);
        assert!(settings.camera.rotation_speed == 0.005);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings =
            Settings::from_json_str(r#"{ "leaf_size": 4, "camera": { "move_speed": 0.5 } }"#)
                .unwrap();
        assert!(settings.leaf_size == 4);
        assert!(settings.max_triangles == 65536);
        assert!(settings.camera.move_speed == 0.5);
        assert!(settings.camera.zoom_step == 0.2);
    }

    #[test]
    fn zero_leaf_size_rejected() {
        let_assert!(
            Err(ConfigError::Invalid { what, .. }) = Settings::from_json_str(r#"{ "leaf_size": 0 }"#)
        );
        assert!(what == "leaf_size");
    }

    #[test]
    fn negative_render_scale_rejected() {
        let_assert!(
            Err(ConfigError::Invalid { what, .. }) =
                Settings::from_json_str(r#"{ "render_scale": -1.0 }"#)
        );
        assert!(what == "render_scale");
    }

    #[test]
    fn malformed_json() {
        let_assert!(Err(ConfigError::Parse(_)) = Settings::from_json_str("{ leaf_size: "));
    }

    #[test]
    fn missing_file() {
        let_assert!(
            Err(ConfigError::Read { .. }) = Settings::load("/nonexistent/texeltrace/settings.json")
        );
    }
}
