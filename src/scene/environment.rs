use serde::{Deserialize, Serialize};

use crate::geometry::{FloatType, WorldPoint};

use super::{Color, SceneError, check_finite, check_range};

/// Thin lens parameters for depth of field.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lens {
    pub aperture: FloatType,
    pub focal_distance: FloatType,
    /// Vertical field of view, radians.
    pub fov: FloatType,
}

impl Default for Lens {
    fn default() -> Self {
        Lens {
            aperture: 0.01,
            focal_distance: 5.0,
            fov: std::f32::consts::FRAC_PI_3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLight {
    pub position: [FloatType; 3],
    pub color: [FloatType; 3],
}

impl Default for PointLight {
    fn default() -> Self {
        PointLight {
            position: [2.0, 5.0, -3.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// Checkered infinite plane at a fixed height.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundPlane {
    pub y: FloatType,
    pub color_a: [FloatType; 3],
    pub color_b: [FloatType; 3],
}

impl Default for GroundPlane {
    fn default() -> Self {
        GroundPlane {
            y: -1.0,
            color_a: [0.3, 0.3, 0.3],
            color_b: [0.5, 0.5, 0.5],
        }
    }
}

/// Everything the kernel needs besides geometry and the camera.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Environment {
    pub lens: Lens,
    pub light: PointLight,
    pub ground: GroundPlane,
}

impl Environment {
    pub fn validate(&self) -> Result<(), SceneError> {
        check_range("lens aperture", self.lens.aperture, 0.0, FloatType::INFINITY, "non-negative")?;
        check_range(
            "focal distance",
            self.lens.focal_distance,
            FloatType::MIN_POSITIVE,
            FloatType::INFINITY,
            "positive",
        )?;
        check_range(
            "field of view",
            self.lens.fov,
            FloatType::MIN_POSITIVE,
            std::f32::consts::PI,
            "between 0 and pi",
        )?;
        check_finite("light position", &self.light.position)?;
        check_finite("light color", &self.light.color)?;
        check_finite("ground height", &[self.ground.y])?;
        check_finite("ground color", &self.ground.color_a)?;
        check_finite("ground color", &self.ground.color_b)?;
        Ok(())
    }

    pub fn light_position(&self) -> WorldPoint {
        WorldPoint::from(self.light.position)
    }

    pub fn light_color(&self) -> Color {
        let [r, g, b] = self.light.color;
        Color::new(r, g, b)
    }
}
