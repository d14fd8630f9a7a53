use bon::bon;
use serde::{Deserialize, Serialize};

use crate::geometry::FloatType;

use super::{SceneError, check_finite, check_range};

pub type Color = rgb::RGB<FloatType>;

index_vec::define_index_type! {
    #[derive(Default)]
    pub struct MaterialIdx = u32;
}

/// Shading model selector, the discriminant is the tag the kernel switches on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Diffuse = 0,
    Mirror = 1,
    Refractive = 2,
    Emissive = 3,
    MetallicRoughness = 4,
}

impl MaterialKind {
    pub fn tag(self) -> i32 {
        self as i32
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    diffuse: Color,
    reflectivity: FloatType,
    ior: FloatType,
    kind: MaterialKind,
    emissive: Color,
    metallic: FloatType,
    roughness: FloatType,
}

#[bon]
impl Material {
    #[builder]
    pub fn new(
        diffuse: Color,
        #[builder(default)] reflectivity: FloatType,
        #[builder(default = 1.0)] ior: FloatType,
        #[builder(default)] kind: MaterialKind,
        #[builder(default = Color::new(0.0, 0.0, 0.0))] emissive: Color,
        #[builder(default)] metallic: FloatType,
        #[builder(default)] roughness: FloatType,
    ) -> Result<Material, SceneError> {
        check_color("diffuse color", &diffuse)?;
        check_color("emissive color", &emissive)?;
        check_range("reflectivity", reflectivity, 0.0, 1.0, "0 to 1")?;
        check_range("index of refraction", ior, 1.0, FloatType::INFINITY, "at least 1")?;
        check_range("metallic", metallic, 0.0, 1.0, "0 to 1")?;
        check_range("roughness", roughness, 0.0, 1.0, "0 to 1")?;

        Ok(Material {
            diffuse,
            reflectivity,
            ior,
            kind,
            emissive,
            metallic,
            roughness,
        })
    }
}

impl Material {
    pub fn diffuse(&self) -> Color {
        self.diffuse
    }

    pub fn reflectivity(&self) -> FloatType {
        self.reflectivity
    }

    pub fn ior(&self) -> FloatType {
        self.ior
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    pub fn emissive(&self) -> Color {
        self.emissive
    }

    pub fn metallic(&self) -> FloatType {
        self.metallic
    }

    pub fn roughness(&self) -> FloatType {
        self.roughness
    }
}

/// Colors are unbounded above (HDR), but never negative.
fn check_color(what: &'static str, color: &Color) -> Result<(), SceneError> {
    check_finite(what, &[color.r, color.g, color.b])?;
    for channel in [color.r, color.g, color.b] {
        if channel < 0.0 {
            return Err(SceneError::OutOfRange {
                what,
                value: channel,
                expected: "non-negative channels",
            });
        }
    }
    Ok(())
}
