use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::geometry::{FloatType, WorldPoint, WorldVector};
use crate::mesh_import::{ImportMode, ImportOptions};

use super::{
    Color, Environment, GroundPlane, Lens, Material, MaterialKind, PointLight, PrimitiveCatalog,
    Quad, SceneError, Sphere, check_finite, check_range,
};

/// Serialized form of a scene: named materials, tagged primitives, and the viewing setup.
///
/// Every field has a default, so a partial document only overrides what it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub materials: IndexMap<String, MaterialDescription>,
    pub primitives: Vec<PrimitiveDescription>,
    pub camera: CameraPose,
    pub lens: Lens,
    pub point_light: PointLight,
    pub ground: GroundPlane,
    pub meshes: Vec<MeshDescription>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    pub kind: MaterialKind,
    pub diffuse: [FloatType; 3],
    pub reflectivity: FloatType,
    pub ior: FloatType,
    pub emissive: [FloatType; 3],
    pub metallic: FloatType,
    pub roughness: FloatType,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        MaterialDescription {
            kind: MaterialKind::Diffuse,
            diffuse: [0.5, 0.5, 0.5],
            reflectivity: 0.0,
            ior: 1.0,
            emissive: [0.0, 0.0, 0.0],
            metallic: 0.0,
            roughness: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimitiveDescription {
    Sphere {
        center: [FloatType; 3],
        radius: FloatType,
        material: String,
    },
    Quad {
        corner: [FloatType; 3],
        u: [FloatType; 3],
        v: [FloatType; 3],
        material: String,
    },
}

/// Initial camera placement. Angles are in radians.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub position: [FloatType; 3],
    pub yaw: FloatType,
    pub pitch: FloatType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    pub path: PathBuf,
    pub material: String,
    #[serde(default)]
    pub target_size: Option<FloatType>,
    #[serde(default)]
    pub translate: [FloatType; 3],
    #[serde(default)]
    pub mode: ImportMode,
}

/// A mesh file to load once the render context is up.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshReference {
    pub path: PathBuf,
    pub options: ImportOptions,
}

/// Validated scene, ready to be turned into a render context.
#[derive(Clone, Debug)]
pub struct SceneSetup {
    pub catalog: PrimitiveCatalog,
    pub environment: Environment,
    pub camera: CameraPose,
    pub meshes: Vec<MeshReference>,
}

impl SceneDescription {
    pub fn from_json_str(json: &str) -> Result<SceneDescription, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a description from a JSON file.
    /// Relative mesh paths are resolved against the directory of the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<SceneDescription, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut description = Self::from_json_str(&content)?;

        if let Some(base) = path.parent() {
            for mesh in description.meshes.iter_mut() {
                if mesh.path.is_relative() {
                    mesh.path = base.join(&mesh.path);
                }
            }
        }

        Ok(description)
    }

    pub fn validate(&self) -> Result<SceneSetup, SceneError> {
        let mut catalog = PrimitiveCatalog::new();

        for (name, description) in &self.materials {
            catalog.add_material(name.clone(), description.to_material()?);
        }

        for primitive in &self.primitives {
            match primitive {
                PrimitiveDescription::Sphere {
                    center,
                    radius,
                    material,
                } => {
                    let material = catalog.material_index(material)?;
                    catalog.add_sphere(Sphere::new(WorldPoint::from(*center), *radius, material)?)?;
                }
                PrimitiveDescription::Quad {
                    corner,
                    u,
                    v,
                    material,
                } => {
                    let material = catalog.material_index(material)?;
                    catalog.add_quad(Quad::new(
                        WorldPoint::from(*corner),
                        WorldVector::from(*u),
                        WorldVector::from(*v),
                        material,
                    )?)?;
                }
            }
        }

        let environment = Environment {
            lens: self.lens,
            light: self.point_light,
            ground: self.ground,
        };
        environment.validate()?;

        check_finite("camera position", &self.camera.position)?;
        check_finite("camera angles", &[self.camera.yaw, self.camera.pitch])?;

        let meshes = self
            .meshes
            .iter()
            .map(|mesh| {
                if let Some(target_size) = mesh.target_size {
                    check_range(
                        "mesh target size",
                        target_size,
                        FloatType::MIN_POSITIVE,
                        FloatType::INFINITY,
                        "positive",
                    )?;
                }
                check_finite("mesh translation", &mesh.translate)?;
                Ok(MeshReference {
                    path: mesh.path.clone(),
                    options: ImportOptions {
                        target_size: mesh.target_size,
                        translate: WorldVector::from(mesh.translate),
                        mode: mesh.mode,
                        material: catalog.material_index(&mesh.material)?,
                    },
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        Ok(SceneSetup {
            catalog,
            environment,
            camera: self.camera,
            meshes,
        })
    }
}

impl MaterialDescription {
    pub fn to_material(&self) -> Result<Material, SceneError> {
        Material::builder()
            .kind(self.kind)
            .diffuse(color(self.diffuse))
            .reflectivity(self.reflectivity)
            .ior(self.ior)
            .emissive(color(self.emissive))
            .metallic(self.metallic)
            .roughness(self.roughness)
            .build()
    }
}

fn color([r, g, b]: [FloatType; 3]) -> Color {
    Color::new(r, g, b)
}

impl Default for SceneDescription {
    /// The demo scene: three spheres in front of the camera, a floor, a gold square and a light.
    fn default() -> Self {
        let material = |kind, diffuse, reflectivity, ior| MaterialDescription {
            kind,
            diffuse,
            reflectivity,
            ior,
            ..Default::default()
        };
        let materials = IndexMap::from([
            (
                "glass".to_owned(),
                material(MaterialKind::Refractive, [0.1, 0.3, 0.2], 0.9, 1.5),
            ),
            (
                "chrome".to_owned(),
                material(MaterialKind::Mirror, [0.3, 0.3, 0.3], 0.9, 1.0),
            ),
            (
                "red".to_owned(),
                material(MaterialKind::Diffuse, [0.8, 0.1, 0.1], 0.0, 1.0),
            ),
            (
                "floor".to_owned(),
                material(MaterialKind::Diffuse, [0.5, 0.5, 0.5], 0.1, 1.0),
            ),
            (
                "gold".to_owned(),
                material(MaterialKind::Mirror, [1.0, 0.84, 0.0], 0.9, 1.0),
            ),
            (
                "light".to_owned(),
                MaterialDescription {
                    kind: MaterialKind::Emissive,
                    diffuse: [1.0, 1.0, 1.0],
                    emissive: [8.0, 8.0, 8.0],
                    ..Default::default()
                },
            ),
            (
                "mesh".to_owned(),
                material(MaterialKind::Diffuse, [0.7, 0.7, 0.7], 0.0, 1.0),
            ),
        ]);

        let sphere = |center, radius, material: &str| PrimitiveDescription::Sphere {
            center,
            radius,
            material: material.to_owned(),
        };
        let quad = |corner, u, v, material: &str| PrimitiveDescription::Quad {
            corner,
            u,
            v,
            material: material.to_owned(),
        };

        SceneDescription {
            materials,
            primitives: vec![
                sphere([-2.0, -0.2, -5.0], 0.8, "glass"),
                sphere([0.5, 0.0, -6.0], 1.0, "chrome"),
                sphere([3.0, -0.4, -7.0], 0.6, "red"),
                sphere([-1.5, 3.0, -4.0], 0.5, "light"),
                quad(
                    [-10.0, -1.0, -10.0],
                    [20.0, 0.0, 0.0],
                    [0.0, 0.0, 20.0],
                    "floor",
                ),
                quad([1.5, -0.5, -4.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], "gold"),
            ],
            camera: CameraPose::default(),
            lens: Lens::default(),
            point_light: PointLight::default(),
            ground: GroundPlane::default(),
            meshes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::{assert, let_assert};

    #[test]
    fn default_scene_is_valid() {
        let setup = SceneDescription::default().validate().unwrap();
        assert!(setup.catalog.spheres().len() == 4);
        assert!(setup.catalog.quads().len() == 2);
        assert!(setup.catalog.material_count() == 7);
        assert!(setup.meshes.is_empty());

        let glass = setup.catalog.spheres()[0].material();
        let glass = setup.catalog.material(glass).unwrap();
        assert!(glass.kind() == MaterialKind::Refractive);
        assert!(glass.ior() == 1.5);
    }

    #[test]
    fn parse_partial_document() {
        let json = r#"{
            "materials": {
                "white": { "diffuse": [1.0, 1.0, 1.0] },
                "glass": { "kind": "refractive", "ior": 1.33 }
            },
            "primitives": [
                { "kind": "sphere", "center": [0, 0, -3], "radius": 1, "material": "glass" },
                { "kind": "quad", "corner": [0, -1, 0], "u": [1, 0, 0], "v": [0, 0, 1],
                  "material": "white" }
            ],
            "meshes": [
                { "path": "bunny.obj", "material": "white", "target_size": 2.0 }
            ]
        }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        assert!(description.lens == Lens::default());

        let setup = description.validate().unwrap();
        assert!(setup.catalog.spheres().len() == 1);
        assert!(setup.catalog.quads().len() == 1);
        let_assert!([mesh] = setup.meshes.as_slice());
        assert!(mesh.options.target_size == Some(2.0));
        assert!(mesh.options.mode == ImportMode::Replace);
        assert!(mesh.options.material.index() == 0);
    }

    #[test]
    fn unknown_primitive_kind_fails_to_parse() {
        let json = r#"{ "primitives": [ { "kind": "torus", "material": "x" } ] }"#;
        let_assert!(Err(ConfigError::Parse(_)) = SceneDescription::from_json_str(json));
    }

    #[test]
    fn unknown_material() {
        let mut description = SceneDescription::default();
        description.primitives.push(PrimitiveDescription::Sphere {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            material: "unobtainium".to_owned(),
        });
        let_assert!(Err(SceneError::UnknownMaterial(name)) = description.validate());
        assert!(name == "unobtainium");
    }

    #[test]
    fn non_positive_radius() {
        let mut description = SceneDescription::default();
        description.primitives.push(PrimitiveDescription::Sphere {
            center: [0.0, 0.0, 0.0],
            radius: -1.0,
            material: "red".to_owned(),
        });
        let_assert!(Err(SceneError::OutOfRange { what, .. }) = description.validate());
        assert!(what == "sphere radius");
    }

    #[test]
    fn invalid_material_values() {
        let mut description = SceneDescription::default();
        description.materials.insert(
            "bad".to_owned(),
            MaterialDescription {
                reflectivity: 1.5,
                ..Default::default()
            },
        );
        let_assert!(Err(SceneError::OutOfRange { what, .. }) = description.validate());
        assert!(what == "reflectivity");
    }

    #[test]
    fn json_round_trip_of_default() {
        let description = SceneDescription::default();
        let json = serde_json::to_string(&description).unwrap();
        let parsed = SceneDescription::from_json_str(&json).unwrap();
        assert!(parsed == description);
    }
}
