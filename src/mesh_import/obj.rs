use std::{fs, path::Path};

use tracing::warn;

use crate::geometry::{Triangle, WorldPoint};

use super::{ImportError, MeshSource};

impl MeshSource {
    pub fn from_obj_file(path: impl AsRef<Path>) -> Result<MeshSource, ImportError> {
        let content = fs::read_to_string(path)?;
        Self::from_obj_str(&content)
    }

    /// Parses Wavefront OBJ text. Only triangle faces are kept, points and lines are skipped.
    pub fn from_obj_str(content: &str) -> Result<MeshSource, ImportError> {
        let parsed = wavefront_obj::obj::parse(content.to_owned())?;
        Ok(Self::from_obj_set(parsed))
    }

    fn from_obj_set(obj: wavefront_obj::obj::ObjSet) -> MeshSource {
        let mut positions = Vec::new();
        let mut triangles = Vec::new();
        let mut skipped = 0usize;

        for o in obj.objects.into_iter() {
            // Vertex indices are local to each object
            let offset = positions.len();
            positions.extend(
                o.vertices
                    .iter()
                    .map(|v| WorldPoint::new(v.x as f32, v.y as f32, v.z as f32)),
            );

            for geometry in o.geometry {
                for shape in geometry.shapes {
                    let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                        skipped += 1;
                        continue;
                    };
                    triangles.push(Triangle::new(offset + a.0, offset + b.0, offset + c.0));
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "Skipped non-triangle OBJ primitives");
        }

        MeshSource {
            positions,
            triangles,
        }
    }
}
