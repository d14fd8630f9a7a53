//! Turning parsed vertex/index lists into scene triangles.

mod obj;
mod worker;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::geometry::{FloatType, Triangle, WorldBox, WorldPoint, WorldVector};
use crate::scene::{MaterialIdx, MeshTriangle, Primitive as _, SceneError};

pub use worker::{ImportRequest, ImportResult, ImportWorker};

/// Indexed triangle mesh as handed over by a parser.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshSource {
    pub positions: Vec<WorldPoint>,
    pub triangles: Vec<Triangle<usize>>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// The imported mesh replaces all existing triangles.
    #[default]
    Replace,
    /// The imported triangles are added to the existing ones.
    Append,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportOptions {
    /// Rescale so that the largest extent of the mesh has this size.
    pub target_size: Option<FloatType>,
    /// Applied after centering (and rescaling).
    pub translate: WorldVector,
    pub mode: ImportMode,
    pub material: MaterialIdx,
}

/// Result of an import, ready to be swapped into a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedMesh {
    pub triangles: Vec<MeshTriangle>,
    /// Triangles left out because of the triangle cap.
    pub dropped: usize,
    /// Bounds of the placed triangles, `None` if there are none.
    pub bounds: Option<WorldBox>,
    pub mode: ImportMode,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    Parse(#[from] wavefront_obj::ParseError),

    #[error("Triangle {triangle} references vertex {index}, but there are only {vertex_count}")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Vertex {0} has a non-finite coordinate")]
    NonFinite(usize),

    #[error("Target size must be positive and finite, got {0}")]
    InvalidTargetSize(FloatType),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Centers the mesh on its bounding box center, optionally rescales it, translates it, and
/// converts it to triangles.
///
/// At most `capacity` triangles are kept, the rest are dropped with a warning.
pub fn import_mesh(
    source: &MeshSource,
    options: &ImportOptions,
    capacity: usize,
) -> Result<ImportedMesh, ImportError> {
    if let Some(target_size) = options.target_size {
        if !(target_size.is_finite() && target_size > 0.0) {
            return Err(ImportError::InvalidTargetSize(target_size));
        }
    }
    validate_source(source)?;

    let kept = source.triangles.len().min(capacity);
    let dropped = source.triangles.len() - kept;
    if dropped > 0 {
        warn!(kept, dropped, "Mesh exceeds the triangle limit, truncating");
    }

    let transform = Placement::new(source, options);
    let triangles = source.triangles[..kept]
        .iter()
        .map(|t| {
            let vertices = t.map(|i| transform.apply(&source.positions[*i]));
            MeshTriangle::new(&vertices, options.material)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut bounds = WorldBox::empty();
    for t in &triangles {
        bounds.grow(&t.bounding_box());
    }

    Ok(ImportedMesh {
        bounds: (!triangles.is_empty()).then_some(bounds),
        triangles,
        dropped,
        mode: options.mode,
    })
}

fn validate_source(source: &MeshSource) -> Result<(), ImportError> {
    let vertex_count = source.positions.len();
    for (triangle, indices) in source.triangles.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|i| **i >= vertex_count) {
            return Err(ImportError::IndexOutOfRange {
                triangle,
                index,
                vertex_count,
            });
        }
    }
    if let Some(vertex) = source
        .positions
        .iter()
        .position(|p| !p.iter().all(|x| x.is_finite()))
    {
        return Err(ImportError::NonFinite(vertex));
    }
    Ok(())
}

/// Uniform scale about the mesh center followed by a translation.
struct Placement {
    center: WorldPoint,
    scale: FloatType,
    translate: WorldVector,
}

impl Placement {
    fn new(source: &MeshSource, options: &ImportOptions) -> Placement {
        let Some(bounds) = WorldBox::from_points(&source.positions) else {
            return Placement {
                center: WorldPoint::origin(),
                scale: 1.0,
                translate: options.translate,
            };
        };

        let max_extent = bounds.extent().max();
        let scale = match options.target_size {
            Some(target_size) if max_extent > 0.0 => target_size / max_extent,
            _ => 1.0,
        };

        Placement {
            center: bounds.center(),
            scale,
            translate: options.translate,
        }
    }

    fn apply(&self, p: &WorldPoint) -> WorldPoint {
        WorldPoint::origin() + (p - self.center) * self.scale + self.translate
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::{assert, let_assert};

    fn options() -> ImportOptions {
        ImportOptions::default()
    }

    /// Axis aligned box corners, two triangles on the bottom face.
    fn box_mesh(min: [f32; 3], max: [f32; 3]) -> MeshSource {
        MeshSource {
            positions: vec![
                WorldPoint::new(min[0], min[1], min[2]),
                WorldPoint::new(max[0], min[1], min[2]),
                WorldPoint::new(max[0], min[1], max[2]),
                WorldPoint::new(min[0], min[1], max[2]),
                WorldPoint::new(min[0], max[1], min[2]),
            ],
            triangles: vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)],
        }
    }

    #[test]
    fn centers_on_bounding_box() {
        let mesh = box_mesh([2.0, 2.0, 2.0], [4.0, 6.0, 4.0]);
        let imported = import_mesh(&mesh, &options(), 100).unwrap();
        assert!(imported.dropped == 0);
        assert!(imported.triangles.len() == 2);
        // Bottom face of the centered box sits at y = -2
        let bounds = imported.bounds.unwrap();
        assert!(bounds.min == WorldPoint::new(-1.0, -2.0, -1.0));
        assert!(bounds.max == WorldPoint::new(1.0, -2.0, 1.0));
    }

    #[test]
    fn rescales_largest_extent_and_translates() {
        let mesh = box_mesh([0.0, 0.0, 0.0], [2.0, 8.0, 4.0]);
        let imported = import_mesh(
            &mesh,
            &ImportOptions {
                target_size: Some(2.0),
                translate: WorldVector::new(0.0, 1.0, -5.0),
                ..options()
            },
            100,
        )
        .unwrap();
        let bounds = imported.bounds.unwrap();
        assert!(bounds.min == WorldPoint::new(-0.25, 0.0, -5.5));
        assert!(bounds.max == WorldPoint::new(0.25, 0.0, -4.5));
    }

    #[test]
    fn flat_point_mesh_is_not_rescaled() {
        let p = WorldPoint::new(3.0, 3.0, 3.0);
        let mesh = MeshSource {
            positions: vec![p, p, p],
            triangles: vec![Triangle::new(0, 1, 2)],
        };
        let imported = import_mesh(
            &mesh,
            &ImportOptions {
                target_size: Some(5.0),
                ..options()
            },
            100,
        )
        .unwrap();
        assert!(imported.triangles[0].origin() == WorldPoint::origin());
    }

    #[test]
    fn truncates_to_whole_triangles() {
        let mesh = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let imported = import_mesh(&mesh, &options(), 1).unwrap();
        assert!(imported.triangles.len() == 1);
        assert!(imported.dropped == 1);

        let imported = import_mesh(&mesh, &options(), 0).unwrap();
        assert!(imported.triangles.is_empty());
        assert!(imported.dropped == 2);
        assert!(imported.bounds.is_none());
    }

    #[test]
    fn bad_index() {
        let mut mesh = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        mesh.triangles.push(Triangle::new(0, 5, 1));
        let_assert!(
            Err(ImportError::IndexOutOfRange {
                triangle: 2,
                index: 5,
                vertex_count: 5
            }) = import_mesh(&mesh, &options(), 100)
        );
    }

    #[test]
    fn non_finite_vertex() {
        let mut mesh = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        mesh.positions[3].y = f32::INFINITY;
        let_assert!(Err(ImportError::NonFinite(3)) = import_mesh(&mesh, &options(), 100));
    }

    #[test]
    fn invalid_target_size() {
        let mesh = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let_assert!(
            Err(ImportError::InvalidTargetSize(_)) = import_mesh(
                &mesh,
                &ImportOptions {
                    target_size: Some(0.0),
                    ..options()
                },
                100
            )
        );
    }

    #[test]
    fn empty_source() {
        let imported = import_mesh(&MeshSource::default(), &options(), 100).unwrap();
        assert!(imported.triangles.is_empty());
        assert!(imported.bounds.is_none());
    }
}
