mod catalog;
mod description;
mod environment;
mod material;
pub mod primitives;
mod triangle_geometry;

use thiserror::Error;

use crate::geometry::{FloatType, WorldBox, WorldPoint};

pub use catalog::PrimitiveCatalog;
pub use description::{
    CameraPose, MaterialDescription, MeshDescription, MeshReference, PrimitiveDescription,
    SceneDescription, SceneSetup,
};
pub use environment::{Environment, GroundPlane, Lens, PointLight};
pub use material::{Color, Material, MaterialIdx, MaterialKind};
pub use primitives::{MeshTriangle, Quad, Sphere};
pub use triangle_geometry::{ImportSummary, Scene, TriangleGeometry};

/// Anything that can be placed into a bounding volume hierarchy.
pub trait Primitive {
    fn bounding_box(&self) -> WorldBox;

    /// Representative point used for partitioning.
    fn centroid(&self) -> WorldPoint {
        self.bounding_box().center()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("{what} is {value}, expected {expected}")]
    OutOfRange {
        what: &'static str,
        value: FloatType,
        expected: &'static str,
    },

    #[error("Unknown material `{0}`")]
    UnknownMaterial(String),

    #[error("Material index {0} is not in the catalog")]
    MissingMaterial(usize),

    #[error("Quad edges are parallel or zero length")]
    DegenerateQuad,
}

pub(crate) fn check_finite(what: &'static str, values: &[FloatType]) -> Result<(), SceneError> {
    if values.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(SceneError::NonFinite { what })
    }
}

pub(crate) fn check_range(
    what: &'static str,
    value: FloatType,
    min: FloatType,
    max: FloatType,
    expected: &'static str,
) -> Result<(), SceneError> {
    check_finite(what, &[value])?;
    if value < min || value > max {
        Err(SceneError::OutOfRange {
            what,
            value,
            expected,
        })
    } else {
        Ok(())
    }
}
