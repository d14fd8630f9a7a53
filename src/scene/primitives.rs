use crate::geometry::{EPSILON, FloatType, Triangle, WorldBox, WorldPoint, WorldVector};

use super::{MaterialIdx, Primitive, SceneError, check_finite};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    center: WorldPoint,
    radius: FloatType,
    material: MaterialIdx,
}

impl Sphere {
    pub fn new(
        center: WorldPoint,
        radius: FloatType,
        material: MaterialIdx,
    ) -> Result<Sphere, SceneError> {
        check_finite("sphere center", center.coords.as_slice())?;
        check_finite("sphere radius", &[radius])?;
        if radius <= 0.0 {
            return Err(SceneError::OutOfRange {
                what: "sphere radius",
                value: radius,
                expected: "positive",
            });
        }
        Ok(Sphere {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }

    pub fn material(&self) -> MaterialIdx {
        self.material
    }
}

impl Primitive for Sphere {
    fn bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox::new(self.center - r_vec, self.center + r_vec)
    }

    fn centroid(&self) -> WorldPoint {
        self.center
    }
}

/// Parallelogram spanned by two edge vectors from a corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    corner: WorldPoint,
    u: WorldVector,
    v: WorldVector,
    material: MaterialIdx,
}

impl Quad {
    pub fn new(
        corner: WorldPoint,
        u: WorldVector,
        v: WorldVector,
        material: MaterialIdx,
    ) -> Result<Quad, SceneError> {
        check_finite("quad corner", corner.coords.as_slice())?;
        check_finite("quad edge u", u.as_slice())?;
        check_finite("quad edge v", v.as_slice())?;
        if u.cross(&v).norm() <= EPSILON {
            return Err(SceneError::DegenerateQuad);
        }
        Ok(Quad {
            corner,
            u,
            v,
            material,
        })
    }

    pub fn corner(&self) -> WorldPoint {
        self.corner
    }

    pub fn u(&self) -> WorldVector {
        self.u
    }

    pub fn v(&self) -> WorldVector {
        self.v
    }

    pub fn material(&self) -> MaterialIdx {
        self.material
    }

    pub fn normal(&self) -> WorldVector {
        self.u.cross(&self.v).normalize()
    }

    pub fn corners(&self) -> [WorldPoint; 4] {
        [
            self.corner,
            self.corner + self.u,
            self.corner + self.v,
            self.corner + self.u + self.v,
        ]
    }
}

impl Primitive for Quad {
    fn bounding_box(&self) -> WorldBox {
        let corners = self.corners();
        let mut ret = WorldBox::new(corners[0], corners[0]);
        for corner in &corners[1..] {
            ret.grow_point(corner);
        }
        ret
    }
}

/// Triangle stored as an origin and two edges, the form the kernel intersects against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshTriangle {
    origin: WorldPoint,
    edge1: WorldVector,
    edge2: WorldVector,
    material: MaterialIdx,
}

impl MeshTriangle {
    pub fn new(
        vertices: &Triangle<WorldPoint>,
        material: MaterialIdx,
    ) -> Result<MeshTriangle, SceneError> {
        for vertex in vertices.iter() {
            check_finite("triangle vertex", vertex.coords.as_slice())?;
        }
        let [edge1, edge2] = vertices.edges();
        Ok(MeshTriangle {
            origin: vertices[0],
            edge1,
            edge2,
            material,
        })
    }

    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    pub fn edge1(&self) -> WorldVector {
        self.edge1
    }

    pub fn edge2(&self) -> WorldVector {
        self.edge2
    }

    pub fn material(&self) -> MaterialIdx {
        self.material
    }

    pub fn vertices(&self) -> Triangle<WorldPoint> {
        Triangle::new(
            self.origin,
            self.origin + self.edge1,
            self.origin + self.edge2,
        )
    }

    /// Unit normal, zero for degenerate triangles.
    pub fn normal(&self) -> WorldVector {
        self.edge1
            .cross(&self.edge2)
            .try_normalize(0.0)
            .unwrap_or_else(WorldVector::zeros)
    }
}

impl Primitive for MeshTriangle {
    fn bounding_box(&self) -> WorldBox {
        self.vertices().bounding_box()
    }

    fn centroid(&self) -> WorldPoint {
        self.vertices().centroid()
    }
}
