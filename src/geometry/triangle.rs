use std::ops::{Index, IndexMut};

use super::{FloatType, WorldBox, WorldPoint, WorldVector};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Point> {
        self.0.iter()
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<Point: Default> Default for Triangle<Point> {
    fn default() -> Self {
        Triangle([Default::default(), Default::default(), Default::default()])
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> IndexMut<usize> for Triangle<Point> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<Point> From<[Point; 3]> for Triangle<Point> {
    fn from(value: [Point; 3]) -> Self {
        Triangle(value)
    }
}

impl Triangle<WorldPoint> {
    pub fn centroid(&self) -> WorldPoint {
        WorldPoint::from(self.iter().map(|p| p.coords).sum::<WorldVector>() / 3.0)
    }

    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [WorldVector; 2] {
        [self.0[1] - self.0[0], self.0[2] - self.0[0]]
    }

    /// Returns a normal vector of the triangle, not normalized.
    pub fn normal(&self) -> WorldVector {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }

    pub fn bounding_box(&self) -> WorldBox {
        let mut ret = WorldBox::new(self.0[0], self.0[0]);
        ret.grow_point(&self.0[1]);
        ret.grow_point(&self.0[2]);
        ret
    }

    pub fn area(&self) -> FloatType {
        self.normal().norm() / 2.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    fn sample() -> Triangle<WorldPoint> {
        Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(3.0, 0.0, 0.0),
            WorldPoint::new(0.0, 3.0, 0.0),
        )
    }

    #[test]
    fn centroid_is_vertex_average() {
        assert!(sample().centroid() == WorldPoint::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn edges_start_at_first_vertex() {
        let [e1, e2] = sample().edges();
        assert!(e1 == WorldVector::new(3.0, 0.0, 0.0));
        assert!(e2 == WorldVector::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn normal_follows_winding() {
        let t = sample();
        assert!(t.normal().normalize() == WorldVector::z());
        assert!(t.area() == 4.5);
    }

    #[test]
    fn bounding_box_covers_vertices() {
        let b = sample().bounding_box();
        assert!(b.min == WorldPoint::new(0.0, 0.0, 0.0));
        assert!(b.max == WorldPoint::new(3.0, 3.0, 0.0));
    }
}
