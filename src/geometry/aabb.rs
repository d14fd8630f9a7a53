use std::ops::Sub;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, Point, Scalar};
use num_traits::One;

use super::{FloatType, WorldBox, WorldPoint, WorldVector};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> AABB<Point2> {
        AABB {
            min: f(&self.min),
            max: f(&self.max),
        }
    }

    pub fn zip_map<Point2, Point3, F: FnMut(&Point, &Point2) -> Point3>(
        &self,
        rhs: &AABB<Point2>,
        mut f: F,
    ) -> AABB<Point3> {
        AABB {
            min: f(&self.min, &rhs.min),
            max: f(&self.max, &rhs.max),
        }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> AABB<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl<Point> From<[Point; 2]> for AABB<Point> {
    fn from(value: [Point; 2]) -> Self {
        let [min, max] = value;
        AABB { min, max }
    }
}

impl<Point> From<(Point, Point)> for AABB<Point> {
    fn from(value: (Point, Point)) -> Self {
        let (min, max) = value;
        AABB { min, max }
    }
}

impl WorldBox {
    /// Box that contains nothing; growing it by anything yields that thing's bounds.
    /// Min is +infinity and max is -infinity on every axis.
    pub fn empty() -> WorldBox {
        AABB {
            min: WorldPoint::new(FloatType::INFINITY, FloatType::INFINITY, FloatType::INFINITY),
            max: WorldPoint::new(
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
            ),
        }
    }

    /// Smallest box containing all the points, `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<WorldBox> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut ret = AABB::new(first, first);
        for p in points {
            ret.grow_point(p);
        }
        Some(ret)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn grow_point(&mut self, p: &WorldPoint) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn grow(&mut self, other: &WorldBox) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    pub fn union(&self, other: &WorldBox) -> WorldBox {
        let mut ret = self.clone();
        ret.grow(other);
        ret
    }

    /// Per-axis size of the box.
    pub fn extent(&self) -> WorldVector {
        self.max - self.min
    }

    /// Index of the axis with the largest extent.
    /// Ties resolve to the lower axis (X before Y before Z).
    pub fn longest_axis(&self) -> usize {
        let extent = self.extent();
        let mut axis = 0;
        for candidate in 1..3 {
            if extent[candidate] > extent[axis] {
                axis = candidate;
            }
        }
        axis
    }

    pub fn contains_point(&self, p: &WorldPoint) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    pub fn contains_box(&self, other: &WorldBox) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::test::WorldPointWrapper;
    use assert2::assert;
    use test_case::test_case;
    use test_strategy::proptest;

    #[proptest]
    fn from_points_contains_all(points: Vec<WorldPointWrapper>) {
        let points: Vec<WorldPoint> = points.into_iter().map(|p| *p).collect();
        match WorldBox::from_points(&points) {
            None => assert!(points.is_empty()),
            Some(b) => {
                assert!(points.iter().all(|p| b.contains_point(p)));
                assert!(points.iter().any(|p| p.x == b.min.x));
                assert!(points.iter().any(|p| p.z == b.max.z));
            }
        }
    }

    #[test]
    fn empty_box_grows_to_point() {
        let mut b = WorldBox::empty();
        assert!(b.is_empty());
        b.grow_point(&WorldPoint::new(1.0, -2.0, 3.0));
        assert!(!b.is_empty());
        assert!(b.min == WorldPoint::new(1.0, -2.0, 3.0));
        assert!(b.max == WorldPoint::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn from_points_is_tight() {
        let points = [
            WorldPoint::new(0.0, 5.0, -1.0),
            WorldPoint::new(2.0, -1.0, 0.5),
            WorldPoint::new(1.0, 1.0, 4.0),
        ];
        let b = WorldBox::from_points(&points).unwrap();
        assert!(b.min == WorldPoint::new(0.0, -1.0, -1.0));
        assert!(b.max == WorldPoint::new(2.0, 5.0, 4.0));
        assert!(b.center() == WorldPoint::new(1.0, 2.0, 1.5));
    }

    #[test]
    fn from_no_points() {
        assert!(WorldBox::from_points(std::iter::empty()).is_none());
    }

    #[test_case([1.0, 1.0, 1.0], 0; "all equal picks x")]
    #[test_case([1.0, 2.0, 2.0], 1; "y and z tie picks y")]
    #[test_case([3.0, 1.0, 3.0], 0; "x and z tie picks x")]
    #[test_case([0.0, 0.0, 0.5], 2; "z strictly largest")]
    #[test_case([0.0, 0.1, 0.0], 1; "y strictly largest")]
    fn longest_axis_tie_breaking(size: [f32; 3], expected: usize) {
        let b = WorldBox::new(WorldPoint::origin(), WorldPoint::from(size));
        assert!(b.longest_axis() == expected);
    }

    #[test]
    fn union_contains_both() {
        let a = WorldBox::new(WorldPoint::new(0.0, 0.0, 0.0), WorldPoint::new(1.0, 1.0, 1.0));
        let b = WorldBox::new(WorldPoint::new(-1.0, 0.5, 0.5), WorldPoint::new(0.5, 2.0, 0.7));
        let u = a.union(&b);
        assert!(u.contains_box(&a));
        assert!(u.contains_box(&b));
        assert!(u.union(&WorldBox::empty()) == u);
    }
}
