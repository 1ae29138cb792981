//! Geometry primitives.
//!
//! Points are glam's `DVec2`. Boxes are squares described by a center and a
//! half-width, with `y` growing upward so that "north" is `+y`.

use glam::DVec2;

/// A point in the plane.
pub type Point = DVec2;

/// Axis-aligned square box.
///
/// Covers the closed region `[x - h, x + h] × [y - h, y + h]`. The edges are
/// stored rather than recomputed, so quadrants produced by
/// [`AxisAlignedBox::subdivide`] share their edges bit-for-bit with the parent
/// and with each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBox {
    center: Point,
    half_width: f64,
    min: Point,
    max: Point,
}

impl AxisAlignedBox {
    /// Create a box from its center and half-width.
    ///
    /// # Panics
    ///
    /// Panics if `half_width` is not a finite, strictly positive number.
    pub fn new(center: Point, half_width: f64) -> Self {
        assert!(
            half_width.is_finite() && half_width > 0.0,
            "half-width must be finite and positive, got {half_width}"
        );
        assert!(center.is_finite(), "box center must be finite, got {center}");
        let extent = DVec2::splat(half_width);
        Self {
            center,
            half_width,
            min: center - extent,
            max: center + extent,
        }
    }

    /// Quadrant spanning `min..max`, with the half-width taken from the parent.
    #[inline]
    fn quadrant(min: Point, max: Point, half_width: f64) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_width,
            min,
            max,
        }
    }

    /// Create a box from center coordinates and half-width.
    #[inline]
    pub fn from_center(cx: f64, cy: f64, half_width: f64) -> Self {
        Self::new(DVec2::new(cx, cy), half_width)
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Full edge length (twice the half-width).
    #[inline]
    pub fn width(&self) -> f64 {
        self.half_width * 2.0
    }

    /// Lower-left corner.
    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    /// Upper-right corner.
    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    /// Check if a point lies within the box or on its edges.
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Check if a disk lies strictly inside the box.
    ///
    /// A disk touching an edge is not contained.
    #[inline]
    pub fn contains_disk(&self, center: Point, radius: f64) -> bool {
        let (min, max) = (self.min(), self.max());
        center.x - radius > min.x
            && center.x + radius < max.x
            && center.y - radius > min.y
            && center.y + radius < max.y
    }

    /// The four corners, in NW, NE, SW, SE order.
    pub fn corners(&self) -> [Point; 4] {
        let (min, max) = (self.min(), self.max());
        [
            DVec2::new(min.x, max.y),
            DVec2::new(max.x, max.y),
            DVec2::new(min.x, min.y),
            DVec2::new(max.x, min.y),
        ]
    }

    /// Corner probe: true if any corner of `self` lies within `other`.
    ///
    /// This is not a full overlap test. A box crossing `other` without any of
    /// its corners inside (for instance a box larger than `other` on every
    /// side) reports `false`. Use [`AxisAlignedBox::overlaps`] for the exact
    /// answer.
    pub fn intersects(&self, other: &AxisAlignedBox) -> bool {
        self.corners().iter().any(|&corner| other.contains_point(corner))
    }

    /// Exact closed-interval overlap test. Boxes sharing only an edge overlap.
    #[inline]
    pub fn overlaps(&self, other: &AxisAlignedBox) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Split into four equal quadrants in NW, NE, SW, SE order.
    ///
    /// Outer edges are copied from the parent and inner edges all sit on the
    /// parent's center, so every point of the parent lies in some quadrant.
    pub fn subdivide(&self) -> [AxisAlignedBox; 4] {
        let h = self.half_width / 2.0;
        let (min, c, max) = (self.min, self.center, self.max);
        [
            Self::quadrant(DVec2::new(min.x, c.y), DVec2::new(c.x, max.y), h),
            Self::quadrant(c, max, h),
            Self::quadrant(min, c, h),
            Self::quadrant(DVec2::new(c.x, min.y), DVec2::new(max.x, c.y), h),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Quadrant;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn unit_box() -> AxisAlignedBox {
        AxisAlignedBox::from_center(0.5, 0.5, 0.5)
    }

    #[test]
    fn test_contains_point_is_inclusive() {
        let b = unit_box();
        assert!(b.contains_point(DVec2::new(0.5, 0.5)));
        assert!(b.contains_point(DVec2::new(0.0, 0.0)));
        assert!(b.contains_point(DVec2::new(1.0, 0.3)));
        assert!(!b.contains_point(DVec2::new(1.0001, 0.3)));
        assert!(!b.contains_point(DVec2::new(0.3, -0.0001)));
    }

    #[test]
    fn test_contains_disk_is_exclusive() {
        let b = unit_box();
        assert!(b.contains_disk(DVec2::new(0.5, 0.5), 0.1));
        // Touching the right edge.
        assert!(!b.contains_disk(DVec2::new(0.9, 0.5), 0.1));
        // Crossing the bottom edge.
        assert!(!b.contains_disk(DVec2::new(0.5, 0.05), 0.1));
        // Zero radius on the edge is still not strictly inside.
        assert!(!b.contains_disk(DVec2::new(0.0, 0.5), 0.0));
    }

    #[test]
    fn test_corners_order() {
        let c = unit_box().corners();
        assert_eq!(c[0], DVec2::new(0.0, 1.0));
        assert_eq!(c[1], DVec2::new(1.0, 1.0));
        assert_eq!(c[2], DVec2::new(0.0, 0.0));
        assert_eq!(c[3], DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_subdivide_quadrants() {
        let parent = unit_box();
        let [nw, ne, sw, se] = parent.subdivide();

        for q in [nw, ne, sw, se] {
            assert_eq!(q.half_width(), 0.25);
        }
        assert_eq!(nw.center(), DVec2::new(0.25, 0.75));
        assert_eq!(ne.center(), DVec2::new(0.75, 0.75));
        assert_eq!(sw.center(), DVec2::new(0.25, 0.25));
        assert_eq!(se.center(), DVec2::new(0.75, 0.25));

        // Union of quadrants equals the parent.
        let min = nw.min().min(ne.min()).min(sw.min()).min(se.min());
        let max = nw.max().max(ne.max()).max(sw.max()).max(se.max());
        assert_eq!(min, parent.min());
        assert_eq!(max, parent.max());
    }

    #[test]
    fn test_intersects_by_corner() {
        let a = unit_box();
        let b = AxisAlignedBox::from_center(1.0, 1.0, 0.25);
        let far = AxisAlignedBox::from_center(5.0, 5.0, 0.25);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_intersects_misses_enclosing_box() {
        // Known limitation: a box enclosing another has no corner inside it.
        let small = AxisAlignedBox::from_center(0.5, 0.5, 0.1);
        let big = unit_box();
        assert!(!big.intersects(&small));
        assert!(big.overlaps(&small));
    }

    #[test]
    fn test_intersects_is_asymmetric() {
        // The large box's right edge crosses the small one, but none of its
        // corners land inside it.
        let large = AxisAlignedBox::from_center(0.0, 0.0, 1.0);
        let small = AxisAlignedBox::from_center(1.5, 0.0, 0.6);
        assert!(!large.intersects(&small));
        assert!(small.intersects(&large));
        assert!(large.overlaps(&small));
        assert!(small.overlaps(&large));
    }

    #[test]
    fn test_overlaps() {
        let a = unit_box();
        assert!(a.overlaps(&AxisAlignedBox::from_center(1.5, 0.5, 0.5)));
        assert!(!a.overlaps(&AxisAlignedBox::from_center(1.6, 0.5, 0.5)));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_subdivide_covers_non_dyadic_parent() {
        let parent = AxisAlignedBox::from_center(-7.312715117751976, 0.0, 4.237321250949226);
        let children = parent.subdivide();

        let edge = parent.max().x;
        for y in [0.5, -0.5, parent.max().y, parent.min().y] {
            let p = DVec2::new(edge, y);
            assert!(parent.contains_point(p));
            assert!(children.iter().any(|c| c.contains_point(p)), "{p} fits no quadrant");
        }
        assert_eq!(children[Quadrant::NorthEast.index()].max(), parent.max());
        assert_eq!(children[Quadrant::SouthWest.index()].min(), parent.min());
    }

    #[test]
    fn test_subdivide_covers_random_parents() {
        let mut rng = StdRng::seed_from_u64(0xb0c5);
        for _ in 0..500 {
            let center = DVec2::new(rng.random_range(-1e4..1e4), rng.random_range(-1e4..1e4));
            let parent = AxisAlignedBox::new(center, rng.random_range(1e-6..1e3));
            let children = parent.subdivide();
            let (min, max) = (parent.min(), parent.max());

            // Shared inner edges and outer edges inherited from the parent.
            let [nw, ne, sw, se] = children;
            assert_eq!(nw.max().x, ne.min().x);
            assert_eq!(sw.max().x, se.min().x);
            assert_eq!(sw.max().y, nw.min().y);
            assert_eq!(se.max().y, ne.min().y);
            assert_eq!((nw.min().x, nw.max().y), (min.x, max.y));
            assert_eq!(ne.max(), max);
            assert_eq!(sw.min(), min);
            assert_eq!((se.max().x, se.min().y), (max.x, min.y));

            let mut samples: Vec<DVec2> = parent.corners().to_vec();
            for _ in 0..16 {
                let t = rng.random_range(min.x..=max.x);
                let u = rng.random_range(min.y..=max.y);
                samples.extend([
                    DVec2::new(t, min.y),
                    DVec2::new(t, max.y),
                    DVec2::new(min.x, u),
                    DVec2::new(max.x, u),
                    DVec2::new(t, u),
                    DVec2::new(parent.center().x, u),
                    DVec2::new(t, parent.center().y),
                ]);
            }
            for p in samples {
                assert!(parent.contains_point(p));
                assert!(
                    children.iter().any(|c| c.contains_point(p)),
                    "{p} inside {parent:?} fits no quadrant"
                );
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_rejects_non_positive_half_width() {
        let _ = AxisAlignedBox::from_center(0.0, 0.0, 0.0);
    }
}
