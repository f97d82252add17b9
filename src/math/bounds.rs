use nalgebra::{Point, SVector};

use super::Affine;

/// An axis-aligned bounding region.
///
/// [`Bounds::empty`] has `min = +inf` and `max = -inf` on every axis, so
/// extending it by a point yields exactly that point. [`Bounds::full`] is
/// the reverse and absorbs everything under [`Bounds::intersect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const D: usize> {
    /// Minimum corner.
    pub min: Point<f64, D>,
    /// Maximum corner.
    pub max: Point<f64, D>,
}

/// 2D bounding region.
pub type Bounds2 = Bounds<2>;

/// 3D bounding region.
pub type Bounds3 = Bounds<3>;

/// 4D bounding region.
pub type Bounds4 = Bounds<4>;

impl<const D: usize> Default for Bounds<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const D: usize> Bounds<D> {
    /// The empty region.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point::from(SVector::from_element(f64::INFINITY)),
            max: Point::from(SVector::from_element(f64::NEG_INFINITY)),
        }
    }

    /// The region covering all of space.
    #[must_use]
    pub fn full() -> Self {
        Self {
            min: Point::from(SVector::from_element(f64::NEG_INFINITY)),
            max: Point::from(SVector::from_element(f64::INFINITY)),
        }
    }

    /// A zero-size region around a single point.
    #[must_use]
    pub fn from_point(p: Point<f64, D>) -> Self {
        Self { min: p, max: p }
    }

    /// The smallest region containing every point; empty for no points.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point<f64, D>>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |b, p| b.extend(p))
    }

    /// Whether `min > max` on any axis.
    ///
    /// This is the canonical emptiness test: an intersection of disjoint
    /// regions is empty without being bit-identical to [`Bounds::empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(self.max.iter()).any(|(lo, hi)| lo > hi)
    }

    /// Returns the region grown to include `p`.
    #[must_use]
    pub fn extend(mut self, p: &Point<f64, D>) -> Self {
        self.extend_mut(p);
        self
    }

    /// Grows the region in place to include `p`.
    pub fn extend_mut(&mut self, p: &Point<f64, D>) {
        self.min = Point::from(self.min.coords.zip_map(&p.coords, f64::min));
        self.max = Point::from(self.max.coords.zip_map(&p.coords, f64::max));
    }

    /// The smallest region containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point::from(self.min.coords.zip_map(&other.min.coords, f64::min)),
            max: Point::from(self.max.coords.zip_map(&other.max.coords, f64::max)),
        }
    }

    /// The region common to both. Check the result with [`Bounds::is_empty`].
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min: Point::from(self.min.coords.zip_map(&other.min.coords, f64::max)),
            max: Point::from(self.max.coords.zip_map(&other.max.coords, f64::min)),
        }
    }

    /// Whether `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: &Point<f64, D>) -> bool {
        (0..D).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    /// Whether the two regions share at least one point.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Extent along each axis; zero for an empty region.
    #[must_use]
    pub fn size(&self) -> SVector<f64, D> {
        if self.is_empty() {
            return SVector::zeros();
        }
        self.max - self.min
    }

    /// Midpoint of the region.
    #[must_use]
    pub fn center(&self) -> Point<f64, D> {
        nalgebra::center(&self.min, &self.max)
    }

    /// The bounds of this region after mapping it through `t`.
    ///
    /// Empty stays empty and an unbounded region becomes [`Bounds::full`].
    #[must_use]
    pub fn transformed(&self, t: &Affine<D>) -> Self {
        if self.is_empty() {
            return *self;
        }
        if self
            .min
            .iter()
            .chain(self.max.iter())
            .any(|v| v.is_infinite())
        {
            return Self::full();
        }
        (0..1usize << D).fold(Self::empty(), |b, mask| {
            let corner = Point::from(SVector::from_fn(|i, _| {
                if (mask >> i) & 1 == 1 {
                    self.max[i]
                } else {
                    self.min[i]
                }
            }));
            b.extend(&t.apply(&corner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Affine2, Point2, Point3, Vector2};
    use approx::assert_relative_eq;

    fn unit_square() -> Bounds2 {
        Bounds2::from_points(&[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)])
    }

    #[test]
    fn extending_empty_yields_the_point() {
        let p = Point3::new(1.0, -2.0, 3.0);
        let b = Bounds3::empty().extend(&p);
        assert_eq!(b.min, p);
        assert_eq!(b.max, p);
        assert!(!b.is_empty());
        assert!(Bounds3::empty().is_empty());
    }

    #[test]
    fn extend_is_idempotent() {
        let p = Point2::new(3.0, -1.0);
        let once = unit_square().extend(&p);
        assert_eq!(once.extend(&p), once);
        assert_eq!(once.min, Point2::new(0.0, -1.0));
        assert_eq!(once.max, Point2::new(3.0, 1.0));
    }

    #[test]
    fn sentinels_are_neutral() {
        let r = unit_square();
        assert_eq!(r.union(&Bounds2::empty()), r);
        assert_eq!(r.intersect(&Bounds2::full()), r);
        assert_eq!(Bounds2::full().union(&r), Bounds2::full());
    }

    #[test]
    fn union_and_intersect_commute() {
        let a = unit_square();
        let b = Bounds2::from_points(&[Point2::new(0.5, -1.0), Point2::new(2.0, 0.5)]);
        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.intersect(&b), b.intersect(&a));
        let i = a.intersect(&b);
        assert_eq!(i.min, Point2::new(0.5, 0.0));
        assert_eq!(i.max, Point2::new(1.0, 0.5));
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = unit_square();
        let b = Bounds2::from_point(Point2::new(5.0, 0.5));
        let i = a.intersect(&b);
        assert!(i.is_empty());
        assert_ne!(i, Bounds2::empty());
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn contains_and_overlaps() {
        let a = unit_square();
        assert!(a.contains(&Point2::new(1.0, 0.0)));
        assert!(!a.contains(&Point2::new(1.0, 1.5)));
        assert!(a.overlaps(&Bounds2::from_point(Point2::new(1.0, 1.0))));
        assert!(!a.overlaps(&Bounds2::empty()));
        assert!(!Bounds2::empty().contains(&Point2::origin()));
    }

    #[test]
    fn size_and_center() {
        let b = Bounds4::empty()
            .extend(&nalgebra::Point4::new(0.0, 0.0, 0.0, 0.0))
            .extend(&nalgebra::Point4::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(b.size(), nalgebra::Vector4::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(b.center(), nalgebra::Point4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(Bounds4::empty().size(), nalgebra::Vector4::zeros());
    }

    #[test]
    fn transformed_covers_rotated_corners() {
        let t = Affine2::rotation(std::f64::consts::FRAC_PI_4)
            .then(&Affine2::translation(Vector2::new(1.0, 0.0)));
        let b = unit_square().transformed(&t);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(b.min, Point2::new(1.0 - h, 0.0), epsilon = 1e-12);
        assert_relative_eq!(b.max, Point2::new(1.0 + h, 2.0 * h), epsilon = 1e-12);
        assert!(Bounds2::empty().transformed(&t).is_empty());
        assert_eq!(Bounds2::full().transformed(&t), Bounds2::full());
    }
}
