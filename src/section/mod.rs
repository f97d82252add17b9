mod circle;
mod params;
mod polygon;
mod stack;

pub use circle::Circle;
pub use params::SegmentParams;
pub use polygon::{Orientation, Polygon};
pub use stack::{LayerStack, Layers};

use crate::error::GeometryError;
use crate::geometry::SourceLoc;
use crate::math::{Affine2, Bounds2};

/// Turns circles into polygons.
///
/// Cross-sections only classify and store circles; whichever stage needs
/// polygon data supplies the tessellation.
pub trait Tessellate {
    fn tessellate(&self, circle: &Circle) -> Polygon;
}

/// Which shape a [`CrossSection`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Polygon,
    Circle,
}

/// One 2D shape of a sliced solid.
#[derive(Debug, Clone, PartialEq)]
pub enum CrossSection {
    Polygon(Polygon),
    Circle(Circle),
}

impl CrossSection {
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Polygon(_) => SectionKind::Polygon,
            Self::Circle(_) => SectionKind::Circle,
        }
    }

    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::Polygon(p) => p.loc(),
            Self::Circle(c) => c.loc(),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds2 {
        match self {
            Self::Polygon(p) => p.bounds(),
            Self::Circle(c) => c.bounds(),
        }
    }

    #[must_use]
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Self::Polygon(p) => Some(p),
            Self::Circle(_) => None,
        }
    }

    #[must_use]
    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Self::Circle(c) => Some(c),
            Self::Polygon(_) => None,
        }
    }

    /// Maps the shape through `t`.
    ///
    /// # Errors
    ///
    /// Returns an error for a circle under a transform that is not a
    /// similarity; the shape is left unchanged.
    pub fn transform(&mut self, t: &Affine2) -> Result<(), GeometryError> {
        match self {
            Self::Polygon(p) => p.transform(t),
            Self::Circle(c) => *c = c.transformed(t)?,
        }
        Ok(())
    }

    /// Returns polygon data, tessellating a circle with `tess`.
    #[must_use]
    pub fn into_polygon<T: Tessellate + ?Sized>(self, tess: &T) -> Polygon {
        match self {
            Self::Polygon(p) => p,
            Self::Circle(c) => tess.tessellate(&c),
        }
    }
}

impl From<Polygon> for CrossSection {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<Circle> for CrossSection {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::LocatedPoint2;
    use crate::math::{Point2, Vector2};
    use std::f64::consts::TAU;

    /// Regular polygon with the circle's suggested fragment count.
    struct Fragments;

    impl Tessellate for Fragments {
        fn tessellate(&self, circle: &Circle) -> Polygon {
            let n = circle.segments();
            let points = (0..n).map(|i| {
                let a = TAU * f64::from(i) / f64::from(n);
                let p = circle.center() + Vector2::new(a.cos(), a.sin()) * circle.radius();
                LocatedPoint2::new(p, circle.loc())
            });
            Polygon::from_contour(points, circle.loc())
        }
    }

    #[test]
    fn kinds_and_provenance() {
        let c: CrossSection = Circle::new(Point2::origin(), 1.0, SourceLoc::at(3)).unwrap().into();
        let p: CrossSection = Polygon::new(SourceLoc::at(4)).into();
        assert_eq!(c.kind(), SectionKind::Circle);
        assert_eq!(p.kind(), SectionKind::Polygon);
        assert_eq!(c.loc(), SourceLoc::at(3));
        assert_eq!(p.loc(), SourceLoc::at(4));
        assert!(c.as_polygon().is_none());
        assert!(p.as_circle().is_none());
    }

    #[test]
    fn circle_is_normalized_by_the_tessellator() {
        let c = Circle::new(Point2::new(1.0, 1.0), 10.0, SourceLoc::at(2)).unwrap();
        let poly = CrossSection::from(c.clone()).into_polygon(&Fragments);
        assert_eq!(poly.points().len(), c.segments() as usize);
        assert_eq!(poly.orientation(0), Some(Orientation::CounterClockwise));
        assert!(poly.points().iter().all(|p| p.loc == SourceLoc::at(2)));
        assert!(c.bounds().contains(&poly.points()[7].coord));
    }

    #[test]
    fn failed_transform_leaves_circle_unchanged() {
        let mut s: CrossSection = Circle::new(Point2::origin(), 1.0, SourceLoc::NONE)
            .unwrap()
            .into();
        let before = s.clone();
        assert!(s.transform(&Affine2::scaling(Vector2::new(2.0, 1.0))).is_err());
        assert_eq!(s, before);
        s.transform(&Affine2::translation(Vector2::new(1.0, 0.0))).unwrap();
        assert_eq!(*s.as_circle().unwrap().center(), Point2::new(1.0, 0.0));
    }
}
