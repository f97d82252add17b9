use crate::math::{Affine2, Affine3, Point2, Point3};

/// Opaque provenance token pointing back into the scene description.
///
/// Carried by every point and every shape so a problem found downstream can
/// be reported against the source text that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLoc(Option<usize>);

impl SourceLoc {
    /// No known origin.
    pub const NONE: Self = Self(None);

    /// A location at the given byte offset of the scene source.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self(Some(offset))
    }

    /// The byte offset, if known.
    #[must_use]
    pub const fn offset(self) -> Option<usize> {
        self.0
    }

    /// Whether this token carries an origin.
    #[must_use]
    pub const fn is_known(self) -> bool {
        self.0.is_some()
    }
}

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque colour.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A 2D point tagged with its origin, an optional colour and an aux tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedPoint2 {
    pub coord: Point2,
    pub loc: SourceLoc,
    /// `None` means no colour was assigned.
    pub color: Option<Rgba>,
    pub aux: u32,
}

impl LocatedPoint2 {
    /// Creates an uncoloured point with aux tag `0`.
    #[must_use]
    pub fn new(coord: Point2, loc: SourceLoc) -> Self {
        Self {
            coord,
            loc,
            color: None,
            aux: 0,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_aux(mut self, aux: u32) -> Self {
        self.aux = aux;
        self
    }

    /// Maps the coordinate, keeping every tag.
    #[must_use]
    pub fn transformed(&self, t: &Affine2) -> Self {
        Self {
            coord: t.apply(&self.coord),
            ..*self
        }
    }
}

/// A 3D point tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedPoint3 {
    pub coord: Point3,
    pub loc: SourceLoc,
}

impl LocatedPoint3 {
    #[must_use]
    pub fn new(coord: Point3, loc: SourceLoc) -> Self {
        Self { coord, loc }
    }

    /// Maps the coordinate, keeping the provenance.
    #[must_use]
    pub fn transformed(&self, t: &Affine3) -> Self {
        Self {
            coord: t.apply(&self.coord),
            loc: self.loc,
        }
    }

    /// Drops the height, producing the point as it lands in a cross-section.
    #[must_use]
    pub fn slice_xy(&self) -> LocatedPoint2 {
        LocatedPoint2::new(self.coord.xy(), self.loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vector2, Vector3};

    #[test]
    fn defaults_are_unset() {
        let p = LocatedPoint2::new(Point2::new(1.0, 2.0), SourceLoc::at(17));
        assert_eq!(p.color, None);
        assert_eq!(p.aux, 0);
        assert_eq!(p.loc.offset(), Some(17));
        assert!(!SourceLoc::default().is_known());
    }

    #[test]
    fn transform_keeps_tags() {
        let p = LocatedPoint2::new(Point2::new(1.0, 2.0), SourceLoc::at(3))
            .with_color(Rgba::opaque(255, 0, 0))
            .with_aux(9);
        let q = p.transformed(&Affine2::translation(Vector2::new(1.0, 1.0)));
        assert_eq!(q.coord, Point2::new(2.0, 3.0));
        assert_eq!(q.color, Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(q.aux, 9);
        assert_eq!(q.loc, p.loc);
    }

    #[test]
    fn slicing_a_3d_point_keeps_provenance() {
        let p = LocatedPoint3::new(Point3::new(1.0, 2.0, 3.0), SourceLoc::at(40))
            .transformed(&Affine3::translation(Vector3::new(0.0, 0.0, -3.0)));
        let s = p.slice_xy();
        assert_eq!(s.coord, Point2::new(1.0, 2.0));
        assert_eq!(s.loc, SourceLoc::at(40));
    }
}
