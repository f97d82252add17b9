use std::collections::HashMap;

use crate::error::GeometryError;
use crate::geometry::{seq_bounds, signed_area, LocatedPoint2, PointArena, PointRef, SourceLoc};
use crate::math::{Affine2, Bounds2, TOLERANCE};

/// Winding direction of a closed contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    /// Zero enclosed area (fewer than three points, or collinear).
    Degenerate,
}

/// A set of closed contours over one shared point list.
///
/// Each contour is an ordered list of positions into [`Polygon::points`].
/// Point storage keeps insertion order exactly. No winding convention is
/// imposed here: consumers that need one check [`Polygon::orientation`] and
/// call [`Polygon::reverse_contour`], which only reorders the contour's
/// index list and never touches the stored points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    points: Vec<LocatedPoint2>,
    contours: Vec<Vec<usize>>,
    loc: SourceLoc,
}

impl Polygon {
    /// Creates an empty polygon.
    #[must_use]
    pub fn new(loc: SourceLoc) -> Self {
        Self {
            points: Vec::new(),
            contours: Vec::new(),
            loc,
        }
    }

    /// Creates a polygon with a single contour through `points` in order.
    #[must_use]
    pub fn from_contour(points: impl IntoIterator<Item = LocatedPoint2>, loc: SourceLoc) -> Self {
        let points: Vec<LocatedPoint2> = points.into_iter().collect();
        let contour = (0..points.len()).collect();
        Self {
            points,
            contours: vec![contour],
            loc,
        }
    }

    /// Builds a single-contour polygon from points owned by `arena`.
    ///
    /// The referenced points are copied into the polygon so the result does
    /// not borrow the arena. A point named twice is stored once and both
    /// contour positions refer to it. Each stored point takes the
    /// reference's location when it has one.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::StaleReference`] if a reference no longer
    /// resolves in `arena`.
    pub fn from_refs(
        arena: &PointArena,
        refs: &[PointRef],
        loc: SourceLoc,
    ) -> Result<Self, GeometryError> {
        let mut poly = Self::new(loc);
        let mut seen = HashMap::with_capacity(refs.len());
        let mut contour = Vec::with_capacity(refs.len());
        for r in refs {
            let p = r.resolve(arena).ok_or(GeometryError::StaleReference)?;
            let idx = *seen.entry(r.target).or_insert_with(|| {
                let mut copy = *p;
                if r.loc.is_known() {
                    copy.loc = r.loc;
                }
                poly.add_point(copy)
            });
            contour.push(idx);
        }
        poly.contours.push(contour);
        Ok(poly)
    }

    /// Appends a point and returns its position.
    pub fn add_point(&mut self, point: LocatedPoint2) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Appends a contour and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::IndexOutOfRange`] if any index does not name
    /// a stored point; the polygon is left unchanged.
    pub fn add_contour(&mut self, indices: Vec<usize>) -> Result<usize, GeometryError> {
        let len = self.points.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(GeometryError::IndexOutOfRange { index, len });
        }
        self.contours.push(indices);
        Ok(self.contours.len() - 1)
    }

    #[must_use]
    pub fn points(&self) -> &[LocatedPoint2] {
        &self.points
    }

    /// Mutable access to the stored points.
    ///
    /// A slice cannot grow or shrink, so contour indices stay valid. It
    /// implements [`PointSeq`](crate::geometry::PointSeq) for algorithms that
    /// only need coordinates.
    pub fn points_mut(&mut self) -> &mut [LocatedPoint2] {
        &mut self.points
    }

    #[must_use]
    pub fn contours(&self) -> &[Vec<usize>] {
        &self.contours
    }

    /// The points of contour `i` in contour order.
    pub fn contour_points(&self, i: usize) -> impl Iterator<Item = &LocatedPoint2> + '_ {
        self.contours
            .get(i)
            .into_iter()
            .flatten()
            .map(|&idx| &self.points[idx])
    }

    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        self.loc
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding region of the stored points.
    #[must_use]
    pub fn bounds(&self) -> Bounds2 {
        seq_bounds(self.points.as_slice())
    }

    /// Signed area of contour `i`, positive when counter-clockwise.
    #[must_use]
    pub fn contour_area(&self, i: usize) -> Option<f64> {
        self.contours
            .get(i)
            .map(|c| signed_area(self.points.as_slice(), c))
    }

    /// Winding direction of contour `i`.
    #[must_use]
    pub fn orientation(&self, i: usize) -> Option<Orientation> {
        self.contour_area(i).map(|area| {
            if area > TOLERANCE {
                Orientation::CounterClockwise
            } else if area < -TOLERANCE {
                Orientation::Clockwise
            } else {
                Orientation::Degenerate
            }
        })
    }

    /// Reverses the visiting order of contour `i`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::IndexOutOfRange`] if there is no contour `i`.
    pub fn reverse_contour(&mut self, i: usize) -> Result<(), GeometryError> {
        let len = self.contours.len();
        let contour = self
            .contours
            .get_mut(i)
            .ok_or(GeometryError::IndexOutOfRange { index: i, len })?;
        contour.reverse();
        Ok(())
    }

    /// Maps every point through `t` in place.
    ///
    /// Contour order is kept, so a mirroring transform flips every contour's
    /// orientation.
    pub fn transform(&mut self, t: &Affine2) {
        for p in &mut self.points {
            p.coord = t.apply(&p.coord);
        }
    }
}
