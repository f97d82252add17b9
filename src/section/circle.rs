use crate::error::GeometryError;
use crate::geometry::SourceLoc;
use crate::math::{Affine2, Bounds2, Point2, Vector2, TOLERANCE};

use super::SegmentParams;

/// A full circle in a cross-section.
///
/// Circles are stored as-is; turning one into a polygon is left to a
/// [`Tessellate`](super::Tessellate) implementation, which may use
/// [`Circle::segments`] as its resolution hint.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
    segments: u32,
    loc: SourceLoc,
}

impl Circle {
    /// Creates a circle with the default resolution hint.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not a finite positive number.
    pub fn new(center: Point2, radius: f64, loc: SourceLoc) -> Result<Self, GeometryError> {
        Self::with_params(center, radius, &SegmentParams::default(), loc)
    }

    /// Creates a circle whose resolution hint follows `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not a finite positive number.
    pub fn with_params(
        center: Point2,
        radius: f64,
        params: &SegmentParams,
        loc: SourceLoc,
    ) -> Result<Self, GeometryError> {
        check_radius(radius)?;
        Ok(Self {
            center,
            radius,
            segments: params.segments(radius),
            loc,
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Suggested fragment count for tessellation.
    #[must_use]
    pub fn segments(&self) -> u32 {
        self.segments
    }

    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        self.loc
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds2 {
        let r = Vector2::repeat(self.radius);
        Bounds2 {
            min: self.center - r,
            max: self.center + r,
        }
    }

    /// Maps the circle through `t`.
    ///
    /// The resolution hint is kept as it was computed for the untransformed
    /// radius, so scaling a shape does not change its fragment count.
    ///
    /// # Errors
    ///
    /// Returns an error unless `t` scales every direction equally, since
    /// anything else would turn the circle into an ellipse, or if the scaled
    /// radius is no longer a valid radius.
    pub fn transformed(&self, t: &Affine2) -> Result<Self, GeometryError> {
        let scale = t.uniform_scale().ok_or_else(|| {
            GeometryError::Degenerate("circle requires a similarity transform".into())
        })?;
        let radius = self.radius * scale;
        check_radius(radius)?;
        Ok(Self {
            center: t.apply(&self.center),
            radius,
            ..self.clone()
        })
    }
}

fn check_radius(radius: f64) -> Result<(), GeometryError> {
    if !radius.is_finite() || radius < TOLERANCE {
        return Err(GeometryError::Degenerate(
            "circle radius must be positive".into(),
        ));
    }
    Ok(())
}
