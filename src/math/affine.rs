use nalgebra::{Point, Rotation3, SMatrix, SVector, Unit};
use tracing::debug;

use super::{Matrix2, Matrix3, Matrix4, Point3, Vector2, Vector3, TOLERANCE};
use crate::error::{GeometryError, TransformError};

/// An affine transform `p -> basis * p + offset` that carries its own
/// inverse basis and determinant.
///
/// The cached fields are derived when the value is built and never mutated
/// afterwards: every constructor fills them in closed form, and new
/// transforms are only obtained through [`Affine::compose`] and
/// [`Affine::invert`]. This keeps long chains of scene transforms free of
/// general matrix inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine<const D: usize> {
    basis: SMatrix<f64, D, D>,
    offset: SVector<f64, D>,
    inverse_basis: SMatrix<f64, D, D>,
    determinant: f64,
}

/// 2D affine transform.
pub type Affine2 = Affine<2>;

/// 3D affine transform.
pub type Affine3 = Affine<3>;

impl<const D: usize> Default for Affine<D> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const D: usize> Affine<D> {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            basis: SMatrix::identity(),
            offset: SVector::zeros(),
            inverse_basis: SMatrix::identity(),
            determinant: 1.0,
        }
    }

    /// A pure translation by `v`.
    #[must_use]
    pub fn translation(v: SVector<f64, D>) -> Self {
        Self {
            offset: v,
            ..Self::identity()
        }
    }

    /// An axis-aligned scaling by the given per-axis factors.
    ///
    /// A zero factor produces a transform with determinant `0`, which
    /// [`Affine::invert`] refuses.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn scaling(factors: SVector<f64, D>) -> Self {
        let inverse = factors.map(|s| if s == 0.0 { 0.0 } else { s.recip() });
        Self {
            basis: SMatrix::from_diagonal(&factors),
            offset: SVector::zeros(),
            inverse_basis: SMatrix::from_diagonal(&inverse),
            determinant: factors.iter().product(),
        }
    }

    /// The linear part.
    #[must_use]
    pub fn basis(&self) -> &SMatrix<f64, D, D> {
        &self.basis
    }

    /// The translation part.
    #[must_use]
    pub fn offset(&self) -> &SVector<f64, D> {
        &self.offset
    }

    /// The cached inverse of [`Affine::basis`].
    #[must_use]
    pub fn inverse_basis(&self) -> &SMatrix<f64, D, D> {
        &self.inverse_basis
    }

    /// The cached determinant of [`Affine::basis`].
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.determinant
    }

    /// Returns the transform that applies `inner` first and then `self`.
    #[must_use]
    pub fn compose(&self, inner: &Self) -> Self {
        Self {
            basis: self.basis * inner.basis,
            offset: self.basis * inner.offset + self.offset,
            inverse_basis: inner.inverse_basis * self.inverse_basis,
            determinant: self.determinant * inner.determinant,
        }
    }

    /// Returns the transform that applies `self` first and then `outer`.
    #[must_use]
    pub fn then(&self, outer: &Self) -> Self {
        outer.compose(self)
    }

    /// Folds a scene-graph path of transforms, outermost first, into one.
    #[must_use]
    pub fn compose_chain<'a>(chain: impl IntoIterator<Item = &'a Self>) -> Self {
        chain
            .into_iter()
            .fold(Self::identity(), |acc, t| acc.compose(t))
    }

    /// Maps a point.
    #[must_use]
    pub fn apply(&self, p: &Point<f64, D>) -> Point<f64, D> {
        Point::from(self.basis * p.coords + self.offset)
    }

    /// Maps a direction; the translation part is ignored.
    #[must_use]
    pub fn apply_vector(&self, v: &SVector<f64, D>) -> SVector<f64, D> {
        self.basis * v
    }

    /// Returns the inverse transform.
    ///
    /// The inverse is read from the cache, so no matrix is inverted here.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Degenerate`] if the determinant is exactly zero.
    #[allow(clippy::float_cmp)]
    pub fn invert(&self) -> Result<Self, TransformError> {
        if self.determinant == 0.0 {
            debug!(determinant = self.determinant, "refusing to invert degenerate transform");
            return Err(self.degenerate());
        }
        Ok(Self {
            basis: self.inverse_basis,
            offset: -(self.inverse_basis * self.offset),
            inverse_basis: self.basis,
            determinant: self.determinant.recip(),
        })
    }

    /// Whether this transform maps every point to itself (within [`TOLERANCE`]).
    #[must_use]
    pub fn is_identity(&self) -> bool {
        (self.basis - SMatrix::<f64, D, D>::identity()).amax() < TOLERANCE
            && self.offset.amax() < TOLERANCE
    }

    /// Whether this transform reverses orientation.
    #[must_use]
    pub fn is_mirroring(&self) -> bool {
        self.determinant < 0.0
    }

    /// Returns the uniform scale factor if the basis is a rotation or
    /// reflection scaled equally along every axis.
    #[must_use]
    pub fn uniform_scale(&self) -> Option<f64> {
        let gram = self.basis.transpose() * self.basis;
        let s2 = gram.trace() / f64::from(u32::try_from(D).ok()?);
        if s2 < TOLERANCE {
            return None;
        }
        let deviation = (gram - SMatrix::<f64, D, D>::identity() * s2).amax();
        (deviation < TOLERANCE * s2.max(1.0)).then_some(s2.sqrt())
    }

    /// Whether the linear part is an orthogonal matrix times a uniform scale.
    #[must_use]
    pub fn is_similarity(&self) -> bool {
        self.uniform_scale().is_some()
    }

    fn degenerate(&self) -> TransformError {
        TransformError::Degenerate {
            determinant: self.determinant,
            basis: self.basis.iter().copied().collect(),
            offset: self.offset.iter().copied().collect(),
        }
    }
}

impl Affine<2> {
    /// A counter-clockwise rotation about the origin by `angle` radians.
    #[must_use]
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let basis = Matrix2::new(c, -s, s, c);
        Self {
            basis,
            offset: Vector2::zeros(),
            inverse_basis: basis.transpose(),
            determinant: 1.0,
        }
    }

    /// A reflection across the line through the origin along `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `axis` has no length.
    pub fn mirror(axis: &Vector2) -> Result<Self, GeometryError> {
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector);
        }
        let d = axis / len;
        let basis = d * d.transpose() * 2.0 - Matrix2::identity();
        Ok(Self {
            basis,
            offset: Vector2::zeros(),
            inverse_basis: basis,
            determinant: -1.0,
        })
    }

    /// Builds a transform from an arbitrary basis, inverting it once.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Degenerate`] if `basis` is singular.
    pub fn from_basis(basis: Matrix2, offset: Vector2) -> Result<Self, TransformError> {
        let mut t = Self {
            basis,
            offset,
            inverse_basis: Matrix2::zeros(),
            determinant: basis.determinant(),
        };
        t.inverse_basis = basis.try_inverse().ok_or_else(|| t.degenerate())?;
        Ok(t)
    }

    /// The equivalent homogeneous 3x3 matrix.
    #[must_use]
    pub fn to_homogeneous(&self) -> Matrix3 {
        let b = &self.basis;
        let o = &self.offset;
        Matrix3::new(
            b[(0, 0)], b[(0, 1)], o.x, //
            b[(1, 0)], b[(1, 1)], o.y, //
            0.0, 0.0, 1.0,
        )
    }
}

impl Affine<3> {
    /// A right-handed rotation by `angle` radians about `axis` through the origin.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `axis` has no length.
    pub fn rotation(axis: &Vector3, angle: f64) -> Result<Self, GeometryError> {
        if axis.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector);
        }
        let basis = Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle).into_inner();
        Ok(Self {
            basis,
            offset: Vector3::zeros(),
            inverse_basis: basis.transpose(),
            determinant: 1.0,
        })
    }

    /// A reflection across the plane through the origin with the given normal.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `normal` has no length.
    pub fn mirror(normal: &Vector3) -> Result<Self, GeometryError> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector);
        }
        let n = normal / len;
        let basis = Matrix3::identity() - n * n.transpose() * 2.0;
        Ok(Self {
            basis,
            offset: Vector3::zeros(),
            inverse_basis: basis,
            determinant: -1.0,
        })
    }

    /// Builds a transform from an arbitrary basis, inverting it once.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Degenerate`] if `basis` is singular.
    pub fn from_basis(basis: Matrix3, offset: Vector3) -> Result<Self, TransformError> {
        let mut t = Self {
            basis,
            offset,
            inverse_basis: Matrix3::zeros(),
            determinant: basis.determinant(),
        };
        t.inverse_basis = basis.try_inverse().ok_or_else(|| t.degenerate())?;
        Ok(t)
    }

    /// The equivalent homogeneous 4x4 matrix.
    #[must_use]
    pub fn to_homogeneous(&self) -> Matrix4 {
        let mut m = Matrix4::identity();
        for r in 0..3 {
            for c in 0..3 {
                m[(r, c)] = self.basis[(r, c)];
            }
            m[(r, 3)] = self.offset[r];
        }
        m
    }

    /// The 2D transform this induces on horizontal cross-sections.
    ///
    /// Returns `None` when x/y depend on z, when z depends on x/y, or when
    /// z is flattened to a single height.
    #[must_use]
    pub fn xy_part(&self) -> Option<Affine2> {
        let b = &self.basis;
        let z_scale = b[(2, 2)];
        let planar = b[(0, 2)].abs() < TOLERANCE
            && b[(1, 2)].abs() < TOLERANCE
            && b[(2, 0)].abs() < TOLERANCE
            && b[(2, 1)].abs() < TOLERANCE;
        if !planar || z_scale.abs() < TOLERANCE {
            return None;
        }
        let inv = &self.inverse_basis;
        Some(Affine2 {
            basis: Matrix2::new(b[(0, 0)], b[(0, 1)], b[(1, 0)], b[(1, 1)]),
            offset: Vector2::new(self.offset.x, self.offset.y),
            inverse_basis: Matrix2::new(inv[(0, 0)], inv[(0, 1)], inv[(1, 0)], inv[(1, 1)]),
            determinant: self.determinant / z_scale,
        })
    }

    /// Maps a slice height through this transform.
    ///
    /// Only meaningful when [`Affine3::xy_part`] returns `Some`.
    #[must_use]
    pub fn map_height(&self, z: f64) -> f64 {
        self.apply(&Point3::new(0.0, 0.0, z)).z
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    fn samples_3d() -> Vec<Affine3> {
        vec![
            Affine3::identity(),
            Affine3::translation(Vector3::new(1.0, -2.0, 3.5)),
            Affine3::scaling(Vector3::new(2.0, 0.5, -3.0)),
            Affine3::rotation(&Vector3::new(1.0, 1.0, 0.0), FRAC_PI_3).unwrap(),
            Affine3::mirror(&Vector3::new(0.0, 1.0, 1.0)).unwrap(),
            Affine3::from_basis(
                Matrix3::new(1.0, 2.0, 0.0, 0.0, 1.0, 3.0, 4.0, 0.0, 1.0),
                Vector3::new(0.5, 0.5, 0.5),
            )
            .unwrap(),
        ]
    }

    fn sample_points() -> Vec<Point3> {
        vec![
            Point3::origin(),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-4.5, 0.25, 10.0),
        ]
    }

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Affine3::identity().apply(&Point3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
        assert!(Affine3::identity().is_identity());
        assert_eq!(Affine3::identity().determinant(), 1.0);
    }

    #[test]
    fn composed_translations_add_up() {
        let a = Affine3::translation(Vector3::new(1.0, 0.0, 0.0));
        let b = Affine3::translation(Vector3::new(0.0, 1.0, 0.0));
        let p = a.compose(&b).apply(&Point3::origin());
        assert_relative_eq!(p, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn compose_applies_inner_first() {
        let scale = Affine2::scaling(Vector2::new(2.0, 2.0));
        let shift = Affine2::translation(Vector2::new(1.0, 0.0));
        let p = Point2::new(1.0, 1.0);
        assert_relative_eq!(scale.compose(&shift).apply(&p), Point2::new(4.0, 2.0));
        assert_relative_eq!(scale.then(&shift).apply(&p), Point2::new(3.0, 2.0));
    }

    #[test]
    fn invert_undoes_apply() {
        for t in samples_3d() {
            let inv = t.invert().unwrap();
            for p in sample_points() {
                assert_relative_eq!(inv.apply(&t.apply(&p)), p, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn cached_inverse_matches_basis() {
        for a in samples_3d() {
            for b in samples_3d() {
                let c = a.compose(&b);
                assert_relative_eq!(
                    c.basis() * c.inverse_basis(),
                    Matrix3::identity(),
                    epsilon = 1e-9
                );
                assert_relative_eq!(c.determinant(), c.basis().determinant(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn composition_is_associative() {
        let ts = samples_3d();
        for a in &ts {
            for b in &ts {
                for c in &ts {
                    let left = a.compose(b).compose(c);
                    let right = a.compose(&b.compose(c));
                    for p in sample_points() {
                        assert_relative_eq!(left.apply(&p), right.apply(&p), epsilon = 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn determinant_is_multiplicative() {
        let ts = samples_3d();
        for a in &ts {
            for b in &ts {
                assert_relative_eq!(
                    a.compose(b).determinant(),
                    a.determinant() * b.determinant(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn zero_scale_cannot_be_inverted() {
        let t = Affine2::scaling(Vector2::new(1.0, 0.0));
        assert_eq!(t.determinant(), 0.0);
        let err = t.invert().unwrap_err();
        let TransformError::Degenerate { basis, offset, .. } = err;
        assert_eq!(basis, vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(offset, vec![0.0, 0.0]);
    }

    #[test]
    fn singular_basis_is_rejected() {
        let r = Affine2::from_basis(Matrix2::new(1.0, 2.0, 2.0, 4.0), Vector2::zeros());
        assert!(matches!(r, Err(TransformError::Degenerate { .. })));
    }

    #[test]
    fn rotation_quarter_turn() {
        let p = Affine2::rotation(FRAC_PI_2).apply(&Point2::new(1.0, 0.0));
        assert_relative_eq!(p, Point2::new(0.0, 1.0), epsilon = 1e-12);

        let r = Affine3::rotation(&Vector3::z(), FRAC_PI_2).unwrap();
        assert_relative_eq!(
            r.apply(&Point3::new(1.0, 0.0, 5.0)),
            Point3::new(0.0, 1.0, 5.0),
            epsilon = 1e-12
        );
        assert!(Affine3::rotation(&Vector3::zeros(), 1.0).is_err());
    }

    #[test]
    fn mirror_reverses_orientation() {
        let m = Affine2::mirror(&Vector2::x()).unwrap();
        assert!(m.is_mirroring());
        assert_relative_eq!(
            m.apply(&Point2::new(2.0, 3.0)),
            Point2::new(2.0, -3.0),
            epsilon = 1e-12
        );
        assert!(m.compose(&m).is_identity());
    }

    #[test]
    fn uniform_scale_detects_similarities() {
        let t = Affine2::rotation(0.3).compose(&Affine2::scaling(Vector2::new(3.0, 3.0)));
        assert_relative_eq!(t.uniform_scale().unwrap(), 3.0, epsilon = 1e-9);
        assert!(Affine2::scaling(Vector2::new(1.0, 2.0)).uniform_scale().is_none());
        assert!(Affine3::mirror(&Vector3::z()).unwrap().is_similarity());
        assert!(!Affine3::scaling(Vector3::new(1.0, 1.0, 0.0)).is_similarity());
    }

    #[test]
    fn homogeneous_matrix_agrees_with_apply() {
        let t = Affine3::translation(Vector3::new(1.0, 2.0, 3.0))
            .compose(&Affine3::rotation(&Vector3::y(), 0.7).unwrap());
        let p = Point3::new(0.5, -1.0, 2.0);
        let h = t.to_homogeneous() * p.to_homogeneous();
        assert_relative_eq!(Point3::from_homogeneous(h).unwrap(), t.apply(&p), epsilon = 1e-12);
    }

    #[test]
    fn xy_part_of_planar_transform() {
        let t = Affine3::translation(Vector3::new(1.0, 2.0, 3.0))
            .compose(&Affine3::rotation(&Vector3::z(), FRAC_PI_2).unwrap())
            .compose(&Affine3::scaling(Vector3::new(2.0, 2.0, 4.0)));
        let xy = t.xy_part().unwrap();
        assert_relative_eq!(
            xy.apply(&Point2::new(1.0, 0.0)),
            Point2::new(1.0, 4.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(xy.determinant(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(xy.basis() * xy.inverse_basis(), Matrix2::identity(), epsilon = 1e-12);
        assert_relative_eq!(t.map_height(1.0), 7.0, epsilon = 1e-12);

        let tilted = Affine3::rotation(&Vector3::x(), 0.2).unwrap();
        assert!(tilted.xy_part().is_none());
    }

    #[test]
    fn chain_folds_outermost_first() {
        let chain = [
            Affine2::translation(Vector2::new(10.0, 0.0)),
            Affine2::scaling(Vector2::new(2.0, 2.0)),
        ];
        let t = Affine2::compose_chain(&chain);
        assert_relative_eq!(t.apply(&Point2::new(1.0, 1.0)), Point2::new(12.0, 2.0));
    }
}
