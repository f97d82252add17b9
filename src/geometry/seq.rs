use std::collections::HashMap;
use std::ptr;

use super::arena::{PointArena, PointRef};
use super::located::LocatedPoint2;
use crate::error::GeometryError;
use crate::math::{Bounds2, Point2};

/// Positional access to 2D coordinates over arbitrary point storage.
///
/// Geometry consumers (clipping, triangulation, offsetting) are written
/// against this trait so the same code runs over a plain coordinate slice,
/// a slice of tagged points, or references into a [`PointArena`]. The trait
/// is object safe, so a `&mut dyn PointSeq` can be handed around where the
/// storage kind is only known at runtime.
pub trait PointSeq {
    /// Number of points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The coordinate at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    fn get(&self, i: usize) -> &Point2;

    /// Mutable access to the coordinate at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    fn nth(&mut self, i: usize) -> &mut Point2;

    /// Position of the coordinate stored at the same address as `point`.
    ///
    /// Identity is by address, not by value: a point with equal coordinates
    /// that lives elsewhere is not found.
    fn index_of(&self, point: &Point2) -> Option<usize>;
}

impl PointSeq for [Point2] {
    fn len(&self) -> usize {
        <[Point2]>::len(self)
    }

    fn get(&self, i: usize) -> &Point2 {
        &self[i]
    }

    fn nth(&mut self, i: usize) -> &mut Point2 {
        &mut self[i]
    }

    fn index_of(&self, point: &Point2) -> Option<usize> {
        slot_of(self, point, |p| p)
    }
}

impl PointSeq for [LocatedPoint2] {
    fn len(&self) -> usize {
        <[LocatedPoint2]>::len(self)
    }

    fn get(&self, i: usize) -> &Point2 {
        &self[i].coord
    }

    fn nth(&mut self, i: usize) -> &mut Point2 {
        &mut self[i].coord
    }

    fn index_of(&self, point: &Point2) -> Option<usize> {
        slot_of(self, point, |p| &p.coord)
    }
}

/// Finds the element whose coordinate lives at `point`'s address in O(1).
fn slot_of<T>(items: &[T], point: &Point2, coord: impl Fn(&T) -> &Point2) -> Option<usize> {
    let first = items.first()?;
    let stride = std::mem::size_of::<T>();
    let base = ptr::from_ref(coord(first)) as usize;
    let delta = (ptr::from_ref(point) as usize).checked_sub(base)?;
    if delta % stride != 0 {
        return None;
    }
    let i = delta / stride;
    items
        .get(i)
        .filter(|&item| ptr::eq(coord(item), point))
        .map(|_| i)
}

/// A sequence of [`PointRef`]s resolved through the arena that owns the points.
///
/// Both handles are borrowed for the lifetime of the view. Every position
/// names a distinct arena point, so `index_of(get(i)) == Some(i)` holds for
/// every `i`. A contour that revisits a point belongs in a
/// [`Polygon`](crate::section::Polygon) index list instead.
#[derive(Debug)]
pub struct SharedPoints<'a> {
    refs: &'a [PointRef],
    arena: &'a mut PointArena,
}

impl<'a> SharedPoints<'a> {
    /// Creates a view over `refs`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::StaleReference`] if a reference no longer
    /// resolves in `arena`, and [`GeometryError::DuplicateReference`] if two
    /// references name the same point.
    pub fn new(refs: &'a [PointRef], arena: &'a mut PointArena) -> Result<Self, GeometryError> {
        let mut seen = HashMap::with_capacity(refs.len());
        for (index, r) in refs.iter().enumerate() {
            if r.resolve(arena).is_none() {
                return Err(GeometryError::StaleReference);
            }
            if let Some(&first) = seen.get(&r.target) {
                return Err(GeometryError::DuplicateReference { first, index });
            }
            seen.insert(r.target, index);
        }
        Ok(Self { refs, arena })
    }

    /// Translates a cross-reference back into its position in this sequence.
    #[must_use]
    pub fn index_of_ref(&self, r: &PointRef) -> Option<usize> {
        self.refs.iter().position(|own| own.target == r.target)
    }

    /// The reference at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[must_use]
    pub fn point_ref(&self, i: usize) -> &PointRef {
        &self.refs[i]
    }
}

impl PointSeq for SharedPoints<'_> {
    fn len(&self) -> usize {
        self.refs.len()
    }

    fn get(&self, i: usize) -> &Point2 {
        &self.arena[self.refs[i].target].coord
    }

    fn nth(&mut self, i: usize) -> &mut Point2 {
        &mut self.arena[self.refs[i].target].coord
    }

    fn index_of(&self, point: &Point2) -> Option<usize> {
        self.refs.iter().position(|r| {
            self.arena
                .get(r.target)
                .is_some_and(|p| ptr::eq(&p.coord, point))
        })
    }
}

/// Bounding region of every point in the sequence.
#[must_use]
pub fn seq_bounds<S: PointSeq + ?Sized>(seq: &S) -> Bounds2 {
    (0..seq.len()).fold(Bounds2::empty(), |b, i| b.extend(seq.get(i)))
}

/// Signed area of the closed contour visiting `contour` positions in order.
///
/// Positive for counter-clockwise, negative for clockwise.
///
/// # Panics
///
/// Panics if any position in `contour` is out of range for `seq`.
#[must_use]
pub fn signed_area<S: PointSeq + ?Sized>(seq: &S, contour: &[usize]) -> f64 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for k in 0..n {
        let a = seq.get(contour[k]);
        let b = seq.get(contour[(k + 1) % n]);
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}
