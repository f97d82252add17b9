use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use tracing::{debug, trace};

use super::CrossSection;
use crate::error::{GeometryError, LayerError, Result};
use crate::geometry::SourceLoc;
use crate::math::{Affine2, Affine3, Bounds3, Point3};

/// A solid sliced into cross-sections at strictly increasing heights.
///
/// This is the hand-off format between 3D evaluation and 2D polygon
/// processing. No two layers share a height, and iteration always runs from
/// the lowest layer to the highest. Every mutating operation either
/// succeeds completely or leaves the stack as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<(f64, CrossSection)>,
    loc: SourceLoc,
}

impl LayerStack {
    /// Creates an empty stack for the solid at `loc`.
    #[must_use]
    pub fn new(loc: SourceLoc) -> Self {
        Self {
            layers: Vec::new(),
            loc,
        }
    }

    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        self.loc
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Appends a layer above every existing one.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidHeight`] for a non-finite height,
    /// [`LayerError::DuplicateHeight`] if it equals the top height and
    /// [`LayerError::NonMonotonic`] if it lies below it.
    pub fn push(
        &mut self,
        height: f64,
        section: CrossSection,
    ) -> std::result::Result<(), LayerError> {
        let height = check_height(height)?;
        if let Some(&(last, _)) = self.layers.last() {
            if height.total_cmp(&last).is_eq() {
                debug!(height, "rejecting duplicate layer height");
                return Err(LayerError::DuplicateHeight { height });
            }
            if height < last {
                debug!(height, last, "rejecting out-of-order layer");
                return Err(LayerError::NonMonotonic { height, last });
            }
        }
        trace!(height, kind = ?section.kind(), "pushing layer");
        self.layers.push((height, section));
        Ok(())
    }

    /// Inserts a layer at its place in height order and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidHeight`] for a non-finite height and
    /// [`LayerError::DuplicateHeight`] if a layer already sits at `height`.
    pub fn insert(
        &mut self,
        height: f64,
        section: CrossSection,
    ) -> std::result::Result<usize, LayerError> {
        let height = check_height(height)?;
        match self.position(height) {
            Ok(_) => {
                debug!(height, "rejecting duplicate layer height");
                Err(LayerError::DuplicateHeight { height })
            }
            Err(pos) => {
                trace!(height, pos, kind = ?section.kind(), "inserting layer");
                self.layers.insert(pos, (height, section));
                Ok(pos)
            }
        }
    }

    /// The layer at exactly `height`.
    #[must_use]
    pub fn get(&self, height: f64) -> Option<&CrossSection> {
        let pos = self.position(height).ok()?;
        Some(&self.layers[pos].1)
    }

    pub fn get_mut(&mut self, height: f64) -> Option<&mut CrossSection> {
        let pos = self.position(height).ok()?;
        Some(&mut self.layers[pos].1)
    }

    /// Removes and returns the layer at exactly `height`.
    pub fn remove(&mut self, height: f64) -> Option<CrossSection> {
        let pos = self.position(height).ok()?;
        Some(self.layers.remove(pos).1)
    }

    /// The lowest layer.
    #[must_use]
    pub fn first(&self) -> Option<(f64, &CrossSection)> {
        self.layers.first().map(|(h, s)| (*h, s))
    }

    /// The highest layer.
    #[must_use]
    pub fn last(&self) -> Option<(f64, &CrossSection)> {
        self.layers.last().map(|(h, s)| (*h, s))
    }

    /// Iterates `(height, section)` from the lowest layer up.
    ///
    /// Each call starts a fresh traversal.
    #[must_use]
    pub fn iter(&self) -> Layers<'_> {
        Layers {
            inner: self.layers.iter(),
        }
    }

    /// Iterates the layers whose heights fall within `range`.
    #[must_use]
    pub fn range<R: RangeBounds<f64>>(&self, range: R) -> Layers<'_> {
        let start = match range.start_bound() {
            Bound::Included(&lo) => self.layers.partition_point(|(h, _)| *h < lo),
            Bound::Excluded(&lo) => self.layers.partition_point(|(h, _)| *h <= lo),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&hi) => self.layers.partition_point(|(h, _)| *h <= hi),
            Bound::Excluded(&hi) => self.layers.partition_point(|(h, _)| *h < hi),
            Bound::Unbounded => self.layers.len(),
        };
        Layers {
            inner: self.layers[start..end.max(start)].iter(),
        }
    }

    /// Layer heights in ascending order.
    pub fn heights(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.layers.iter().map(|(h, _)| *h)
    }

    /// 3D bounding region of every layer placed at its height.
    #[must_use]
    pub fn bounds(&self) -> Bounds3 {
        self.iter().fold(Bounds3::empty(), |b, (z, section)| {
            let flat = section.bounds();
            if flat.is_empty() {
                return b;
            }
            b.extend(&Point3::new(flat.min.x, flat.min.y, z))
                .extend(&Point3::new(flat.max.x, flat.max.y, z))
        })
    }

    /// Maps every section through the same 2D transform.
    ///
    /// # Errors
    ///
    /// Returns an error if a circle cannot follow `t`; no layer is changed.
    pub fn transform_sections(&mut self, t: &Affine2) -> std::result::Result<(), GeometryError> {
        let mut mapped = self.layers.clone();
        for (_, section) in &mut mapped {
            section.transform(t)?;
        }
        self.layers = mapped;
        Ok(())
    }

    /// Moves the whole sliced solid through a 3D transform.
    ///
    /// Heights go through the z part of `t` and sections through its xy
    /// part. A negative z scale flips the stack so it stays ascending.
    ///
    /// # Errors
    ///
    /// Fails if `t` does not keep horizontal planes horizontal, if a circle
    /// cannot follow the xy part, if a mapped height is not finite, or if two
    /// mapped heights collide. The stack is unchanged on failure.
    pub fn transform(&mut self, t: &Affine3) -> Result<()> {
        let xy = t.xy_part().ok_or_else(|| {
            GeometryError::Degenerate("transform does not preserve horizontal slices".into())
        })?;
        let mut mapped = Vec::with_capacity(self.layers.len());
        for (z, section) in &self.layers {
            let mut section = section.clone();
            section.transform(&xy)?;
            mapped.push((check_height(t.map_height(*z))?, section));
        }
        if t.basis()[(2, 2)] < 0.0 {
            mapped.reverse();
        }
        if let Some(pair) = mapped.windows(2).find(|w| w[0].0 >= w[1].0) {
            let height = pair[1].0;
            debug!(height, "layer heights collided under transform");
            return Err(LayerError::DuplicateHeight { height }.into());
        }
        self.layers = mapped;
        Ok(())
    }

    fn position(&self, height: f64) -> std::result::Result<usize, usize> {
        let height = height + 0.0;
        self.layers
            .binary_search_by(|(h, _)| h.total_cmp(&height))
    }
}

/// Validates a layer height and folds `-0.0` into `0.0`.
///
/// Stored heights are always normalized, so `total_cmp` orders them the
/// same way `<` does.
fn check_height(height: f64) -> std::result::Result<f64, LayerError> {
    if height.is_finite() {
        Ok(height + 0.0)
    } else {
        debug!(height, "rejecting non-finite layer height");
        Err(LayerError::InvalidHeight(height))
    }
}

impl TryFrom<Vec<(f64, CrossSection)>> for LayerStack {
    type Error = LayerError;

    /// Builds a stack from layers in any order.
    fn try_from(layers: Vec<(f64, CrossSection)>) -> std::result::Result<Self, LayerError> {
        let mut stack = Self::default();
        for (height, section) in layers {
            stack.insert(height, section)?;
        }
        Ok(stack)
    }
}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = (f64, &'a CrossSection);
    type IntoIter = Layers<'a>;

    fn into_iter(self) -> Layers<'a> {
        self.iter()
    }
}

/// Ascending-height iterator over a [`LayerStack`].
#[derive(Debug, Clone)]
pub struct Layers<'a> {
    inner: std::slice::Iter<'a, (f64, CrossSection)>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = (f64, &'a CrossSection);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(h, s)| (*h, s))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Layers<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(h, s)| (*h, s))
    }
}

impl ExactSizeIterator for Layers<'_> {}

impl FusedIterator for Layers<'_> {}
