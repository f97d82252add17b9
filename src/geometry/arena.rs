use std::ops::{Index, IndexMut};

use slotmap::SlotMap;

use super::located::{LocatedPoint2, SourceLoc};

slotmap::new_key_type! {
    /// Generational handle of a point stored in a [`PointArena`].
    pub struct PointKey;
}

/// Top-level owner of shared 2D points.
///
/// Other structures name points in here through [`PointRef`] instead of
/// copying them. Keys are generational, so a reference to a removed point
/// stops resolving rather than silently aliasing a newer one.
#[derive(Debug, Default, Clone)]
pub struct PointArena {
    points: SlotMap<PointKey, LocatedPoint2>,
}

impl PointArena {
    /// Creates a new, empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a point and returns its key.
    pub fn insert(&mut self, point: LocatedPoint2) -> PointKey {
        self.points.insert(point)
    }

    /// Inserts a point and returns a reference to it carrying the point's own location.
    pub fn insert_ref(&mut self, point: LocatedPoint2) -> PointRef {
        let loc = point.loc;
        PointRef::new(self.insert(point), loc)
    }

    #[must_use]
    pub fn get(&self, key: PointKey) -> Option<&LocatedPoint2> {
        self.points.get(key)
    }

    pub fn get_mut(&mut self, key: PointKey) -> Option<&mut LocatedPoint2> {
        self.points.get_mut(key)
    }

    /// Removes a point; outstanding references to it stop resolving.
    pub fn remove(&mut self, key: PointKey) -> Option<LocatedPoint2> {
        self.points.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Panics if `key` no longer names a point; use [`PointArena::get`] to check.
impl Index<PointKey> for PointArena {
    type Output = LocatedPoint2;

    fn index(&self, key: PointKey) -> &LocatedPoint2 {
        &self.points[key]
    }
}

impl IndexMut<PointKey> for PointArena {
    fn index_mut(&mut self, key: PointKey) -> &mut LocatedPoint2 {
        &mut self.points[key]
    }
}

/// Non-owning reference to a point in a [`PointArena`].
///
/// `loc` records where the reference itself was made, which may differ from
/// the origin of the point it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRef {
    pub target: PointKey,
    pub loc: SourceLoc,
}

impl PointRef {
    #[must_use]
    pub fn new(target: PointKey, loc: SourceLoc) -> Self {
        Self { target, loc }
    }

    /// Looks the point up, or `None` if it was removed from `arena`.
    #[must_use]
    pub fn resolve<'a>(&self, arena: &'a PointArena) -> Option<&'a LocatedPoint2> {
        arena.get(self.target)
    }
}
