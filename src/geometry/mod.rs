pub mod arena;
pub mod located;
pub mod seq;

pub use arena::{PointArena, PointKey, PointRef};
pub use located::{LocatedPoint2, LocatedPoint3, Rgba, SourceLoc};
pub use seq::{seq_bounds, signed_area, PointSeq, SharedPoints};
