pub mod error;
pub mod geometry;
pub mod math;
pub mod section;

pub use error::{Result, StrataError};
