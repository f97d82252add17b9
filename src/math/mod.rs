pub mod affine;
pub mod bounds;

pub use affine::{Affine, Affine2, Affine3};
pub use bounds::{Bounds, Bounds2, Bounds3, Bounds4};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4D vector type.
pub type Vector4 = nalgebra::Vector4<f64>;

/// 2x2 matrix, the linear part of a 2D transform.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// 3x3 matrix, the linear part of a 3D transform or a homogeneous 2D one.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
