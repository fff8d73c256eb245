pub mod contour;
pub mod plane;

pub use contour::reconstruct_contour;
pub use plane::Plane;

/// 3D point type. Coordinates are millimetres.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-9;
