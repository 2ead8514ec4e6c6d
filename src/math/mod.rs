/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Smallest dimension a procedural primitive is allowed to have.
///
/// Configured radii and heights are floored to this value before use so a
/// zero or negative dimension never produces NaN or zero-area geometry.
pub const MIN_DIMENSION: f64 = 1e-4;

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

/// Builds a rotation matrix from XYZ Euler angles in degrees.
///
/// The X rotation is applied first, then Y, then Z.
#[must_use]
pub fn rotation_xyz_degrees(angles: &Vector3) -> Matrix4 {
    let rx = nalgebra::Rotation3::from_axis_angle(&Vector3::x_axis(), angles.x.to_radians());
    let ry = nalgebra::Rotation3::from_axis_angle(&Vector3::y_axis(), angles.y.to_radians());
    let rz = nalgebra::Rotation3::from_axis_angle(&Vector3::z_axis(), angles.z.to_radians());
    (rz * ry * rx).to_homogeneous()
}
