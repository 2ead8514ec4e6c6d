use crate::math::{rotation_xyz_degrees, Matrix4, Vector3};

/// A single entry in a prim's transform op stack.
///
/// Ops compose in stack order: for `[Translate, RotateXYZ, Scale]` a point is
/// scaled first, then rotated, then translated.
#[derive(Debug, Clone, PartialEq)]
pub enum XformOp {
    /// Translation by a displacement vector.
    Translate(Vector3),
    /// Rotation by XYZ Euler angles, in degrees.
    RotateXYZ(Vector3),
    /// Non-uniform scale.
    Scale(Vector3),
    /// An arbitrary 4x4 matrix.
    Transform(Matrix4),
}

impl XformOp {
    /// Returns the matrix this op contributes.
    #[must_use]
    pub fn matrix(&self) -> Matrix4 {
        match self {
            Self::Translate(t) => Matrix4::new_translation(t),
            Self::RotateXYZ(angles) => rotation_xyz_degrees(angles),
            Self::Scale(s) => Matrix4::new_nonuniform_scaling(s),
            Self::Transform(m) => *m,
        }
    }
}

/// Composes an op stack into a single local transform.
#[must_use]
pub fn compose(ops: &[XformOp]) -> Matrix4 {
    ops.iter()
        .fold(Matrix4::identity(), |acc, op| acc * op.matrix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{transform_point, Point3};
    use approx::assert_relative_eq;

    #[test]
    fn empty_stack_is_identity() {
        assert_eq!(compose(&[]), Matrix4::identity());
    }

    #[test]
    fn scale_applies_before_translate() {
        let ops = [
            XformOp::Translate(Vector3::new(1.0, 0.0, 0.0)),
            XformOp::Scale(Vector3::new(2.0, 2.0, 2.0)),
        ];
        let q = transform_point(&compose(&ops), &Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(q, Point3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn rotate_then_translate() {
        let ops = [
            XformOp::Translate(Vector3::new(0.0, 0.0, 5.0)),
            XformOp::RotateXYZ(Vector3::new(0.0, 0.0, 90.0)),
        ];
        let q = transform_point(&compose(&ops), &Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(q, Point3::new(0.0, 1.0, 5.0), epsilon = 1e-12);
    }
}
