/// Transform composition from scale, rotation and translation
use nalgebra::{Matrix4, Vector3};
use stlobj_core::Transform;

/// Rotation around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn from_degrees([x, y, z]: [f64; 3]) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// Rotation matrix; rotations apply in order X, Y, Z
    pub fn matrix(&self) -> Matrix4<f64> {
        let rx = Matrix4::new_rotation(Vector3::new(self.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.z));

        rz * ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    pub scale: Vector3<f64>,
    pub rotation: RotationState,
    pub translation: Vector3<f64>,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: RotationState::zero(),
            translation: Vector3::zeros(),
        }
    }
}

impl TransformParams {
    /// `T · R · S`
    pub fn matrix(&self) -> Matrix4<f64> {
        let scale = Matrix4::new_nonuniform_scaling(&self.scale);
        let translation = Matrix4::new_translation(&self.translation);
        translation * self.rotation.matrix() * scale
    }

    pub fn to_transform(&self) -> Transform {
        let m = self.matrix();
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = m[(i, j)];
            }
        }
        Transform::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use stlobj_core::Vector3 as Point;

    fn assert_point_eq(a: Point, b: Point) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = RotationState::zero().matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_default_params_are_identity() {
        assert_eq!(TransformParams::default().to_transform(), Transform::IDENTITY);
    }

    #[test]
    fn test_rotation_about_z() {
        let params = TransformParams {
            rotation: RotationState::from_degrees([0.0, 0.0, 90.0]),
            ..Default::default()
        };
        let p = params.to_transform().apply(Point::new(1.0, 0.0, 0.0));
        assert_point_eq(p, Point::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotation_order_is_x_then_z() {
        let params = TransformParams {
            rotation: RotationState::from_degrees([90.0, 0.0, 90.0]),
            ..Default::default()
        };
        // x-rotation takes +y to +z; z-rotation then leaves it there
        let p = params.to_transform().apply(Point::new(0.0, 1.0, 0.0));
        assert_point_eq(p, Point::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let params = TransformParams {
            scale: Vector3::new(0.5, 0.5, 0.5),
            translation: Vector3::new(-2.0, 1.0, 2.0),
            ..Default::default()
        };
        let p = params.to_transform().apply(Point::new(2.0, 2.0, 2.0));
        assert_point_eq(p, Point::new(-1.0, 2.0, 3.0));
    }
}
