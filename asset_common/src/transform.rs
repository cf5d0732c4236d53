use serde::{Deserialize, Serialize};
use ultraviolet::{Mat4, Rotor3, Vec3, Vec4};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Rotor3,
    pub scale: Vec3,
}

impl Transform {
    /// Takes the glTF layout: a translation, an `[x, y, z, w]` quaternion and a scale.
    pub fn from_arrays(position: [f32; 3], orientation: [f32; 4], scale: [f32; 3]) -> Self {
        Self {
            position: Vec3::from(position),
            orientation: Rotor3::from_quaternion_array(orientation),
            scale: Vec3::from(scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            orientation: Rotor3::identity(),
            scale: Vec3::one(),
        }
    }
}

/// Translation * rotation * scale
impl From<Transform> for Mat4 {
    fn from(transform: Transform) -> Self {
        let isometry = ultraviolet::Isometry3::new(transform.position, transform.orientation);
        isometry.into_homogeneous_matrix() * Mat4::from_nonuniform_scale(transform.scale)
    }
}

/// Builds a matrix from column-major arrays, which is how glTF stores node matrices.
pub fn matrix_from_columns(columns: [[f32; 4]; 4]) -> Mat4 {
    Mat4::new(
        Vec4::from(columns[0]),
        Vec4::from(columns[1]),
        Vec4::from(columns[2]),
        Vec4::from(columns[3]),
    )
}

pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    let transformed = *matrix * Vec4::new(point.x, point.y, point.z, 1.0);
    Vec3::new(transformed.x, transformed.y, transformed.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trs_applies_scale_before_translation() {
        let matrix: Mat4 = Transform::from_arrays([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0], [2.0, 2.0, 2.0]).into();
        let point = transform_point(&matrix, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(point, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn columns_are_read_column_major() {
        let matrix = matrix_from_columns([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [5.0, 6.0, 7.0, 1.0],
        ]);
        assert_eq!(transform_point(&matrix, Vec3::zero()), Vec3::new(5.0, 6.0, 7.0));
    }
}
