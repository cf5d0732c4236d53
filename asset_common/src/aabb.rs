use serde::{Deserialize, Serialize};
use ultraviolet::{Mat4, Vec3};

use crate::transform::transform_point;

/// Axis aligned bounding box. A freshly created box is empty (min > max) so that
/// extending it with any other box yields that box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, other: &Aabb) {
        self.min = self.min.min_by_component(other.min);
        self.max = self.max.max_by_component(other.max);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        result.extend(other);
        result
    }

    /// An empty box is contained in everything.
    pub fn contains(&self, other: &Aabb) -> bool {
        other.is_empty()
            || (self.min.x <= other.min.x
                && self.min.y <= other.min.y
                && self.min.z <= other.min.z
                && self.max.x >= other.max.x
                && self.max.y >= other.max.y
                && self.max.z >= other.max.z)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Transforms all eight corners and bounds them again. Transforming only min and max
    /// is wrong as soon as the matrix rotates or mirrors.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut result = Aabb::empty();
        for corner in self.corners() {
            let point = transform_point(matrix, corner);
            result.min = result.min.min_by_component(point);
            result.max = result.max.max_by_component(point);
        }
        result
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
