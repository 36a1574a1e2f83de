/// Bounding sphere.

use glam::{Mat4, Vec3};
use super::aabb::AABB;
use super::plane::Plane;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn test_plane(&self, plane: &Plane) -> f32 {
        let dist = plane.test(self.center);

        if dist > self.radius {
            dist - self.radius
        } else if dist < -self.radius {
            dist + self.radius
        } else {
            0.0
        }
    }

    pub fn to_aabb(&self) -> AABB {
        AABB::from_center_half_extents(self.center, Vec3::splat(self.radius))
    }

    /// Radius scales by the largest axis scale of the matrix.
    pub fn transformed(&self, matrix: &Mat4) -> Sphere {
        let scale = matrix.col(0).truncate().length()
            .max(matrix.col(1).truncate().length())
            .max(matrix.col(2).truncate().length());

        Sphere {
            center: matrix.transform_point3(self.center),
            radius: self.radius * scale,
        }
    }
}
