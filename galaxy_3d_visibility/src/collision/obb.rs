/// Oriented bounding box. Portals are usually thin OBBs.

use glam::{Mat3, Mat4, Vec3};
use super::aabb::AABB;
use super::plane::Plane;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OBB {
    pub center: Vec3,
    /// Columns are the box's local X/Y/Z axes (orthonormal)
    pub rotation: Mat3,
    /// Half size along each local axis
    pub extents: Vec3,
}

impl OBB {
    pub fn new(center: Vec3, rotation: Mat3, extents: Vec3) -> Self {
        Self { center, rotation, extents }
    }

    /// Projected radius of the box onto `normal`.
    fn projected_radius(&self, normal: Vec3) -> f32 {
        (0..3)
            .map(|i| self.rotation.col(i).dot(normal).abs() * self.extents[i])
            .sum()
    }

    pub fn test_plane(&self, plane: &Plane) -> f32 {
        let radius = self.projected_radius(plane.normal);
        let dist = plane.test(self.center);

        if dist - radius > 0.0 {
            dist - radius
        } else if dist + radius < 0.0 {
            dist + radius
        } else {
            0.0
        }
    }

    pub fn to_aabb(&self) -> AABB {
        let abs_rotation = Mat3::from_cols(
            self.rotation.col(0).abs(),
            self.rotation.col(1).abs(),
            self.rotation.col(2).abs(),
        );
        AABB::from_center_half_extents(self.center, abs_rotation * self.extents)
    }

    /// Exact for rigid and uniformly scaled transforms.
    pub fn transformed(&self, matrix: &Mat4) -> OBB {
        let mut rotation = Mat3::IDENTITY;
        let mut extents = Vec3::ZERO;
        let mut axes = [Vec3::X, Vec3::Y, Vec3::Z];

        for i in 0..3 {
            let axis = matrix.transform_vector3(self.rotation.col(i) * self.extents[i]);
            let len = axis.length();
            extents[i] = len;
            if len > 0.0 {
                axes[i] = axis / len;
            } else {
                axes[i] = matrix.transform_vector3(self.rotation.col(i)).normalize_or_zero();
            }
        }
        rotation.x_axis = axes[0];
        rotation.y_axis = axes[1];
        rotation.z_axis = axes[2];

        OBB {
            center: matrix.transform_point3(self.center),
            rotation,
            extents,
        }
    }
}
