/// Infinite plane: all points `p` with `normal · p = offset`.

use glam::{Mat4, Vec3, Vec4};

/// Plane with a unit normal.
///
/// `test(p) > 0` in front (normal side), `< 0` behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    /// Build a plane; `normal` is normalized (a zero normal is kept as-is).
    pub fn new(normal: Vec3, offset: f32) -> Self {
        let len = normal.length();
        if len > 0.0 {
            Self { normal: normal / len, offset: offset / len }
        } else {
            Self { normal, offset }
        }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalize_or_zero();
        Self { normal: n, offset: n.dot(point) }
    }

    /// Plane from (A, B, C, D) coefficients of `Ax + By + Cz + D = 0`.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        Self::new(coefficients.truncate(), -coefficients.w)
    }

    /// Signed distance from `point` to the plane.
    pub fn test(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }

    /// Closest point of the plane to the origin.
    pub fn origin_point(&self) -> Vec3 {
        self.normal * self.offset
    }

    /// Signed distance of another plane if parallel, 0 if they cross.
    pub fn test_plane(&self, other: &Plane) -> f32 {
        if self.normal.cross(other.normal).length_squared() > 1e-12 {
            return 0.0;
        }
        other.test(self.origin_point())
    }

    pub fn transformed(&self, matrix: &Mat4) -> Plane {
        let point = matrix.transform_point3(self.origin_point());
        // Normals transform by the inverse transpose
        let normal = matrix.inverse().transpose().transform_vector3(self.normal);
        Plane::from_point_normal(point, normal)
    }
}
