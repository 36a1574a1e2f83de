/// Ray and line segment shapes.

use glam::{Mat4, Vec3};
use super::aabb::AABB;
use super::plane::Plane;

/// Half-infinite line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    pub fn test_plane(&self, plane: &Plane) -> f32 {
        let dist = plane.test(self.origin);
        let cos = plane.normal.dot(self.direction);

        if cos > 0.0 {
            // Heading to the front side: crosses if it starts behind
            if dist < 0.0 { 0.0 } else { dist }
        } else if dist > 0.0 && cos < 0.0 {
            0.0
        } else {
            dist
        }
    }

    /// Unbounded along every axis the ray travels.
    pub fn to_aabb(&self) -> AABB {
        let mut aabb = AABB { min: self.origin, max: self.origin };
        for i in 0..3 {
            if self.direction[i] > 0.0 {
                aabb.max[i] = f32::MAX;
            } else if self.direction[i] < 0.0 {
                aabb.min[i] = f32::MIN;
            }
        }
        aabb
    }

    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }
}

/// Segment from `origin` to `origin + direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub origin: Vec3,
    /// Not normalized: its length is the segment length
    pub direction: Vec3,
}

impl LineSegment {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self { origin: start, direction: end - start }
    }

    pub fn end(&self) -> Vec3 {
        self.origin + self.direction
    }

    pub fn test_plane(&self, plane: &Plane) -> f32 {
        let d0 = plane.test(self.origin);
        let d1 = plane.test(self.end());

        if d0 * d1 <= 0.0 {
            0.0
        } else if d0 > 0.0 {
            d0.min(d1)
        } else {
            d0.max(d1)
        }
    }

    pub fn to_aabb(&self) -> AABB {
        let end = self.end();
        AABB::new(self.origin.min(end), self.origin.max(end))
    }

    pub fn transformed(&self, matrix: &Mat4) -> LineSegment {
        LineSegment::from_points(
            matrix.transform_point3(self.origin),
            matrix.transform_point3(self.end()),
        )
    }
}
