/// Axis-aligned bounding box.
///
/// The cheap shape every spatial is reduced to: sectors are AABBs, octree
/// nodes are AABBs, and placement only ever compares AABBs.

use glam::{Mat4, Vec3};
use super::plane::Plane;

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` extending `half_extents` along each axis.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Box spanning `f32::MAX` on every axis (rays, planes).
    pub fn unbounded() -> Self {
        Self {
            min: Vec3::splat(f32::MIN),
            max: Vec3::splat(f32::MAX),
        }
    }

    /// Smallest box enclosing all `points`. Returns `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = AABB { min: *first, max: *first };
        for p in rest {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }
        Some(aabb)
    }

    /// `min <= max` on every axis and no NaN.
    pub fn is_valid(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan() && self.min.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Squared length of the min→max diagonal.
    ///
    /// Used by sector placement to prefer the smaller of overlapping sectors.
    pub fn diagonal_length_squared(&self) -> f32 {
        (self.max - self.min).length_squared()
    }

    /// Transform this AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    /// Test if this AABB fully contains another AABB (touching faces count).
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Squared distance from `point` to the closest point of the box (0 inside).
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        let closest = point.clamp(self.min, self.max);
        (point - closest).length_squared()
    }

    /// 0 if the box crosses the plane, otherwise the signed distance of the
    /// closest corner (negative behind the plane).
    pub fn test_plane(&self, plane: &Plane) -> f32 {
        let center = self.center();
        let radius = self.half_extents().dot(plane.normal.abs());
        let dist = plane.test(center);

        if dist - radius > 0.0 {
            dist - radius
        } else if dist + radius < 0.0 {
            dist + radius
        } else {
            0.0
        }
    }

    /// The 8 corners; bit0 = X, bit1 = Y, bit2 = Z (0 = min, 1 = max).
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }
}
