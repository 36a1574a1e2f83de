/// Frustum - six clipping planes for visibility culling.
///
/// Each plane has an inward-pointing unit normal: a point P is inside the
/// frustum if `plane.test(P) >= 0` for all planes. Works for perspective and
/// orthographic projections alike.

use glam::{Mat4, Vec3, Vec4};
use super::aabb::AABB;
use super::plane::Plane;
use super::shape::CollisionShape;

/// Result of a 3-way frustum/AABB classification.
///
/// Used by the octree for hierarchical culling:
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect all objects without further testing
/// - `Partial` → test individual objects and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        let coefficients = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        Self {
            planes: coefficients.map(Plane::from_coefficients),
        }
    }

    /// Frustum of a camera with the given projection placed at `world_transform`.
    pub fn from_projection_and_transform(projection: &Mat4, world_transform: &Mat4) -> Self {
        Self::from_view_projection(&(*projection * world_transform.inverse()))
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.test(point) >= 0.0)
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// Conservative: may return false positives, never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        for plane in &self.planes {
            let normal = plane.normal;

            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if plane.test(p_vertex) < 0.0 {
                return false;
            }
        }

        true
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// - If the p-vertex is outside any plane → `Outside` (early out)
    /// - If the n-vertex is outside any plane → at least `Partial`
    /// - If all n-vertices are inside all planes → `Inside`
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut all_inside = true;

        for plane in &self.planes {
            let normal = plane.normal;

            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if plane.test(p_vertex) < 0.0 {
                return FrustumTest::Outside;
            }

            let n_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if plane.test(n_vertex) < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }

    /// Shape vs frustum: outside as soon as the shape lies entirely behind
    /// one plane. Touching a plane counts as inside.
    pub fn intersects_shape(&self, shape: &CollisionShape) -> bool {
        self.planes.iter().all(|plane| shape.test_plane(plane) >= 0.0)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
