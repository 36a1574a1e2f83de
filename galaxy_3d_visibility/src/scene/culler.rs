/// Portal culling strategies.
///
/// A PortalCuller gets the final say on whether a portal that passed the
/// frustum test is traversed. Renderers plug in occlusion or distance
/// limits here.

use glam::Vec3;
use crate::collision::CollisionShape;

/// Veto hook consulted for every frustum-visible portal.
pub trait PortalCuller: Send + Sync {
    /// Return false to stop propagation through this portal.
    fn is_portal_visible(&self, shape: &CollisionShape) -> bool;
}

/// Accepts every portal (same as passing no culler).
pub struct AcceptAllPortals;

impl PortalCuller for AcceptAllPortals {
    fn is_portal_visible(&self, _shape: &CollisionShape) -> bool {
        true
    }
}

/// Rejects portals whose closest point is farther than `max_distance` from `eye`.
///
/// Distance is measured to the portal's AABB.
pub struct DistancePortalCuller {
    pub eye: Vec3,
    pub max_distance: f32,
}

impl DistancePortalCuller {
    pub fn new(eye: Vec3, max_distance: f32) -> Self {
        Self { eye, max_distance }
    }
}

impl PortalCuller for DistancePortalCuller {
    fn is_portal_visible(&self, shape: &CollisionShape) -> bool {
        let distance_sq = shape.to_aabb().distance_squared_to_point(self.eye);
        distance_sq <= self.max_distance * self.max_distance
    }
}
