//! Collision module - shapes and the frustum used by placement and culling.
//!
//! The shape set is closed (`CollisionShape` enum); the visibility core only
//! needs three operations from it: `test_plane`, `to_aabb` and `transformed`.

mod aabb;
mod frustum;
mod obb;
mod plane;
mod ray;
mod shape;
mod sphere;

pub use aabb::AABB;
pub use frustum::{
    Frustum, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use obb::OBB;
pub use plane::Plane;
pub use ray::{LineSegment, Ray};
pub use shape::{CollisionShape, CollisionShapeType};
pub use sphere::Sphere;
