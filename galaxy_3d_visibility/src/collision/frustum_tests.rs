use glam::{Mat3, Mat4, Quat, Vec3};
use crate::collision::{AABB, CollisionShape, OBB, Sphere, LineSegment};
use super::*;

fn perspective(far: f32) -> Mat4 {
    Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, far)
}

/// Camera at `eye` looking down -Z
fn frustum_looking_down_neg_z(eye: Vec3) -> Frustum {
    let view = Mat4::look_at_rh(eye, eye - Vec3::Z, Vec3::Y);
    Frustum::from_view_projection(&(perspective(100.0) * view))
}

// ============================================================================
// Frustum::from_view_projection
// ============================================================================

#[test]
fn test_frustum_from_identity_matrix() {
    let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);

    for plane in &frustum.planes {
        assert!((plane.normal.length() - 1.0).abs() < 1e-5, "plane normal should be unit length");
    }
}

#[test]
fn test_frustum_from_orthographic_projection() {
    let projection = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    for plane in &frustum.planes {
        assert!((plane.normal.length() - 1.0).abs() < 1e-4, "plane normal should be unit length");
    }
    assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -50.0)));
    assert!(!frustum.contains_point(Vec3::new(11.0, 0.0, -50.0)));
}

#[test]
fn test_frustum_from_projection_and_transform_follows_camera() {
    // Rotating -Z by +90° around Y gives -X
    let world = Mat4::from_rotation_translation(
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        Vec3::new(5.0, 5.0, 5.0),
    );
    let frustum = Frustum::from_projection_and_transform(&perspective(50.0), &world);

    assert!(frustum.contains_point(Vec3::new(1.0, 5.0, 5.0)));
    assert!(!frustum.contains_point(Vec3::new(9.0, 5.0, 5.0)));
}

// ============================================================================
// Frustum::intersects_aabb / classify_aabb
// ============================================================================

#[test]
fn test_aabb_inside_frustum() {
    let frustum = frustum_looking_down_neg_z(Vec3::new(0.0, 0.0, 5.0));
    let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));

    assert!(frustum.intersects_aabb(&aabb));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Inside);
}

#[test]
fn test_aabb_behind_camera() {
    let frustum = frustum_looking_down_neg_z(Vec3::new(0.0, 0.0, 5.0));
    let aabb = AABB::new(Vec3::new(-1.0, -1.0, 10.0), Vec3::new(1.0, 1.0, 12.0));

    assert!(!frustum.intersects_aabb(&aabb));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Outside);
}

#[test]
fn test_aabb_beyond_far_plane() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let frustum = Frustum::from_view_projection(&(perspective(10.0) * view));
    let aabb = AABB::new(Vec3::new(-1.0, -1.0, -20.0), Vec3::new(1.0, 1.0, -18.0));

    assert!(!frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_straddling_side_plane_is_partial() {
    let frustum = frustum_looking_down_neg_z(Vec3::ZERO);
    // At z = -10 the 90° frustum spans x in [-10, 10]
    let aabb = AABB::new(Vec3::new(8.0, -1.0, -11.0), Vec3::new(14.0, 1.0, -9.0));

    assert!(frustum.intersects_aabb(&aabb));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Partial);
}

// ============================================================================
// Frustum::intersects_shape
// ============================================================================

#[test]
fn test_sphere_inside_and_outside() {
    let frustum = frustum_looking_down_neg_z(Vec3::ZERO);

    let inside = CollisionShape::from(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0));
    let behind = CollisionShape::from(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0));

    assert!(frustum.intersects_shape(&inside));
    assert!(!frustum.intersects_shape(&behind));
}

#[test]
fn test_sphere_straddling_plane_counts_as_inside() {
    let frustum = frustum_looking_down_neg_z(Vec3::ZERO);
    // Center just outside the right plane, radius reaches back in
    let sphere = CollisionShape::from(Sphere::new(Vec3::new(11.0, 0.0, -10.0), 2.0));

    assert!(frustum.intersects_shape(&sphere));
}

#[test]
fn test_thin_obb_portal() {
    let frustum = frustum_looking_down_neg_z(Vec3::ZERO);
    let portal = CollisionShape::from(OBB::new(
        Vec3::new(0.0, 0.0, -10.0),
        Mat3::IDENTITY,
        Vec3::new(2.0, 2.0, 0.01),
    ));
    let portal_behind = CollisionShape::from(OBB::new(
        Vec3::new(0.0, 0.0, 10.0),
        Mat3::IDENTITY,
        Vec3::new(2.0, 2.0, 0.01),
    ));

    assert!(frustum.intersects_shape(&portal));
    assert!(!frustum.intersects_shape(&portal_behind));
}

#[test]
fn test_line_segment_crossing_frustum() {
    let frustum = frustum_looking_down_neg_z(Vec3::ZERO);
    let through = CollisionShape::from(LineSegment::from_points(
        Vec3::new(-50.0, 0.0, -10.0),
        Vec3::new(50.0, 0.0, -10.0),
    ));
    let behind = CollisionShape::from(LineSegment::from_points(
        Vec3::new(-50.0, 0.0, 10.0),
        Vec3::new(50.0, 0.0, 10.0),
    ));

    assert!(frustum.intersects_shape(&through));
    assert!(!frustum.intersects_shape(&behind));
}

// ============================================================================
// Plane constants
// ============================================================================

#[test]
fn test_plane_constants() {
    assert_eq!(PLANE_LEFT, 0);
    assert_eq!(PLANE_RIGHT, 1);
    assert_eq!(PLANE_BOTTOM, 2);
    assert_eq!(PLANE_TOP, 3);
    assert_eq!(PLANE_NEAR, 4);
    assert_eq!(PLANE_FAR, 5);
}
