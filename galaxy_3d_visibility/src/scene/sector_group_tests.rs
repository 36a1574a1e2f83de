/// Tests for SectorGroup
///
/// Three boxes side by side along X: A = [0, 10], B = [10, 20], C = [20, 30]
/// (Y and Z span [0, 10]). Portals are thin OBBs on the shared faces.

use super::*;
use crate::collision::{OBB, Sphere};
use crate::scene::culler::DistancePortalCuller;
use crate::scene::frustumable::{FrustumKind, FrustumableDesc};
use crate::scene::scene_node::{SceneNode, SceneNodeDesc};
use crate::scene::spatial::SpatialFlags;
use glam::{Mat3, Mat4, Quat, Vec3};

// ============================================================================
// Helper Functions
// ============================================================================

fn sector_box(x0: f32) -> AABB {
    AABB::new(Vec3::new(x0, 0.0, 0.0), Vec3::new(x0 + 10.0, 10.0, 10.0))
}

fn portal_at_x(x: f32) -> CollisionShape {
    CollisionShape::from(OBB::new(Vec3::new(x, 5.0, 5.0), Mat3::IDENTITY, Vec3::new(0.01, 4.0, 4.0)))
}

fn sphere_node(center: Vec3, flags: NodeFlags) -> SceneNodeDesc {
    SceneNodeDesc {
        name: "object".to_string(),
        world_transform: Mat4::from_translation(center),
        flags,
        shape: Some(CollisionShape::from(Sphere::new(Vec3::ZERO, 1.0))),
        frustum: None,
    }
}

/// Camera at (5, 5, 5) looking along +X (or -X), 90° FOV, 100 units deep.
fn camera_node(look_positive_x: bool, kind: FrustumKind) -> SceneNodeDesc {
    let angle = if look_positive_x { -std::f32::consts::FRAC_PI_2 } else { std::f32::consts::FRAC_PI_2 };
    SceneNodeDesc {
        name: "camera".to_string(),
        world_transform: Mat4::from_rotation_translation(Quat::from_rotation_y(angle), Vec3::splat(5.0)),
        flags: NodeFlags::empty(),
        shape: Some(CollisionShape::from(Sphere::new(Vec3::ZERO, 0.5))),
        frustum: Some(FrustumableDesc {
            kind,
            projection: Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0),
        }),
    }
}

struct World {
    group: SectorGroup,
    nodes: SceneNodes,
    a: SectorKey,
    b: SectorKey,
    c: SectorKey,
}

/// A, B and C with no portals yet.
fn three_sectors() -> World {
    let mut group = SectorGroup::default();
    let a = group.create_sector(sector_box(0.0)).unwrap();
    let b = group.create_sector(sector_box(10.0)).unwrap();
    let c = group.create_sector(sector_box(20.0)).unwrap();
    World { group, nodes: SceneNodes::with_key(), a, b, c }
}

fn add_node(world: &mut World, desc: SceneNodeDesc) -> SceneNodeKey {
    let key = world.nodes.insert(SceneNode::new(desc, 0));
    world.group.place_scene_node(&mut world.nodes, key);
    key
}

// ============================================================================
// Sectors & portals
// ============================================================================

#[test]
fn test_create_sector_rejects_degenerate_bounds() {
    let mut group = SectorGroup::default();
    assert!(group.create_sector(AABB::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0))).is_err());
    assert!(group.create_sector_with_depth(sector_box(0.0), 9).is_err());
    assert_eq!(group.sector_count(), 0);
}

#[test]
fn test_sector_bounds_match_octree_root() {
    let world = three_sectors();
    let sector = world.group.sector(world.b).unwrap();

    assert_eq!(*sector.aabb(), sector_box(10.0));
    assert_eq!(sector.aabb(), sector.octree().root().aabb());
    assert_eq!(sector.octree().max_depth(), DEFAULT_OCTREE_DEPTH);
}

#[test]
fn test_portal_is_symmetric() {
    let mut world = three_sectors();
    let portal = world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();

    assert!(world.group.sector(world.a).unwrap().portals().contains(&portal));
    assert!(world.group.sector(world.b).unwrap().portals().contains(&portal));
    assert!(world.group.sector(world.c).unwrap().portals().is_empty());

    let p = world.group.portal(portal).unwrap();
    assert_eq!(p.other(world.a), Some(world.b));
    assert_eq!(p.other(world.b), Some(world.a));
    assert_eq!(p.other(world.c), None);
}

#[test]
fn test_portal_with_unknown_sector_is_rejected() {
    let mut world = three_sectors();
    world.group.remove_sector(&mut world.nodes, world.c).unwrap();

    let result = world.group.create_portal(world.a, world.c, portal_at_x(20.0));
    assert!(matches!(result, Err(crate::error::Error::InvalidPortal(_))));
    assert_eq!(world.group.portal_count(), 0);
    assert!(world.group.sector(world.a).unwrap().portals().is_empty());
}

#[test]
fn test_self_loop_portal_is_accepted_once() {
    let mut world = three_sectors();
    let portal = world.group.create_portal(world.a, world.a, portal_at_x(5.0)).unwrap();

    assert!(world.group.portal(portal).unwrap().is_self_loop());
    assert_eq!(world.group.sector(world.a).unwrap().portals(), &[portal]);
}

#[test]
fn test_remove_portal_detaches_both_sides() {
    let mut world = three_sectors();
    let portal = world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();

    world.group.remove_portal(portal).unwrap();

    assert!(world.group.sector(world.a).unwrap().portals().is_empty());
    assert!(world.group.sector(world.b).unwrap().portals().is_empty());
    assert!(world.group.remove_portal(portal).is_err());
}

#[test]
fn test_iteration_follows_creation_order() {
    let world = three_sectors();
    let keys: Vec<SectorKey> = world.group.sectors().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![world.a, world.b, world.c]);
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn test_find_sector_prefers_smaller() {
    let mut group = SectorGroup::default();
    let big = group.create_sector(AABB::new(Vec3::ZERO, Vec3::splat(100.0))).unwrap();
    let small = group.create_sector(AABB::new(Vec3::splat(10.0), Vec3::splat(20.0))).unwrap();

    let inside_small = AABB::new(Vec3::splat(14.0), Vec3::splat(16.0));
    let only_big = AABB::new(Vec3::splat(50.0), Vec3::splat(52.0));

    assert_eq!(group.find_sector_for(&inside_small), Some(small));
    assert_eq!(group.find_sector_for(&only_big), Some(big));
    assert_eq!(group.find_sector_for(&AABB::new(Vec3::splat(200.0), Vec3::splat(201.0))), None);
}

#[test]
fn test_find_sector_tie_goes_to_first() {
    let world = three_sectors();
    // Touches the A/B shared face, both have the same size
    let on_face = AABB::new(Vec3::new(9.0, 4.0, 4.0), Vec3::new(11.0, 6.0, 6.0));
    assert_eq!(world.group.find_sector_for(&on_face), Some(world.a));
}

#[test]
fn test_place_sets_back_reference() {
    let mut world = three_sectors();
    let key = add_node(&mut world, sphere_node(Vec3::new(15.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    let spatial = world.nodes[key].spatial().unwrap();
    let location = spatial.octree_node().unwrap();
    assert_eq!(location.sector, world.b);

    let octree = world.group.sector(world.b).unwrap().octree();
    assert_eq!(octree.node_of(key), Some(location.node));
    assert!(octree.node(location.node).unwrap().aabb().contains(spatial.aabb()));
}

#[test]
fn test_place_is_idempotent_and_exclusive() {
    let mut world = three_sectors();
    let key = add_node(&mut world, sphere_node(Vec3::new(15.0, 5.0, 5.0), NodeFlags::RENDERABLE));
    let before = world.nodes[key].spatial().unwrap().octree_node();

    assert_eq!(world.group.place_scene_node(&mut world.nodes, key), Some(world.b));
    assert_eq!(world.nodes[key].spatial().unwrap().octree_node(), before);

    let holders = world.group.sectors().filter(|(_, s)| s.octree().contains(key)).count();
    assert_eq!(holders, 1);
}

#[test]
fn test_move_between_sectors() {
    let mut world = three_sectors();
    let key = add_node(&mut world, sphere_node(Vec3::new(15.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    world.nodes[key].set_world_transform(Mat4::from_translation(Vec3::new(25.0, 5.0, 5.0)), 1);
    assert_eq!(world.group.place_scene_node(&mut world.nodes, key), Some(world.c));

    assert!(!world.group.sector(world.b).unwrap().octree().contains(key));
    assert!(world.group.sector(world.c).unwrap().octree().contains(key));
}

#[test]
fn test_place_outside_all_sectors_clears_placement() {
    let mut world = three_sectors();
    let key = add_node(&mut world, sphere_node(Vec3::new(15.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    world.nodes[key].set_world_transform(Mat4::from_translation(Vec3::new(500.0, 5.0, 5.0)), 1);
    assert_eq!(world.group.place_scene_node(&mut world.nodes, key), None);

    assert!(!world.nodes[key].spatial().unwrap().is_placed());
    assert!(world.group.sectors().all(|(_, s)| !s.octree().contains(key)));
}

#[test]
fn test_place_node_without_spatial_is_noop() {
    let mut world = three_sectors();
    let key = world.nodes.insert(SceneNode::new(SceneNodeDesc::default(), 0));
    assert_eq!(world.group.place_scene_node(&mut world.nodes, key), None);
}

#[test]
fn test_remove_scene_node() {
    let mut world = three_sectors();
    let key = add_node(&mut world, sphere_node(Vec3::new(5.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    assert!(world.group.remove_scene_node(&mut world.nodes, key));
    assert!(!world.group.sector(world.a).unwrap().octree().contains(key));
    assert!(!world.nodes[key].spatial().unwrap().is_placed());
    assert!(!world.group.remove_scene_node(&mut world.nodes, key));
}

#[test]
fn test_remove_sector_replaces_spatials() {
    let mut group = SectorGroup::default();
    let big = group.create_sector(AABB::new(Vec3::ZERO, Vec3::splat(100.0))).unwrap();
    let small = group.create_sector(AABB::new(Vec3::splat(10.0), Vec3::splat(20.0))).unwrap();
    let mut nodes = SceneNodes::with_key();

    let key = nodes.insert(SceneNode::new(sphere_node(Vec3::splat(15.0), NodeFlags::RENDERABLE), 0));
    assert_eq!(group.place_scene_node(&mut nodes, key), Some(small));

    group.remove_sector(&mut nodes, small).unwrap();

    assert!(group.sector(small).is_none());
    assert_eq!(nodes[key].spatial().unwrap().sector(), Some(big));
    assert!(group.sector(big).unwrap().octree().contains(key));
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn test_visible_sectors_through_portal() {
    let mut world = three_sectors();
    world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();
    let camera = add_node(&mut world, camera_node(true, FrustumKind::Camera));
    let frustum = *world.nodes[camera].frustumable().unwrap().frustum();

    assert_eq!(world.group.visible_sectors(world.a, &frustum, None), vec![world.a, world.b]);
}

#[test]
fn test_visible_sectors_chain_any_portal_order() {
    let mut world = three_sectors();
    // B↔C created before A↔B
    world.group.create_portal(world.b, world.c, portal_at_x(20.0)).unwrap();
    world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();
    let camera = add_node(&mut world, camera_node(true, FrustumKind::Camera));
    let frustum = *world.nodes[camera].frustumable().unwrap().frustum();

    assert_eq!(
        world.group.visible_sectors(world.a, &frustum, None),
        vec![world.a, world.b, world.c],
    );
}

#[test]
fn test_portal_behind_camera_is_not_crossed() {
    let mut world = three_sectors();
    world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();
    let camera = add_node(&mut world, camera_node(false, FrustumKind::Camera));
    let frustum = *world.nodes[camera].frustumable().unwrap().frustum();

    assert_eq!(world.group.visible_sectors(world.a, &frustum, None), vec![world.a]);
}

#[test]
fn test_culler_vetoes_portal() {
    let mut world = three_sectors();
    world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();
    let camera = add_node(&mut world, camera_node(true, FrustumKind::Camera));
    let frustum = *world.nodes[camera].frustumable().unwrap().frustum();

    let near = DistancePortalCuller::new(Vec3::splat(5.0), 3.0);
    let far = DistancePortalCuller::new(Vec3::splat(5.0), 50.0);

    assert_eq!(world.group.visible_sectors(world.a, &frustum, Some(&near)), vec![world.a]);
    assert_eq!(world.group.visible_sectors(world.a, &frustum, Some(&far)), vec![world.a, world.b]);
}

#[test]
fn test_self_loop_is_skipped_by_traversal() {
    let mut world = three_sectors();
    world.group.create_portal(world.a, world.a, portal_at_x(8.0)).unwrap();
    let camera = add_node(&mut world, camera_node(true, FrustumKind::Camera));
    let frustum = *world.nodes[camera].frustumable().unwrap().frustum();

    assert_eq!(world.group.visible_sectors(world.a, &frustum, None), vec![world.a]);
}

#[test]
fn test_do_visibility_tests_filters_and_flags() {
    let mut world = three_sectors();
    world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();
    let camera = add_node(&mut world, camera_node(true, FrustumKind::Camera));

    let mesh = add_node(&mut world, sphere_node(Vec3::new(15.0, 5.0, 5.0), NodeFlags::RENDERABLE));
    let caster = add_node(&mut world, sphere_node(
        Vec3::new(17.0, 5.0, 5.0), NodeFlags::RENDERABLE | NodeFlags::SHADOW_CASTER,
    ));
    let lamp = add_node(&mut world, sphere_node(Vec3::new(8.0, 5.0, 5.0), NodeFlags::LIGHT));

    let results = world.group.do_visibility_tests(
        &mut world.nodes, camera, VisibilityTest::RENDERABLES | VisibilityTest::LIGHTS, None, 4,
    );

    assert_eq!(results.timestamp(), 4);
    assert_eq!(results.sectors(), &[world.a, world.b]);
    assert!(results.renderables().contains(&mesh));
    assert!(results.renderables().contains(&caster));
    assert_eq!(results.lights(), &[lamp]);
    assert!(!results.contains(camera));

    assert!(world.nodes[mesh].spatial().unwrap().is_visible(SpatialFlags::VISIBLE_CAMERA));
    assert!(!world.nodes[mesh].spatial().unwrap().is_visible(SpatialFlags::VISIBLE_LIGHT));
    assert!(!world.nodes[camera].spatial().unwrap().is_visible(SpatialFlags::VISIBLE_CAMERA));

    let shadows = world.group.do_visibility_tests(
        &mut world.nodes, camera, VisibilityTest::ONLY_SHADOW_CASTERS, None, 4,
    );
    assert_eq!(shadows.renderables(), &[caster]);
    assert!(shadows.lights().is_empty());
}

#[test]
fn test_light_frustum_sets_light_flag() {
    let mut world = three_sectors();
    let light = add_node(&mut world, camera_node(true, FrustumKind::Light));
    let mesh = add_node(&mut world, sphere_node(Vec3::new(8.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    let results = world.group.do_visibility_tests(&mut world.nodes, light, VisibilityTest::RENDERABLES, None, 0);

    assert_eq!(results.renderables(), &[mesh]);
    let spatial = world.nodes[mesh].spatial().unwrap();
    assert!(spatial.is_visible(SpatialFlags::VISIBLE_LIGHT));
    assert!(!spatial.is_visible(SpatialFlags::VISIBLE_CAMERA));
}

#[test]
fn test_unplaced_owner_sees_nothing() {
    let mut world = three_sectors();
    let mut desc = camera_node(true, FrustumKind::Camera);
    desc.world_transform = Mat4::from_translation(Vec3::splat(500.0));
    let camera = add_node(&mut world, desc);
    add_node(&mut world, sphere_node(Vec3::new(5.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    let results = world.group.do_visibility_tests(&mut world.nodes, camera, VisibilityTest::all(), None, 0);

    assert!(results.is_empty());
    assert!(results.sectors().is_empty());
}

#[test]
fn test_owner_without_frustum_sees_nothing() {
    let mut world = three_sectors();
    let node = add_node(&mut world, sphere_node(Vec3::new(5.0, 5.0, 5.0), NodeFlags::RENDERABLE));
    add_node(&mut world, sphere_node(Vec3::new(7.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    let results = world.group.do_visibility_tests(&mut world.nodes, node, VisibilityTest::all(), None, 0);
    assert!(results.is_empty());
}

#[test]
fn test_moved_portal_out_of_frustum_hides_far_sector() {
    let mut world = three_sectors();
    let portal = world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();
    let camera = add_node(&mut world, camera_node(true, FrustumKind::Camera));

    let before = world.group.do_visibility_tests(&mut world.nodes, camera, VisibilityTest::RENDERABLES, None, 0);
    assert_eq!(before.sectors(), &[world.a, world.b]);

    // Door slides far off to the side of the view
    let moved = CollisionShape::from(OBB::new(Vec3::new(10.0, 5.0, -20.0), Mat3::IDENTITY, Vec3::new(0.01, 4.0, 4.0)));
    world.group.set_portal_shape(portal, moved).unwrap();

    let after = world.group.do_visibility_tests(&mut world.nodes, camera, VisibilityTest::RENDERABLES, None, 1);
    assert_eq!(after.sectors(), &[world.a]);
}

#[test]
fn test_set_shape_of_removed_portal_fails() {
    let mut world = three_sectors();
    let portal = world.group.create_portal(world.a, world.b, portal_at_x(10.0)).unwrap();
    world.group.remove_portal(portal).unwrap();

    let result = world.group.set_portal_shape(portal, portal_at_x(12.0));
    assert!(matches!(result, Err(crate::error::Error::InvalidPortal(_))));
}

#[test]
fn test_begin_frame_clears_stale_flags() {
    let mut world = three_sectors();
    let camera = add_node(&mut world, camera_node(true, FrustumKind::Camera));
    let mesh = add_node(&mut world, sphere_node(Vec3::new(8.0, 5.0, 5.0), NodeFlags::RENDERABLE));

    let first = world.group.do_visibility_tests(&mut world.nodes, camera, VisibilityTest::RENDERABLES, None, 0);
    assert_eq!(first.renderables(), &[mesh]);
    assert!(world.nodes[mesh].spatial().unwrap().is_visible(SpatialFlags::VISIBLE_CAMERA));

    // Behind the camera now
    world.nodes[mesh].set_world_transform(Mat4::from_translation(Vec3::new(2.0, 5.0, 5.0)), 1);
    world.group.place_scene_node(&mut world.nodes, mesh);
    world.group.begin_frame(&mut world.nodes);
    assert!(world.nodes[mesh].spatial().unwrap().flags().is_empty());

    let second = world.group.do_visibility_tests(&mut world.nodes, camera, VisibilityTest::RENDERABLES, None, 1);
    assert!(second.renderables().is_empty());
    assert!(!world.nodes[mesh].spatial().unwrap().is_visible(SpatialFlags::VISIBLE_CAMERA));
}
