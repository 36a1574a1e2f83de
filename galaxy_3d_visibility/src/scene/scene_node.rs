/// SceneNode - an entry of the scene with optional visibility capabilities.
///
/// A node may expose a `Spatial` (it can be placed and found visible) and a
/// `Frustumable` (it can run visibility queries). Cameras and shadow-casting
/// lights usually have both.

use bitflags::bitflags;
use glam::Mat4;
use slotmap::{new_key_type, SlotMap};
use crate::collision::CollisionShape;
use super::frustumable::{Frustumable, FrustumableDesc};
use super::spatial::Spatial;

new_key_type! {
    /// Stable key for a SceneNode within a Scene.
    ///
    /// Keys remain valid even after other nodes are removed.
    /// A key becomes invalid only when its own node is removed.
    pub struct SceneNodeKey;
}

bitflags! {
    /// What kind of content a node carries, used by the visibility filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const RENDERABLE = 1 << 0;
        const SHADOW_CASTER = 1 << 1;
        const LIGHT = 1 << 2;
    }
}

/// Node storage shared by the scene and the sector group.
pub type SceneNodes = SlotMap<SceneNodeKey, SceneNode>;

/// Scene node creation descriptor
#[derive(Debug, Clone)]
pub struct SceneNodeDesc {
    pub name: String,
    pub world_transform: Mat4,
    pub flags: NodeFlags,
    /// Local-space shape; None for nodes that are never placed
    pub shape: Option<CollisionShape>,
    pub frustum: Option<FrustumableDesc>,
}

impl Default for SceneNodeDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            world_transform: Mat4::IDENTITY,
            flags: NodeFlags::empty(),
            shape: None,
            frustum: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    world_transform: Mat4,
    flags: NodeFlags,
    spatial: Option<Spatial>,
    frustumable: Option<Frustumable>,
}

impl SceneNode {
    /// Build a node from its descriptor at frame `timestamp`.
    pub fn new(desc: SceneNodeDesc, timestamp: u64) -> Self {
        let spatial = desc.shape
            .map(|shape| Spatial::new(shape, &desc.world_transform, timestamp));
        let frustumable = desc.frustum
            .map(|f| Frustumable::from_desc(&f, &desc.world_transform));

        Self {
            name: desc.name,
            world_transform: desc.world_transform,
            flags: desc.flags,
            spatial,
            frustumable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world_transform(&self) -> &Mat4 {
        &self.world_transform
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: NodeFlags) {
        self.flags = flags;
    }

    pub fn spatial(&self) -> Option<&Spatial> {
        self.spatial.as_ref()
    }

    pub(crate) fn spatial_mut(&mut self) -> Option<&mut Spatial> {
        self.spatial.as_mut()
    }

    pub fn frustumable(&self) -> Option<&Frustumable> {
        self.frustumable.as_ref()
    }

    pub(crate) fn frustumable_mut(&mut self) -> Option<&mut Frustumable> {
        self.frustumable.as_mut()
    }

    /// Move the node: refreshes the spatial's shape/AABB and the frustum.
    ///
    /// Re-placement is the caller's job (`SectorGroup::place_scene_node`).
    pub fn set_world_transform(&mut self, world_transform: Mat4, timestamp: u64) {
        self.world_transform = world_transform;
        if let Some(spatial) = &mut self.spatial {
            spatial.mark_updated(&world_transform, timestamp);
        }
        if let Some(frustumable) = &mut self.frustumable {
            frustumable.update_transform(&world_transform);
        }
    }

    /// Replace the frustum projection. Returns false if the node has no frustum.
    pub fn set_projection(&mut self, projection: Mat4) -> bool {
        match &mut self.frustumable {
            Some(frustumable) => {
                frustumable.set_projection(projection, &self.world_transform);
                true
            }
            None => false,
        }
    }

    /// Drop per-frame state (visibility flags and results).
    pub(crate) fn begin_frame(&mut self) {
        if let Some(spatial) = &mut self.spatial {
            spatial.clear_visibility();
        }
        if let Some(frustumable) = &mut self.frustumable {
            frustumable.clear_visibility_results();
        }
    }
}
