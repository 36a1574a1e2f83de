/// Spatial - the placeable part of a scene node.
///
/// Holds the collision shape (local and world space), the AABB derived from
/// the world shape, the timestamp of the last update and a back-reference to
/// the octree node the spatial currently lives in.

use bitflags::bitflags;
use glam::Mat4;
use crate::collision::{AABB, CollisionShape};
use super::sector::SectorKey;

bitflags! {
    /// Per-frame visibility marks, cleared by `SectorGroup::begin_frame`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpatialFlags: u32 {
        /// Seen by at least one camera frustum this frame
        const VISIBLE_CAMERA = 1 << 0;
        /// Seen by at least one light frustum this frame
        const VISIBLE_LIGHT = 1 << 1;
    }
}

/// Where a spatial is stored: a sector and a node index in its octree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OctreeNodeRef {
    pub sector: SectorKey,
    pub node: usize,
}

#[derive(Debug, Clone)]
pub struct Spatial {
    /// Shape in the node's local space
    local_shape: CollisionShape,
    /// Shape in world space (local shape moved by the world transform)
    shape: CollisionShape,
    /// World AABB of `shape`, recomputed in `mark_updated`
    aabb: AABB,
    /// Timestamp of the last `mark_updated`
    timestamp: u64,
    /// None while unplaced
    octree_node: Option<OctreeNodeRef>,
    flags: SpatialFlags,
}

impl Spatial {
    /// Create a spatial already moved to `world_transform`.
    pub fn new(local_shape: CollisionShape, world_transform: &Mat4, timestamp: u64) -> Self {
        let shape = local_shape.transformed(world_transform);
        Self {
            local_shape,
            shape,
            aabb: shape.to_aabb(),
            timestamp,
            octree_node: None,
            flags: SpatialFlags::empty(),
        }
    }

    pub fn local_shape(&self) -> &CollisionShape {
        &self.local_shape
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub fn aabb(&self) -> &AABB {
        &self.aabb
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Octree node holding this spatial, if placed.
    pub fn octree_node(&self) -> Option<OctreeNodeRef> {
        self.octree_node
    }

    /// Sector holding this spatial, if placed.
    pub fn sector(&self) -> Option<SectorKey> {
        self.octree_node.map(|r| r.sector)
    }

    pub fn is_placed(&self) -> bool {
        self.octree_node.is_some()
    }

    pub(crate) fn set_octree_node(&mut self, octree_node: Option<OctreeNodeRef>) {
        self.octree_node = octree_node;
    }

    pub fn flags(&self) -> SpatialFlags {
        self.flags
    }

    pub fn is_visible(&self, flag: SpatialFlags) -> bool {
        self.flags.intersects(flag)
    }

    pub(crate) fn set_visible(&mut self, flag: SpatialFlags) {
        self.flags.insert(flag);
    }

    pub(crate) fn clear_visibility(&mut self) {
        self.flags = SpatialFlags::empty();
    }

    /// Move the shape to a new world transform and refresh the AABB.
    ///
    /// Does not re-place the spatial: callers follow up with
    /// `SectorGroup::place_scene_node`.
    pub fn mark_updated(&mut self, world_transform: &Mat4, timestamp: u64) {
        self.shape = self.local_shape.transformed(world_transform);
        self.aabb = self.shape.to_aabb();
        self.timestamp = timestamp;
    }
}

#[cfg(test)]
#[path = "spatial_tests.rs"]
mod tests;
