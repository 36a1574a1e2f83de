/// Scene - node storage plus the sector group, driven once per frame.
///
/// Typical frame:
/// 1. `begin_frame` (advances the timestamp, drops last frame's visibility)
/// 2. `set_world_transform` for every moved node (re-places its spatial)
/// 3. `do_visibility_tests` for every active camera or light

use glam::Mat4;
use crate::collision::{AABB, CollisionShape};
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use super::culler::PortalCuller;
use super::octree::DEFAULT_OCTREE_DEPTH;
use super::portal::PortalKey;
use super::scene_node::{NodeFlags, SceneNode, SceneNodeDesc, SceneNodeKey, SceneNodes};
use super::sector::SectorKey;
use super::sector_group::SectorGroup;
use super::visibility::{VisibilityTest, VisibilityTestResults};

/// Scene configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneConfig {
    /// Octree depth of sectors created with `create_sector`
    pub octree_max_depth: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            octree_max_depth: DEFAULT_OCTREE_DEPTH,
        }
    }
}

pub struct Scene {
    config: SceneConfig,
    nodes: SceneNodes,
    sector_group: SectorGroup,
    /// Frame counter, starts at 0 and only grows
    timestamp: u64,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            nodes: SceneNodes::with_key(),
            sector_group: SectorGroup::new(config.octree_max_depth),
            timestamp: 0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Start a new frame: bump the timestamp and clear every visibility flag
    /// and stored result.
    pub fn begin_frame(&mut self) {
        self.timestamp += 1;
        self.sector_group.begin_frame(&mut self.nodes);
    }

    // ===== SECTORS & PORTALS =====

    pub fn create_sector(&mut self, aabb: AABB) -> Result<SectorKey> {
        self.sector_group.create_sector(aabb)
    }

    pub fn create_sector_with_depth(&mut self, aabb: AABB, octree_depth: u32) -> Result<SectorKey> {
        self.sector_group.create_sector_with_depth(aabb, octree_depth)
    }

    pub fn create_portal(&mut self, a: SectorKey, b: SectorKey, shape: CollisionShape) -> Result<PortalKey> {
        self.sector_group.create_portal(a, b, shape)
    }

    pub fn set_portal_shape(&mut self, key: PortalKey, shape: CollisionShape) -> Result<()> {
        self.sector_group.set_portal_shape(key, shape)
    }

    pub fn remove_portal(&mut self, key: PortalKey) -> Result<()> {
        self.sector_group.remove_portal(key)
    }

    /// Remove a sector; the spatials it held are placed again elsewhere.
    pub fn remove_sector(&mut self, key: SectorKey) -> Result<()> {
        self.sector_group.remove_sector(&mut self.nodes, key)
    }

    pub fn sector_group(&self) -> &SectorGroup {
        &self.sector_group
    }

    // ===== NODES =====

    /// Add a node and place its spatial (if any).
    pub fn create_node(&mut self, desc: SceneNodeDesc) -> SceneNodeKey {
        let key = self.nodes.insert(SceneNode::new(desc, self.timestamp));
        self.sector_group.place_scene_node(&mut self.nodes, key);
        key
    }

    /// Remove a node, taking its spatial out of its octree first.
    pub fn remove_node(&mut self, key: SceneNodeKey) -> Result<()> {
        if !self.nodes.contains_key(key) {
            engine_bail!(InvalidSceneNode, "galaxy3d::Scene", "Scene node {:?} not found", key);
        }
        self.sector_group.remove_scene_node(&mut self.nodes, key);
        self.nodes.remove(key);
        engine_debug!("galaxy3d::Scene", "Removed scene node {:?}", key);
        Ok(())
    }

    /// Move a node and re-place it. Returns the sector it ended up in.
    pub fn set_world_transform(&mut self, key: SceneNodeKey, world_transform: Mat4) -> Result<Option<SectorKey>> {
        let Some(node) = self.nodes.get_mut(key) else {
            engine_bail!(InvalidSceneNode, "galaxy3d::Scene", "Scene node {:?} not found", key);
        };
        node.set_world_transform(world_transform, self.timestamp);
        Ok(self.sector_group.place_scene_node(&mut self.nodes, key))
    }

    /// Place a node again without moving it.
    pub fn place_scene_node(&mut self, key: SceneNodeKey) -> Result<Option<SectorKey>> {
        if !self.nodes.contains_key(key) {
            engine_bail!(InvalidSceneNode, "galaxy3d::Scene", "Scene node {:?} not found", key);
        }
        Ok(self.sector_group.place_scene_node(&mut self.nodes, key))
    }

    /// Replace the node's flags. Takes effect at the next visibility query.
    pub fn set_node_flags(&mut self, key: SceneNodeKey, flags: NodeFlags) -> Result<()> {
        let Some(node) = self.nodes.get_mut(key) else {
            engine_bail!(InvalidSceneNode, "galaxy3d::Scene", "Scene node {:?} not found", key);
        };
        node.set_flags(flags);
        Ok(())
    }

    /// Replace the projection of a camera or light node.
    pub fn set_projection(&mut self, key: SceneNodeKey, projection: Mat4) -> Result<()> {
        let Some(node) = self.nodes.get_mut(key) else {
            engine_bail!(InvalidSceneNode, "galaxy3d::Scene", "Scene node {:?} not found", key);
        };
        if !node.set_projection(projection) {
            engine_bail!(InvalidSceneNode, "galaxy3d::Scene", "Scene node '{}' has no frustum", node.name());
        }
        Ok(())
    }

    /// Run a visibility query for the frustum of `owner`.
    ///
    /// The results are also kept on the owner's Frustumable until the next
    /// `begin_frame`.
    pub fn do_visibility_tests(
        &mut self,
        owner: SceneNodeKey,
        test: VisibilityTest,
        culler: Option<&dyn PortalCuller>,
    ) -> VisibilityTestResults {
        let results = self.sector_group.do_visibility_tests(
            &mut self.nodes, owner, test, culler, self.timestamp,
        );

        if let Some(frustumable) = self.nodes.get_mut(owner).and_then(|n| n.frustumable_mut()) {
            frustumable.set_visibility_results(results.clone());
        }
        results
    }

    pub fn node(&self, key: SceneNodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (SceneNodeKey, &SceneNode)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
