/// SectorGroup - owner of all sectors and portals.
///
/// Routes spatial placement to the right sector and answers visibility
/// queries by walking the portal graph from the querying node's sector.
///
/// Sectors and portals live in slot maps; insertion-ordered key lists keep
/// iteration (and therefore placement tie-breaks and traversal order)
/// deterministic.

use std::collections::VecDeque;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::collision::{AABB, CollisionShape, Frustum};
use crate::error::Result;
use crate::{engine_bail, engine_debug, engine_trace, engine_warn};
use super::culler::PortalCuller;
use super::octree::DEFAULT_OCTREE_DEPTH;
use super::portal::{Portal, PortalKey};
use super::scene_node::{NodeFlags, SceneNodeKey, SceneNodes};
use super::sector::{Sector, SectorKey};
use super::spatial::OctreeNodeRef;
use super::visibility::{VisibilityTest, VisibilityTestResults};

pub struct SectorGroup {
    sectors: SlotMap<SectorKey, Sector>,
    portals: SlotMap<PortalKey, Portal>,
    /// Sector keys in creation order
    sector_order: Vec<SectorKey>,
    /// Portal keys in creation order
    portal_order: Vec<PortalKey>,
    /// Octree depth used by `create_sector`
    default_octree_depth: u32,
}

impl Default for SectorGroup {
    fn default() -> Self {
        Self::new(DEFAULT_OCTREE_DEPTH)
    }
}

impl SectorGroup {
    pub fn new(default_octree_depth: u32) -> Self {
        Self {
            sectors: SlotMap::with_key(),
            portals: SlotMap::with_key(),
            sector_order: Vec::new(),
            portal_order: Vec::new(),
            default_octree_depth,
        }
    }

    pub fn default_octree_depth(&self) -> u32 {
        self.default_octree_depth
    }

    // ===== SECTORS & PORTALS =====

    /// Create a sector covering `aabb` with the default octree depth.
    pub fn create_sector(&mut self, aabb: AABB) -> Result<SectorKey> {
        self.create_sector_with_depth(aabb, self.default_octree_depth)
    }

    /// Create a sector covering `aabb`.
    ///
    /// Fails on degenerate bounds or a depth above `MAX_OCTREE_DEPTH`.
    pub fn create_sector_with_depth(&mut self, aabb: AABB, octree_depth: u32) -> Result<SectorKey> {
        let sector = Sector::new(aabb, octree_depth)?;
        let key = self.sectors.insert(sector);
        self.sector_order.push(key);

        engine_debug!("galaxy3d::SectorGroup",
            "Created sector {:?} ({:?} .. {:?}, depth {})", key, aabb.min, aabb.max, octree_depth);
        Ok(key)
    }

    /// Connect two sectors through an opening bounded by `shape` (world space).
    ///
    /// Both sectors must belong to this group. A portal from a sector to
    /// itself is accepted but never traversed.
    pub fn create_portal(&mut self, a: SectorKey, b: SectorKey, shape: CollisionShape) -> Result<PortalKey> {
        for sector in [a, b] {
            if !self.sectors.contains_key(sector) {
                engine_bail!(InvalidPortal, "galaxy3d::SectorGroup",
                    "Portal references unknown sector {:?}", sector);
            }
        }

        if a == b {
            engine_warn!("galaxy3d::SectorGroup",
                "Portal connects sector {:?} to itself, it will be ignored by traversal", a);
        }

        let key = self.portals.insert(Portal::new(a, b, shape));
        self.portal_order.push(key);

        for sector in [a, b] {
            if let Some(sector) = self.sectors.get_mut(sector) {
                sector.attach_portal(key);
            }
        }

        engine_debug!("galaxy3d::SectorGroup", "Created portal {:?} between {:?} and {:?}", key, a, b);
        Ok(key)
    }

    /// Replace a portal's shape (the opening moved).
    pub fn set_portal_shape(&mut self, key: PortalKey, shape: CollisionShape) -> Result<()> {
        let Some(portal) = self.portals.get_mut(key) else {
            engine_bail!(InvalidPortal, "galaxy3d::SectorGroup", "Portal {:?} not found", key);
        };
        portal.set_shape(shape);
        Ok(())
    }

    /// Remove a portal and detach it from both sectors.
    pub fn remove_portal(&mut self, key: PortalKey) -> Result<()> {
        let Some(portal) = self.portals.remove(key) else {
            engine_bail!(InvalidPortal, "galaxy3d::SectorGroup", "Portal {:?} not found", key);
        };

        for sector in portal.sectors() {
            if let Some(sector) = self.sectors.get_mut(sector) {
                sector.detach_portal(key);
            }
        }
        self.portal_order.retain(|&p| p != key);
        Ok(())
    }

    /// Remove a sector, its portals, and re-place the spatials it held.
    ///
    /// Spatials that fit no other sector end up unplaced.
    pub fn remove_sector(&mut self, nodes: &mut SceneNodes, key: SectorKey) -> Result<()> {
        let Some(sector) = self.sectors.get(key) else {
            engine_bail!(InvalidSector, "galaxy3d::SectorGroup", "Sector {:?} not found", key);
        };

        let incident = sector.portals().to_vec();
        for portal in incident {
            self.remove_portal(portal)?;
        }

        let Some(mut sector) = self.sectors.remove(key) else {
            engine_bail!(InvalidSector, "galaxy3d::SectorGroup", "Sector {:?} not found", key);
        };
        self.sector_order.retain(|&s| s != key);

        let orphans: Vec<SceneNodeKey> = sector.octree().keys().collect();
        sector.clear_spatials();

        for node_key in orphans {
            if let Some(spatial) = nodes.get_mut(node_key).and_then(|n| n.spatial_mut()) {
                spatial.set_octree_node(None);
            }
            self.place_scene_node(nodes, node_key);
        }
        Ok(())
    }

    pub fn sector(&self, key: SectorKey) -> Option<&Sector> {
        self.sectors.get(key)
    }

    pub fn portal(&self, key: PortalKey) -> Option<&Portal> {
        self.portals.get(key)
    }

    /// Sectors in creation order.
    pub fn sectors(&self) -> impl Iterator<Item = (SectorKey, &Sector)> {
        self.sector_order
            .iter()
            .filter_map(move |&key| self.sectors.get(key).map(|s| (key, s)))
    }

    /// Portals in creation order.
    pub fn portals(&self) -> impl Iterator<Item = (PortalKey, &Portal)> {
        self.portal_order
            .iter()
            .filter_map(move |&key| self.portals.get(key).map(|p| (key, p)))
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn portal_count(&self) -> usize {
        self.portals.len()
    }

    // ===== PLACEMENT =====

    /// Sector that should own a spatial with bounds `aabb`.
    ///
    /// Every sector touching `aabb` is a candidate; the one with the smallest
    /// diagonal wins, the earliest created on ties. Preferring the smaller
    /// sector is a heuristic for nested rooms, not a containment rule.
    pub fn find_sector_for(&self, aabb: &AABB) -> Option<SectorKey> {
        let mut best: Option<(SectorKey, f32)> = None;

        for (key, sector) in self.sectors() {
            if !sector.aabb().intersects(aabb) {
                continue;
            }
            let size = sector.aabb().diagonal_length_squared();
            if best.map_or(true, |(_, best_size)| size < best_size) {
                best = Some((key, size));
            }
        }

        best.map(|(key, _)| key)
    }

    /// Place (or re-place) a node's spatial. Idempotent.
    ///
    /// Returns the sector it ended up in. A spatial that touches no sector is
    /// removed from its previous node and left unplaced.
    pub fn place_scene_node(&mut self, nodes: &mut SceneNodes, key: SceneNodeKey) -> Option<SectorKey> {
        let Some(spatial) = nodes.get_mut(key).and_then(|n| n.spatial_mut()) else {
            engine_debug!("galaxy3d::SectorGroup", "Scene node {:?} has no spatial to place", key);
            return None;
        };

        let aabb = *spatial.aabb();
        let previous = spatial.octree_node();

        let Some(target) = self.find_sector_for(&aabb) else {
            engine_warn!("galaxy3d::SectorGroup",
                "Spatial outside all sectors (node {:?}, {:?} .. {:?})", key, aabb.min, aabb.max);
            if let Some(prev) = previous {
                if let Some(sector) = self.sectors.get_mut(prev.sector) {
                    sector.remove_spatial(key);
                }
            }
            spatial.set_octree_node(None);
            return None;
        };

        if let Some(prev) = previous {
            if prev.sector != target {
                if let Some(sector) = self.sectors.get_mut(prev.sector) {
                    sector.remove_spatial(key);
                }
            }
        }

        let node = match self.sectors.get_mut(target) {
            Some(sector) => {
                if sector.place_spatial(key, &aabb) {
                    sector.octree().node_of(key)
                } else {
                    None
                }
            }
            None => None,
        };
        spatial.set_octree_node(node.map(|node| OctreeNodeRef { sector: target, node }));

        engine_trace!("galaxy3d::SectorGroup", "Placed node {:?} in sector {:?}", key, target);
        node.map(|_| target)
    }

    /// Take a node's spatial out of its sector. Returns false if it was not placed.
    pub fn remove_scene_node(&mut self, nodes: &mut SceneNodes, key: SceneNodeKey) -> bool {
        let Some(spatial) = nodes.get_mut(key).and_then(|n| n.spatial_mut()) else {
            return false;
        };

        let removed = match spatial.octree_node() {
            Some(prev) => self.sectors
                .get_mut(prev.sector)
                .map_or(false, |sector| sector.remove_spatial(key)),
            None => false,
        };
        spatial.set_octree_node(None);
        removed
    }

    // ===== VISIBILITY =====

    /// Drop last frame's visibility flags and stored results on every node.
    ///
    /// Call once per frame before the first `do_visibility_tests`.
    pub fn begin_frame(&self, nodes: &mut SceneNodes) {
        for node in nodes.values_mut() {
            node.begin_frame();
        }
    }

    /// Sectors reachable from `start` through portals inside `frustum`.
    ///
    /// Breadth-first: `start` first, then its neighbors, and so on. Self-loop
    /// portals and portals vetoed by `culler` are not crossed.
    pub fn visible_sectors(
        &self,
        start: SectorKey,
        frustum: &Frustum,
        culler: Option<&dyn PortalCuller>,
    ) -> Vec<SectorKey> {
        self.traverse_portals(start, |shape| frustum.intersects_shape(shape), culler)
    }

    fn traverse_portals<F>(
        &self,
        start: SectorKey,
        portal_inside: F,
        culler: Option<&dyn PortalCuller>,
    ) -> Vec<SectorKey>
    where
        F: Fn(&CollisionShape) -> bool,
    {
        if !self.sectors.contains_key(start) {
            return Vec::new();
        }

        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut order = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let Some(sector) = self.sectors.get(current) else {
                continue;
            };

            for &portal_key in sector.portals() {
                let Some(portal) = self.portals.get(portal_key) else {
                    continue;
                };
                if portal.is_self_loop() {
                    continue;
                }
                let Some(next) = portal.other(current) else {
                    continue;
                };
                if visited.contains(&next) || !portal_inside(portal.shape()) {
                    continue;
                }
                if let Some(culler) = culler {
                    if !culler.is_portal_visible(portal.shape()) {
                        engine_trace!("galaxy3d::SectorGroup", "Portal {:?} vetoed by culler", portal_key);
                        continue;
                    }
                }

                visited.insert(next);
                order.push(next);
                queue.push_back(next);
            }
        }

        order
    }

    /// Collect what the frustum of node `owner` sees.
    ///
    /// Starts in the owner's sector, expands through visible portals, then
    /// queries every reached octree. Matching spatials get the owner's
    /// visibility flag (camera or light). The owner never sees itself.
    ///
    /// An owner that is missing, has no frustum or spatial, or is not placed
    /// gets an empty result.
    pub fn do_visibility_tests(
        &self,
        nodes: &mut SceneNodes,
        owner: SceneNodeKey,
        test: VisibilityTest,
        culler: Option<&dyn PortalCuller>,
        timestamp: u64,
    ) -> VisibilityTestResults {
        let mut results = VisibilityTestResults::new(test, timestamp);

        let Some(node) = nodes.get(owner) else {
            engine_warn!("galaxy3d::SectorGroup", "Visibility test owner {:?} not found", owner);
            return results;
        };
        let Some(frustumable) = node.frustumable() else {
            engine_warn!("galaxy3d::SectorGroup", "Scene node '{}' has no frustum", node.name());
            return results;
        };
        let Some(start) = node.spatial().and_then(|s| s.sector()) else {
            engine_debug!("galaxy3d::SectorGroup",
                "Scene node '{}' is not placed in any sector, nothing visible", node.name());
            return results;
        };

        let visibility_flag = frustumable.kind().visibility_flag();
        let sectors = self.traverse_portals(start, |shape| frustumable.inside_frustum(shape), culler);

        let mut candidates = Vec::new();
        for &sector_key in &sectors {
            if let Some(sector) = self.sectors.get(sector_key) {
                sector.octree().query_frustum(frustumable.frustum(), &mut candidates);
            }
        }

        let mut seen = Vec::new();
        for key in candidates {
            if key == owner {
                continue;
            }
            let Some(candidate) = nodes.get(key) else {
                continue;
            };
            let inside = candidate.spatial().map_or(false, |s| frustumable.inside_frustum(s.shape()));
            if !inside {
                continue;
            }

            let flags = candidate.flags();
            let mut visible = false;

            if test.wants_renderables()
                && flags.contains(NodeFlags::RENDERABLE)
                && (!test.shadow_casters_only() || flags.contains(NodeFlags::SHADOW_CASTER))
            {
                results.push_renderable(key);
                visible = true;
            }
            if test.wants_lights() && flags.contains(NodeFlags::LIGHT) {
                results.push_light(key);
                visible = true;
            }
            if visible {
                seen.push(key);
            }
        }

        for key in seen {
            if let Some(spatial) = nodes.get_mut(key).and_then(|n| n.spatial_mut()) {
                spatial.set_visible(visibility_flag);
            }
        }

        engine_trace!("galaxy3d::SectorGroup",
            "Visibility for {:?}: {} sectors, {} renderables, {} lights",
            owner, sectors.len(), results.renderables().len(), results.lights().len());

        results.set_sectors(sectors);
        results
    }
}

#[cfg(test)]
#[path = "sector_group_tests.rs"]
mod tests;
