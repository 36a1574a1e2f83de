/// Sector - a convex region of the world with its own octree.
///
/// Sectors only exist inside a `SectorGroup` and are addressed by
/// `SectorKey`. The sector's bounds are the bounds of its octree root.

use slotmap::new_key_type;
use crate::collision::AABB;
use crate::error::Result;
use super::octree::Octree;
use super::portal::PortalKey;
use super::scene_node::SceneNodeKey;

new_key_type! {
    /// Stable key for a Sector within a SectorGroup.
    pub struct SectorKey;
}

pub struct Sector {
    octree: Octree,
    /// Incident portals, in creation order
    portals: Vec<PortalKey>,
}

impl Sector {
    pub(crate) fn new(aabb: AABB, octree_depth: u32) -> Result<Self> {
        Ok(Self {
            octree: Octree::new(aabb, octree_depth)?,
            portals: Vec::new(),
        })
    }

    pub fn aabb(&self) -> &AABB {
        self.octree.aabb()
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn portals(&self) -> &[PortalKey] {
        &self.portals
    }

    /// Insert or update a spatial in this sector's octree.
    ///
    /// Returns false (and leaves the octree untouched) when `aabb` does not
    /// touch the sector at all.
    pub fn place_spatial(&mut self, key: SceneNodeKey, aabb: &AABB) -> bool {
        if !self.aabb().intersects(aabb) {
            return false;
        }
        self.octree.place(key, aabb);
        true
    }

    pub fn remove_spatial(&mut self, key: SceneNodeKey) -> bool {
        self.octree.remove(key)
    }

    pub(crate) fn clear_spatials(&mut self) {
        self.octree.clear();
    }

    pub(crate) fn attach_portal(&mut self, portal: PortalKey) {
        if !self.portals.contains(&portal) {
            self.portals.push(portal);
        }
    }

    pub(crate) fn detach_portal(&mut self, portal: PortalKey) {
        self.portals.retain(|&p| p != portal);
    }
}
