/// VisibilityTestResults - outcome of one visibility query.
///
/// Created by `SectorGroup::do_visibility_tests`. Holds the sectors reached
/// through portals and the keys of the visible nodes, split into
/// renderables and lights.
///
/// Ephemeral: valid for the frame it was produced in.

use bitflags::bitflags;
use super::scene_node::SceneNodeKey;
use super::sector::SectorKey;

bitflags! {
    /// What a visibility query collects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VisibilityTest: u32 {
        /// Nodes flagged RENDERABLE
        const RENDERABLES = 1 << 0;
        /// Only renderables that also cast shadows (implies RENDERABLES)
        const ONLY_SHADOW_CASTERS = 1 << 1;
        /// Nodes flagged LIGHT
        const LIGHTS = 1 << 2;
    }
}

impl VisibilityTest {
    pub fn wants_renderables(self) -> bool {
        self.intersects(Self::RENDERABLES | Self::ONLY_SHADOW_CASTERS)
    }

    pub fn wants_lights(self) -> bool {
        self.contains(Self::LIGHTS)
    }

    pub fn shadow_casters_only(self) -> bool {
        self.contains(Self::ONLY_SHADOW_CASTERS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityTestResults {
    test: VisibilityTest,
    timestamp: u64,
    sectors: Vec<SectorKey>,
    renderables: Vec<SceneNodeKey>,
    lights: Vec<SceneNodeKey>,
}

impl VisibilityTestResults {
    /// Empty result for `test` at frame `timestamp`.
    pub(crate) fn new(test: VisibilityTest, timestamp: u64) -> Self {
        Self {
            test,
            timestamp,
            sectors: Vec::new(),
            renderables: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub(crate) fn set_sectors(&mut self, sectors: Vec<SectorKey>) {
        self.sectors = sectors;
    }

    pub(crate) fn push_renderable(&mut self, key: SceneNodeKey) {
        self.renderables.push(key);
    }

    pub(crate) fn push_light(&mut self, key: SceneNodeKey) {
        self.lights.push(key);
    }

    /// The query mask these results answer.
    pub fn test(&self) -> VisibilityTest {
        self.test
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Sectors reached, in traversal order (the owner's sector first).
    pub fn sectors(&self) -> &[SectorKey] {
        &self.sectors
    }

    pub fn renderables(&self) -> &[SceneNodeKey] {
        &self.renderables
    }

    pub fn lights(&self) -> &[SceneNodeKey] {
        &self.lights
    }

    /// True if `key` was found visible in either list.
    pub fn contains(&self, key: SceneNodeKey) -> bool {
        self.renderables.contains(&key) || self.lights.contains(&key)
    }

    /// Number of visible nodes (renderables + lights).
    pub fn len(&self) -> usize {
        self.renderables.len() + self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty() && self.lights.is_empty()
    }
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
