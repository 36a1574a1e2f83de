//! Debug line geometry for sectors, portals and occupied octree nodes.
//!
//! Produces a flat line list (two vertices per segment) ready to be copied
//! into a vertex buffer with `as_bytes`.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use crate::collision::AABB;
use super::octree::Octree;
use super::sector_group::SectorGroup;

pub const SECTOR_COLOR: Vec4 = Vec4::new(0.2, 0.8, 0.2, 1.0);
pub const PORTAL_COLOR: Vec4 = Vec4::new(0.9, 0.2, 0.9, 1.0);
pub const OCTREE_NODE_COLOR: Vec4 = Vec4::new(0.9, 0.7, 0.1, 1.0);

/// GPU layout: position (12 bytes) + color (16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// 12 box edges as corner index pairs (corner bit layout: bit0 = X, bit1 = Y, bit2 = Z).
const AABB_EDGES: [(usize, usize); 12] = [
    (0, 1), (2, 3), (4, 5), (6, 7),
    (0, 2), (1, 3), (4, 6), (5, 7),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

#[derive(Debug, Default, Clone)]
pub struct DebugLines {
    vertices: Vec<DebugVertex>,
}

impl DebugLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&mut self, from: Vec3, to: Vec3, color: Vec4) {
        let color = color.to_array();
        self.vertices.push(DebugVertex { position: from.to_array(), color });
        self.vertices.push(DebugVertex { position: to.to_array(), color });
    }

    /// Wireframe box. Unbounded or invalid boxes are skipped.
    pub fn add_aabb(&mut self, aabb: &AABB, color: Vec4) {
        let limit = Vec3::splat(f32::MAX);
        if !aabb.is_valid() || aabb.min.abs().cmpge(limit).any() || aabb.max.abs().cmpge(limit).any() {
            return;
        }

        let corners = aabb.corners();
        for (a, b) in AABB_EDGES {
            self.add_line(corners[a], corners[b], color);
        }
    }

    /// Boxes of every octree node holding at least one spatial.
    pub fn add_octree(&mut self, octree: &Octree, color: Vec4) {
        octree.for_each_node(|node| {
            if !node.spatials().is_empty() {
                self.add_aabb(node.aabb(), color);
            }
        });
    }

    /// Sectors, portals and occupied octree nodes of a whole group.
    pub fn add_sector_group(&mut self, group: &SectorGroup) {
        for (_, sector) in group.sectors() {
            self.add_aabb(sector.aabb(), SECTOR_COLOR);
            self.add_octree(sector.octree(), OCTREE_NODE_COLOR);
        }
        for (_, portal) in group.portals() {
            self.add_aabb(&portal.shape().to_aabb(), PORTAL_COLOR);
        }
    }

    pub fn vertices(&self) -> &[DebugVertex] {
        &self.vertices
    }

    /// Number of line segments.
    pub fn line_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Raw vertex bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
#[path = "debug_draw_tests.rs"]
mod tests;
