/// Octree - static, depth-bounded spatial index of one sector.
///
/// Single-node placement: each spatial is stored in exactly one node, the
/// deepest one whose AABB fully contains the spatial's AABB. A spatial that
/// straddles a child boundary stays in the parent. A spatial that only
/// partially overlaps the root is stored at the root.
///
/// Benefits:
/// - No duplication, so query results never need deduplication
/// - O(depth) placement and O(1) removal (reverse lookup map)
///
/// All nodes are pre-allocated at construction in depth-first order:
/// the subtree of a node occupies a contiguous range right after it.

use rustc_hash::FxHashMap;
use glam::Vec3;
use crate::collision::{AABB, Frustum, FrustumTest};
use crate::error::Result;
use crate::engine_bail;
use super::scene_node::SceneNodeKey;

/// Deepest octree a sector may request (8^6 leaves).
pub const MAX_OCTREE_DEPTH: u32 = 6;

/// Depth used when the caller does not pick one.
pub const DEFAULT_OCTREE_DEPTH: u32 = 3;

/// Index of the root node in the flat node array.
const ROOT: usize = 0;

/// A single node in the octree.
struct OctreeNode {
    /// World-space AABB of this node
    aabb: AABB,
    /// Root = 0
    depth: u32,
    /// Index of the first child in the flat array (0 = no children / leaf)
    first_child: usize,
    /// Spatials that fit this node but none of its children
    spatials: Vec<SceneNodeKey>,
}

/// Static octree spatial index.
pub struct Octree {
    /// Flat array of all octree nodes (pre-allocated)
    nodes: Vec<OctreeNode>,
    /// Maximum depth of the tree (root = depth 0)
    max_depth: u32,
    /// Reverse lookup: spatial key → (node index, world AABB)
    locations: FxHashMap<SceneNodeKey, (usize, AABB)>,
    /// subtree_sizes[d] = total node count for a subtree of depth d
    subtree_sizes: Vec<usize>,
}

impl Octree {
    /// Create a static octree covering `aabb`.
    ///
    /// # Arguments
    ///
    /// * `aabb` - World-space bounds, must have a positive size on every axis
    /// * `max_depth` - Maximum tree depth (root = 0), at most `MAX_OCTREE_DEPTH`.
    ///   Total nodes = (8^(d+1) - 1) / 7.
    pub fn new(aabb: AABB, max_depth: u32) -> Result<Self> {
        if !aabb.is_valid() || aabb.size().min_element() <= 0.0 {
            engine_bail!(InvalidParameter, "galaxy3d::Octree",
                "Degenerate octree bounds {:?} .. {:?}", aabb.min, aabb.max);
        }
        if max_depth > MAX_OCTREE_DEPTH {
            engine_bail!(InvalidParameter, "galaxy3d::Octree",
                "Octree depth {} exceeds maximum {}", max_depth, MAX_OCTREE_DEPTH);
        }

        let total_nodes = Self::total_node_count(max_depth);
        let mut nodes = Vec::with_capacity(total_nodes);
        Self::build_recursive(&mut nodes, &aabb, 0, max_depth);

        debug_assert_eq!(nodes.len(), total_nodes);

        let subtree_sizes: Vec<usize> = (0..=max_depth).map(Self::total_node_count).collect();

        Ok(Self {
            nodes,
            max_depth,
            locations: FxHashMap::default(),
            subtree_sizes,
        })
    }

    /// Total number of nodes for a given depth: (8^(d+1) - 1) / 7
    fn total_node_count(max_depth: u32) -> usize {
        let mut count = 0usize;
        let mut level_count = 1usize;
        for _ in 0..=max_depth {
            count += level_count;
            level_count *= 8;
        }
        count
    }

    fn build_recursive(
        nodes: &mut Vec<OctreeNode>,
        aabb: &AABB,
        depth: u32,
        max_depth: u32,
    ) {
        let node_index = nodes.len();
        nodes.push(OctreeNode {
            aabb: *aabb,
            depth,
            first_child: 0,
            spatials: Vec::new(),
        });

        if depth >= max_depth {
            return;
        }

        let center = aabb.center();
        nodes[node_index].first_child = nodes.len();

        for octant in 0..8u8 {
            let child_aabb = Self::octant_aabb(aabb, &center, octant);
            Self::build_recursive(nodes, &child_aabb, depth + 1, max_depth);
        }
    }

    /// AABB of octant 0–7. Bit layout: bit0 = X, bit1 = Y, bit2 = Z
    /// (0 = low half, 1 = high half).
    fn octant_aabb(parent: &AABB, center: &Vec3, octant: u8) -> AABB {
        AABB {
            min: Vec3::new(
                if octant & 1 == 0 { parent.min.x } else { center.x },
                if octant & 2 == 0 { parent.min.y } else { center.y },
                if octant & 4 == 0 { parent.min.z } else { center.z },
            ),
            max: Vec3::new(
                if octant & 1 == 0 { center.x } else { parent.max.x },
                if octant & 2 == 0 { center.y } else { parent.max.y },
                if octant & 4 == 0 { center.z } else { parent.max.z },
            ),
        }
    }

    /// Octant a point falls into relative to `center` (same bit layout).
    fn point_octant(center: &Vec3, point: &Vec3) -> u8 {
        ((point.x >= center.x) as u8)
            | (((point.y >= center.y) as u8) << 1)
            | (((point.z >= center.z) as u8) << 2)
    }

    /// Offset of octant `i` in the depth-first layout, relative to the
    /// parent's first child.
    fn subtree_offset(&self, octant: u8, remaining_depth: u32) -> usize {
        octant as usize * self.subtree_sizes[remaining_depth as usize]
    }

    /// Deepest node that fully contains `aabb` (root if it does not fit the root).
    ///
    /// If both AABB corners fall in the same octant the box fits entirely in
    /// that child, otherwise it straddles a boundary and stays here.
    fn find_target_node(&self, aabb: &AABB) -> usize {
        if !self.nodes[ROOT].aabb.contains(aabb) {
            return ROOT;
        }

        let mut node_idx = ROOT;
        let mut depth = 0;

        loop {
            let first_child = self.nodes[node_idx].first_child;
            if depth >= self.max_depth || first_child == 0 {
                return node_idx;
            }

            let center = self.nodes[node_idx].aabb.center();
            let min_oct = Self::point_octant(&center, &aabb.min);
            let max_oct = Self::point_octant(&center, &aabb.max);

            if min_oct != max_oct {
                return node_idx;
            }

            node_idx = first_child + self.subtree_offset(min_oct, self.max_depth - depth - 1);
            depth += 1;
        }
    }

    // ===== PLACEMENT =====

    /// Insert or move a spatial. Returns the node index it now lives in.
    ///
    /// When the target node is unchanged only the stored AABB is refreshed.
    pub fn place(&mut self, key: SceneNodeKey, aabb: &AABB) -> usize {
        let target = self.find_target_node(aabb);

        if let Some(entry) = self.locations.get_mut(&key) {
            if entry.0 == target {
                entry.1 = *aabb;
                return target;
            }
        }

        self.remove(key);
        self.nodes[target].spatials.push(key);
        self.locations.insert(key, (target, *aabb));
        target
    }

    /// Remove a spatial. Returns false if it was not in this octree.
    pub fn remove(&mut self, key: SceneNodeKey) -> bool {
        match self.locations.remove(&key) {
            Some((node_idx, _)) => {
                let spatials = &mut self.nodes[node_idx].spatials;
                if let Some(pos) = spatials.iter().position(|&k| k == key) {
                    spatials.swap_remove(pos);
                }
                true
            }
            None => false,
        }
    }

    /// Node index holding `key`.
    pub fn node_of(&self, key: SceneNodeKey) -> Option<usize> {
        self.locations.get(&key).map(|&(node, _)| node)
    }

    pub fn contains(&self, key: SceneNodeKey) -> bool {
        self.locations.contains_key(&key)
    }

    /// Remove every spatial, keeping the node structure.
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.spatials.clear();
        }
        self.locations.clear();
    }

    /// Number of spatials stored.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Keys of all stored spatials (unordered).
    pub fn keys(&self) -> impl Iterator<Item = SceneNodeKey> + '_ {
        self.locations.keys().copied()
    }

    // ===== QUERY =====

    /// Append every spatial whose AABB may be inside `frustum` to `results`.
    ///
    /// 3-way classification at each node:
    /// - `Outside` → skip the subtree
    /// - `Inside` → collect the subtree without further tests
    /// - `Partial` → test this node's spatials, recurse into children
    pub fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<SceneNodeKey>) {
        let root_class = frustum.classify_aabb(&self.nodes[ROOT].aabb);
        if root_class == FrustumTest::Outside {
            // Spatials overhanging the root can still reach the frustum
            self.test_spatials(ROOT, frustum, results);
            return;
        }
        self.query_recursive(ROOT, frustum, root_class, results);
    }

    fn query_recursive(
        &self,
        node_idx: usize,
        frustum: &Frustum,
        classification: FrustumTest,
        results: &mut Vec<SceneNodeKey>,
    ) {
        match classification {
            FrustumTest::Outside => {}

            FrustumTest::Inside => self.collect_all(node_idx, results),

            FrustumTest::Partial => {
                self.test_spatials(node_idx, frustum, results);

                for child_idx in self.child_indices(node_idx) {
                    let child_class = frustum.classify_aabb(&self.nodes[child_idx].aabb);
                    self.query_recursive(child_idx, frustum, child_class, results);
                }
            }
        }
    }

    fn test_spatials(&self, node_idx: usize, frustum: &Frustum, results: &mut Vec<SceneNodeKey>) {
        for &key in &self.nodes[node_idx].spatials {
            if let Some((_, aabb)) = self.locations.get(&key) {
                if frustum.intersects_aabb(aabb) {
                    results.push(key);
                }
            }
        }
    }

    /// Whole subtree, no frustum test. Depth-first layout makes it one range.
    fn collect_all(&self, node_idx: usize, results: &mut Vec<SceneNodeKey>) {
        let depth = self.nodes[node_idx].depth;
        let end = node_idx + self.subtree_sizes[(self.max_depth - depth) as usize];
        for node in &self.nodes[node_idx..end] {
            results.extend_from_slice(&node.spatials);
        }
    }

    fn child_indices(&self, node_idx: usize) -> impl Iterator<Item = usize> + '_ {
        let node = &self.nodes[node_idx];
        let first_child = node.first_child;
        let count = if first_child == 0 { 0 } else { 8u8 };
        let remaining = self.max_depth.saturating_sub(node.depth + 1);
        (0..count).map(move |octant| first_child + self.subtree_offset(octant, remaining))
    }

    // ===== INSPECTION =====

    /// Bounds of the root node.
    pub fn aabb(&self) -> &AABB {
        &self.nodes[ROOT].aabb
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> OctreeNodeView<'_> {
        OctreeNodeView { octree: self, index: ROOT }
    }

    pub fn node(&self, index: usize) -> Option<OctreeNodeView<'_>> {
        (index < self.nodes.len()).then_some(OctreeNodeView { octree: self, index })
    }

    /// Visit every node in depth-first order (parents before children).
    pub fn for_each_node(&self, mut f: impl FnMut(OctreeNodeView<'_>)) {
        for index in 0..self.nodes.len() {
            f(OctreeNodeView { octree: self, index });
        }
    }
}

/// Read-only handle on one octree node, for debug drawing and inspection.
#[derive(Clone, Copy)]
pub struct OctreeNodeView<'a> {
    octree: &'a Octree,
    index: usize,
}

impl<'a> OctreeNodeView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn aabb(&self) -> &'a AABB {
        &self.octree.nodes[self.index].aabb
    }

    pub fn depth(&self) -> u32 {
        self.octree.nodes[self.index].depth
    }

    pub fn is_leaf(&self) -> bool {
        self.octree.nodes[self.index].first_child == 0
    }

    /// Spatials stored directly in this node.
    pub fn spatials(&self) -> &'a [SceneNodeKey] {
        &self.octree.nodes[self.index].spatials
    }

    /// The 8 children in octant order, empty for a leaf.
    pub fn children(&self) -> impl Iterator<Item = OctreeNodeView<'a>> + 'a {
        let octree = self.octree;
        octree
            .child_indices(self.index)
            .map(move |index| OctreeNodeView { octree, index })
    }
}

impl std::fmt::Debug for OctreeNodeView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctreeNodeView")
            .field("index", &self.index)
            .field("depth", &self.depth())
            .field("aabb", self.aabb())
            .field("spatials", &self.spatials().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
