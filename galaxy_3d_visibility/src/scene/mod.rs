//! Scene module
//!
//! Sectors, portals and their octrees, the scene nodes placed into them and
//! the portal-driven visibility queries.

mod culler;
mod debug_draw;
mod frustumable;
mod octree;
mod portal;
mod scene;
mod scene_node;
mod sector;
mod sector_group;
mod spatial;
mod visibility;

pub use culler::{PortalCuller, AcceptAllPortals, DistancePortalCuller};
pub use debug_draw::{
    DebugLines, DebugVertex,
    SECTOR_COLOR, PORTAL_COLOR, OCTREE_NODE_COLOR,
};
pub use frustumable::{Frustumable, FrustumableDesc, FrustumKind};
pub use octree::{Octree, OctreeNodeView, MAX_OCTREE_DEPTH, DEFAULT_OCTREE_DEPTH};
pub use portal::{Portal, PortalKey};
pub use scene::{Scene, SceneConfig};
pub use scene_node::{SceneNode, SceneNodeDesc, SceneNodeKey, SceneNodes, NodeFlags};
pub use sector::{Sector, SectorKey};
pub use sector_group::SectorGroup;
pub use spatial::{Spatial, SpatialFlags, OctreeNodeRef};
pub use visibility::{VisibilityTest, VisibilityTestResults};
