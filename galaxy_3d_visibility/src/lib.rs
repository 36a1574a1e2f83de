/*!
# Galaxy 3D Visibility

Sector/portal visibility core for the Galaxy 3D engine.

The world is split into convex **sectors**, each indexed by a static
**octree**. Sectors are linked by two-way **portals**. A camera or light
only sees what lies in its own sector plus the sectors reachable through
portals inside its frustum.

## Architecture

- **SectorGroup**: Owns sectors and portals, places spatials, runs visibility queries
- **Sector**: Bounds + octree + incident portals
- **Octree**: Static depth-bounded index, single-node placement
- **Spatial**: Placeable shape of a scene node (world AABB, octree back-reference)
- **Frustumable**: Frustum of a camera or light node
- **Scene**: Node storage and per-frame driver over a SectorGroup

Rendering, GPU resources and asset loading are left to the caller.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod collision;
pub mod scene;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logger slot)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Collision shapes and frustum
    pub mod collision {
        pub use crate::collision::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
