/// Portal - a two-way opening between two sectors.

use slotmap::new_key_type;
use crate::collision::CollisionShape;
use super::sector::SectorKey;

new_key_type! {
    /// Stable key for a Portal within a SectorGroup.
    pub struct PortalKey;
}

#[derive(Debug, Clone)]
pub struct Portal {
    sectors: [SectorKey; 2],
    /// World-space bounds of the opening (usually a thin OBB)
    shape: CollisionShape,
}

impl Portal {
    pub(crate) fn new(a: SectorKey, b: SectorKey, shape: CollisionShape) -> Self {
        Self { sectors: [a, b], shape }
    }

    pub fn sectors(&self) -> [SectorKey; 2] {
        self.sectors
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub(crate) fn set_shape(&mut self, shape: CollisionShape) {
        self.shape = shape;
    }

    /// The sector on the other side of `from`, None if `from` is not an end.
    pub fn other(&self, from: SectorKey) -> Option<SectorKey> {
        match self.sectors {
            [a, b] if a == from => Some(b),
            [a, b] if b == from => Some(a),
            _ => None,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.sectors[0] == self.sectors[1]
    }
}
