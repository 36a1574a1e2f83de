/// Frustumable - the frustum-owning capability of camera and light nodes.
///
/// The world frustum is rebuilt whenever the owner moves or the projection
/// changes. The last visibility results are kept until the next frame.

use glam::Mat4;
use crate::collision::{CollisionShape, Frustum};
use super::spatial::SpatialFlags;
use super::visibility::VisibilityTestResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumKind {
    Camera,
    Light,
}

impl FrustumKind {
    /// Flag set on spatials seen by a frustum of this kind.
    pub fn visibility_flag(self) -> SpatialFlags {
        match self {
            FrustumKind::Camera => SpatialFlags::VISIBLE_CAMERA,
            FrustumKind::Light => SpatialFlags::VISIBLE_LIGHT,
        }
    }
}

/// Construction parameters of a Frustumable.
#[derive(Debug, Clone, Copy)]
pub struct FrustumableDesc {
    pub kind: FrustumKind,
    pub projection: Mat4,
}

#[derive(Debug, Clone)]
pub struct Frustumable {
    kind: FrustumKind,
    projection: Mat4,
    /// World-space frustum for the current transform
    frustum: Frustum,
    visibility_results: Option<VisibilityTestResults>,
}

impl Frustumable {
    pub fn new(kind: FrustumKind, projection: Mat4, world_transform: &Mat4) -> Self {
        Self {
            kind,
            projection,
            frustum: Frustum::from_projection_and_transform(&projection, world_transform),
            visibility_results: None,
        }
    }

    pub fn from_desc(desc: &FrustumableDesc, world_transform: &Mat4) -> Self {
        Self::new(desc.kind, desc.projection, world_transform)
    }

    pub fn kind(&self) -> FrustumKind {
        self.kind
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn set_projection(&mut self, projection: Mat4, world_transform: &Mat4) {
        self.projection = projection;
        self.update_transform(world_transform);
    }

    pub fn update_transform(&mut self, world_transform: &Mat4) {
        self.frustum = Frustum::from_projection_and_transform(&self.projection, world_transform);
    }

    /// Shape vs frustum, touching counts as inside.
    pub fn inside_frustum(&self, shape: &CollisionShape) -> bool {
        self.frustum.intersects_shape(shape)
    }

    /// Results of the last visibility query this frame.
    pub fn visibility_results(&self) -> Option<&VisibilityTestResults> {
        self.visibility_results.as_ref()
    }

    pub(crate) fn set_visibility_results(&mut self, results: VisibilityTestResults) {
        self.visibility_results = Some(results);
    }

    pub(crate) fn clear_visibility_results(&mut self) {
        self.visibility_results = None;
    }
}
