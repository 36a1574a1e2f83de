/// CollisionShape - the closed set of shapes the visibility core understands.
///
/// Every operation is a single `match`, so adding a shape forces every
/// dispatch site to handle it.

use glam::Mat4;
use super::aabb::AABB;
use super::obb::OBB;
use super::plane::Plane;
use super::ray::{LineSegment, Ray};
use super::sphere::Sphere;

/// Discriminant-only view of a shape, handy for logs and debug overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionShapeType {
    LineSegment,
    Ray,
    Plane,
    Sphere,
    Aabb,
    Obb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    LineSegment(LineSegment),
    Ray(Ray),
    Plane(Plane),
    Sphere(Sphere),
    Aabb(AABB),
    Obb(OBB),
}

impl CollisionShape {
    pub fn shape_type(&self) -> CollisionShapeType {
        match self {
            CollisionShape::LineSegment(_) => CollisionShapeType::LineSegment,
            CollisionShape::Ray(_) => CollisionShapeType::Ray,
            CollisionShape::Plane(_) => CollisionShapeType::Plane,
            CollisionShape::Sphere(_) => CollisionShapeType::Sphere,
            CollisionShape::Aabb(_) => CollisionShapeType::Aabb,
            CollisionShape::Obb(_) => CollisionShapeType::Obb,
        }
    }

    /// 0 if the shape crosses `plane`, otherwise the signed distance of its
    /// closest point (positive in front, negative behind).
    pub fn test_plane(&self, plane: &Plane) -> f32 {
        match self {
            CollisionShape::LineSegment(s) => s.test_plane(plane),
            CollisionShape::Ray(r) => r.test_plane(plane),
            CollisionShape::Plane(p) => p.test_plane(plane),
            CollisionShape::Sphere(s) => s.test_plane(plane),
            CollisionShape::Aabb(b) => b.test_plane(plane),
            CollisionShape::Obb(b) => b.test_plane(plane),
        }
    }

    /// World AABB enclosing the shape (unbounded for planes and rays).
    pub fn to_aabb(&self) -> AABB {
        match self {
            CollisionShape::LineSegment(s) => s.to_aabb(),
            CollisionShape::Ray(r) => r.to_aabb(),
            CollisionShape::Plane(_) => AABB::unbounded(),
            CollisionShape::Sphere(s) => s.to_aabb(),
            CollisionShape::Aabb(b) => *b,
            CollisionShape::Obb(b) => b.to_aabb(),
        }
    }

    /// Shape moved into the space described by `matrix`.
    ///
    /// An AABB stays axis-aligned (it grows to enclose the rotated box).
    pub fn transformed(&self, matrix: &Mat4) -> CollisionShape {
        match self {
            CollisionShape::LineSegment(s) => CollisionShape::LineSegment(s.transformed(matrix)),
            CollisionShape::Ray(r) => CollisionShape::Ray(r.transformed(matrix)),
            CollisionShape::Plane(p) => CollisionShape::Plane(p.transformed(matrix)),
            CollisionShape::Sphere(s) => CollisionShape::Sphere(s.transformed(matrix)),
            CollisionShape::Aabb(b) => CollisionShape::Aabb(b.transformed(matrix)),
            CollisionShape::Obb(b) => CollisionShape::Obb(b.transformed(matrix)),
        }
    }
}

impl From<LineSegment> for CollisionShape {
    fn from(s: LineSegment) -> Self {
        CollisionShape::LineSegment(s)
    }
}

impl From<Ray> for CollisionShape {
    fn from(r: Ray) -> Self {
        CollisionShape::Ray(r)
    }
}

impl From<Plane> for CollisionShape {
    fn from(p: Plane) -> Self {
        CollisionShape::Plane(p)
    }
}

impl From<Sphere> for CollisionShape {
    fn from(s: Sphere) -> Self {
        CollisionShape::Sphere(s)
    }
}

impl From<AABB> for CollisionShape {
    fn from(b: AABB) -> Self {
        CollisionShape::Aabb(b)
    }
}

impl From<OBB> for CollisionShape {
    fn from(b: OBB) -> Self {
        CollisionShape::Obb(b)
    }
}

#[cfg(test)]
#[path = "shape_tests.rs"]
mod tests;
