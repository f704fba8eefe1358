//! Ray-surface interaction.
//!
//! Defines the [`Surface`] trait shared by spheres and the light source, and
//! the [`Hit`] records produced by intersection tests.

use glam::Vec3A;
use smallvec::SmallVec;

use crate::ray::Ray;
use crate::shading::Color;
use crate::tracer::Tracer;

/// A point where a ray crosses a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Signed distance from the ray origin, projected on the ray direction.
    pub distance: f32,
    /// World position of the crossing.
    pub point: Vec3A,
}

/// Crossings ahead of a ray origin, nearest first. A sphere has at most two.
pub type Intersections = SmallVec<[Hit; 2]>;

/// Position of a surface in the scene's object list.
///
/// Used to exclude the surface a reflected ray was spawned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

/// An object that can be hit by rays and contribute a colour.
///
/// Must be thread-safe (Sync + Send) so a scene can be shared by parallel
/// render workers.
pub trait Surface: Send + Sync {
    /// Crossings of `ray` lying ahead of its origin, nearest first.
    ///
    /// Returns `None` when the ray misses.
    fn intersect(&self, ray: &Ray) -> Option<Intersections>;

    /// Unit outward normal at a point on the surface.
    fn normal_at(&self, point: Vec3A) -> Vec3A;

    /// Base colour at a point on the surface.
    fn color_at(&self, point: Vec3A) -> Color;

    /// Share of the final colour taken from the mirrored ray, in [0, 1].
    fn reflectivity(&self) -> f32;

    /// Colour this surface contributes for `ray`, or `None` if it is not hit.
    ///
    /// `id` is this surface's own position in the scene so that reflected rays
    /// can skip it; `depth` counts reflections so far.
    fn color_for(&self, ray: &Ray, tracer: &Tracer, id: SurfaceId, depth: u32) -> Option<Color>;

    /// Nearest crossing ahead of the ray origin.
    fn nearest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.intersect(ray).and_then(|hits| hits.first().copied())
    }
}
