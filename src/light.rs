//! The scene's point light, modelled as a small emissive sphere.

use glam::Vec3A;

use crate::ray::Ray;
use crate::shading::Color;
use crate::sphere::Sphere;
use crate::surface::{Intersections, Surface, SurfaceId};
use crate::tracer::Tracer;

/// Emissive sphere. Its center is the light position used for diffuse shading.
///
/// Shares the sphere's geometry but never shades or reflects: a ray that hits
/// it sees the raw light colour.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSource {
    sphere: Sphere,
}

impl LightSource {
    /// Create a light at `center` drawn as a sphere of `radius`.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not a finite positive number.
    pub fn new(center: Vec3A, radius: f32, color: Color) -> Self {
        Self {
            sphere: Sphere::new(center, radius, color, 0.0),
        }
    }

    /// Light position.
    pub fn center(&self) -> Vec3A {
        self.sphere.center()
    }

    /// Emitted colour.
    pub fn color(&self) -> Color {
        self.sphere.color()
    }
}

impl Surface for LightSource {
    fn intersect(&self, ray: &Ray) -> Option<Intersections> {
        self.sphere.intersect(ray)
    }

    fn normal_at(&self, point: Vec3A) -> Vec3A {
        self.sphere.normal_at(point)
    }

    fn color_at(&self, point: Vec3A) -> Color {
        self.sphere.color_at(point)
    }

    fn reflectivity(&self) -> f32 {
        0.0
    }

    fn color_for(&self, ray: &Ray, _tracer: &Tracer, _id: SurfaceId, _depth: u32) -> Option<Color> {
        self.nearest_hit(ray).map(|hit| self.color_at(hit.point))
    }
}
