//! Sphere primitive for ray tracing.
//!
//! Solves the ray-sphere quadratic and implements the recursive Whitted shading
//! used by every non-emissive surface.

use glam::Vec3A;

use crate::interval::Interval;
use crate::ray::Ray;
use crate::shading::{self, Color};
use crate::surface::{Hit, Intersections, Surface, SurfaceId};
use crate::tracer::Tracer;

/// Sphere primitive defined by center, radius, colour and reflectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3A,
    radius: f32,
    color: Color,
    reflectivity: f32,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not a finite positive number or `reflectivity`
    /// lies outside [0, 1].
    pub fn new(center: Vec3A, radius: f32, color: Color, reflectivity: f32) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "sphere radius must be finite and positive, got {radius}"
        );
        assert!(
            (0.0..=1.0).contains(&reflectivity),
            "sphere reflectivity must lie in [0, 1], got {reflectivity}"
        );
        Self {
            center,
            radius,
            color,
            reflectivity,
        }
    }

    /// Center point of the sphere in world coordinates.
    pub fn center(&self) -> Vec3A {
        self.center
    }

    /// Radius of the sphere.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Constant surface colour.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl Surface for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Intersections> {
        // |P0 + tD - C|^2 = r^2 expanded into a quadratic in t
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let mut hits: Intersections = [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)]
            .into_iter()
            .map(|t| {
                let point = ray.at(t);
                Hit {
                    distance: ray.projection(point),
                    point,
                }
            })
            .filter(|hit| Interval::AHEAD.contains(hit.distance))
            .collect();

        if hits.is_empty() {
            return None;
        }
        hits.sort_by(|l, r| l.distance.total_cmp(&r.distance));
        Some(hits)
    }

    fn normal_at(&self, point: Vec3A) -> Vec3A {
        (point - self.center).normalize_or_zero()
    }

    fn color_at(&self, _point: Vec3A) -> Color {
        self.color
    }

    fn reflectivity(&self) -> f32 {
        self.reflectivity
    }

    fn color_for(&self, ray: &Ray, tracer: &Tracer, id: SurfaceId, depth: u32) -> Option<Color> {
        let hit = self.nearest_hit(ray)?;
        let normal = self.normal_at(hit.point);

        // A matte surface would weight the mirrored colour by zero anyway.
        let reflected = if self.reflectivity > 0.0 && depth < tracer.max_depth() {
            let mirrored = Ray::new(hit.point, shading::reflect(ray.direction, normal));
            tracer.trace_ray(&mirrored, Some(id), depth + 1)
        } else {
            None
        };

        let scene = tracer.scene();
        let shade = shading::lambert(hit.point, normal, scene.light().center());
        let local = shading::diffuse(
            self.color_at(hit.point),
            shade,
            scene.ambient_coeff(),
            scene.diffuse_coeff(),
        );

        Some(shading::truncate(shading::blend(local, reflected, self.reflectivity)))
    }
}
