//! Ray representation for recursive ray tracing.
//!
//! A ray is the half-line r(t) = origin + t * direction for t >= 0. Primary rays
//! start at the camera; reflected rays start on the surface that spawned them.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,

    /// Direction of travel.
    ///
    /// Expected to be unit length so that projection distances are world
    /// distances. Never zero: [`Ray::new`] rejects degenerate directions.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    ///
    /// # Panics
    ///
    /// Panics if `direction` is zero or not finite.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        assert!(
            direction.is_finite() && direction.length_squared() > 0.0,
            "ray direction must be a finite non-zero vector, got {direction}"
        );
        Self { origin, direction }
    }

    /// Create a ray from `origin` towards `target` with a unit direction.
    ///
    /// # Panics
    ///
    /// Panics if `target` coincides with `origin`.
    pub fn towards(origin: Vec3A, target: Vec3A) -> Self {
        let direction = (target - origin).try_normalize().unwrap_or_else(|| {
            panic!("cannot aim a ray from {origin} at itself")
        });
        Self::new(origin, direction)
    }

    /// Compute a point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Signed distance of `point`'s projection onto the ray, measured from the
    /// origin along the direction.
    pub fn projection(&self, point: Vec3A) -> f32 {
        (point - self.origin).dot(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3A::new(1.0, 2.0, 3.0), Vec3A::Z);
        assert_eq!(ray.at(0.0), Vec3A::new(1.0, 2.0, 3.0));
        assert_eq!(ray.at(2.0), Vec3A::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn test_towards_is_unit_length() {
        let ray = Ray::towards(Vec3A::ZERO, Vec3A::new(3.0, 0.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert!((ray.direction.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_projection_sign() {
        let ray = Ray::new(Vec3A::ZERO, Vec3A::X);
        assert_eq!(ray.projection(Vec3A::new(5.0, 3.0, 0.0)), 5.0);
        assert_eq!(ray.projection(Vec3A::new(-2.0, 1.0, 0.0)), -2.0);
    }

    #[test]
    #[should_panic(expected = "ray direction")]
    fn test_zero_direction_is_rejected() {
        Ray::new(Vec3A::ONE, Vec3A::ZERO);
    }

    #[test]
    #[should_panic(expected = "at itself")]
    fn test_towards_same_point_is_rejected() {
        Ray::towards(Vec3A::ONE, Vec3A::ONE);
    }
}
