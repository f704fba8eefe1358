//! Whitted shading terms.
//!
//! Colours live on the 0..255 scale and are never clamped here; encoders clamp
//! when writing pixels. The surface shading routine in [`crate::sphere`]
//! combines these helpers into the final colour of a hit.

use glam::Vec3A;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Mirror `v` about the surface normal `n`.
///
/// `v` points into the surface, `n` is unit length. The result leaves the
/// surface on the same side as `n`.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Cosine between the normal and the direction to the light, floored at zero.
///
/// A point sitting exactly on the light position gets no direct light.
pub fn lambert(point: Vec3A, normal: Vec3A, light_position: Vec3A) -> f32 {
    (light_position - point)
        .try_normalize()
        .map_or(0.0, |to_light| to_light.dot(normal).max(0.0))
}

/// Ambient plus diffuse contribution for a surface of colour `base`.
pub fn diffuse(base: Color, shade: f32, ambient_coeff: f32, diffuse_coeff: f32) -> Color {
    base * (ambient_coeff + shade * diffuse_coeff)
}

/// Mix the local colour with the mirrored one by `reflectivity`.
pub fn blend(local: Color, reflected: Option<Color>, reflectivity: f32) -> Color {
    match reflected {
        Some(reflected) => local * (1.0 - reflectivity) + reflected * reflectivity,
        None => local,
    }
}

/// Drop the fractional part of every channel.
pub fn truncate(color: Color) -> Color {
    color.trunc()
}
