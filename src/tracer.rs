//! Tracer: scene resolution and the per-pixel sampling loop.

use glam::Vec3A;
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::frame::Frame;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::Color;
use crate::surface::SurfaceId;

/// Reflection bounces followed before falling back to local shading.
pub const DEFAULT_MAX_DEPTH: u32 = 4;

/// Deepest reflection chain a tracer accepts. Each bounce is one level of
/// recursion, so this bounds stack use.
pub const MAX_REFLECTION_DEPTH: u32 = 64;

/// Colour resolved for one frame point. `None` means background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    /// Horizontal frame coordinate, growing to the right
    pub x: i32,
    /// Vertical frame coordinate, growing upwards
    pub y: i32,
    /// Resolved colour, if any surface contributed
    pub color: Option<Color>,
}

/// Renders a [`Scene`] as seen from a pinhole camera through a virtual frame.
///
/// The frame plane sits at `z = frame_z`; each pixel is one world unit wide.
/// Immutable once built, so one tracer can serve many parallel workers.
pub struct Tracer {
    scene: Scene,
    camera_location: Vec3A,
    frame_z: f32,
    max_depth: u32,
}

impl Tracer {
    /// Create a tracer with the default reflection depth.
    ///
    /// # Panics
    ///
    /// Panics if the camera lies on the frame plane, which would make primary
    /// rays degenerate.
    pub fn new(scene: Scene, camera_location: Vec3A, frame_z: f32) -> Self {
        assert!(
            camera_location.z != frame_z,
            "camera at {camera_location} lies on the frame plane z = {frame_z}"
        );
        Self {
            scene,
            camera_location,
            frame_z,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override how many reflections are followed.
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` exceeds [`MAX_REFLECTION_DEPTH`].
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        assert!(
            max_depth <= MAX_REFLECTION_DEPTH,
            "max depth {max_depth} exceeds the limit of {MAX_REFLECTION_DEPTH}"
        );
        self.max_depth = max_depth;
        self
    }

    /// Scene being rendered.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Pinhole position.
    pub fn camera_location(&self) -> Vec3A {
        self.camera_location
    }

    /// Depth of the frame plane.
    pub fn frame_z(&self) -> f32 {
        self.frame_z
    }

    /// Maximum reflection depth.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Resolve the colour seen along `ray`.
    ///
    /// Surfaces are asked in scene order and the first one that yields a
    /// colour wins, whether or not it is the nearest. `excluded` is skipped;
    /// reflected rays pass the surface they leave from.
    pub fn trace_ray(&self, ray: &Ray, excluded: Option<SurfaceId>, depth: u32) -> Option<Color> {
        self.scene
            .objects()
            .iter()
            .enumerate()
            .map(|(index, surface)| (SurfaceId(index), surface))
            .filter(|(id, _)| Some(*id) != excluded)
            .find_map(|(id, surface)| surface.color_for(ray, self, id, depth))
    }

    /// Ray from the camera through frame point `(x, y)`.
    pub fn primary_ray(&self, x: i32, y: i32) -> Ray {
        let frame_point = Vec3A::new(x as f32, y as f32, self.frame_z);
        Ray::towards(self.camera_location, frame_point)
    }

    /// Colour of frame point `(x, y)`.
    pub fn sample(&self, x: i32, y: i32) -> PixelSample {
        PixelSample {
            x,
            y,
            color: self.trace_ray(&self.primary_ray(x, y), None, 0),
        }
    }

    /// Lazily sample every pixel of a `width` x `height` frame, top row first,
    /// left to right.
    pub fn render(&self, width: u32, height: u32) -> PixelSamples<'_> {
        PixelSamples {
            tracer: self,
            frame: Frame::new(width, height),
            next: 0,
        }
    }

    /// Render a whole frame in parallel.
    ///
    /// Every worker writes only the pixel it traced. Channels keep the 0..255
    /// scale and are not clamped; missing colours are black.
    pub fn render_image(&self, width: u32, height: u32) -> ImageBuffer<Rgb<f32>, Vec<f32>> {
        let frame = Frame::new(width, height);
        let mut image: ImageBuffer<Rgb<f32>, Vec<f32>> = ImageBuffer::new(width, height);

        info!("Rendering {}x{} using {} CPU cores...", width, height, rayon::current_num_threads());
        debug!(
            "Camera at {}, frame plane z = {}, {} surfaces, max depth {}",
            self.camera_location,
            self.frame_z,
            self.scene.len(),
            self.max_depth
        );
        let generation_start = std::time::Instant::now();
        let pb = ProgressBar::new(frame.pixel_count() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        image.enumerate_pixels_mut().par_bridge().for_each(|(px, py, pixel)| {
            let (x, y) = frame.from_pixel(px, py);
            let color = self.sample(x, y).color.unwrap_or(Color::ZERO);
            *pixel = Rgb([color.x, color.y, color.z]);
            pb.inc(1);
        });

        pb.finish_and_clear();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        image
    }
}

/// Single-pass stream of [`PixelSample`]s produced by [`Tracer::render`].
pub struct PixelSamples<'a> {
    tracer: &'a Tracer,
    frame: Frame,
    next: usize,
}

impl PixelSamples<'_> {
    /// Frame being sampled.
    pub fn frame(&self) -> Frame {
        self.frame
    }
}

impl Iterator for PixelSamples<'_> {
    type Item = PixelSample;

    fn next(&mut self) -> Option<PixelSample> {
        if self.next >= self.frame.pixel_count() {
            return None;
        }
        let (x, y) = self.frame.scan_point(self.next);
        self.next += 1;
        Some(self.tracer.sample(x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.frame.pixel_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PixelSamples<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightSource;
    use crate::sphere::Sphere;
    use std::sync::Arc;

    const RED: Color = Color::new(200.5, 0.0, 0.0);
    const GREEN: Color = Color::new(0.0, 200.5, 0.0);
    const BLUE: Color = Color::new(0.0, 0.0, 200.5);

    /// Light far behind a camera at the origin looking down +z.
    fn backlit_scene() -> Scene {
        Scene::new(LightSource::new(Vec3A::new(0.0, 0.0, -1.0e4), 1.0, Color::splat(255.0)), 0.2, 0.8)
    }

    fn ray_down_z() -> Ray {
        Ray::new(Vec3A::ZERO, Vec3A::Z)
    }

    #[test]
    fn test_first_contributing_surface_wins() {
        let scene = backlit_scene()
            .with(Arc::new(Sphere::new(Vec3A::new(0.0, 0.0, 500.0), 20.0, BLUE, 0.0)))
            .with(Arc::new(Sphere::new(Vec3A::new(0.0, 0.0, 100.0), 20.0, RED, 0.0)));
        let tracer = Tracer::new(scene, Vec3A::new(0.0, 0.0, -10.0), 0.0);

        // The red sphere is nearer, but the blue one is listed first.
        let color = tracer.trace_ray(&ray_down_z(), None, 0).expect("both spheres are on the ray");
        assert_eq!(color.x, 0.0);
        assert!(color.z > 0.0);
    }

    #[test]
    fn test_excluded_surface_is_never_reported() {
        let mut scene = backlit_scene();
        let near = scene.add(Arc::new(Sphere::new(Vec3A::new(0.0, 0.0, 100.0), 20.0, RED, 0.0)));
        scene.add(Arc::new(Sphere::new(Vec3A::new(0.0, 0.0, 500.0), 20.0, BLUE, 0.0)));
        let tracer = Tracer::new(scene, Vec3A::new(0.0, 0.0, -10.0), 0.0);

        let unrestricted = tracer.trace_ray(&ray_down_z(), None, 0).expect("red hit");
        assert!(unrestricted.x > 0.0);

        let skipping = tracer.trace_ray(&ray_down_z(), Some(near), 0).expect("blue hit");
        assert_eq!(skipping.x, 0.0);
        assert!(skipping.z > 0.0);
    }

    #[test]
    fn test_nothing_on_the_ray_is_background() {
        let tracer = Tracer::new(backlit_scene(), Vec3A::new(0.0, 0.0, -10.0), 0.0);
        assert!(tracer.trace_ray(&Ray::new(Vec3A::ZERO, Vec3A::X), None, 0).is_none());
    }

    fn facing_mirrors() -> Scene {
        let light = LightSource::new(Vec3A::new(0.0, 1000.0, 0.0), 1.0, Color::splat(255.0));
        Scene::new(light, 0.2, 0.8)
            .with(Arc::new(Sphere::new(Vec3A::new(0.0, 0.0, 100.0), 10.0, RED, 0.5)))
            .with(Arc::new(Sphere::new(Vec3A::new(0.0, 0.0, -100.0), 10.0, GREEN, 0.5)))
    }

    #[test]
    fn test_facing_mirrors_terminate() {
        let tracer =
            Tracer::new(facing_mirrors(), Vec3A::new(0.0, 0.0, -50.0), 0.0).with_max_depth(MAX_REFLECTION_DEPTH);
        assert!(tracer.trace_ray(&ray_down_z(), None, 0).is_some());
    }

    #[test]
    fn test_depth_cap_falls_back_to_local_shading() {
        let flat = Tracer::new(facing_mirrors(), Vec3A::new(0.0, 0.0, -50.0), 0.0).with_max_depth(0);
        let local = flat.trace_ray(&ray_down_z(), None, 0).expect("red mirror");
        assert_eq!(local.y, 0.0);

        let deep = Tracer::new(facing_mirrors(), Vec3A::new(0.0, 0.0, -50.0), 0.0);
        let mirrored = deep.trace_ray(&ray_down_z(), None, 0).expect("red mirror");
        assert!(mirrored.y > 0.0, "green mirror should show up in the red one");
    }

    #[test]
    fn test_primary_ray_through_frame_point() {
        let tracer = Tracer::new(backlit_scene(), Vec3A::new(0.0, 0.0, -4.0), 0.0);
        let ray = tracer.primary_ray(3, 0);
        assert_eq!(ray.origin, Vec3A::new(0.0, 0.0, -4.0));
        assert!((ray.direction - Vec3A::new(0.6, 0.0, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_render_yields_every_pixel_in_scan_order() {
        let tracer = Tracer::new(backlit_scene(), Vec3A::new(0.0, 0.0, -100.0), 0.0);
        let samples = tracer.render(4, 2);
        assert_eq!(samples.len(), 8);

        let coords: Vec<(i32, i32)> = samples.map(|s| (s.x, s.y)).collect();
        assert_eq!(
            coords,
            vec![(-2, 1), (-1, 1), (0, 1), (1, 1), (-2, 0), (-1, 0), (0, 0), (1, 0)]
        );
    }

    #[test]
    #[should_panic(expected = "exceeds the limit")]
    fn test_depth_beyond_limit_is_rejected() {
        let _ = Tracer::new(facing_mirrors(), Vec3A::new(0.0, 0.0, -50.0), 0.0).with_max_depth(MAX_REFLECTION_DEPTH + 1);
    }

    #[test]
    #[should_panic(expected = "frame plane")]
    fn test_camera_on_frame_plane_is_rejected() {
        Tracer::new(backlit_scene(), Vec3A::new(0.0, 0.0, 5.0), 5.0);
    }
}
