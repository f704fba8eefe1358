//! Scene description: one light, an ordered list of surfaces and the lighting
//! coefficients.

use std::sync::Arc;

use crate::light::LightSource;
use crate::surface::{Surface, SurfaceId};

/// Read-only collection of everything a render needs to resolve colours.
///
/// The light is also the first entry of [`Scene::objects`], so it can be hit
/// like any other surface. Both roles share one instance.
pub struct Scene {
    light: Arc<LightSource>,
    objects: Vec<Arc<dyn Surface>>,
    ambient_coeff: f32,
    diffuse_coeff: f32,
}

impl Scene {
    /// Id of the light in [`Scene::objects`].
    pub const LIGHT_ID: SurfaceId = SurfaceId(0);

    /// Create a scene holding only the light.
    ///
    /// # Panics
    ///
    /// Panics if either coefficient is not finite.
    pub fn new(light: LightSource, ambient_coeff: f32, diffuse_coeff: f32) -> Self {
        assert!(
            ambient_coeff.is_finite() && diffuse_coeff.is_finite(),
            "lighting coefficients must be finite, got ambient {ambient_coeff} and diffuse {diffuse_coeff}"
        );
        let light = Arc::new(light);
        let objects: Vec<Arc<dyn Surface>> = vec![light.clone() as Arc<dyn Surface>];
        Self {
            light,
            objects,
            ambient_coeff,
            diffuse_coeff,
        }
    }

    /// Append a surface. Surfaces are resolved in insertion order.
    pub fn add(&mut self, surface: Arc<dyn Surface>) -> SurfaceId {
        self.objects.push(surface);
        SurfaceId(self.objects.len() - 1)
    }

    /// Builder-style variant of [`Scene::add`].
    pub fn with(mut self, surface: Arc<dyn Surface>) -> Self {
        self.add(surface);
        self
    }

    /// The single light source.
    pub fn light(&self) -> &LightSource {
        &self.light
    }

    /// Every surface, light first, in resolution order.
    pub fn objects(&self) -> &[Arc<dyn Surface>] {
        &self.objects
    }

    /// Weight of the unconditional ambient term.
    pub fn ambient_coeff(&self) -> f32 {
        self.ambient_coeff
    }

    /// Weight of the Lambertian term.
    pub fn diffuse_coeff(&self) -> f32 {
        self.diffuse_coeff
    }

    /// Number of surfaces, light included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Always false: a scene holds at least its light.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
