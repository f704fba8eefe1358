//! Scene files.
//!
//! A scene is described in TOML: the camera, the lighting coefficients, the
//! light and an ordered list of spheres. Spheres are resolved in file order,
//! after the light.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3A;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::LightSource;
use crate::scene::Scene;
use crate::sphere::Sphere;
use crate::tracer::{Tracer, DEFAULT_MAX_DEPTH, MAX_REFLECTION_DEPTH};

/// Three floats, as written in scene files.
pub type Vec3Data = [f32; 3];

/// Errors raised while loading a scene file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The path does not exist.
    #[error("Scene file not found: {0}")]
    NotFound(String),

    /// The file exists but could not be read.
    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or misses required keys.
    #[error("Failed to parse scene file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parse but describe an impossible scene.
    #[error("Scene validation error: {0}")]
    Validation(String),
}

/// Complete scene description.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    /// Camera and frame placement
    pub camera: CameraConfig,
    /// Shading coefficients
    #[serde(default)]
    pub lighting: LightingConfig,
    /// The single light
    pub light: LightConfig,
    /// Shaded spheres in resolution order
    #[serde(default)]
    pub spheres: Vec<SphereConfig>,
}

/// Pinhole position and frame placement.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CameraConfig {
    /// Pinhole position
    pub location: Vec3Data,
    /// Depth of the frame plane
    #[serde(default)]
    pub frame_z: f32,
    /// Reflection bounces to follow
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

/// Ambient and diffuse weights.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LightingConfig {
    /// Ambient weight
    #[serde(default = "default_ambient")]
    pub ambient: f32,
    /// Lambertian weight
    #[serde(default = "default_diffuse")]
    pub diffuse: f32,
}

/// The point light, drawn as a small emissive sphere.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LightConfig {
    /// Light position
    pub center: Vec3Data,
    /// Size of the visible emitter
    pub radius: f32,
    /// Emitted colour on the 0..255 scale
    pub color: Vec3Data,
}

/// One shaded sphere.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SphereConfig {
    /// Center position
    pub center: Vec3Data,
    /// Radius, positive
    pub radius: f32,
    /// Base colour on the 0..255 scale
    pub color: Vec3Data,
    /// Mirror weight in [0, 1]
    #[serde(default)]
    pub reflectivity: f32,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_ambient() -> f32 {
    0.2
}

fn default_diffuse() -> f32 {
    0.8
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: default_ambient(),
            diffuse: default_diffuse(),
        }
    }
}

impl Default for SceneConfig {
    /// Three spheres in front of a large mirror, lit from the upper left.
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                location: [0.0, 0.0, -1000.0],
                frame_z: 0.0,
                max_depth: DEFAULT_MAX_DEPTH,
            },
            lighting: LightingConfig::default(),
            light: LightConfig {
                center: [-600.0, 700.0, 200.0],
                radius: 30.0,
                color: [255.0, 255.0, 255.0],
            },
            spheres: vec![
                SphereConfig {
                    center: [-260.0, -60.0, 700.0],
                    radius: 160.0,
                    color: [220.0, 60.0, 50.0],
                    reflectivity: 0.1,
                },
                SphereConfig {
                    center: [120.0, -120.0, 500.0],
                    radius: 110.0,
                    color: [60.0, 180.0, 90.0],
                    reflectivity: 0.3,
                },
                SphereConfig {
                    center: [330.0, 60.0, 850.0],
                    radius: 180.0,
                    color: [70.0, 90.0, 230.0],
                    reflectivity: 0.2,
                },
                SphereConfig {
                    center: [0.0, 0.0, 2600.0],
                    radius: 1200.0,
                    color: [200.0, 200.0, 200.0],
                    reflectivity: 0.8,
                },
            ],
        }
    }
}

/// Load a scene description from a TOML file.
pub fn load_scene_config<P: AsRef<Path>>(path: P) -> Result<SceneConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    SceneConfig::from_toml(&content)
}

impl SceneConfig {
    /// Parse and validate a scene description.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the scene types would otherwise reject with a panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("camera.location", &self.camera.location)?;
        finite("camera.frame_z", &[self.camera.frame_z])?;
        if self.camera.location[2] == self.camera.frame_z {
            return Err(ConfigError::Validation(format!(
                "camera.location lies on the frame plane z = {}",
                self.camera.frame_z
            )));
        }
        if self.camera.max_depth > MAX_REFLECTION_DEPTH {
            return Err(ConfigError::Validation(format!(
                "camera.max_depth must be at most {MAX_REFLECTION_DEPTH}, got {}",
                self.camera.max_depth
            )));
        }

        for (name, value) in [("lighting.ambient", self.lighting.ambient), ("lighting.diffuse", self.lighting.diffuse)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        finite("light.center", &self.light.center)?;
        finite("light.color", &self.light.color)?;
        positive_radius("light.radius", self.light.radius)?;

        for (index, sphere) in self.spheres.iter().enumerate() {
            let prefix = format!("spheres[{index}]");
            finite(&format!("{prefix}.center"), &sphere.center)?;
            finite(&format!("{prefix}.color"), &sphere.color)?;
            positive_radius(&format!("{prefix}.radius"), sphere.radius)?;
            if !(0.0..=1.0).contains(&sphere.reflectivity) {
                return Err(ConfigError::Validation(format!(
                    "{prefix}.reflectivity must lie in [0, 1], got {}",
                    sphere.reflectivity
                )));
            }
        }

        Ok(())
    }

    /// Build the scene in file order.
    pub fn build_scene(&self) -> Result<Scene, ConfigError> {
        self.validate()?;

        let light = LightSource::new(
            Vec3A::from_array(self.light.center),
            self.light.radius,
            Vec3A::from_array(self.light.color),
        );
        let mut scene = Scene::new(light, self.lighting.ambient, self.lighting.diffuse);
        for sphere in &self.spheres {
            scene.add(Arc::new(Sphere::new(
                Vec3A::from_array(sphere.center),
                sphere.radius,
                Vec3A::from_array(sphere.color),
                sphere.reflectivity,
            )));
        }
        Ok(scene)
    }

    /// Build a tracer for this scene and camera.
    pub fn build_tracer(&self) -> Result<Tracer, ConfigError> {
        let scene = self.build_scene()?;
        Ok(Tracer::new(scene, Vec3A::from_array(self.camera.location), self.camera.frame_z)
            .with_max_depth(self.camera.max_depth))
    }
}

fn finite(name: &str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{name} must be finite, got {values:?}")))
    }
}

fn positive_radius(name: &str, radius: f32) -> Result<(), ConfigError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{name} must be positive, got {radius}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[camera]
location = [0.0, 0.0, -500.0]

[light]
center = [0.0, 400.0, 0.0]
radius = 20.0
color = [255.0, 255.0, 255.0]

[[spheres]]
center = [0.0, 0.0, 300.0]
radius = 100.0
color = [10.0, 20.0, 30.0]
"#;

    #[test]
    fn test_minimal_scene_uses_defaults() {
        let config = SceneConfig::from_toml(MINIMAL).expect("valid scene");
        assert_eq!(config.camera.frame_z, 0.0);
        assert_eq!(config.camera.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.lighting, LightingConfig { ambient: 0.2, diffuse: 0.8 });
        assert_eq!(config.spheres.len(), 1);
        assert_eq!(config.spheres[0].reflectivity, 0.0);
    }

    #[test]
    fn test_build_keeps_file_order_after_light() {
        let tracer = SceneConfig::from_toml(MINIMAL)
            .and_then(|c| c.build_tracer())
            .expect("valid scene");
        assert_eq!(tracer.scene().len(), 2);
        assert_eq!(tracer.scene().light().center(), Vec3A::new(0.0, 400.0, 0.0));
        assert_eq!(tracer.camera_location(), Vec3A::new(0.0, 0.0, -500.0));
    }

    #[test]
    fn test_load_missing_scene() {
        let result = load_scene_config("/nonexistent/scene.toml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[camera\nlocation = ").expect("write scene");

        assert!(matches!(load_scene_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, MINIMAL).expect("write scene");

        let config = load_scene_config(&path).expect("valid scene");
        assert_eq!(config.light.radius, 20.0);
    }

    #[test]
    fn test_missing_light_is_a_parse_error() {
        let result = SceneConfig::from_toml("[camera]\nlocation = [0.0, 0.0, -1.0]\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_radius_is_rejected() {
        let content = MINIMAL.replace("radius = 100.0", "radius = -100.0");
        let err = SceneConfig::from_toml(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("spheres[0].radius")));
    }

    #[test]
    fn test_reflectivity_out_of_range_is_rejected() {
        let content = format!("{MINIMAL}reflectivity = 1.5\n");
        let err = SceneConfig::from_toml(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("reflectivity")));
    }

    #[test]
    fn test_camera_on_frame_plane_is_rejected() {
        let content = MINIMAL.replace("location = [0.0, 0.0, -500.0]", "location = [0.0, 0.0, 0.0]");
        assert!(matches!(SceneConfig::from_toml(&content), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_oversized_max_depth_is_rejected() {
        let content = MINIMAL.replace(
            "location = [0.0, 0.0, -500.0]",
            "location = [0.0, 0.0, -500.0]\nmax_depth = 4000000000",
        );
        let err = SceneConfig::from_toml(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("camera.max_depth")));

        let at_limit = MINIMAL.replace(
            "location = [0.0, 0.0, -500.0]",
            &format!("location = [0.0, 0.0, -500.0]\nmax_depth = {MAX_REFLECTION_DEPTH}"),
        );
        let tracer = SceneConfig::from_toml(&at_limit)
            .and_then(|c| c.build_tracer())
            .expect("limit itself is accepted");
        assert_eq!(tracer.max_depth(), MAX_REFLECTION_DEPTH);
        assert_eq!(tracer.frame_z(), 0.0);
    }

    #[test]
    fn test_negative_ambient_is_rejected() {
        let content = format!("{MINIMAL}\n[lighting]\nambient = -0.5\n");
        assert!(matches!(SceneConfig::from_toml(&content), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_default_scene_is_valid() {
        let config = SceneConfig::default();
        config.validate().expect("default scene validates");
        let tracer = config.build_tracer().expect("default scene builds");
        assert_eq!(tracer.scene().len(), 1 + config.spheres.len());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = SceneConfig::default();
        let text = toml::to_string(&config).expect("serializes");
        assert_eq!(SceneConfig::from_toml(&text).expect("parses back"), config);
    }
}
