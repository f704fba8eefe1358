//! mirrortrace ray tracer
//!
//! Renders spheres lit by a single point light with recursive Whitted shading:
//! ambient and diffuse light plus mirror reflections. Outputs PNG and EXR
//! formats with optional TEV viewer integration.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod frame;
pub mod interval;
pub mod light;
pub mod output;
pub mod ray;
pub mod scene;
pub mod shading;
pub mod sphere;
pub mod surface;
pub mod tracer;

pub use config::{load_scene_config, ConfigError, SceneConfig};
pub use frame::Frame;
pub use light::LightSource;
pub use ray::Ray;
pub use scene::Scene;
pub use shading::Color;
pub use sphere::Sphere;
pub use surface::{Surface, SurfaceId};
pub use tracer::{PixelSample, Tracer};
