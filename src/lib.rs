pub mod accumulation;
pub mod bvh;
pub mod camera;
pub mod config;
mod context;
pub mod encoder;
pub mod geometry;
pub mod kernel;
pub mod mesh_import;
mod noise;
pub mod scene;
mod util;

pub use crate::context::{ContextError, FrameReport, RenderContext};
pub use camera::CameraRig;
pub use config::Settings;
pub use noise::NoisePattern;
pub use scene::Scene;
pub use util::Stats;
