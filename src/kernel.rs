//! Boundary to the per-pixel shading kernel running on the GPU.
//!
//! Everything behind [`ShadingKernel`] (context creation, shader compilation, texture objects)
//! belongs to the host application. This crate only decides what gets uploaded and when.

use thiserror::Error;

use crate::accumulation::{TargetSlot, Viewport};
use crate::encoder::PrimitiveUniforms;
use crate::noise::NoisePattern;
use crate::scene::{GroundPlane, Lens, TriangleGeometry};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    #[error("Shader compilation failed: {0}")]
    Compile(String),

    #[error("Shader program linking failed: {0}")]
    Link(String),

    #[error("Draw failed: {0}")]
    Draw(String),
}

/// Per-frame values handed to the kernel together with the bound textures.
#[derive(Clone, Debug)]
pub struct FrameUniforms<'a> {
    pub resolution: [u32; 2],

    pub camera_position: [f32; 3],
    /// Column major rotation.
    pub camera_matrix: [f32; 9],
    pub camera_right: [f32; 3],
    pub camera_up: [f32; 3],
    pub camera_forward: [f32; 3],
    pub lens: Lens,

    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
    pub ground: GroundPlane,

    pub frame_count: u32,
    pub blend_weight: f32,
    pub read_target: TargetSlot,
    pub write_target: TargetSlot,

    /// Zero when there are no triangles.
    pub mesh_bounds_min: [f32; 3],
    pub mesh_bounds_max: [f32; 3],
    pub triangle_count: i32,
    pub node_count: i32,
    /// -1 when there are no triangles.
    pub bvh_root: i32,
    pub triangle_texture_size: [u32; 2],
    pub node_texture_size: [u32; 2],
    pub noise_size: u32,

    pub primitives: &'a PrimitiveUniforms,
}

pub trait ShadingKernel {
    /// Compiles the kernel and uploads the noise texture. Called once, failure ends the session.
    fn initialize(&mut self, noise: &NoisePattern) -> Result<(), KernelError>;

    /// (Re)allocates both accumulation targets.
    fn resize(&mut self, viewport: Viewport);

    /// Uploads node and triangle textures. Called only when the geometry version changes.
    fn upload_geometry(&mut self, geometry: &TriangleGeometry);

    /// Renders one frame into `uniforms.write_target`.
    fn draw(&mut self, uniforms: &FrameUniforms) -> Result<(), KernelError>;
}

/// Summary of one [`ShadingKernel::draw`] call kept by [`RecordingKernel`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RecordedFrame {
    pub resolution: [u32; 2],
    pub frame_count: u32,
    pub blend_weight: f32,
    pub write_target: TargetSlot,
    pub camera_position: [f32; 3],
    pub triangle_count: i32,
    pub node_count: i32,
    pub bvh_root: i32,
}

/// Kernel that renders nothing and keeps a log of the calls it received.
///
/// Used for headless runs and for testing the frame loop.
#[derive(Clone, Debug, Default)]
pub struct RecordingKernel {
    pub noise_size: Option<u32>,
    pub viewports: Vec<Viewport>,
    /// Geometry versions in upload order.
    pub uploads: Vec<u64>,
    pub frames: Vec<RecordedFrame>,
    /// Returned from `initialize` instead of succeeding.
    pub fail_initialize: Option<KernelError>,
}

impl ShadingKernel for RecordingKernel {
    fn initialize(&mut self, noise: &NoisePattern) -> Result<(), KernelError> {
        if let Some(error) = &self.fail_initialize {
            return Err(error.clone());
        }
        self.noise_size = Some(noise.size());
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewports.push(viewport);
    }

    fn upload_geometry(&mut self, geometry: &TriangleGeometry) {
        self.uploads.push(geometry.version());
    }

    fn draw(&mut self, uniforms: &FrameUniforms) -> Result<(), KernelError> {
        self.frames.push(RecordedFrame {
            resolution: uniforms.resolution,
            frame_count: uniforms.frame_count,
            blend_weight: uniforms.blend_weight,
            write_target: uniforms.write_target,
            camera_position: uniforms.camera_position,
            triangle_count: uniforms.triangle_count,
            node_count: uniforms.node_count,
            bvh_root: uniforms.bvh_root,
        });
        Ok(())
    }
}
