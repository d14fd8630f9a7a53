use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::accumulation::{AccumulationController, Viewport};
use crate::camera::{CameraInput, CameraRig};
use crate::config::Settings;
use crate::kernel::{FrameUniforms, KernelError, ShadingKernel};
use crate::mesh_import::{ImportError, ImportOptions, ImportResult, ImportWorker, MeshSource};
use crate::noise::NoisePattern;
use crate::scene::{ImportSummary, Scene, SceneSetup, TriangleGeometry};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to start the mesh import thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// What happened during one [`RenderContext::tick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame count the frame was drawn with, zero right after a reset.
    pub frame_count: u32,
    /// Geometry was uploaded before drawing.
    pub uploaded: bool,
    /// Background imports applied in this tick.
    pub imported: usize,
}

/// All state of one interactive session.
///
/// Frames are driven by [`tick`](RenderContext::tick), which never overlaps with itself.
/// Geometry changes from imports become visible at the next tick.
pub struct RenderContext {
    settings: Settings,
    scene: Scene,
    camera: CameraRig,
    accumulation: AccumulationController,
    noise: NoisePattern,
    /// Geometry version the kernel holds, `None` before the first upload.
    uploaded_version: Option<u64>,
    resize_pending: bool,
    imports: ImportWorker,
}

impl RenderContext {
    /// Builds the context and queues the meshes referenced by the setup for background loading.
    pub fn new(
        settings: Settings,
        setup: SceneSetup,
        viewport: Viewport,
    ) -> Result<RenderContext, ContextError> {
        let scene = Scene::new(setup.catalog, setup.environment, &settings);
        let camera = CameraRig::from_pose(&setup.camera, settings.camera);
        let noise = NoisePattern::generate(settings.noise_size, settings.noise_seed);

        let mut imports = ImportWorker::spawn()?;
        for mesh in setup.meshes {
            imports.request(mesh.path, mesh.options);
        }

        Ok(RenderContext {
            settings,
            scene,
            camera,
            accumulation: AccumulationController::new(viewport),
            noise,
            uploaded_version: None,
            resize_pending: false,
            imports,
        })
    }

    /// Compiles the kernel and allocates the render targets.
    /// An error here means the session cannot render at all.
    pub fn initialize(&mut self, kernel: &mut impl ShadingKernel) -> Result<(), ContextError> {
        kernel.initialize(&self.noise)?;
        kernel.resize(self.accumulation.viewport());
        self.resize_pending = false;
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn accumulation(&self) -> &AccumulationController {
        &self.accumulation
    }

    pub fn noise(&self) -> &NoisePattern {
        &self.noise
    }

    /// Feeds a camera input. Returns true if the camera moved, which restarts accumulation.
    pub fn handle_input(&mut self, input: &CameraInput) -> bool {
        let moved = self.camera.apply(input);
        if moved {
            self.accumulation.camera_moved();
        }
        moved
    }

    /// Changes the output size. The targets are reallocated at the next tick.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let changed = self.accumulation.resize(viewport);
        self.resize_pending |= changed;
        changed
    }

    /// Resizes for a client area, applying the configured render scale.
    pub fn resize_client(&mut self, width: f64, height: f64) -> bool {
        self.resize(Viewport::from_client_size(
            width,
            height,
            self.settings.render_scale,
        ))
    }

    /// Imports an already parsed mesh right away.
    ///
    /// Accumulation continues across the geometry change.
    pub fn import_mesh(
        &mut self,
        source: &MeshSource,
        options: &ImportOptions,
    ) -> Result<ImportSummary, ImportError> {
        self.scene.import_mesh(source, options, &self.settings)
    }

    /// Queues a mesh file for loading on the import thread.
    pub fn request_import(&mut self, path: impl Into<PathBuf>, options: ImportOptions) -> u64 {
        self.imports.request(path, options)
    }

    pub fn pending_imports(&self) -> usize {
        self.imports.in_flight()
    }

    /// Applies finished background imports. Returns how many succeeded.
    pub fn poll_imports(&mut self) -> usize {
        let mut applied = 0;
        while let Some(result) = self.imports.try_recv() {
            applied += usize::from(self.apply_import_result(result).is_some());
        }
        applied
    }

    /// Waits until all queued imports finished and applies them. Returns how many succeeded.
    pub fn finish_imports(&mut self) -> usize {
        let mut applied = 0;
        while let Some(result) = self.imports.recv_blocking() {
            applied += usize::from(self.apply_import_result(result).is_some());
        }
        applied
    }

    fn apply_import_result(&mut self, result: ImportResult) -> Option<ImportSummary> {
        let ImportResult { request, outcome } = result;
        let imported = outcome.and_then(|source| {
            self.scene
                .import_mesh(&source, &request.options, &self.settings)
        });

        match imported {
            Ok(summary) => {
                info!(
                    path = %request.path.display(),
                    imported = summary.imported,
                    dropped = summary.dropped,
                    mode = ?summary.mode,
                    "Mesh imported"
                );
                Some(summary)
            }
            Err(error) => {
                warn!(
                    path = %request.path.display(),
                    %error,
                    "Mesh import failed, keeping the current scene"
                );
                None
            }
        }
    }

    /// Renders one frame: applies finished imports, uploads changed geometry, reallocates
    /// targets after a resize and draws.
    pub fn tick(&mut self, kernel: &mut impl ShadingKernel) -> Result<FrameReport, KernelError> {
        let imported = self.poll_imports();

        let geometry = self.scene.geometry();
        let uploaded = self.uploaded_version != Some(geometry.version());
        if uploaded {
            kernel.upload_geometry(&geometry);
            self.uploaded_version = Some(geometry.version());
        }

        if self.resize_pending {
            kernel.resize(self.accumulation.viewport());
            self.resize_pending = false;
        }

        let frame_count = self.accumulation.frame_count();
        kernel.draw(&self.frame_uniforms(&geometry))?;
        self.accumulation.finish_frame();

        Ok(FrameReport {
            frame_count,
            uploaded,
            imported,
        })
    }

    /// Uniforms for the next frame drawn over `geometry`.
    pub fn frame_uniforms<'a>(&'a self, geometry: &TriangleGeometry) -> FrameUniforms<'a> {
        let environment = self.scene.environment();
        let (mesh_bounds_min, mesh_bounds_max): ([f32; 3], [f32; 3]) = geometry
            .bounds()
            .map(|bounds| (bounds.min.into(), bounds.max.into()))
            .unwrap_or_default();
        let node_layout = geometry.nodes().layout();
        let triangle_layout = geometry.triangle_texture().layout();

        FrameUniforms {
            resolution: self.accumulation.viewport().size(),

            camera_position: self.camera.position().into(),
            camera_matrix: self.camera.matrix(),
            camera_right: self.camera.right().into(),
            camera_up: self.camera.up().into(),
            camera_forward: self.camera.forward().into(),
            lens: environment.lens,

            light_position: environment.light.position,
            light_color: environment.light.color,
            ground: environment.ground,

            frame_count: self.accumulation.frame_count(),
            blend_weight: self.accumulation.blend_weight(),
            read_target: self.accumulation.read_target(),
            write_target: self.accumulation.write_target(),

            mesh_bounds_min,
            mesh_bounds_max,
            triangle_count: geometry.triangle_count() as i32,
            node_count: geometry.bvh().node_count() as i32,
            bvh_root: geometry.bvh().root_index(),
            triangle_texture_size: [triangle_layout.width(), triangle_layout.height()],
            node_texture_size: [node_layout.width(), node_layout.height()],
            noise_size: self.noise.size(),

            primitives: self.scene.uniforms(),
        }
    }
}
