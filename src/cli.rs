use std::path::PathBuf;

use anyhow::{Context as _, ensure};
use clap::Parser;
use indicatif::ProgressBar;
use tracing::info;
use tracing_subscriber::EnvFilter;

use texeltrace::{
    RenderContext, Settings,
    accumulation::Viewport,
    geometry::WorldVector,
    kernel::RecordingKernel,
    mesh_import::{ImportMode, ImportOptions},
    scene::SceneDescription,
};

/// Builds a scene, prints its hierarchy statistics and runs frames against a recording kernel.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Settings JSON file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Scene description JSON file, the demo scene if missing
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Wavefront OBJ mesh to import
    #[arg(long, value_name = "PATH")]
    mesh: Option<PathBuf>,

    /// Material of the imported mesh
    #[arg(long, default_value = "mesh")]
    material: String,

    /// Rescale the mesh so that its largest extent has this size
    #[arg(long, value_name = "SIZE")]
    target_size: Option<f32>,

    /// Mesh translation, after centering
    #[arg(
        long,
        value_name = "X,Y,Z",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    translate: Option<Vec<f32>>,

    /// Add the mesh to the triangles of the scene instead of replacing them
    #[arg(long)]
    append: bool,

    /// Number of frames to run
    #[arg(long, default_value_t = 16)]
    frames: u32,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Print the whole hierarchy
    #[arg(long)]
    tree: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let settings = args
        .settings
        .as_ref()
        .map(Settings::load)
        .transpose()?
        .unwrap_or_default();
    let description = args
        .scene
        .as_ref()
        .map(SceneDescription::from_file)
        .transpose()?
        .unwrap_or_default();
    let setup = description.validate()?;

    let mesh_options = match &args.mesh {
        Some(_) => {
            let translate = match &args.translate {
                Some(t) => {
                    ensure!(t.len() == 3, "--translate takes three comma separated numbers");
                    WorldVector::new(t[0], t[1], t[2])
                }
                None => WorldVector::zeros(),
            };
            Some(ImportOptions {
                target_size: args.target_size,
                translate,
                mode: if args.append {
                    ImportMode::Append
                } else {
                    ImportMode::Replace
                },
                material: setup.catalog.material_index(&args.material)?,
            })
        }
        None => None,
    };

    let viewport = Viewport::new(args.width, args.height).context("Viewport must not be empty")?;
    let mut context = RenderContext::new(settings, setup, viewport)?;
    if let (Some(mesh), Some(options)) = (args.mesh, mesh_options) {
        context.request_import(mesh, options);
    }
    context.finish_imports();

    let geometry = context.scene().geometry();
    println!("{}", geometry.bvh().statistics());
    if args.tree {
        geometry.bvh().print_tree()?;
    }

    let mut kernel = RecordingKernel::default();
    context.initialize(&mut kernel)?;

    let bar = ProgressBar::new(args.frames as u64);
    for _ in 0..args.frames {
        context.tick(&mut kernel)?;
        bar.inc(1);
    }
    bar.finish();

    info!(
        frames = kernel.frames.len(),
        uploads = kernel.uploads.len(),
        accumulated = context.accumulation().frame_count(),
        "Done"
    );

    Ok(())
}
