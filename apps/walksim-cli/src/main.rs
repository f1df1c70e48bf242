use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use walksim_assets::{Mesh, TextureImage};
use walksim_common::DemoConfig;
use walksim_render::{DebugTextRenderer, FirstPersonCamera, Renderer, Scene};

#[derive(Parser)]
#[command(name = "walksim-cli", about = "Inspect walking simulator configs and assets")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the fully resolved configuration as YAML
    Config {
        /// YAML configuration file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load an OBJ file and report its geometry
    Mesh {
        /// Path to the .obj file
        path: PathBuf,
    },
    /// Decode an image and check it can be used as a texture
    Texture {
        /// Path to the image file
        path: PathBuf,
    },
    /// Build the scene, move the camera and describe the resulting frame
    Frame {
        /// YAML configuration file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seconds spent walking forward (negative walks backward)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        forward: f32,
        /// Seconds spent strafing right (negative strafes left)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        strafe: f32,
        /// Horizontal mouse motion in pixels applied before moving
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        turn: f32,
        /// Vertical mouse motion in pixels applied before moving
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        tilt: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    match cli.command {
        Commands::Info => {
            println!("walksim-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", walksim_common::crate_info());
            println!("assets: {}", walksim_assets::crate_info());
            println!("input: {}", walksim_input::crate_info());
            println!("render: {}", walksim_render::crate_info());
        }
        Commands::Config { config } => {
            let config = DemoConfig::load_or_default(config.as_deref())?;
            print!("{}", config.to_yaml()?);
        }
        Commands::Mesh { path } => {
            let mut mesh = Mesh::new();
            let summary = mesh.load_obj(&path)?;
            println!(
                "{}: {} models, {} vertices, {} triangles",
                path.display(),
                summary.models,
                summary.vertices,
                summary.triangles
            );
            if let Some((min, max)) = mesh.bounds() {
                println!(
                    "Bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
                    min.x, min.y, min.z, max.x, max.y, max.z
                );
            }
        }
        Commands::Texture { path } => {
            let texture = TextureImage::load(&path)?;
            println!(
                "{}: {}x{} {:?} ({} bytes uploaded as RGBA8)",
                path.display(),
                texture.width,
                texture.height,
                texture.source_format,
                texture.pixels.len()
            );
        }
        Commands::Frame {
            config,
            forward,
            strafe,
            turn,
            tilt,
        } => {
            let config = DemoConfig::load_or_default(config.as_deref())?;
            let scene = Scene::load(&config).context("failed to load scene")?;

            let mut camera = FirstPersonCamera::from_config(&config.camera, 1.0);
            camera.set_viewport(config.window.width, config.window.height);
            camera.rotate(turn, tilt);
            camera.apply_movement(forward.signum(), 0.0, forward.abs());
            camera.apply_movement(0.0, strafe.signum(), strafe.abs());
            tracing::debug!("camera after movement: {:?}", camera.position);

            print!("{}", DebugTextRenderer::new().render(&scene, &camera));
        }
    }

    Ok(())
}
