use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use tumble_engine::device::GpuInit;
use tumble_engine::logging::{LoggingConfig, init_logging};
use tumble_engine::window::{LogicalSize, Runtime, RuntimeConfig};
use tumble_engine::{Engine, EngineAssets};

/// Spinning textured cube.
#[derive(Parser, Debug)]
#[command(name = "tumble", version)]
struct Args {
    /// Directory holding shader.v.wgsl, shader.f.wgsl and texture.png.
    /// Built-in assets are used when omitted.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// PNG or JPEG to use instead of the asset texture.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Window title.
    #[arg(long, default_value = "tumble")]
    title: String,

    /// Initial window width in logical pixels.
    #[arg(long, default_value = "800")]
    width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value = "600")]
    height: u32,

    /// Log filter in env_logger syntax (overrides RUST_LOG).
    #[arg(long)]
    log: Option<String>,

    /// Present without waiting for vertical sync.
    #[arg(long)]
    no_vsync: bool,

    /// Keep the window title free of the frame rate.
    #[arg(long)]
    no_fps: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        filter: args.log.clone(),
        ..Default::default()
    });

    let mut assets = match &args.assets {
        Some(dir) => EngineAssets::from_dir(dir)?,
        None => EngineAssets::builtin(),
    };
    if let Some(path) = &args.texture {
        assets = assets.with_texture_file(path)?;
    }

    let config = RuntimeConfig {
        title: args.title,
        initial_size: LogicalSize::new(f64::from(args.width), f64::from(args.height)),
        show_fps: !args.no_fps,
    };
    let gpu_init = GpuInit::default().with_vsync(!args.no_vsync);

    log::info!("starting {}x{}", args.width, args.height);
    Runtime::run(config, gpu_init, Engine::new(assets))
}
