use bitmappr::config::{ExplorerConfig, SmoothingKind, load_config, load_config_from};
use bitmappr::errors::{MapprError, MapprResult};
use bitmappr::session::{Advisory, ExplorerSession};
use bitmappr::terrain_generation::{NoiseSettings, get_terrain_preset};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod bitmappr_cli {
    pub mod cli_utils;
    pub mod report;
}

use bitmappr_cli::cli_utils::*;
use bitmappr_cli::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SmoothingArg {
    Corner,
    Catmull,
}

impl From<SmoothingArg> for SmoothingKind {
    fn from(arg: SmoothingArg) -> Self {
        match arg {
            SmoothingArg::Corner => SmoothingKind::CornerCutting,
            SmoothingArg::Catmull => SmoothingKind::CatmullRom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Clone)]
#[command(name = "bitmappr")]
#[command(about = "Generate a procedural terrain grid and find the cheapest route across it")]
struct Args {
    /// Grid size in cells (format: WIDTHxHEIGHT); overrides the config file
    #[arg(long)]
    size: Option<String>,

    /// Terrain seed for reproducible generation
    #[arg(long)]
    seed: Option<u32>,

    /// Terrain preset (default, archipelago, highlands); overrides the config noise settings
    #[arg(long)]
    preset: Option<String>,

    /// Route start cell (format: X,Y)
    #[arg(long, allow_hyphen_values = true)]
    from: Option<String>,

    /// Route goal cell (format: X,Y)
    #[arg(long, allow_hyphen_values = true)]
    to: Option<String>,

    /// Config file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path smoothing strategy for the reported polyline
    #[arg(long, value_enum)]
    smoothing: Option<SmoothingArg>,

    /// Print the terrain as glyphs with the route drawn as 'o'
    #[arg(long)]
    map: bool,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "bitmappr=debug" } else { "bitmappr=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> MapprResult<ExplorerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };

    if let Some(size) = &args.size {
        let (width, height) = parse_size(size)?;
        config.grid.width = width;
        config.grid.height = height;
    }
    if let Some(smoothing) = args.smoothing {
        config.smoothing.strategy = smoothing.into();
    }

    Ok(config)
}

fn noise_settings(args: &Args, config: &ExplorerConfig) -> MapprResult<NoiseSettings> {
    match &args.preset {
        Some(name) => get_terrain_preset(name, args.seed)
            .map(|generator| generator.settings)
            .ok_or_else(|| MapprError::InvalidArgument {
                reason: format!("Unknown preset '{name}'. Expected default, archipelago or highlands"),
            }),
        None => Ok(NoiseSettings::from(&config.noise)),
    }
}

/// Click `--from` then `--to`; a rejected start leaves nothing for the goal to attach to
fn select_endpoints(
    session: &mut ExplorerSession,
    from: Option<(i64, i64)>,
    to: Option<(i64, i64)>,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    for (x, y) in [from, to].into_iter().flatten() {
        if let Some(advisory) = session.click(x, y).advisory() {
            advisories.push(advisory);
            if session.start().is_none() {
                break;
            }
        }
    }
    advisories
}

fn main() -> MapprResult<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Parse every argument before doing any generation work
    let config = build_config(&args)?;
    let noise = noise_settings(&args, &config)?;
    let from = args.from.as_deref().map(parse_cell).transpose()?;
    let to = args.to.as_deref().map(parse_cell).transpose()?;

    let mut session = ExplorerSession::with_noise(config, noise, rand::random(), args.seed)?;
    info!(
        "World ready: {}x{} seed {}",
        session.world().width(),
        session.world().height(),
        session.world().seed
    );

    let advisories = select_endpoints(&mut session, from, to);

    let world = session.snapshot();
    let report = Report::new(&world, session.route(), &advisories, args.map);

    match args.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
