use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use skyline_assets::FactoryRegistry;
use skyline_kernel::{Scene, SceneConfig, WorldConfig};
use skyline_layout::Table;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyline-cli", about = "CLI tool for skyline worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and registered factories
    Info,
    /// Build every world's placement grid and print its tables
    Layout {
        /// Scene file (.yaml, .yml or .json); one default world if omitted
        config: Option<PathBuf>,
        /// Override the scene seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Which table to print
        #[arg(short, long, value_enum, default_value = "width")]
        table: TableArg,
    },
    /// Move a viewer along the travel axis and stream every world
    Simulate {
        /// Scene file (.yaml, .yml or .json); one default world if omitted
        config: Option<PathBuf>,
        /// Override the scene seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of frames to run
        #[arg(short, long, default_value = "400")]
        frames: u64,
        /// Viewer distance per frame; positive moves toward -Z
        #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
        speed: f32,
        /// Viewer start position on the Z axis
        #[arg(long, default_value = "100.0", allow_hyphen_values = true)]
        start: f32,
        /// Print every event as a JSON line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TableArg {
    Width,
    Height,
    Heightmap,
}

impl From<TableArg> for Table {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Width => Table::Width,
            TableArg::Height => Table::Height,
            TableArg::Heightmap => Table::Heightmap,
        }
    }
}

fn load_scene(config: Option<PathBuf>, seed: Option<u64>) -> anyhow::Result<Scene> {
    let mut scene_config = match config {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => SceneConfig {
            seed: 0,
            worlds: vec![WorldConfig::new("default")],
        },
    };
    if let Some(seed) = seed {
        scene_config.seed = seed;
    }
    let registry = FactoryRegistry::with_builtins()?;
    Ok(Scene::from_config(&scene_config, registry)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let registry = FactoryRegistry::with_builtins()?;
            println!("skyline-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", skyline_common::crate_info());
            println!("layout: {}", skyline_layout::crate_info());
            println!("assets: {}", skyline_assets::crate_info());
            println!("stream: {}", skyline_stream::crate_info());
            println!("kernel: {}", skyline_kernel::crate_info());
            println!("factories: {}", registry.names().join(", "));
        }
        Commands::Layout {
            config,
            seed,
            table,
        } => {
            let scene = load_scene(config, seed)?;
            for report in scene.summary() {
                let Some(world) = scene.world(report.id) else {
                    continue;
                };
                let grid = world.grid();
                println!(
                    "{} `{}`: {}x{} cells, {} placed, fingerprint {:#018x}",
                    report.id,
                    report.name,
                    grid.total_x(),
                    grid.total_z(),
                    grid.placed_count(),
                    grid.fingerprint()
                );
                if grid.has_tables() {
                    print!("{}", grid.format_table(table.into()));
                } else {
                    println!("(dimensions only)");
                }
                println!();
            }
        }
        Commands::Simulate {
            config,
            seed,
            frames,
            speed,
            start,
            json,
        } => {
            let mut scene = load_scene(config, seed)?;
            println!(
                "Simulating {} world(s): seed={}, frames={frames}, speed={speed}, start={start}",
                scene.world_count(),
                scene.seed()
            );

            let mut viewer_z = start;
            let mut event_count = 0usize;
            for _ in 0..frames {
                let events = scene.step(viewer_z);
                event_count += events.len();
                for e in events {
                    if json {
                        println!("{}", serde_json::to_string(e)?);
                    } else {
                        tracing::info!(tick = e.tick, world = %e.world, event = ?e.event, "event");
                    }
                }
                viewer_z -= speed;
                if scene.world_count() == 0 {
                    tracing::info!(tick = scene.tick(), "all worlds retired");
                    break;
                }
            }

            println!(
                "After {} frames: viewer_z={viewer_z:.1}, events={event_count}, live worlds={}",
                scene.tick(),
                scene.world_count()
            );
            for report in scene.summary() {
                println!("{report}");
            }
        }
    }

    Ok(())
}
