//! Showreel CLI
//!
//! Loads the catalog and runs the hero product cycle headlessly.

use anyhow::{Context, Result};
use clap::Parser;
use showreel_app::prelude::*;
use showreel_app::CyclePhase;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::Overrides;

#[derive(Parser)]
#[command(name = "showreel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Looping hero product showreel", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (defaults to ./showreel.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog URL or path
    #[arg(long)]
    products: Option<String>,

    /// Frame driver rate
    #[arg(long)]
    fps: Option<u32>,

    /// Playback speed multiplier
    #[arg(long)]
    time_scale: Option<f32>,

    /// Stop after this many cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// Seed for the particle field
    #[arg(long)]
    seed: Option<u64>,

    /// Print the render container's HTML at every phase transition
    #[arg(long)]
    dump: bool,
}

/// Prints the render container on each phase change
struct DumpObserver {
    container_id: String,
}

impl CycleObserver for DumpObserver {
    fn on_phase(&mut self, cycle: u64, phase: CyclePhase, scene: &Scene) {
        let Some(container) = scene.find_by_id(&self.container_id) else {
            return;
        };
        println!("<!-- cycle {cycle}: {phase} -->");
        println!("{}", scene.to_html(container));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let overrides = Overrides {
        products: cli.products,
        fps: cli.fps,
        time_scale: cli.time_scale,
        cycles: cli.cycles,
        seed: cli.seed,
    };
    let config = config::resolve(cli.config.as_deref(), &overrides)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(run(config, cli.dump))
}

async fn run(config: ShowreelConfig, dump: bool) -> Result<()> {
    let mut scene = Scene::new();
    HostPage::new(&config)
        .build(&mut scene)
        .context("Failed to build the host page")?;
    let scene = scene.into_shared();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested; finishing the current cycle");
            let _ = shutdown_tx.send(true);
        }
    });

    info!("Starting showreel with catalog {}", config.products_url);

    let container_id = config.container_id.clone();
    let mut app = ShowreelApp::new(config, scene);
    if dump {
        app = app.with_observer(DumpObserver { container_id });
    }

    let summary = app.run(shutdown_rx).await?;
    info!(
        "Showreel finished after {} cycles ({:?})",
        summary.cycles_completed, summary.stop_reason
    );
    Ok(())
}
