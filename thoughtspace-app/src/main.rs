//! Thoughtspace - desktop canvas
//!
//! Hosts one canvas session in an eframe window: the live canvas, a control
//! panel, stats, insights and the connection-label prompt.

mod app;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use thoughtspace::AppConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::{Paths, ThoughtApp};

#[derive(Parser)]
#[command(name = "thoughtspace")]
#[command(about = "A physics sandbox for your thoughts")]
#[command(version)]
struct Cli {
    /// Config file (JSON). Missing files fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where snapshots and exports are written
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `thoughtspace=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,

    #[arg(long, default_value_t = 1400.0)]
    width: f32,

    #[arg(long, default_value_t = 900.0)]
    height: f32,

    /// Populate the collaboration roster with simulated peers
    #[arg(long)]
    demo_peers: bool,
}

fn init_logging(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).with_context(|| format!("invalid log filter `{f}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn project_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join("thoughtspace")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let config_path = cli
        .config
        .unwrap_or_else(|| project_dir(dirs::config_dir()).join("config.json"));
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let data_dir = cli.data_dir.unwrap_or_else(|| project_dir(dirs::data_dir()));
    let paths = Paths {
        exports: data_dir.join("exports"),
        snapshots: data_dir,
    };
    tracing::info!(
        config = %config_path.display(),
        data = %paths.snapshots.display(),
        "starting thoughtspace"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_title("Thoughtspace"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    let demo_peers = cli.demo_peers;
    eframe::run_native(
        "Thoughtspace",
        options,
        Box::new(move |cc| Ok(Box::new(ThoughtApp::new(cc, config, paths, demo_peers)))),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))
}
