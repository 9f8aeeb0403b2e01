use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use esg_core::{bind_addr_from_env, data_dir_from_env, ChartImage, EsgStore};
use esg_report::LayoutConfig;
use esg_server::cli::{Cli, Commands};
use esg_server::{render_stored_report, router, AppState};
use esg_strategy::StrategyGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let env = |key: &str| std::env::var(key).ok();

    match Cli::parse().command() {
        Commands::Serve { bind, data_dir } => {
            let bind = match bind {
                Some(bind) => bind,
                None => bind_addr_from_env(env)?,
            };
            serve(bind, data_dir.unwrap_or_else(|| data_dir_from_env(env))).await
        }
        Commands::Report {
            data_dir,
            chart,
            out_dir,
        } => write_report(
            &data_dir.unwrap_or_else(|| data_dir_from_env(env)),
            chart.as_deref(),
            &out_dir,
        ),
    }
}

async fn serve(bind: std::net::SocketAddr, data_dir: PathBuf) -> anyhow::Result<()> {
    let ai = esg_core::read_settings();
    let generator = StrategyGenerator::from_settings(&ai);
    tracing::info!(
        target: "esg_server",
        data_dir = %data_dir.display(),
        mode = ?generator.configured_mode(),
        "starting"
    );

    let state = AppState {
        store: Arc::new(EsgStore::open(&data_dir)),
        generator,
        layout: LayoutConfig::default(),
    };

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    tracing::info!(target: "esg_server", %bind, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// An unreadable or non-PNG chart file is reported and replaced by the
/// placeholder rather than aborting the report.
fn load_chart(path: &Path) -> Option<ChartImage> {
    let loaded = std::fs::read(path)
        .map_err(esg_core::EsgError::from)
        .and_then(ChartImage::from_png);
    match loaded {
        Ok(chart) => Some(chart),
        Err(e) => {
            tracing::warn!(
                target: "esg_server",
                path = %path.display(),
                error = %e,
                "chart not usable"
            );
            None
        }
    }
}

fn write_report(data_dir: &Path, chart: Option<&Path>, out_dir: &Path) -> anyhow::Result<()> {
    let store = EsgStore::open(data_dir);
    let chart = chart.and_then(load_chart);
    let (filename, pdf) = render_stored_report(&store, LayoutConfig::default(), chart.as_ref())?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(filename);
    std::fs::write(&path, pdf).with_context(|| format!("writing {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}
