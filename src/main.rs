// src/main.rs

mod accuracy;
mod chart;
mod config;
mod decision;
mod noise;
mod render;
mod report;
mod simulation;
mod types;
mod video_writer;
mod weather;

use anyhow::Result;
use noise::SeededNoise;
use simulation::SimulationOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather::WeatherSource;

const CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = types::Config::load_optional(CONFIG_PATH)?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    // RUST_LOG wins over logging.level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weathersync={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 WeatherSync simulation starting");
    if !found {
        info!("No {} found, using default configuration", CONFIG_PATH);
    }
    info!(
        "✓ Configuration loaded (preset={:?}, output={})",
        config.simulation.preset, config.output.dir
    );

    let api_key = config.api_key();
    if api_key.is_none() {
        warn!(
            "⚠️  No weather API key (set {} or weather.api_key)",
            config::API_KEY_ENV
        );
    }

    let source = WeatherSource::new(&config.weather, api_key)?;
    let reading = source.fetch().await;

    if let Some(seed) = config.simulation.seed {
        info!("🎲 Using fixed seed {}", seed);
    }
    let mut noise = SeededNoise::from_optional_seed(config.simulation.seed);

    let options = SimulationOptions::from_config(&config);
    let summary = simulation::simulate(
        reading,
        &options,
        &mut noise,
        chrono::Local::now().naive_local(),
    )?;

    info!("\n========================================");
    info!("✓ Simulation complete");
    info!("  Report: {}", summary.report_path.display());
    match &summary.video_path {
        Some(path) => info!("  Video: {} ({} frames)", path.display(), summary.frames_rendered),
        None => info!("  Video: skipped (clear weather)"),
    }
    if let Some(path) = &summary.chart_path {
        info!("  Chart: {}", path.display());
    }
    info!("========================================");

    Ok(())
}
