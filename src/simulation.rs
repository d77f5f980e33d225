// src/simulation.rs
//
// One end-to-end run after the weather has been resolved:
//
//   reading → accuracies → decisions → report.txt
//                                    → frames/ + ir_detection.mp4  (not clear)
//                                    → accuracy_plot.png           (if enabled)

use crate::accuracy;
use crate::chart;
use crate::decision::decide;
use crate::noise::NoiseSource;
use crate::render::{AnimationConfig, FrameRenderer, Scene, FRAME_HEIGHT, FRAME_WIDTH};
use crate::report;
use crate::types::{AccuracyResult, Config, DecisionPair, WeatherReading};
use crate::video_writer;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

pub const REPORT_FILE: &str = "report.txt";
pub const FRAMES_DIR: &str = "frames";
pub const VIDEO_FILE: &str = "ir_detection.mp4";
pub const CHART_FILE: &str = "accuracy_plot.png";

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub output_dir: PathBuf,
    pub animation: AnimationConfig,
    pub save_frames: bool,
    pub accuracy_chart: bool,
}

impl SimulationOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output.dir),
            animation: AnimationConfig::from_preset(config.simulation.preset),
            save_frames: config.output.save_frames,
            accuracy_chart: config.output.accuracy_chart,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub reading: WeatherReading,
    pub accuracies: AccuracyResult,
    pub decisions: DecisionPair,
    pub report_path: PathBuf,
    pub frames_rendered: usize,
    pub video_path: Option<PathBuf>,
    pub chart_path: Option<PathBuf>,
}

pub fn simulate(
    reading: WeatherReading,
    options: &SimulationOptions,
    noise: &mut dyn NoiseSource,
    timestamp: NaiveDateTime,
) -> Result<RunSummary> {
    std::fs::create_dir_all(&options.output_dir)?;

    let accuracies = accuracy::sample(reading.visibility_km, noise);
    let decisions = decide(
        accuracies.baseline_pct,
        accuracies.enhanced_pct,
        reading.visibility_km,
    );

    info!(
        "🎯 Baseline: {:.1}% → {} | Enhanced: {:.1}% → {}",
        accuracies.baseline_pct,
        decisions.baseline.as_str(),
        accuracies.enhanced_pct,
        decisions.enhanced.as_str()
    );

    let report_path = options.output_dir.join(REPORT_FILE);
    report::write_report(&report_path, &reading, &accuracies, &decisions, timestamp)?;

    let mut frames_rendered = 0;
    let mut video_path = None;

    if reading.is_clear() {
        info!("☀️  Clear weather, skipping video simulation");
    } else {
        let mut renderer = FrameRenderer::new(options.animation);
        if options.save_frames {
            renderer = renderer.with_frames_dir(options.output_dir.join(FRAMES_DIR));
        }

        let scene = Scene {
            reading,
            accuracies,
            decisions,
        };
        let frames = renderer.render_sequence(&scene, noise)?;
        frames_rendered = frames.len();

        let path = options.output_dir.join(VIDEO_FILE);
        video_writer::encode(
            &frames,
            options.animation.fps,
            FRAME_WIDTH,
            FRAME_HEIGHT,
            &path,
        )?;
        video_path = Some(path);
    }

    let chart_path = if options.accuracy_chart {
        let path = options.output_dir.join(CHART_FILE);
        chart::write_chart(&path, &reading, &accuracies)?;
        Some(path)
    } else {
        None
    };

    let summary = RunSummary {
        reading,
        accuracies,
        decisions,
        report_path,
        frames_rendered,
        video_path,
        chart_path,
    };

    if let Ok(json) = serde_json::to_string(&summary) {
        debug!("Run summary: {}", json);
    }

    Ok(summary)
}
