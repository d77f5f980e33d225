// src/chart.rs
//
// Static bar chart comparing the two sampled accuracies.
//
//   FSD Performance in Fog (Vis: 0.5 km)
//   Accuracy (%)
//   100 ┤
//       │                 ┌──────┐ 77.1%
//    50 ┤   19.2%         │      │
//       │  ┌──────┐       │      │
//     0 ┼──┴──────┴───────┴──────┴──
//         Current FSD     WeatherSync IR
//
// Bars are drawn on a fixed 0-100 axis and clipped to the plot area; the
// printed value is always the raw sample.

use crate::render::save_image;
use crate::types::{AccuracyResult, WeatherReading};
use anyhow::Result;
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
};
use std::path::Path;
use tracing::info;

pub const CHART_WIDTH: i32 = 1000;
pub const CHART_HEIGHT: i32 = 600;

const PLOT_LEFT: i32 = 110;
const PLOT_RIGHT: i32 = 950;
const PLOT_TOP: i32 = 90;
const PLOT_BOTTOM: i32 = 520;
const BAR_WIDTH: i32 = 220;
const AXIS_MAX_PCT: f64 = 100.0;

const BASELINE_LABEL: &str = "Current FSD (Problem)";
const ENHANCED_LABEL: &str = "WeatherSync IR (Solution)";

mod palette {
    use opencv::core::Scalar;

    pub const BACKGROUND: Scalar = Scalar::new(255.0, 255.0, 255.0, 0.0);
    pub const INK: Scalar = Scalar::new(0.0, 0.0, 0.0, 0.0);
    pub const GRID: Scalar = Scalar::new(220.0, 220.0, 220.0, 0.0);
    pub const BASELINE_BAR: Scalar = Scalar::new(128.0, 128.0, 128.0, 0.0);
    pub const ENHANCED_BAR: Scalar = Scalar::new(0.0, 128.0, 0.0, 0.0);
}

/// Pixel row for an accuracy value, clipped to the plot area.
fn value_to_y(pct: f64) -> i32 {
    let clipped = pct.clamp(0.0, AXIS_MAX_PCT);
    let span = f64::from(PLOT_BOTTOM - PLOT_TOP);
    PLOT_BOTTOM - (clipped / AXIS_MAX_PCT * span).round() as i32
}

fn text_width(text: &str, scale: f64, thickness: i32) -> Result<i32> {
    let mut baseline = 0;
    let size =
        imgproc::get_text_size(text, imgproc::FONT_HERSHEY_SIMPLEX, scale, thickness, &mut baseline)?;
    Ok(size.width)
}

fn draw_text(
    img: &mut Mat,
    text: &str,
    x: i32,
    y: i32,
    scale: f64,
    thickness: i32,
) -> Result<()> {
    imgproc::put_text(
        img,
        text,
        core::Point::new(x, y),
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        palette::INK,
        thickness,
        imgproc::LINE_AA,
        false,
    )?;
    Ok(())
}

fn draw_centered(img: &mut Mat, text: &str, center_x: i32, y: i32, scale: f64) -> Result<()> {
    let w = text_width(text, scale, 1)?;
    draw_text(img, text, center_x - w / 2, y, scale, 1)
}

fn draw_bar(img: &mut Mat, center_x: i32, pct: f64, color: core::Scalar, label: &str) -> Result<()> {
    let top = value_to_y(pct);
    let left = center_x - BAR_WIDTH / 2;

    if top < PLOT_BOTTOM {
        imgproc::rectangle(
            img,
            core::Rect::new(left, top, BAR_WIDTH, PLOT_BOTTOM - top),
            color,
            -1,
            imgproc::LINE_8,
            0,
        )?;
    }

    let value_y = (top - 10).max(PLOT_TOP - 5);
    draw_centered(img, &format!("{:.1}%", pct), center_x, value_y, 0.6)?;
    draw_centered(img, label, center_x, PLOT_BOTTOM + 30, 0.55)?;
    Ok(())
}

fn chart_title(reading: &WeatherReading) -> String {
    format!(
        "FSD Performance in {} (Vis: {:?} km)",
        reading.condition.display_name(),
        reading.visibility_km
    )
}

/// Draw the chart into a fresh 1000x600 BGR image.
pub fn render_chart(reading: &WeatherReading, accuracies: &AccuracyResult) -> Result<Mat> {
    let mut img = Mat::new_rows_cols_with_default(
        CHART_HEIGHT,
        CHART_WIDTH,
        core::CV_8UC3,
        palette::BACKGROUND,
    )?;

    // Horizontal grid and y ticks every 20%
    for tick in (0..=100).step_by(20) {
        let y = value_to_y(f64::from(tick));
        imgproc::line(
            &mut img,
            core::Point::new(PLOT_LEFT, y),
            core::Point::new(PLOT_RIGHT, y),
            palette::GRID,
            1,
            imgproc::LINE_8,
            0,
        )?;
        let label = tick.to_string();
        let w = text_width(&label, 0.5, 1)?;
        draw_text(&mut img, &label, PLOT_LEFT - 10 - w, y + 5, 0.5, 1)?;
    }

    let plot_width = PLOT_RIGHT - PLOT_LEFT;
    draw_bar(
        &mut img,
        PLOT_LEFT + plot_width / 4,
        accuracies.baseline_pct,
        palette::BASELINE_BAR,
        BASELINE_LABEL,
    )?;
    draw_bar(
        &mut img,
        PLOT_LEFT + plot_width * 3 / 4,
        accuracies.enhanced_pct,
        palette::ENHANCED_BAR,
        ENHANCED_LABEL,
    )?;

    // Axes
    imgproc::line(
        &mut img,
        core::Point::new(PLOT_LEFT, PLOT_TOP),
        core::Point::new(PLOT_LEFT, PLOT_BOTTOM),
        palette::INK,
        1,
        imgproc::LINE_8,
        0,
    )?;
    imgproc::line(
        &mut img,
        core::Point::new(PLOT_LEFT, PLOT_BOTTOM),
        core::Point::new(PLOT_RIGHT, PLOT_BOTTOM),
        palette::INK,
        1,
        imgproc::LINE_8,
        0,
    )?;

    draw_centered(&mut img, &chart_title(reading), CHART_WIDTH / 2, 40, 0.8)?;
    draw_text(&mut img, "Accuracy (%)", 20, PLOT_TOP - 20, 0.55, 1)?;

    Ok(img)
}

pub fn write_chart(path: &Path, reading: &WeatherReading, accuracies: &AccuracyResult) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let img = render_chart(reading, accuracies)?;
    save_image(path, &img)?;
    info!("📊 Accuracy plot saved as '{}'", path.display());
    Ok(())
}
