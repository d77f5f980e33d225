// src/render/panels.rs
//
// The two 400x300 sensor views.
//
// Baseline: flat gray camera image. Objects only appear when the sampled
// accuracy says the camera would have picked them up; heavy sensor noise.
//
// Enhanced: IR view whose background level tracks ambient temperature.
// Objects are always present (hot against a cold scene), light noise only
// in rain or fog, then a JET false-color palette.

use super::{colors, put_label, AnimationConfig, Scene, PANEL_HEIGHT, PANEL_WIDTH};
use crate::decision::DISENGAGE_BELOW_PCT;
use crate::noise::NoiseSource;
use anyhow::Result;
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
};

/// Noise variance on the [0, 1] intensity scale.
const BASELINE_NOISE_VARIANCE: f64 = 0.05;
const ENHANCED_NOISE_VARIANCE: f64 = 0.03;

/// Objects are drawn on the baseline panel only above this accuracy (%).
const BASELINE_VISIBLE_ABOVE_PCT: f64 = 50.0;
/// The disengage banner appears after this many steps.
const DISENGAGE_BANNER_AFTER_STEP: usize = 15;

// Gray levels
const FAINT_OBJECT: f64 = 100.0;
const FAINT_WHEEL: f64 = 90.0;
const HOT_OBJECT: f64 = 255.0;
const WARM_WHEEL: f64 = 200.0;

const IR_BACKGROUND_BASE: f64 = 50.0;
const IR_BACKGROUND_MIN: f64 = 30.0;
const IR_BACKGROUND_MAX: f64 = 70.0;

// Scene geometry (panel coordinates)
const PEDESTRIAN: ((i32, i32), (i32, i32)) = ((150, 80), (200, 200));
const VEHICLE_TOP: i32 = 180;
const VEHICLE_BOTTOM: i32 = 230;
const VEHICLE_LENGTH: i32 = 100;
const WHEEL_RADIUS: i32 = 15;

// ============================================================================
// BASELINE (PROBLEM) PANEL
// ============================================================================

/// Render the baseline camera panel as 8-bit BGR.
pub fn baseline_panel(
    scene: &Scene,
    animation: &AnimationConfig,
    step: usize,
    noise: &mut dyn NoiseSource,
) -> Result<Mat> {
    let accuracy = scene.accuracies.baseline_pct;
    let x = animation.x_shift(step);

    let mut gray = gray_canvas(f64::from(animation.baseline_background))?;

    if accuracy > BASELINE_VISIBLE_ABOVE_PCT {
        fill_rect(&mut gray, PEDESTRIAN.0, PEDESTRIAN.1, FAINT_OBJECT)?;
        fill_rect(
            &mut gray,
            (x, VEHICLE_TOP),
            (x + VEHICLE_LENGTH, VEHICLE_BOTTOM),
            FAINT_OBJECT,
        )?;
        if animation.detailed {
            draw_vehicle_details(&mut gray, x, FAINT_OBJECT, FAINT_WHEEL)?;
        }
    }

    add_gaussian_noise(&mut gray, BASELINE_NOISE_VARIANCE, noise)?;

    let mut bgr = Mat::default();
    imgproc::cvt_color(&gray, &mut bgr, imgproc::COLOR_GRAY2BGR, 0)?;

    put_label(&mut bgr, "Current FSD (Problem)", 10, 30, 0.7, colors::WHITE, 2)?;
    put_label(
        &mut bgr,
        &format!("Accuracy: {:.1}%", accuracy),
        10,
        60,
        0.5,
        colors::WHITE,
        1,
    )?;
    put_label(
        &mut bgr,
        &format!("Decision: {}", scene.decisions.baseline.label()),
        10,
        90,
        0.5,
        animation.baseline_decision_color,
        1,
    )?;

    if animation.detailed && step > DISENGAGE_BANNER_AFTER_STEP && accuracy < DISENGAGE_BELOW_PCT
    {
        put_label(&mut bgr, "FSD Disengaged", 100, 200, 1.0, colors::RED, 2)?;
    }

    Ok(bgr)
}

// ============================================================================
// ENHANCED (SOLUTION) PANEL
// ============================================================================

/// IR background level: colder scenes read brighter, clamped to [30, 70].
pub fn ir_background_level(temperature_c: f64) -> u8 {
    // Clamped in f64 so extreme temperatures cannot overflow the cast
    let level = IR_BACKGROUND_BASE - (temperature_c * 2.0).trunc();
    level.clamp(IR_BACKGROUND_MIN, IR_BACKGROUND_MAX) as u8
}

/// Render the IR panel as 8-bit BGR (JET palette).
pub fn enhanced_panel(
    scene: &Scene,
    animation: &AnimationConfig,
    step: usize,
    noise: &mut dyn NoiseSource,
) -> Result<Mat> {
    let x = animation.x_shift(step);

    let mut gray = gray_canvas(f64::from(ir_background_level(
        scene.reading.temperature_c,
    )))?;

    fill_rect(&mut gray, PEDESTRIAN.0, PEDESTRIAN.1, HOT_OBJECT)?;
    fill_rect(
        &mut gray,
        (x, VEHICLE_TOP),
        (x + VEHICLE_LENGTH, VEHICLE_BOTTOM),
        HOT_OBJECT,
    )?;
    draw_vehicle_details(&mut gray, x, HOT_OBJECT, WARM_WHEEL)?;

    if animation.detailed {
        put_label(&mut gray, "T", x + 45, 165, 0.7, core::Scalar::all(HOT_OBJECT), 2)?;
    }

    if scene.reading.condition.degrades_ir() {
        add_gaussian_noise(&mut gray, ENHANCED_NOISE_VARIANCE, noise)?;
    }

    let mut ir = Mat::default();
    imgproc::apply_color_map(&gray, &mut ir, imgproc::COLORMAP_JET)?;

    put_label(&mut ir, "WeatherSync IR (Solution)", 10, 30, 0.7, colors::WHITE, 2)?;
    put_label(
        &mut ir,
        &format!("Accuracy: {:.1}%", scene.accuracies.enhanced_pct),
        10,
        60,
        0.5,
        colors::WHITE,
        1,
    )?;
    put_label(
        &mut ir,
        &format!("Decision: {}", scene.decisions.enhanced.label()),
        10,
        90,
        0.5,
        colors::GREEN,
        1,
    )?;

    if animation.detailed {
        put_label(&mut ir, "Tesla", x, 140, 0.5, colors::WHITE, 1)?;
        put_label(&mut ir, "Pedestrian", 150, 70, 0.5, colors::WHITE, 1)?;
    }

    Ok(ir)
}

// ============================================================================
// DRAWING HELPERS
// ============================================================================

fn gray_canvas(level: f64) -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(
        PANEL_HEIGHT,
        PANEL_WIDTH,
        core::CV_8UC1,
        core::Scalar::all(level),
    )?)
}

/// Filled rectangle between two inclusive corners.
fn fill_rect(img: &mut Mat, tl: (i32, i32), br: (i32, i32), level: f64) -> Result<()> {
    imgproc::rectangle_points(
        img,
        core::Point::new(tl.0, tl.1),
        core::Point::new(br.0, br.1),
        core::Scalar::all(level),
        -1,
        imgproc::LINE_8,
        0,
    )?;
    Ok(())
}

fn fill_circle(img: &mut Mat, center: (i32, i32), radius: i32, level: f64) -> Result<()> {
    imgproc::circle(
        img,
        core::Point::new(center.0, center.1),
        radius,
        core::Scalar::all(level),
        -1,
        imgproc::LINE_8,
        0,
    )?;
    Ok(())
}

/// Cabin on top of the body and two wheels on the bottom edge.
fn draw_vehicle_details(img: &mut Mat, x: i32, body: f64, wheel: f64) -> Result<()> {
    fill_rect(img, (x + 30, 150), (x + 80, VEHICLE_TOP), body)?;
    fill_circle(img, (x + 20, VEHICLE_BOTTOM), WHEEL_RADIUS, wheel)?;
    fill_circle(img, (x + 80, VEHICLE_BOTTOM), WHEEL_RADIUS, wheel)?;
    Ok(())
}

/// Additive Gaussian noise on an 8-bit single-channel image.
///
/// Works on the [0, 1] intensity scale with the given variance, clips to
/// [0, 1] and rounds back to 8 bits.
pub fn add_gaussian_noise(
    img: &mut Mat,
    variance: f64,
    noise: &mut dyn NoiseSource,
) -> Result<()> {
    let stddev = variance.sqrt();
    for px in img.data_bytes_mut()?.iter_mut() {
        let value = f64::from(*px) / 255.0 + noise.gaussian(0.0, stddev);
        *px = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    Ok(())
}
