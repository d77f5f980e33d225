// src/render/mod.rs
//
// Side-by-side "problem vs solution" frame rendering.
//
//   ┌───────────────────────── 800 ─────────────────────────┐
//   │                      50px margin                      │
//   │ ┌──────── 400 ────────┐ ┌──────── 400 ────────┐       │
//   │ │ BASELINE (gray cam) │ │ ENHANCED (IR, JET)  │  300  │
//   │ └─────────────────────┘ └─────────────────────┘       │
//   │                      50px margin                      │
//   └───────────────────────────────────────────────────────┘
//
// Every frame is drawn from scratch: the only thing that changes from one
// step to the next is the vehicle's x offset (x0 + step * stride).

pub mod composite;
pub mod panels;

use crate::noise::NoiseSource;
use crate::types::{AccuracyResult, AnimationPreset, DecisionPair, WeatherReading};
use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat, Vector},
    imgcodecs, imgproc,
    prelude::*,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const FRAME_WIDTH: i32 = 800;
pub const FRAME_HEIGHT: i32 = 400;
pub const PANEL_WIDTH: i32 = 400;
pub const PANEL_HEIGHT: i32 = 300;
/// Vertical offset of both panels inside the composite frame.
pub const PANEL_TOP: i32 = 50;

/// Colors used for frame rendering (BGR format for OpenCV).
pub mod colors {
    use opencv::core::Scalar;

    pub const WHITE: Scalar = Scalar::new(255.0, 255.0, 255.0, 0.0);
    pub const RED: Scalar = Scalar::new(0.0, 0.0, 255.0, 0.0);
    pub const BLUE: Scalar = Scalar::new(255.0, 0.0, 0.0, 0.0);
    pub const GREEN: Scalar = Scalar::new(0.0, 255.0, 0.0, 0.0);
    pub const BLACK: Scalar = Scalar::new(0.0, 0.0, 0.0, 0.0);
}

// ============================================================================
// ANIMATION PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Number of animated steps (intro frames not included).
    pub frames: usize,
    pub fps: f64,
    /// Vehicle x offset at step 0.
    pub x0: i32,
    /// Pixels the vehicle moves per step.
    pub stride: i32,
    /// How many times the intro card is repeated before the animation.
    pub intro_repeats: usize,
    /// Gray level of the baseline camera background.
    pub baseline_background: u8,
    pub baseline_decision_color: core::Scalar,
    /// Wheels on the baseline panel, object labels and the IR badge, plus
    /// the "FSD Disengaged" banner.
    pub detailed: bool,
}

impl AnimationConfig {
    pub fn classic() -> Self {
        Self {
            frames: 20,
            fps: 2.0,
            x0: 50,
            stride: 5,
            intro_repeats: 0,
            baseline_background: 50,
            baseline_decision_color: colors::BLUE,
            detailed: false,
        }
    }

    pub fn showcase() -> Self {
        Self {
            frames: 30,
            fps: 5.0,
            x0: 50,
            stride: 3,
            intro_repeats: 10,
            baseline_background: 70,
            baseline_decision_color: colors::RED,
            detailed: true,
        }
    }

    pub fn from_preset(preset: AnimationPreset) -> Self {
        match preset {
            AnimationPreset::Classic => Self::classic(),
            AnimationPreset::Showcase => Self::showcase(),
        }
    }

    pub fn x_shift(&self, step: usize) -> i32 {
        self.x0 + step as i32 * self.stride
    }

    /// Intro plus animation frames.
    pub fn total_frames(&self) -> usize {
        self.intro_repeats + self.frames
    }
}

/// Everything a frame depends on besides the step index.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub reading: WeatherReading,
    pub accuracies: AccuracyResult,
    pub decisions: DecisionPair,
}

// ============================================================================
// RENDERER
// ============================================================================

pub struct FrameRenderer {
    animation: AnimationConfig,
    /// When set, every animated frame is also written as frame_{i}.png.
    frames_dir: Option<PathBuf>,
}

impl FrameRenderer {
    pub fn new(animation: AnimationConfig) -> Self {
        Self {
            animation,
            frames_dir: None,
        }
    }

    pub fn with_frames_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frames_dir = Some(dir.into());
        self
    }

    /// Render one animated step as a composite 800x400 BGR frame.
    pub fn render_step(
        &self,
        scene: &Scene,
        step: usize,
        noise: &mut dyn NoiseSource,
    ) -> Result<Mat> {
        let baseline = panels::baseline_panel(scene, &self.animation, step, noise)?;
        let enhanced = panels::enhanced_panel(scene, &self.animation, step, noise)?;
        composite::compose(&baseline, &enhanced)
    }

    /// Intro frames followed by every animated step, in playback order.
    pub fn render_sequence(
        &self,
        scene: &Scene,
        noise: &mut dyn NoiseSource,
    ) -> Result<Vec<Mat>> {
        if let Some(dir) = &self.frames_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let mut frames = Vec::with_capacity(self.animation.total_frames());

        if self.animation.intro_repeats > 0 {
            let intro = composite::intro_frame(&scene.reading)?;
            for _ in 0..self.animation.intro_repeats {
                frames.push(intro.try_clone()?);
            }
        }

        for step in 0..self.animation.frames {
            let frame = self.render_step(scene, step, noise)?;
            if let Some(dir) = &self.frames_dir {
                save_image(&dir.join(format!("frame_{}.png", step)), &frame)?;
            }
            frames.push(frame);
        }

        info!(
            "🎞️  Rendered {} frames ({} intro + {} animated)",
            frames.len(),
            self.animation.intro_repeats,
            self.animation.frames
        );

        Ok(frames)
    }
}

pub fn save_image(path: &Path, img: &Mat) -> Result<()> {
    let path_str = path
        .to_str()
        .with_context(|| format!("Non UTF-8 image path {}", path.display()))?;
    let written = imgcodecs::imwrite(path_str, img, &Vector::new())
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    if !written {
        anyhow::bail!("OpenCV could not write {}", path.display());
    }
    debug!("Saved {}", path.display());
    Ok(())
}

/// Draw a Hershey-simplex text line with its baseline-left corner at (x, y).
pub(crate) fn put_label(
    img: &mut Mat,
    text: &str,
    x: i32,
    y: i32,
    scale: f64,
    color: core::Scalar,
    thickness: i32,
) -> Result<()> {
    imgproc::put_text(
        img,
        text,
        core::Point::new(x, y),
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        color,
        thickness,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::types::{BaselineDecision, EnhancedDecision, WeatherCondition};

    pub fn scene(condition: WeatherCondition, baseline_pct: f64, temperature_c: f64) -> Scene {
        Scene {
            reading: WeatherReading::new(condition, 0.5, temperature_c),
            accuracies: AccuracyResult {
                baseline_pct,
                enhanced_pct: 77.0,
            },
            decisions: DecisionPair {
                baseline: if baseline_pct < 50.0 {
                    BaselineDecision::Disengage
                } else {
                    BaselineDecision::ProceedWithCaution
                },
                enhanced: EnhancedDecision::SlowAndSensor,
            },
        }
    }
}
