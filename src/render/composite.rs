// src/render/composite.rs

use super::{colors, put_label, FRAME_HEIGHT, FRAME_WIDTH, PANEL_HEIGHT, PANEL_TOP, PANEL_WIDTH};
use crate::types::WeatherReading;
use anyhow::{bail, Result};
use opencv::{
    core::{self, Mat},
    prelude::*,
};

fn black_frame() -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(
        FRAME_HEIGHT,
        FRAME_WIDTH,
        core::CV_8UC3,
        colors::BLACK,
    )?)
}

/// Place `left` at x=0..400 and `right` at x=400..800, both at y=50..350.
pub fn compose(left: &Mat, right: &Mat) -> Result<Mat> {
    for panel in [left, right] {
        if panel.rows() != PANEL_HEIGHT
            || panel.cols() != PANEL_WIDTH
            || panel.typ() != core::CV_8UC3
        {
            bail!(
                "Panel must be {}x{} BGR, got {}x{} type {}",
                PANEL_WIDTH,
                PANEL_HEIGHT,
                panel.cols(),
                panel.rows(),
                panel.typ()
            );
        }
    }

    let mut frame = black_frame()?;

    let row_bytes = (PANEL_WIDTH * 3) as usize;
    let frame_row_bytes = (FRAME_WIDTH * 3) as usize;
    let left_bytes = left.data_bytes()?;
    let right_bytes = right.data_bytes()?;
    let dst = frame.data_bytes_mut()?;

    for y in 0..PANEL_HEIGHT as usize {
        let src_start = y * row_bytes;
        let dst_start = (y + PANEL_TOP as usize) * frame_row_bytes;

        dst[dst_start..dst_start + row_bytes]
            .copy_from_slice(&left_bytes[src_start..src_start + row_bytes]);
        dst[dst_start + row_bytes..dst_start + 2 * row_bytes]
            .copy_from_slice(&right_bytes[src_start..src_start + row_bytes]);
    }

    Ok(frame)
}

fn intro_caption(reading: &WeatherReading) -> String {
    format!(
        "Weather: {}, Vis: {:?} km",
        reading.condition.display_name(),
        reading.visibility_km
    )
}

/// Title card shown before the animation.
pub fn intro_frame(reading: &WeatherReading) -> Result<Mat> {
    let mut frame = black_frame()?;
    put_label(
        &mut frame,
        "FSD WeatherSync: Problem vs Solution",
        100,
        180,
        1.0,
        colors::WHITE,
        2,
    )?;
    put_label(
        &mut frame,
        &intro_caption(reading),
        100,
        230,
        0.7,
        colors::WHITE,
        1,
    )?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::scene;
    use super::super::{panels, AnimationConfig};
    use super::*;
    use crate::noise::SeededNoise;
    use crate::types::WeatherCondition;

    fn solid_panel(b: f64, g: f64, r: f64) -> Mat {
        Mat::new_rows_cols_with_default(
            PANEL_HEIGHT,
            PANEL_WIDTH,
            core::CV_8UC3,
            core::Scalar::new(b, g, r, 0.0),
        )
        .unwrap()
    }

    fn bgr(img: &Mat, x: i32, y: i32) -> [u8; 3] {
        img.at_2d::<core::Vec3b>(y, x).unwrap().0
    }

    #[test]
    fn test_compose_places_panels() {
        let frame = compose(&solid_panel(10.0, 20.0, 30.0), &solid_panel(200.0, 0.0, 0.0)).unwrap();

        assert_eq!(frame.rows(), FRAME_HEIGHT);
        assert_eq!(frame.cols(), FRAME_WIDTH);

        // Margins stay black
        assert_eq!(bgr(&frame, 0, 0), [0, 0, 0]);
        assert_eq!(bgr(&frame, 799, 49), [0, 0, 0]);
        assert_eq!(bgr(&frame, 400, 350), [0, 0, 0]);

        // Panel corners
        assert_eq!(bgr(&frame, 0, 50), [10, 20, 30]);
        assert_eq!(bgr(&frame, 399, 349), [10, 20, 30]);
        assert_eq!(bgr(&frame, 400, 50), [200, 0, 0]);
        assert_eq!(bgr(&frame, 799, 349), [200, 0, 0]);
    }

    #[test]
    fn test_compose_rejects_wrong_size() {
        let small = Mat::new_rows_cols_with_default(
            10,
            10,
            core::CV_8UC3,
            core::Scalar::all(0.0),
        )
        .unwrap();
        assert!(compose(&small, &solid_panel(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_halves_differ() {
        let animation = AnimationConfig::showcase();
        let s = scene(WeatherCondition::Fog, 40.0, 2.0);
        let mut noise = SeededNoise::from_seed(21);

        let left = panels::baseline_panel(&s, &animation, 5, &mut noise).unwrap();
        let right = panels::enhanced_panel(&s, &animation, 5, &mut noise).unwrap();
        let frame = compose(&left, &right).unwrap();

        let bytes = frame.data_bytes().unwrap();
        let row = (FRAME_WIDTH * 3) as usize;
        let half = (PANEL_WIDTH * 3) as usize;
        let differing_rows = (PANEL_TOP as usize..(PANEL_TOP + PANEL_HEIGHT) as usize)
            .filter(|&y| bytes[y * row..y * row + half] != bytes[y * row + half..(y + 1) * row])
            .count();
        assert_eq!(differing_rows, PANEL_HEIGHT as usize);

        // Baseline stays gray, IR background is colored
        let l = bgr(&frame, 300, 300);
        let r = bgr(&frame, 700, 300);
        assert_eq!(l[0], l[1]);
        assert_eq!(l[1], l[2]);
        assert!(!(r[0] == r[1] && r[1] == r[2]));
    }

    #[test]
    fn test_intro_caption_keeps_decimal() {
        let reading = WeatherReading::new(WeatherCondition::Snow, 10.0, -1.0);
        assert_eq!(intro_caption(&reading), "Weather: Snow, Vis: 10.0 km");
        assert_eq!(
            intro_caption(&WeatherReading::fallback()),
            "Weather: Fog, Vis: 0.5 km"
        );
    }

    #[test]
    fn test_intro_frame_has_text() {
        let frame = intro_frame(&scene(WeatherCondition::Rain, 40.0, 10.0).reading).unwrap();
        let lit = frame.data_bytes().unwrap().iter().filter(|&&b| b > 0).count();
        assert!(lit > 0);
        assert_eq!(bgr(&frame, 5, 5), [0, 0, 0]);
    }
}
