// src/accuracy.rs
//
// Synthetic detection accuracy for the two simulated sensors.
//
// Both models are a step function of visibility plus Gaussian jitter. The
// constants are policy values, not measurements.

use crate::noise::NoiseSource;
use crate::types::AccuracyResult;

// Baseline camera
pub const BASELINE_BASE_PCT: f64 = 90.0;
pub const BASELINE_DENSE_FACTOR: f64 = 0.25;
pub const BASELINE_REDUCED_FACTOR: f64 = 0.5;
pub const BASELINE_NOISE_STDDEV: f64 = 7.0;

// IR-enhanced sensor
pub const ENHANCED_BASE_PCT: f64 = 85.0;
pub const ENHANCED_REDUCED_FACTOR: f64 = 0.9;
pub const ENHANCED_NOISE_STDDEV: f64 = 3.0;

/// Below this visibility (km) the baseline camera is nearly blind.
pub const DENSE_VISIBILITY_KM: f64 = 1.0;
/// Below this visibility (km) both sensors are degraded.
pub const REDUCED_VISIBILITY_KM: f64 = 3.0;

/// Non-noise component of the baseline accuracy.
pub fn baseline_expected(visibility_km: f64) -> f64 {
    let factor = if visibility_km < DENSE_VISIBILITY_KM {
        BASELINE_DENSE_FACTOR
    } else if visibility_km < REDUCED_VISIBILITY_KM {
        BASELINE_REDUCED_FACTOR
    } else {
        1.0
    };
    BASELINE_BASE_PCT * factor
}

/// Non-noise component of the enhanced accuracy.
pub fn enhanced_expected(visibility_km: f64) -> f64 {
    let factor = if visibility_km < REDUCED_VISIBILITY_KM {
        ENHANCED_REDUCED_FACTOR
    } else {
        1.0
    };
    ENHANCED_BASE_PCT * factor
}

pub fn baseline_accuracy(visibility_km: f64, noise: &mut dyn NoiseSource) -> f64 {
    baseline_expected(visibility_km) + noise.gaussian(0.0, BASELINE_NOISE_STDDEV)
}

pub fn enhanced_accuracy(visibility_km: f64, noise: &mut dyn NoiseSource) -> f64 {
    enhanced_expected(visibility_km) + noise.gaussian(0.0, ENHANCED_NOISE_STDDEV)
}

/// Sample both sensors, baseline first.
pub fn sample(visibility_km: f64, noise: &mut dyn NoiseSource) -> AccuracyResult {
    let baseline_pct = baseline_accuracy(visibility_km, noise);
    let enhanced_pct = enhanced_accuracy(visibility_km, noise);
    AccuracyResult {
        baseline_pct,
        enhanced_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{ConstantNoise, SeededNoise};

    #[test]
    fn test_good_visibility_is_undegraded() {
        for vis in [3.0, 5.0, 10.0, 250.0] {
            assert_eq!(baseline_expected(vis), 90.0);
            assert_eq!(enhanced_expected(vis), 85.0);
        }
    }

    #[test]
    fn test_dense_visibility() {
        for vis in [0.0, 0.5, 0.99] {
            assert_eq!(baseline_expected(vis), 22.5);
            assert!((enhanced_expected(vis) - 76.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reduced_visibility() {
        assert_eq!(baseline_expected(1.0), 45.0);
        assert_eq!(baseline_expected(2.99), 45.0);
        assert!((enhanced_expected(1.0) - 76.5).abs() < 1e-9);
    }

    #[test]
    fn test_noise_scaled_by_stddev() {
        let mut noise = ConstantNoise(1.0);
        assert_eq!(baseline_accuracy(10.0, &mut noise), 97.0);
        assert_eq!(enhanced_accuracy(10.0, &mut noise), 88.0);

        let mut zero = ConstantNoise(0.0);
        let result = sample(0.5, &mut zero);
        assert_eq!(result.baseline_pct, 22.5);
    }

    #[test]
    fn test_not_clamped() {
        let mut noise = ConstantNoise(3.0);
        assert!(baseline_accuracy(10.0, &mut noise) > 100.0);

        let mut noise = ConstantNoise(-4.0);
        assert!(baseline_accuracy(0.2, &mut noise) < 0.0);
    }

    #[test]
    fn test_enhanced_spread_is_tighter() {
        let mut noise = SeededNoise::from_seed(99);
        let n = 5_000;
        let spread = |xs: &[f64], center: f64| {
            (xs.iter().map(|x| (x - center).powi(2)).sum::<f64>() / xs.len() as f64).sqrt()
        };

        let baseline: Vec<f64> = (0..n).map(|_| baseline_accuracy(5.0, &mut noise)).collect();
        let enhanced: Vec<f64> = (0..n).map(|_| enhanced_accuracy(5.0, &mut noise)).collect();

        assert!(spread(&enhanced, 85.0) < spread(&baseline, 90.0));
    }
}
