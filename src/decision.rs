// src/decision.rs

use crate::accuracy::DENSE_VISIBILITY_KM;
use crate::types::{BaselineDecision, DecisionPair, EnhancedDecision};

/// Baseline accuracy (%) under which the camera-only stack hands back control.
pub const DISENGAGE_BELOW_PCT: f64 = 50.0;

/// Map sampled accuracies and visibility to the canned advisory pair.
///
/// `_enhanced_acc` does not influence the outcome: the IR side decides on
/// visibility alone.
pub fn decide(baseline_acc: f64, _enhanced_acc: f64, visibility_km: f64) -> DecisionPair {
    let baseline = if baseline_acc < DISENGAGE_BELOW_PCT {
        BaselineDecision::Disengage
    } else {
        BaselineDecision::ProceedWithCaution
    };

    let enhanced = if visibility_km < DENSE_VISIBILITY_KM {
        EnhancedDecision::SlowAndSensor
    } else {
        EnhancedDecision::MaintainAndMonitor
    };

    DecisionPair { baseline, enhanced }
}
