// src/report.rs

use crate::types::{AccuracyResult, DecisionPair, WeatherReading};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fixed-template plain-text summary of one run.
pub fn render_report(
    reading: &WeatherReading,
    accuracies: &AccuracyResult,
    decisions: &DecisionPair,
    timestamp: NaiveDateTime,
) -> String {
    format!(
        "FSD WeatherSync Simulation\n\
         Date: {date}\n\
         Weather: {cond}, Visibility: {vis:?} km, Temp: {temp}°C\n\
         \n\
         Problem (Current FSD):\n\
         Accuracy: {base:.1}% - Struggles in {cond_lower}.\n\
         Decision: {base_decision}\n\
         \n\
         Solution (WeatherSync with IR):\n\
         Accuracy: {enh:.1}% - Reliable with IR.\n\
         Decision: {enh_decision}\n",
        date = timestamp.format(TIMESTAMP_FORMAT),
        cond = reading.condition.display_name(),
        vis = reading.visibility_km,
        temp = reading.temperature_c,
        base = accuracies.baseline_pct,
        cond_lower = reading.condition.as_str(),
        base_decision = decisions.baseline.label(),
        enh = accuracies.enhanced_pct,
        enh_decision = decisions.enhanced.label(),
    )
}

/// Render the report, echo it to stdout and persist it to `path`.
pub fn write_report(
    path: &Path,
    reading: &WeatherReading,
    accuracies: &AccuracyResult,
    decisions: &DecisionPair,
    timestamp: NaiveDateTime,
) -> Result<String> {
    let report = render_report(reading, accuracies, decisions, timestamp);
    println!("{}", report);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, &report).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("📝 Report saved as '{}'", path.display());
    Ok(report)
}
