use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub endpoint: String,
    pub city: String,
    /// Overridden by the OPENWEATHER_API_KEY environment variable.
    pub api_key: String,
    pub units: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            city: "SanFrancisco".to_string(),
            api_key: String::new(),
            units: "metric".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
    pub preset: AnimationPreset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPreset {
    /// 20 frames at 2 fps, no intro.
    Classic,
    /// 30 frames at 5 fps with a held intro card and object labels.
    #[default]
    Showcase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub save_frames: bool,
    pub accuracy_chart: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "outputs".to_string(),
            save_frames: true,
            accuracy_chart: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// WEATHER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Clear,
    Rain,
    Fog,
    Snow,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Fog => "fog",
            Self::Snow => "snow",
        }
    }

    /// Capitalized form used in reports and on-screen captions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Rain => "Rain",
            Self::Fog => "Fog",
            Self::Snow => "Snow",
        }
    }

    /// Conditions under which the IR panel picks up sensor noise.
    pub fn degrades_ir(&self) -> bool {
        matches!(self, Self::Rain | Self::Fog)
    }
}

/// Where a reading came from. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherOrigin {
    Provider,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherReading {
    pub condition: WeatherCondition,
    pub visibility_km: f64,
    pub temperature_c: f64,
    pub origin: WeatherOrigin,
}

impl WeatherReading {
    pub fn new(condition: WeatherCondition, visibility_km: f64, temperature_c: f64) -> Self {
        Self {
            condition,
            visibility_km,
            temperature_c,
            origin: WeatherOrigin::Provider,
        }
    }

    /// Reading used whenever the provider cannot be reached or understood.
    pub fn fallback() -> Self {
        Self {
            condition: WeatherCondition::Fog,
            visibility_km: 0.5,
            temperature_c: 2.0,
            origin: WeatherOrigin::Fallback,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.condition == WeatherCondition::Clear
    }
}

// ============================================================================
// DETECTION RESULTS
// ============================================================================

/// Sampled accuracies in percent. Not clamped: noise can push either value
/// below 0 or above 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyResult {
    pub baseline_pct: f64,
    pub enhanced_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineDecision {
    Disengage,
    ProceedWithCaution,
}

impl BaselineDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disengage => "disengage",
            Self::ProceedWithCaution => "proceed_with_caution",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Disengage => "Disengage FSD",
            Self::ProceedWithCaution => "Proceed with caution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancedDecision {
    SlowAndSensor,
    MaintainAndMonitor,
}

impl EnhancedDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SlowAndSensor => "slow_and_sensor",
            Self::MaintainAndMonitor => "maintain_and_monitor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SlowAndSensor => "Slow to 20 mph, use IR",
            Self::MaintainAndMonitor => "Maintain speed, monitor with IR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionPair {
    pub baseline: BaselineDecision,
    pub enhanced: EnhancedDecision,
}
