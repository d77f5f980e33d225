// src/weather.rs
//
// Current-weather lookup against the OpenWeatherMap "weather by city" API.
//
// One GET, no retries. Anything that goes wrong (transport, timeout, HTTP
// status, malformed body, missing key) resolves to the fixed fallback
// reading so the rest of the run always has a WeatherReading to work with.

use crate::types::{WeatherCondition, WeatherConfig, WeatherReading};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Visibility assumed when the provider omits the field (meters).
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

/// Ordered classification rules. The first substring found in the
/// lowercased provider text wins; no match means clear.
const CONDITION_RULES: &[(&str, WeatherCondition)] = &[
    ("rain", WeatherCondition::Rain),
    ("fog", WeatherCondition::Fog),
    ("mist", WeatherCondition::Fog),
    ("snow", WeatherCondition::Snow),
];

pub fn classify_condition(provider_text: &str) -> WeatherCondition {
    let text = provider_text.to_lowercase();
    CONDITION_RULES
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .map(|&(_, condition)| condition)
        .unwrap_or(WeatherCondition::Clear)
}

// ============================================================================
// PROVIDER RESPONSE
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    weather: Vec<ProviderCondition>,
    /// Meters.
    visibility: Option<f64>,
    main: ProviderMain,
}

#[derive(Debug, Deserialize)]
struct ProviderCondition {
    main: String,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: f64,
}

/// Parse a provider JSON body into a reading.
pub fn parse_response(body: &str) -> Result<WeatherReading> {
    let response: ProviderResponse =
        serde_json::from_str(body).context("Unexpected weather response shape")?;

    let condition_text = response
        .weather
        .first()
        .map(|w| w.main.as_str())
        .ok_or_else(|| anyhow!("Weather response has no conditions"))?;

    let visibility_km = response.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0;

    Ok(WeatherReading::new(
        classify_condition(condition_text),
        visibility_km,
        response.main.temp,
    ))
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct WeatherSource {
    http_client: reqwest::Client,
    endpoint: String,
    city: String,
    api_key: Option<String>,
    units: String,
}

impl WeatherSource {
    pub fn new(config: &WeatherConfig, api_key: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            city: config.city.clone(),
            api_key,
            units: config.units.clone(),
        })
    }

    /// Resolve the current reading. Never fails; see module docs.
    pub async fn fetch(&self) -> WeatherReading {
        let reading = match self.request().await {
            Ok(reading) => reading,
            Err(e) => {
                warn!("🌐 Weather API error: {:#}. Using fallback data.", e);
                WeatherReading::fallback()
            }
        };

        info!(
            "🌦️  Weather alert: {} detected, Visibility: {:?} km, Temp: {}°C",
            reading.condition.display_name(),
            reading.visibility_km,
            reading.temperature_c
        );

        reading
    }

    async fn request(&self) -> Result<WeatherReading> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("no API key configured");
        };

        debug!("🌐 GET {} (q={}, units={})", self.endpoint, self.city, self.units);

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("q", self.city.as_str()),
                ("appid", api_key),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            // The request URL carries the API key
            .map_err(|e| e.without_url())
            .context("Weather request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to read weather response")?;

        if !status.is_success() {
            bail!("HTTP {}: {}", status, body);
        }

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherOrigin;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_classify_condition() {
        assert_eq!(classify_condition("light rain"), WeatherCondition::Rain);
        assert_eq!(classify_condition("Mist"), WeatherCondition::Fog);
        assert_eq!(classify_condition("fog"), WeatherCondition::Fog);
        assert_eq!(classify_condition("heavy snow"), WeatherCondition::Snow);
        assert_eq!(classify_condition("clear sky"), WeatherCondition::Clear);
        assert_eq!(classify_condition("Clouds"), WeatherCondition::Clear);
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify_condition("rain and snow"), WeatherCondition::Rain);
        assert_eq!(classify_condition("snow in mist"), WeatherCondition::Fog);
        assert_eq!(classify_condition("freezing fog, rain"), WeatherCondition::Rain);
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "weather": [{"main": "Drizzle Rain", "description": "light rain"}],
            "visibility": 2500,
            "main": {"temp": 11.5, "humidity": 90}
        }"#;
        let reading = parse_response(body).unwrap();
        assert_eq!(reading.condition, WeatherCondition::Rain);
        assert_eq!(reading.visibility_km, 2.5);
        assert_eq!(reading.temperature_c, 11.5);
        assert_eq!(reading.origin, WeatherOrigin::Provider);
    }

    #[test]
    fn test_parse_response_default_visibility() {
        let body = r#"{"weather": [{"main": "Clear"}], "main": {"temp": 20}}"#;
        let reading = parse_response(body).unwrap();
        assert_eq!(reading.condition, WeatherCondition::Clear);
        assert_eq!(reading.visibility_km, 10.0);
    }

    #[test]
    fn test_parse_response_rejects_bad_shapes() {
        assert!(parse_response(r#"{"cod": 401, "message": "Invalid API key"}"#).is_err());
        assert!(parse_response(r#"{"weather": [], "main": {"temp": 3}}"#).is_err());
        assert!(parse_response(r#"{"weather": [{"main": "Rain"}]}"#).is_err());
        assert!(parse_response("not json").is_err());
    }

    fn test_config(endpoint: String, timeout_secs: u64) -> WeatherConfig {
        WeatherConfig {
            endpoint,
            timeout_secs,
            ..WeatherConfig::default()
        }
    }

    /// Serve exactly one canned HTTP response on a random local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/data/2.5/weather", addr)
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let endpoint = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"weather":[{"main":"Snow"}],"visibility":800,"main":{"temp":-3.0}}"#,
        )
        .await;
        let source = WeatherSource::new(&test_config(endpoint, 5), Some("key".into())).unwrap();

        let reading = source.fetch().await;
        assert_eq!(reading.condition, WeatherCondition::Snow);
        assert_eq!(reading.visibility_km, 0.8);
        assert_eq!(reading.temperature_c, -3.0);
        assert_eq!(reading.origin, WeatherOrigin::Provider);
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_falls_back() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = format!("http://{}/weather", addr);
        let source = WeatherSource::new(&test_config(endpoint, 2), Some("key".into())).unwrap();

        assert_eq!(source.fetch().await, WeatherReading::fallback());
    }

    #[tokio::test]
    async fn test_request_errors_do_not_leak_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = format!("http://{}/weather", addr);
        let source =
            WeatherSource::new(&test_config(endpoint, 2), Some("SECRET_KEY_123".into())).unwrap();

        let err = source.request().await.unwrap_err();
        let logged = format!("{:#}", err);
        assert!(logged.contains("Weather request failed"));
        assert!(!logged.contains("SECRET_KEY_123"));
        assert!(!logged.contains("appid"));
    }

    #[tokio::test]
    async fn test_timeout_error_does_not_leak_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let endpoint = format!("http://{}/weather", addr);
        let source =
            WeatherSource::new(&test_config(endpoint, 1), Some("SECRET_KEY_123".into())).unwrap();

        let logged = format!("{:#}", source.request().await.unwrap_err());
        assert!(!logged.contains("SECRET_KEY_123"));
    }

    #[tokio::test]
    async fn test_fetch_http_error_falls_back() {
        let endpoint = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"cod":401,"message":"Invalid API key"}"#,
        )
        .await;
        let source = WeatherSource::new(&test_config(endpoint, 5), Some("bad".into())).unwrap();

        assert_eq!(source.fetch().await, WeatherReading::fallback());
    }

    #[tokio::test]
    async fn test_fetch_timeout_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and never answer.
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let endpoint = format!("http://{}/weather", addr);
        let source = WeatherSource::new(&test_config(endpoint, 1), Some("key".into())).unwrap();

        assert_eq!(source.fetch().await, WeatherReading::fallback());
    }

    #[tokio::test]
    async fn test_fetch_without_key_falls_back() {
        let source =
            WeatherSource::new(&test_config("http://127.0.0.1:9/".into(), 1), None).unwrap();
        assert_eq!(source.fetch().await, WeatherReading::fallback());
    }
}
