//! Weather resolution: place name to coordinates to current conditions to a
//! French report. Every external failure degrades to a fallback location or
//! an apology, never to an error the caller has to handle.

mod client;
mod report;

pub use client::OpenMeteoClient;
pub use report::{apology, describe_code, icon_for_code, WeatherReport};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::WeatherError;
use crate::gazetteer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
  pub name: String,
  #[serde(default)]
  pub country: String,
  pub latitude: f64,
  pub longitude: f64,
}

impl ResolvedLocation {
  pub fn paris() -> Self {
    Self { name: "Paris".into(), country: "France".into(), latitude: 48.8567, longitude: 2.3508 }
  }

  /// "Lyon, France", or just the name when the country is unknown.
  pub fn display_name(&self) -> String {
    if self.country.is_empty() {
      self.name.clone()
    } else {
      format!("{}, {}", self.name, self.country)
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Units {
  pub temperature: String,
  pub humidity: String,
  pub wind_speed: String,
}

impl Default for Units {
  fn default() -> Self {
    Self { temperature: "°C".into(), humidity: "%".into(), wind_speed: "km/h".into() }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
  pub temperature: f64,
  pub apparent_temperature: f64,
  pub humidity: f64,
  pub wind_speed: f64,
  pub weather_code: u32,
  #[serde(default)]
  pub units: Units,
}

/// External geocoding and forecast lookups.
#[async_trait]
pub trait WeatherService: Send + Sync {
  /// Ranked candidates for a place name, best first. May be empty.
  async fn geocode(&self, name: &str) -> Result<Vec<ResolvedLocation>, WeatherError>;

  async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions, WeatherError>;
}

pub struct WeatherPipeline {
  service: Arc<dyn WeatherService>,
  default_location: ResolvedLocation,
  timeout: Duration,
}

impl WeatherPipeline {
  pub fn new(service: Arc<dyn WeatherService>, default_location: ResolvedLocation, timeout: Duration) -> Self {
    Self { service, default_location, timeout }
  }

  async fn bounded<T>(
    &self,
    service: &'static str,
    call: impl Future<Output = Result<T, WeatherError>>,
  ) -> Result<T, WeatherError> {
    tokio::time::timeout(self.timeout, call)
      .await
      .map_err(|_| WeatherError::timeout(service, self.timeout.as_secs()))?
  }

  async fn geocode_first(&self, name: &str) -> Result<ResolvedLocation, WeatherError> {
    let candidates = self.bounded("geocoding", self.service.geocode(name)).await?;
    candidates.into_iter().next().ok_or_else(|| WeatherError::no_candidates(name))
  }

  /// Default when no place is given, then the gazetteer, then the geocoding
  /// service; any geocoding failure falls back to the default.
  pub async fn locate(&self, place: Option<&str>) -> ResolvedLocation {
    let Some(name) = place.map(str::trim).filter(|n| !n.is_empty()) else {
      return self.default_location.clone();
    };

    if let Some(known) = gazetteer::lookup(name) {
      tracing::debug!(place = %known.name, "resolved from gazetteer");
      return known;
    }

    match self.geocode_first(name).await {
      Ok(location) => {
        tracing::info!(place = %location.display_name(), "resolved by geocoding");
        location
      }
      Err(e) => {
        tracing::warn!(place = name, "geocoding failed, using default location: {e}");
        self.default_location.clone()
      }
    }
  }

  pub async fn resolve(&self, place: Option<&str>) -> Result<WeatherReport, WeatherError> {
    let location = self.locate(place).await;
    let conditions = self.bounded("forecast", self.service.current(location.latitude, location.longitude)).await?;
    Ok(WeatherReport::new(location, conditions, chrono::Local::now()))
  }

  /// The rendered report, or an apology when the forecast is unavailable.
  pub async fn report_text(&self, place: Option<&str>) -> String {
    match self.resolve(place).await {
      Ok(report) => report.render(),
      Err(e) => {
        tracing::warn!("weather unavailable: {e}");
        apology(&e).to_string()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  #[derive(Default)]
  struct StubService {
    candidates: Vec<ResolvedLocation>,
    geocode_fails: bool,
    forecast_fails: bool,
    delay: Option<Duration>,
    geocoded: Mutex<Vec<String>>,
    forecasts: Mutex<Vec<(f64, f64)>>,
  }

  #[async_trait]
  impl WeatherService for StubService {
    async fn geocode(&self, name: &str) -> Result<Vec<ResolvedLocation>, WeatherError> {
      self.geocoded.lock().unwrap().push(name.to_string());
      if let Some(delay) = self.delay {
        tokio::time::sleep(delay).await;
      }
      if self.geocode_fails {
        return Err(WeatherError::status("geocoding", 500));
      }
      Ok(self.candidates.clone())
    }

    async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions, WeatherError> {
      self.forecasts.lock().unwrap().push((latitude, longitude));
      if self.forecast_fails {
        return Err(WeatherError::transport("forecast", "connection refused"));
      }
      Ok(CurrentConditions {
        temperature: 21.4,
        apparent_temperature: 20.6,
        humidity: 55.0,
        wind_speed: 11.8,
        weather_code: 2,
        units: Units::default(),
      })
    }
  }

  fn pipeline(stub: Arc<StubService>) -> WeatherPipeline {
    WeatherPipeline::new(stub, ResolvedLocation::paris(), Duration::from_millis(200))
  }

  #[tokio::test]
  async fn test_missing_place_uses_default() {
    let stub = Arc::new(StubService::default());
    let location = pipeline(stub.clone()).locate(None).await;
    assert_eq!(location.name, "Paris");
    assert!(stub.geocoded.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_gazetteer_skips_geocoding() {
    let stub = Arc::new(StubService::default());
    let location = pipeline(stub.clone()).locate(Some("lyon")).await;
    assert_eq!(location.name, "Lyon");
    assert!(stub.geocoded.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_first_geocoding_candidate_wins() {
    let stub = Arc::new(StubService {
      candidates: vec![
        ResolvedLocation { name: "Brest".into(), country: "France".into(), latitude: 48.39, longitude: -4.49 },
        ResolvedLocation { name: "Brest".into(), country: "Biélorussie".into(), latitude: 52.09, longitude: 23.68 },
      ],
      ..StubService::default()
    });
    let report = pipeline(stub.clone()).resolve(Some("Brest")).await.unwrap();
    assert_eq!(report.location.country, "France");
    assert_eq!(stub.forecasts.lock().unwrap()[0], (48.39, -4.49));
  }

  #[tokio::test]
  async fn test_empty_or_failed_geocoding_falls_back_to_default() {
    let empty = Arc::new(StubService::default());
    let report = pipeline(empty).resolve(Some("Atlantide")).await.unwrap();
    assert_eq!(report.location.name, "Paris");

    let failing = Arc::new(StubService { geocode_fails: true, ..StubService::default() });
    let report = pipeline(failing).resolve(Some("Atlantide")).await.unwrap();
    assert_eq!(report.location.name, "Paris");
  }

  #[tokio::test]
  async fn test_slow_geocoding_times_out_to_default() {
    let slow = Arc::new(StubService { delay: Some(Duration::from_secs(5)), ..StubService::default() });
    let report = pipeline(slow.clone()).resolve(Some("Atlantide")).await.unwrap();
    assert_eq!(report.location.name, "Paris");
    assert_eq!(slow.forecasts.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_forecast_failure_becomes_apology() {
    let stub = Arc::new(StubService { forecast_fails: true, ..StubService::default() });
    let text = pipeline(stub).report_text(Some("Nice")).await;
    assert!(text.starts_with("Désolé"));
    assert!(text.contains("connexion"));
  }
}
