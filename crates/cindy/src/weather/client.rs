//! Open-Meteo geocoding and forecast client.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{CurrentConditions, ResolvedLocation, Units, WeatherService};
use crate::config::Config;
use crate::error::WeatherError;

const CANDIDATES: &str = "5";
const CURRENT_FIELDS: &str =
  "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m,apparent_temperature";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
  #[serde(default)]
  results: Vec<GeocodingHit>,
}

#[derive(Debug, Deserialize)]
struct GeocodingHit {
  name: String,
  latitude: f64,
  longitude: f64,
  #[serde(default)]
  country: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
  current: CurrentBlock,
  #[serde(default)]
  current_units: Option<UnitsBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
  temperature_2m: f64,
  relative_humidity_2m: f64,
  weather_code: u32,
  wind_speed_10m: f64,
  apparent_temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
struct UnitsBlock {
  temperature_2m: Option<String>,
  relative_humidity_2m: Option<String>,
  wind_speed_10m: Option<String>,
}

impl From<Option<UnitsBlock>> for Units {
  fn from(block: Option<UnitsBlock>) -> Self {
    let block = block.unwrap_or_default();
    let defaults = Units::default();
    Units {
      temperature: block.temperature_2m.unwrap_or(defaults.temperature),
      humidity: block.relative_humidity_2m.unwrap_or(defaults.humidity),
      wind_speed: block.wind_speed_10m.unwrap_or(defaults.wind_speed),
    }
  }
}

pub struct OpenMeteoClient {
  client: Client,
  geocoding_url: String,
  forecast_url: String,
  timeout_secs: u64,
}

impl OpenMeteoClient {
  pub fn new(geocoding_url: impl Into<String>, forecast_url: impl Into<String>, timeout_secs: u64) -> Self {
    let client = Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .expect("Failed to create HTTP client");

    Self { client, geocoding_url: geocoding_url.into(), forecast_url: forecast_url.into(), timeout_secs }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(&config.geocoding_url, &config.forecast_url, config.http_timeout_secs)
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    service: &'static str,
    url: &str,
    query: &[(&str, String)],
  ) -> Result<T, WeatherError> {
    let response = self.client.get(url).query(query).send().await.map_err(|e| {
      if e.is_timeout() {
        WeatherError::timeout(service, self.timeout_secs)
      } else {
        WeatherError::transport(service, e.to_string())
      }
    })?;

    if !response.status().is_success() {
      return Err(WeatherError::status(service, response.status().as_u16()));
    }

    let body = response.text().await.map_err(|e| WeatherError::transport(service, e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| WeatherError::payload(service, e.to_string()))
  }
}

#[async_trait]
impl WeatherService for OpenMeteoClient {
  async fn geocode(&self, name: &str) -> Result<Vec<ResolvedLocation>, WeatherError> {
    let query = [
      ("name", name.to_string()),
      ("count", CANDIDATES.to_string()),
      ("language", "fr".to_string()),
      ("format", "json".to_string()),
    ];
    let response: GeocodingResponse = self.get_json("geocoding", &self.geocoding_url, &query).await?;

    Ok(
      response
        .results
        .into_iter()
        .map(|hit| ResolvedLocation {
          name: hit.name,
          country: hit.country,
          latitude: hit.latitude,
          longitude: hit.longitude,
        })
        .collect(),
    )
  }

  async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions, WeatherError> {
    let query = [
      ("latitude", latitude.to_string()),
      ("longitude", longitude.to_string()),
      ("current", CURRENT_FIELDS.to_string()),
      ("timezone", "auto".to_string()),
      ("forecast_days", "1".to_string()),
    ];
    let response: ForecastResponse = self.get_json("forecast", &self.forecast_url, &query).await?;
    let current = response.current;

    Ok(CurrentConditions {
      temperature: current.temperature_2m,
      apparent_temperature: current.apparent_temperature,
      humidity: current.relative_humidity_2m,
      wind_speed: current.wind_speed_10m,
      weather_code: current.weather_code,
      units: Units::from(response.current_units),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::{Matcher, Server};

  fn client_for(server: &Server) -> OpenMeteoClient {
    OpenMeteoClient::new(format!("{}/v1/search", server.url()), format!("{}/v1/forecast", server.url()), 2)
  }

  #[tokio::test]
  async fn test_geocode_returns_ranked_candidates() {
    let mut server = Server::new_async().await;
    let mock = server
      .mock("GET", "/v1/search")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("name".into(), "Brest".into()),
        Matcher::UrlEncoded("count".into(), "5".into()),
        Matcher::UrlEncoded("language".into(), "fr".into()),
      ]))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"results":[
          {"id":1,"name":"Brest","latitude":48.39,"longitude":-4.49,"country":"France"},
          {"id":2,"name":"Brest","latitude":52.09,"longitude":23.68,"country":"Biélorussie"}
        ],"generationtime_ms":0.5}"#,
      )
      .create_async()
      .await;

    let candidates = client_for(&server).geocode("Brest").await.unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].country, "France");
    assert_eq!(candidates[0].latitude, 48.39);
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_geocode_without_results_is_empty() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/v1/search")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"generationtime_ms":0.3}"#)
      .create_async()
      .await;

    let candidates = client_for(&server).geocode("Atlantide").await.unwrap();
    assert!(candidates.is_empty());
  }

  #[tokio::test]
  async fn test_error_status_is_reported() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/v1/search").match_query(Matcher::Any).with_status(500).create_async().await;

    let err = client_for(&server).geocode("Lyon").await.unwrap_err();
    assert!(matches!(err, WeatherError::Status { status: 500, .. }));
  }

  #[tokio::test]
  async fn test_current_conditions_with_units() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/v1/forecast")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("latitude".into(), "45.7578".into()),
        Matcher::UrlEncoded("timezone".into(), "auto".into()),
        Matcher::UrlEncoded("current".into(), CURRENT_FIELDS.into()),
      ]))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{
          "current_units": {"temperature_2m": "°F", "relative_humidity_2m": "%", "wind_speed_10m": "mph"},
          "current": {"time": "2026-10-19T14:00", "temperature_2m": 64.2, "relative_humidity_2m": 70,
                      "weather_code": 61, "wind_speed_10m": 8.1, "apparent_temperature": 62.0}
        }"#,
      )
      .create_async()
      .await;

    let current = client_for(&server).current(45.7578, 4.832).await.unwrap();
    assert_eq!(current.weather_code, 61);
    assert_eq!(current.humidity, 70.0);
    assert_eq!(current.units.temperature, "°F");
    assert_eq!(current.units.wind_speed, "mph");
  }

  #[tokio::test]
  async fn test_malformed_forecast_is_payload_error() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/v1/forecast")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(r#"{"current": {"temperature_2m": 12.0}}"#)
      .create_async()
      .await;

    let err = client_for(&server).current(48.85, 2.35).await.unwrap_err();
    assert!(matches!(err, WeatherError::Payload { .. }));
    assert!(!err.is_connectivity());
  }

  #[tokio::test]
  async fn test_unreachable_host_is_transport_error() {
    let client = OpenMeteoClient::new("http://127.0.0.1:9/v1/search", "http://127.0.0.1:9/v1/forecast", 1);
    let err = client.current(48.85, 2.35).await.unwrap_err();
    assert!(err.is_connectivity());
  }
}
