//! Stub weather service for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use cindy::weather::{CurrentConditions, ResolvedLocation, Units, WeatherService};
use cindy::{Assistant, Config, WeatherError};

#[derive(Default)]
pub struct StubWeather {
  pub candidates: Vec<ResolvedLocation>,
  pub forecast_fails: bool,
  pub geocoded: Mutex<Vec<String>>,
  pub forecasts: Mutex<Vec<(f64, f64)>>,
}

impl StubWeather {
  pub fn geocoded(&self) -> Vec<String> {
    self.geocoded.lock().unwrap().clone()
  }

  pub fn forecasts(&self) -> Vec<(f64, f64)> {
    self.forecasts.lock().unwrap().clone()
  }
}

#[async_trait]
impl WeatherService for StubWeather {
  async fn geocode(&self, name: &str) -> Result<Vec<ResolvedLocation>, WeatherError> {
    self.geocoded.lock().unwrap().push(name.to_string());
    Ok(self.candidates.clone())
  }

  async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions, WeatherError> {
    self.forecasts.lock().unwrap().push((latitude, longitude));
    if self.forecast_fails {
      return Err(WeatherError::status("forecast", 503));
    }
    Ok(CurrentConditions {
      temperature: 16.0,
      apparent_temperature: 15.0,
      humidity: 72.0,
      wind_speed: 9.0,
      weather_code: 3,
      units: Units::default(),
    })
  }
}

pub fn config_in(dir: &Path) -> Config {
  Config { data_dir: Some(dir.to_path_buf()), ..Config::default() }
}

pub fn assistant_with(dir: &Path, stub: Arc<StubWeather>) -> Assistant {
  Assistant::with_service(config_in(dir), stub)
}
