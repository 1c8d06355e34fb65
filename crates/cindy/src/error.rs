use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CindyError>;

#[derive(Error, Debug)]
pub enum CindyError {
  #[error("I/O error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid JSON in {path}: {source}")]
  Json {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to persist {path}: {message}")]
  Persist { path: PathBuf, message: String },

  #[error("Configuration error: {message}")]
  Config { message: String },
}

impl CindyError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
    Self::Json { path: path.into(), source }
  }

  pub fn persist(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
    Self::Persist { path: path.into(), message: message.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }
}

/// Failures of the external weather services. These never leave the weather
/// pipeline; they are turned into an apology reply.
#[derive(Error, Debug)]
pub enum WeatherError {
  #[error("{service} did not answer within {seconds}s")]
  Timeout { service: &'static str, seconds: u64 },

  #[error("{service} request failed: {message}")]
  Transport { service: &'static str, message: String },

  #[error("{service} returned status {status}")]
  Status { service: &'static str, status: u16 },

  #[error("{service} returned an unexpected payload: {message}")]
  Payload { service: &'static str, message: String },

  #[error("No place found for '{name}'")]
  NoCandidates { name: String },
}

impl WeatherError {
  pub fn timeout(service: &'static str, seconds: u64) -> Self {
    Self::Timeout { service, seconds }
  }

  pub fn transport(service: &'static str, message: impl Into<String>) -> Self {
    Self::Transport { service, message: message.into() }
  }

  pub fn status(service: &'static str, status: u16) -> Self {
    Self::Status { service, status }
  }

  pub fn payload(service: &'static str, message: impl Into<String>) -> Self {
    Self::Payload { service, message: message.into() }
  }

  pub fn no_candidates(name: impl Into<String>) -> Self {
    Self::NoCandidates { name: name.into() }
  }

  /// Connection-level failures get a different apology than bad data.
  pub fn is_connectivity(&self) -> bool {
    matches!(self, Self::Timeout { .. } | Self::Transport { .. } | Self::Status { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_messages() {
    let err = CindyError::config("retrain_every must be at least 1");
    assert_eq!(err.to_string(), "Configuration error: retrain_every must be at least 1");

    let err = WeatherError::status("geocoding", 503);
    assert_eq!(err.to_string(), "geocoding returned status 503");
    assert!(err.is_connectivity());

    let err = WeatherError::payload("forecast", "missing field `current`");
    assert!(!err.is_connectivity());
  }
}
