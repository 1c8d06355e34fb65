//! Configuration for the assistant.
//!
//! Loaded from JSON with per-field defaults. Lookup order: an explicit path,
//! then `.cindy.json`, `cindy.json` in the working directory, then
//! `~/.cindy/config.json`. `CINDY_DATA_DIR` overrides the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CindyError, Result};
use crate::trainer::TrainerLimits;
use crate::weather::ResolvedLocation;

pub const DATA_DIR_ENV: &str = "CINDY_DATA_DIR";

const INTERACTIONS_FILE: &str = "interactions.jsonl";
const MODEL_FILE: &str = "model.json";
const STATISTICS_FILE: &str = "statistics.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Name the assistant introduces itself with
  #[serde(default = "default_agent_name")]
  pub agent_name: String,
  /// Where the log, model and statistics live; `~/.cindy` when unset
  #[serde(default)]
  pub data_dir: Option<PathBuf>,
  /// Retrain after this many logged interactions
  #[serde(default = "default_retrain_every")]
  pub retrain_every: usize,
  /// Lexicon scores below this classify as unknown
  #[serde(default = "default_min_score")]
  pub min_score: u32,
  #[serde(default = "default_http_timeout_secs")]
  pub http_timeout_secs: u64,
  #[serde(default = "default_geocoding_url")]
  pub geocoding_url: String,
  #[serde(default = "default_forecast_url")]
  pub forecast_url: String,
  /// Used when no place is named or the named one cannot be found
  #[serde(default = "ResolvedLocation::paris")]
  pub default_location: ResolvedLocation,
  #[serde(default = "default_top_tokens")]
  pub top_tokens: usize,
  #[serde(default = "default_top_phrases")]
  pub top_phrases: usize,
  #[serde(default = "default_token_cap")]
  pub token_cap: u32,
  #[serde(default = "default_phrase_cap")]
  pub phrase_cap: u32,
}

fn default_agent_name() -> String {
  "Cindy".to_string()
}
fn default_retrain_every() -> usize {
  10
}
fn default_min_score() -> u32 {
  2
}
fn default_http_timeout_secs() -> u64 {
  5
}
fn default_geocoding_url() -> String {
  "https://geocoding-api.open-meteo.com/v1/search".to_string()
}
fn default_forecast_url() -> String {
  "https://api.open-meteo.com/v1/forecast".to_string()
}
fn default_top_tokens() -> usize {
  30
}
fn default_top_phrases() -> usize {
  15
}
fn default_token_cap() -> u32 {
  5
}
fn default_phrase_cap() -> u32 {
  8
}

impl Default for Config {
  fn default() -> Self {
    Self {
      agent_name: default_agent_name(),
      data_dir: None,
      retrain_every: default_retrain_every(),
      min_score: default_min_score(),
      http_timeout_secs: default_http_timeout_secs(),
      geocoding_url: default_geocoding_url(),
      forecast_url: default_forecast_url(),
      default_location: ResolvedLocation::paris(),
      top_tokens: default_top_tokens(),
      top_phrases: default_top_phrases(),
      token_cap: default_token_cap(),
      phrase_cap: default_phrase_cap(),
    }
  }
}

impl Config {
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| CindyError::io(path, e))?;
    let config: Config = serde_json::from_str(&content).map_err(|e| CindyError::json(path, e))?;
    config.validate()?;
    Ok(config)
  }

  /// Explicit path if given, else the first config file found, else defaults.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit {
      return Self::load_from_file(path);
    }

    let mut candidates = vec![PathBuf::from(".cindy.json"), PathBuf::from("cindy.json")];
    if let Some(home) = dirs::home_dir() {
      candidates.push(home.join(".cindy").join("config.json"));
    }

    for path in &candidates {
      if path.exists() {
        tracing::debug!(path = %path.display(), "loading configuration");
        return Self::load_from_file(path);
      }
    }

    Ok(Config::default())
  }

  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    crate::journal::write_json_atomic(path.as_ref(), self)
  }

  pub fn validate(&self) -> Result<()> {
    if self.retrain_every == 0 {
      return Err(CindyError::config("retrain_every must be at least 1"));
    }
    if self.http_timeout_secs == 0 {
      return Err(CindyError::config("http_timeout_secs must be at least 1"));
    }
    if self.agent_name.trim().is_empty() {
      return Err(CindyError::config("agent_name cannot be empty"));
    }
    Ok(())
  }

  /// `CINDY_DATA_DIR`, then `data_dir`, then `~/.cindy`.
  pub fn data_dir(&self) -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
      if !dir.trim().is_empty() {
        return PathBuf::from(dir);
      }
    }
    if let Some(dir) = &self.data_dir {
      return dir.clone();
    }
    dirs::home_dir().map(|home| home.join(".cindy")).unwrap_or_else(|| PathBuf::from(".cindy"))
  }

  pub fn interactions_path(&self) -> PathBuf {
    self.data_dir().join(INTERACTIONS_FILE)
  }

  pub fn model_path(&self) -> PathBuf {
    self.data_dir().join(MODEL_FILE)
  }

  pub fn statistics_path(&self) -> PathBuf {
    self.data_dir().join(STATISTICS_FILE)
  }

  pub fn trainer_limits(&self) -> TrainerLimits {
    TrainerLimits {
      top_tokens: self.top_tokens,
      top_phrases: self.top_phrases,
      token_cap: self.token_cap,
      phrase_cap: self.phrase_cap,
    }
  }
}
