//! The request pipeline: classify, resolve side effects, reply, log, and
//! periodically retrain.

use chrono::Local;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::config::Config;
use crate::entities::EntityMap;
use crate::error::Result;
use crate::intent::Intent;
use crate::journal::{InteractionLog, InteractionRecord, ModelStore};
use crate::lexicon::{AdaptiveModel, Lexicon};
use crate::resolver::{Classification, IntentResolver};
use crate::responses::{ReplyContext, ResponseSynthesizer};
use crate::stats::InteractionStats;
use crate::trainer;
use crate::weather::{OpenMeteoClient, WeatherPipeline, WeatherService};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
  pub reply: String,
  pub suggestions: Vec<String>,
  pub intent: Intent,
  pub confidence: f32,
  pub entities: EntityMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrainSummary {
  pub records: usize,
  pub keywords: usize,
  pub phrases: usize,
}

/// One model generation: the learned weights and the classifier built from them.
pub struct ModelSnapshot {
  pub learned: AdaptiveModel,
  pub resolver: IntentResolver,
}

impl ModelSnapshot {
  fn build(learned: AdaptiveModel, min_score: u32) -> Self {
    let resolver = IntentResolver::new(Lexicon::merged(&learned), min_score);
    Self { learned, resolver }
  }
}

pub struct Assistant {
  config: Config,
  snapshot: RwLock<Arc<ModelSnapshot>>,
  retrain_lock: tokio::sync::Mutex<()>,
  logged: AtomicUsize,
  weather: WeatherPipeline,
  synthesizer: ResponseSynthesizer,
  log: InteractionLog,
  store: ModelStore,
}

impl Assistant {
  /// Assistant backed by the Open-Meteo services.
  pub fn new(config: Config) -> Self {
    let service = Arc::new(OpenMeteoClient::from_config(&config));
    Self::with_service(config, service)
  }

  pub fn with_service(config: Config, service: Arc<dyn WeatherService>) -> Self {
    let log = InteractionLog::new(config.interactions_path());
    let store = ModelStore::new(config.model_path());

    let mut learned = match store.load() {
      Ok(Some(model)) => {
        tracing::info!(path = %store.path().display(), "loaded adaptive model");
        model
      }
      Ok(None) => AdaptiveModel::new(),
      Err(e) => {
        tracing::warn!("adaptive model unavailable, using seed lexicon only: {e}");
        AdaptiveModel::new()
      }
    };

    let limits = config.trainer_limits();
    let lowered = learned.clamp(limits.token_cap, limits.phrase_cap);
    if lowered > 0 {
      tracing::warn!(lowered, "adaptive model had weights above cap, lowered them");
    }

    let logged = log.len().unwrap_or_else(|e| {
      tracing::warn!("could not read interaction log: {e}");
      0
    });

    let weather = WeatherPipeline::new(
      service,
      config.default_location.clone(),
      Duration::from_secs(config.http_timeout_secs),
    );

    Self {
      snapshot: RwLock::new(Arc::new(ModelSnapshot::build(learned, config.min_score))),
      retrain_lock: tokio::sync::Mutex::new(()),
      logged: AtomicUsize::new(logged),
      weather,
      synthesizer: ResponseSynthesizer::new(config.agent_name.clone()),
      log,
      store,
      config,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn interaction_log(&self) -> &InteractionLog {
    &self.log
  }

  /// The current model generation. Callers keep a consistent view for as
  /// long as they hold the `Arc`, even across a retrain.
  pub fn snapshot(&self) -> Arc<ModelSnapshot> {
    match self.snapshot.read() {
      Ok(guard) => guard.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }

  fn install(&self, snapshot: ModelSnapshot) {
    let snapshot = Arc::new(snapshot);
    match self.snapshot.write() {
      Ok(mut guard) => *guard = snapshot,
      Err(poisoned) => *poisoned.into_inner() = snapshot,
    }
  }

  /// Classify without replying, logging or learning.
  pub fn classify(&self, question: &str) -> Classification {
    self.snapshot().resolver.classify(question)
  }

  /// Answer one question. Never fails: external and storage problems degrade
  /// to apologies and warnings.
  pub async fn ask(&self, question: &str) -> Answer {
    let classification = self.classify(question);
    tracing::info!(
      intent = %classification.intent,
      confidence = classification.confidence,
      "classified question"
    );

    let weather = match classification.intent {
      Intent::Weather => Some(self.weather.report_text(classification.entities.place()).await),
      _ => None,
    };

    let ctx = ReplyContext { entities: &classification.entities, now: Local::now(), weather };
    let (reply, suggestions) = self.synthesizer.synthesize(classification.intent, &ctx);

    let answer = Answer {
      reply,
      suggestions,
      intent: classification.intent,
      confidence: classification.confidence,
      entities: classification.entities,
    };

    if !question.trim().is_empty() {
      self.record(question, &answer).await;
    }
    answer
  }

  async fn record(&self, question: &str, answer: &Answer) {
    let record =
      InteractionRecord::new(question.trim(), &answer.reply, answer.intent, answer.confidence, answer.entities.clone());
    if let Err(e) = self.log.append(&record) {
      tracing::warn!("failed to log interaction: {e}");
      return;
    }

    let total = self.logged.fetch_add(1, Ordering::SeqCst) + 1;
    if total % self.config.retrain_every.max(1) == 0 {
      match self.retrain().await {
        Ok(Some(summary)) => tracing::info!(records = summary.records, "periodic retrain complete"),
        Ok(None) => {}
        Err(e) => tracing::warn!("periodic retrain failed: {e}"),
      }
    }
  }

  /// Rebuild the adaptive model from the full log, persist it and swap in a
  /// new classifier. Returns `Ok(None)` when another retrain is in progress.
  pub async fn retrain(&self) -> Result<Option<RetrainSummary>> {
    let Ok(_guard) = self.retrain_lock.try_lock() else {
      tracing::debug!("retrain already running, skipping");
      return Ok(None);
    };

    let records = self.log.read_all()?;
    let previous = self.snapshot();
    let learned = trainer::retrain(&records, &previous.learned, &self.config.trainer_limits());
    self.store.save(&learned)?;

    let (keywords, phrases) = learned.sizes();
    self.install(ModelSnapshot::build(learned, self.config.min_score));

    Ok(Some(RetrainSummary { records: records.len(), keywords, phrases }))
  }

  /// The last `limit` logged exchanges, oldest first; zero means all.
  pub fn history(&self, limit: usize) -> Result<Vec<InteractionRecord>> {
    self.log.recent(limit)
  }

  pub fn statistics(&self) -> Result<InteractionStats> {
    let records = self.log.read_all()?;
    Ok(InteractionStats::from_records(&records))
  }

  /// Compute statistics and write them next to the log.
  pub fn write_statistics(&self) -> Result<InteractionStats> {
    let stats = self.statistics()?;
    crate::journal::write_json_atomic(&self.config.statistics_path(), &stats)?;
    Ok(stats)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn assistant_in(temp_dir: &TempDir) -> Assistant {
    Assistant::new(Config { data_dir: Some(temp_dir.path().to_path_buf()), ..Config::default() })
  }

  fn log_jokes(assistant: &Assistant, count: usize) {
    for _ in 0..count {
      let record = InteractionRecord::new("Raconte-moi une blague", "", Intent::Joke, 1.0, EntityMap::new());
      assistant.log.append(&record).unwrap();
    }
  }

  #[tokio::test]
  async fn test_retrain_skipped_while_another_is_running() {
    let temp_dir = TempDir::new().unwrap();
    let assistant = assistant_in(&temp_dir);
    log_jokes(&assistant, 10);

    let guard = assistant.retrain_lock.lock().await;
    assert_eq!(assistant.retrain().await.unwrap(), None);
    assert!(!assistant.config().model_path().exists());
    assert_eq!(assistant.classify("blague").score, 4);
    drop(guard);

    let summary = assistant.retrain().await.unwrap().unwrap();
    assert_eq!(summary.records, 10);
    assert!(assistant.config().model_path().exists());
  }

  #[tokio::test]
  async fn test_history_returns_latest_exchanges() {
    let temp_dir = TempDir::new().unwrap();
    let assistant = assistant_in(&temp_dir);
    assistant.ask("Bonjour").await;
    assistant.ask("Merci").await;
    assistant.ask("Au revoir").await;

    let history = assistant.history(2).unwrap();
    let questions: Vec<&str> = history.iter().map(|r| r.question.as_str()).collect();
    assert_eq!(questions, ["Merci", "Au revoir"]);
    assert_eq!(history[0].intent, Intent::Thanks);
    assert_eq!(assistant.history(0).unwrap().len(), 3);
  }

  #[tokio::test]
  async fn test_held_snapshot_survives_retrain() {
    let temp_dir = TempDir::new().unwrap();
    let assistant = assistant_in(&temp_dir);
    log_jokes(&assistant, 10);

    let before = assistant.snapshot();
    assistant.retrain().await.unwrap().unwrap();
    let after = assistant.snapshot();

    assert!(!Arc::ptr_eq(&before, &after));
    assert!(before.learned.is_empty());
    assert_eq!(before.resolver.classify("blague").score, 4);
    assert_eq!(after.learned.keyword(Intent::Joke, "blague"), Some(5));
    assert_eq!(after.resolver.classify("blague").score, 5);
  }
}
