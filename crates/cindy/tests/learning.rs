mod common;

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use cindy::journal::ModelStore;
use cindy::{Assistant, Intent};
use common::{assistant_with, config_in, StubWeather};

fn stub() -> Arc<StubWeather> {
  Arc::new(StubWeather::default())
}

#[tokio::test]
async fn test_tenth_interaction_retrains_and_reloads() {
  let temp_dir = TempDir::new().unwrap();
  let assistant = assistant_with(temp_dir.path(), stub());

  let before = assistant.ask("blague").await;
  assert_eq!(before.intent, Intent::Joke);
  assert!((before.confidence - 0.4).abs() < 1e-6);

  for _ in 0..9 {
    let answer = assistant.ask("Raconte-moi une blague").await;
    assert_eq!(answer.intent, Intent::Joke);
  }

  let model = ModelStore::new(temp_dir.path().join("model.json")).load().unwrap().unwrap();
  assert_eq!(model.keyword(Intent::Joke, "blague"), Some(5));
  assert_eq!(model.phrase(Intent::Joke, "une blague"), Some(8));

  let after = assistant.classify("blague");
  assert_eq!(after.intent, Intent::Joke);
  assert_eq!(after.score, 5);
  assert!(after.confidence > before.confidence);
}

#[tokio::test]
async fn test_no_retrain_before_threshold() {
  let temp_dir = TempDir::new().unwrap();
  let assistant = assistant_with(temp_dir.path(), stub());

  for _ in 0..9 {
    assistant.ask("Raconte-moi une blague").await;
  }
  assert!(!temp_dir.path().join("model.json").exists());
}

#[tokio::test]
async fn test_learned_weights_stay_capped() {
  let temp_dir = TempDir::new().unwrap();
  let config = cindy::Config { retrain_every: 5, ..config_in(temp_dir.path()) };
  let assistant = Assistant::with_service(config, stub());

  for _ in 0..40 {
    assistant.ask("Raconte-moi une blague vraiment drôle").await;
    assistant.ask("Quel temps fait-il à Lyon ?").await;
  }
  for _ in 0..3 {
    assistant.retrain().await.unwrap();
  }

  let model = ModelStore::new(temp_dir.path().join("model.json")).load().unwrap().unwrap();
  for (_, weights) in model.iter() {
    assert!(weights.keywords.values().all(|w| *w <= 5));
    assert!(weights.phrases.values().all(|w| *w <= 8));
  }
}

#[tokio::test]
async fn test_model_on_disk_is_merged_at_startup() {
  let temp_dir = TempDir::new().unwrap();
  fs::write(
    temp_dir.path().join("model.json"),
    r#"{"joke": {"keywords": {"blague": 5, "devinette": 3}, "phrases": {}}}"#,
  )
  .unwrap();

  let assistant = assistant_with(temp_dir.path(), stub());
  let result = assistant.classify("une devinette");
  assert_eq!(result.intent, Intent::Joke);
  assert_eq!(result.score, 3);
  assert_eq!(assistant.classify("blague").score, 5);
}

#[tokio::test]
async fn test_corrupt_model_falls_back_to_seed_lexicon() {
  let temp_dir = TempDir::new().unwrap();
  fs::write(temp_dir.path().join("model.json"), "{ not json").unwrap();

  let assistant = assistant_with(temp_dir.path(), stub());
  let result = assistant.classify("blague");
  assert_eq!(result.intent, Intent::Joke);
  assert_eq!(result.score, 4);

  // a manual retrain replaces the unreadable file
  assistant.ask("blague").await;
  let summary = assistant.retrain().await.unwrap().unwrap();
  assert_eq!(summary.records, 1);
  assert!(ModelStore::new(temp_dir.path().join("model.json")).load().is_ok());
}

#[tokio::test]
async fn test_history_from_previous_run_counts_towards_retrain() {
  let temp_dir = TempDir::new().unwrap();
  {
    let first_run = assistant_with(temp_dir.path(), stub());
    for _ in 0..6 {
      first_run.ask("Raconte-moi une blague").await;
    }
  }

  let second_run = assistant_with(temp_dir.path(), stub());
  for _ in 0..4 {
    second_run.ask("Raconte-moi une blague").await;
  }
  assert!(temp_dir.path().join("model.json").exists());
}

#[tokio::test]
async fn test_over_cap_model_file_is_lowered_on_load_and_retrain() {
  let temp_dir = TempDir::new().unwrap();
  fs::write(
    temp_dir.path().join("model.json"),
    r#"{"joke": {"keywords": {"devinette": 50}, "phrases": {"une devinette": 40}}}"#,
  )
  .unwrap();

  let assistant = assistant_with(temp_dir.path(), stub());
  let snapshot = assistant.snapshot();
  assert_eq!(snapshot.learned.keyword(Intent::Joke, "devinette"), Some(5));
  let merged = snapshot.resolver.lexicon().weights(Intent::Joke).unwrap();
  assert_eq!(merged.keyword("devinette"), Some(5));
  assert_eq!(merged.phrase("une devinette"), Some(8));
  assert_eq!(assistant.classify("une devinette").score, 13);

  for _ in 0..10 {
    assistant.ask("une blague").await;
  }

  let model = ModelStore::new(temp_dir.path().join("model.json")).load().unwrap().unwrap();
  assert_eq!(model.keyword(Intent::Joke, "devinette"), Some(5));
  assert_eq!(model.phrase(Intent::Joke, "une devinette"), Some(8));
  assert_eq!(model.keyword(Intent::Joke, "blague"), Some(5));
}
