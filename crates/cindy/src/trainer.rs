//! Rebuilds the adaptive model from interaction history by frequency counting.

use std::collections::HashMap;

use crate::intent::Intent;
use crate::journal::InteractionRecord;
use crate::lexicon::{tokenize, AdaptiveModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerLimits {
  pub top_tokens: usize,
  pub top_phrases: usize,
  pub token_cap: u32,
  pub phrase_cap: u32,
}

impl Default for TrainerLimits {
  fn default() -> Self {
    Self { top_tokens: 30, top_phrases: 15, token_cap: 5, phrase_cap: 8 }
  }
}

/// Tokens shorter than this carry no signal ("le", "à", "il").
const MIN_TOKEN_CHARS: usize = 3;

#[derive(Default)]
struct Counts {
  tokens: HashMap<String, u32>,
  phrases: HashMap<String, u32>,
}

fn count_question(counts: &mut Counts, question: &str) {
  let tokens = tokenize(question);

  for token in tokens.iter().filter(|t| t.chars().count() >= MIN_TOKEN_CHARS) {
    *counts.tokens.entry(token.clone()).or_insert(0) += 1;
  }

  for width in [2, 3] {
    for window in tokens.windows(width) {
      *counts.phrases.entry(window.join(" ")).or_insert(0) += 1;
    }
  }
}

/// Highest frequency first, then alphabetical so the cut is deterministic.
fn top(counts: HashMap<String, u32>, limit: usize, min_frequency: u32) -> Vec<(String, u32)> {
  let mut ranked: Vec<(String, u32)> = counts.into_iter().filter(|(_, f)| *f >= min_frequency).collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  ranked.truncate(limit);
  ranked
}

/// Produce the next model generation. Starts from `previous`, so intents
/// absent from the history keep their learned weights. Records classified as
/// unknown are ignored.
pub fn retrain(records: &[InteractionRecord], previous: &AdaptiveModel, limits: &TrainerLimits) -> AdaptiveModel {
  let mut per_intent: HashMap<Intent, Counts> = HashMap::new();
  for record in records.iter().filter(|r| !r.intent.is_unknown()) {
    count_question(per_intent.entry(record.intent).or_default(), &record.question);
  }

  let mut model = previous.clone();
  for (intent, counts) in per_intent {
    let weights = model.entry(intent);

    for (token, frequency) in top(counts.tokens, limits.top_tokens, 1) {
      let current = weights.keyword(&token).unwrap_or(0);
      let weight = (current + frequency / 2).min(limits.token_cap);
      if weight > 0 {
        weights.keywords.insert(token, weight);
      }
    }

    for (phrase, frequency) in top(counts.phrases, limits.top_phrases, 2) {
      let current = weights.phrase(&phrase).unwrap_or(0);
      let weight = (current + frequency).min(limits.phrase_cap);
      weights.phrases.insert(phrase, weight);
    }
  }

  let lowered = model.clamp(limits.token_cap, limits.phrase_cap);
  if lowered > 0 {
    tracing::warn!(lowered, "learned weights above cap were lowered");
  }

  let (keywords, phrases) = model.sizes();
  tracing::info!(records = records.len(), keywords, phrases, "adaptive model retrained");
  model
}
