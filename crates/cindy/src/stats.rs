//! Aggregate view over the interaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::journal::InteractionRecord;

const TOP_ENTITIES: usize = 5;
const TOP_QUESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
  pub value: String,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionStats {
  pub total: usize,
  pub intents: BTreeMap<String, usize>,
  pub top_entities: BTreeMap<String, Vec<ValueCount>>,
  pub average_confidence: BTreeMap<String, f32>,
  pub top_questions: Vec<ValueCount>,
  pub generated_at: DateTime<Utc>,
}

/// Counts values keeping first-appearance order for ties.
#[derive(Default)]
struct Tally {
  order: Vec<String>,
  counts: HashMap<String, usize>,
}

impl Tally {
  fn add(&mut self, value: &str) {
    match self.counts.get_mut(value) {
      Some(count) => *count += 1,
      None => {
        self.order.push(value.to_string());
        self.counts.insert(value.to_string(), 1);
      }
    }
  }

  fn top(&self, limit: usize) -> Vec<ValueCount> {
    let mut ranked: Vec<ValueCount> = self
      .order
      .iter()
      .map(|value| ValueCount { value: value.clone(), count: self.counts[value] })
      .collect();
    // stable sort keeps first appearance among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
  }
}

impl InteractionStats {
  pub fn from_records(records: &[InteractionRecord]) -> Self {
    let mut intents: BTreeMap<String, usize> = BTreeMap::new();
    let mut entity_tallies: BTreeMap<String, Tally> = BTreeMap::new();
    let mut confidence_sums: BTreeMap<String, f32> = BTreeMap::new();
    let mut questions = Tally::default();

    for record in records {
      let intent = record.intent.as_str().to_string();
      *intents.entry(intent.clone()).or_insert(0) += 1;
      *confidence_sums.entry(intent.clone()).or_insert(0.0) += record.confidence;

      let tally = entity_tallies.entry(intent).or_default();
      for (_, value) in record.entities.iter() {
        tally.add(value);
      }

      let question = record.question.trim();
      if !question.is_empty() {
        questions.add(question);
      }
    }

    let average_confidence = confidence_sums
      .into_iter()
      .map(|(intent, sum)| {
        let count = intents.get(&intent).copied().unwrap_or(1).max(1);
        (intent, sum / count as f32)
      })
      .collect();

    let top_entities = entity_tallies
      .into_iter()
      .filter(|(_, tally)| !tally.order.is_empty())
      .map(|(intent, tally)| (intent, tally.top(TOP_ENTITIES)))
      .collect();

    Self {
      total: records.len(),
      intents,
      top_entities,
      average_confidence,
      top_questions: questions.top(TOP_QUESTIONS),
      generated_at: Utc::now(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entities::{EntityKind, EntityMap};
  use crate::intent::Intent;

  fn record(question: &str, intent: Intent, confidence: f32, place: Option<&str>) -> InteractionRecord {
    let mut entities = EntityMap::new();
    if let Some(place) = place {
      entities.insert(EntityKind::Place, place);
    }
    InteractionRecord::new(question, "", intent, confidence, entities)
  }

  #[test]
  fn test_empty_history() {
    let stats = InteractionStats::from_records(&[]);
    assert_eq!(stats.total, 0);
    assert!(stats.intents.is_empty());
    assert!(stats.top_questions.is_empty());
  }

  #[test]
  fn test_distribution_entities_and_averages() {
    let records = vec![
      record("météo à Lyon", Intent::Weather, 1.0, Some("Lyon")),
      record("météo à Nice", Intent::Weather, 0.5, Some("Nice")),
      record("météo à Lyon", Intent::Weather, 1.0, Some("Lyon")),
      record("blague", Intent::Joke, 0.4, None),
    ];
    let stats = InteractionStats::from_records(&records);

    assert_eq!(stats.total, 4);
    assert_eq!(stats.intents["weather"], 3);
    assert_eq!(stats.intents["joke"], 1);

    let places = &stats.top_entities["weather"];
    assert_eq!(places[0], ValueCount { value: "Lyon".into(), count: 2 });
    assert_eq!(places[1].value, "Nice");
    assert!(!stats.top_entities.contains_key("joke"));

    assert!((stats.average_confidence["weather"] - 2.5 / 3.0).abs() < 1e-6);
    assert_eq!(stats.top_questions[0], ValueCount { value: "météo à Lyon".into(), count: 2 });
    assert_eq!(stats.top_questions[1].value, "météo à Nice");
  }
}
