//! Keyword and phrase weights per intent.
//!
//! The seed table is compiled in. The adaptive model is learned from the
//! interaction log and merged on top of it into a read-only [`Lexicon`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::intent::Intent;

/// Lowercase, turn punctuation into spaces and collapse whitespace.
/// "Va-t-il pleuvoir à Nice ?" becomes "va t il pleuvoir à nice".
pub fn normalize(text: &str) -> String {
  let spaced: String = text
    .to_lowercase()
    .chars()
    .map(|c| if c.is_alphanumeric() { c } else { ' ' })
    .collect();
  spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn tokenize(text: &str) -> Vec<String> {
  normalize(text).split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightMap {
  #[serde(default)]
  pub keywords: BTreeMap<String, u32>,
  #[serde(default)]
  pub phrases: BTreeMap<String, u32>,
}

impl WeightMap {
  /// Insert a raw key; multi-word keys land in `phrases`. Keeps the larger
  /// weight when the normalized key already exists.
  pub fn insert(&mut self, raw_key: &str, weight: u32) {
    let key = normalize(raw_key);
    if key.is_empty() {
      return;
    }
    let target = if key.contains(' ') { &mut self.phrases } else { &mut self.keywords };
    let slot = target.entry(key).or_insert(0);
    *slot = (*slot).max(weight);
  }

  /// Union with learned weights; a learned weight replaces the existing one
  /// only when it is larger.
  pub fn absorb(&mut self, learned: &WeightMap) {
    for (key, weight) in &learned.keywords {
      let slot = self.keywords.entry(key.clone()).or_insert(0);
      *slot = (*slot).max(*weight);
    }
    for (key, weight) in &learned.phrases {
      let slot = self.phrases.entry(key.clone()).or_insert(0);
      *slot = (*slot).max(*weight);
    }
  }

  pub fn keyword(&self, key: &str) -> Option<u32> {
    self.keywords.get(key).copied()
  }

  pub fn phrase(&self, key: &str) -> Option<u32> {
    self.phrases.get(key).copied()
  }

  /// Lower every weight above its cap; returns how many were lowered.
  pub fn clamp(&mut self, keyword_cap: u32, phrase_cap: u32) -> usize {
    let mut lowered = 0;
    for (weights, cap) in [(&mut self.keywords, keyword_cap), (&mut self.phrases, phrase_cap)] {
      for weight in weights.values_mut().filter(|w| **w > cap) {
        *weight = cap;
        lowered += 1;
      }
    }
    lowered
  }

  pub fn is_empty(&self) -> bool {
    self.keywords.is_empty() && self.phrases.is_empty()
  }
}

/// Learned weights, persisted as `{"joke": {"keywords": {..}, "phrases": {..}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, WeightMap>", into = "BTreeMap<String, WeightMap>")]
pub struct AdaptiveModel {
  intents: BTreeMap<Intent, WeightMap>,
}

impl From<BTreeMap<String, WeightMap>> for AdaptiveModel {
  fn from(raw: BTreeMap<String, WeightMap>) -> Self {
    let mut intents = BTreeMap::new();
    for (name, weights) in raw {
      match name.parse::<Intent>() {
        Ok(Intent::Unknown) => {}
        Ok(intent) => {
          intents.insert(intent, weights);
        }
        Err(e) => tracing::warn!(intent = %name, "ignoring learned weights: {e}"),
      }
    }
    Self { intents }
  }
}

impl From<AdaptiveModel> for BTreeMap<String, WeightMap> {
  fn from(model: AdaptiveModel) -> Self {
    model.intents.into_iter().map(|(intent, weights)| (intent.as_str().to_string(), weights)).collect()
  }
}

impl AdaptiveModel {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, intent: Intent) -> Option<&WeightMap> {
    self.intents.get(&intent)
  }

  pub fn entry(&mut self, intent: Intent) -> &mut WeightMap {
    self.intents.entry(intent).or_default()
  }

  pub fn iter(&self) -> impl Iterator<Item = (Intent, &WeightMap)> {
    self.intents.iter().map(|(i, w)| (*i, w))
  }

  pub fn keyword(&self, intent: Intent, key: &str) -> Option<u32> {
    self.get(intent).and_then(|w| w.keyword(key))
  }

  pub fn phrase(&self, intent: Intent, key: &str) -> Option<u32> {
    self.get(intent).and_then(|w| w.phrase(key))
  }

  pub fn is_empty(&self) -> bool {
    self.intents.values().all(WeightMap::is_empty)
  }

  /// Bring every learned weight under the caps, e.g. for a model file written
  /// with looser limits. Returns how many weights were lowered.
  pub fn clamp(&mut self, keyword_cap: u32, phrase_cap: u32) -> usize {
    self.intents.values_mut().map(|w| w.clamp(keyword_cap, phrase_cap)).sum()
  }

  /// Number of (keywords, phrases) across all intents.
  pub fn sizes(&self) -> (usize, usize) {
    self.intents.values().fold((0, 0), |(k, p), w| (k + w.keywords.len(), p + w.phrases.len()))
  }
}

const GREETING: &[(&str, u32)] = &[
  ("bonjour", 3), ("salut", 3), ("hello", 3), ("coucou", 3), ("hey", 2), ("bonsoir", 3),
  ("jour", 1), ("soir", 1),
];

const FAREWELL: &[(&str, u32)] = &[
  ("au revoir", 5), ("revoir", 3), ("bye", 4), ("adieu", 4), ("à bientôt", 5), ("bientôt", 2),
  ("bonne nuit", 4), ("bonne soirée", 4), ("à plus", 3), ("ciao", 4), ("quitter", 2),
];

const WEATHER: &[(&str, u32)] = &[
  ("meteo", 5), ("météo", 5), ("temps", 4), ("température", 4), ("climat", 3), ("chaud", 2),
  ("froid", 2), ("pluie", 3), ("soleil", 3), ("nuage", 2), ("neige", 3), ("ensoleillé", 3),
  ("pluvieux", 3), ("degrés", 3), ("météorologique", 4), ("pleuvoir", 5), ("pleut", 5),
  ("pleuvra", 5), ("va-t-il pleuvoir", 6), ("va-t-il", 2), ("fera-t-il", 2), ("vent", 2),
  ("orage", 3),
];

const TIME: &[(&str, u32)] = &[
  ("heure", 5), ("temps", 2), ("horloge", 3), ("montre", 2), ("actuel", 1), ("maintenant", 1),
  ("précisément", 1), ("moment", 1), ("horaire", 3),
];

const DATE: &[(&str, u32)] = &[
  ("date", 5), ("jour", 3), ("mois", 3), ("année", 3), ("aujourd'hui", 4), ("semaine", 2),
  ("calendrier", 3), ("actuel", 1),
];

const THANKS: &[(&str, u32)] = &[
  ("merci", 5), ("remercie", 4), ("remercier", 4), ("thanks", 3), ("reconnaissance", 2),
  ("gentil", 2), ("sympa", 2),
];

const WELLBEING_QUESTION: &[(&str, u32)] = &[
  ("ca va", 4), ("ça va", 4), ("vas-tu", 4), ("comment vas", 4), ("comment tu vas", 4),
  ("comment ça va", 5), ("tu vas bien", 4), ("forme", 2), ("santé", 2), ("humeur", 2),
  ("bien", 1), ("état", 1),
];

const WELLBEING_ANSWER: &[(&str, u32)] = &[
  ("je vais bien", 6), ("ça va bien", 6), ("ca va bien", 6), ("très bien", 4), ("pas mal", 3),
  ("en forme", 3), ("super", 2), ("génial", 2), ("bof", 3), ("fatigué", 3), ("fatiguée", 3),
  ("content", 2), ("contente", 2),
];

const HELP: &[(&str, u32)] = &[
  ("aide", 5), ("aider", 4), ("help", 4), ("comment", 2), ("besoin", 2), ("pouvez-vous", 1),
  ("peux-tu", 1), ("assister", 3), ("assistance", 3), ("guide", 3), ("montrer", 2),
  ("expliquer", 2), ("instructions", 3),
];

const CAPABILITIES: &[(&str, u32)] = &[
  ("faire", 3), ("capable", 4), ("capacités", 5), ("fonctionnalités", 4), ("options", 3),
  ("possibilités", 4), ("quoi faire", 4), ("que sais-tu", 5), ("que peux-tu", 5),
  ("commandes", 3), ("fonctions", 3), ("services", 2),
];

const IDENTITY: &[(&str, u32)] = &[
  ("qui es-tu", 5), ("qui êtes-vous", 5), ("tu es qui", 5), ("ton nom", 4), ("t'appelles", 4),
  ("appelles", 3), ("présente-toi", 4), ("identité", 4),
];

const CREATOR: &[(&str, u32)] = &[
  ("créateur", 5), ("créatrice", 5), ("créé", 3), ("créée", 3), ("conçu", 3), ("conçue", 3),
  ("programmé", 3), ("programmée", 3), ("développé", 3), ("qui t'a", 4), ("inventeur", 4),
  ("cindy singer", 5),
];

const HOW_IT_WORKS: &[(&str, u32)] = &[
  ("fonctionnes", 5), ("fonctionnement", 5), ("marches", 3), ("comment tu marches", 5),
  ("comment ça marche", 4), ("algorithme", 3), ("apprends", 3), ("apprentissage", 3),
  ("comprends", 2),
];

const JOKE: &[(&str, u32)] = &[
  ("blague", 4), ("blagues", 4), ("joke", 5), ("drôle", 4), ("amusant", 4), ("rire", 4),
  ("humour", 4), ("raconter", 3), ("raconte", 3), ("histoire", 2), ("rigoler", 4),
  ("marrant", 4), ("hilarant", 4), ("comique", 4), ("gag", 4), ("farce", 3),
];

const ORGANIZATION: &[(&str, u32)] = &[
  ("digital factory", 6), ("entreprise", 5), ("société", 4), ("startup", 3), ("start-up", 3),
  ("organisation", 4), ("compagnie", 3), ("digital", 3), ("factory", 3),
];

fn seed_entries(intent: Intent) -> &'static [(&'static str, u32)] {
  match intent {
    Intent::Greeting => GREETING,
    Intent::Farewell => FAREWELL,
    Intent::Weather => WEATHER,
    Intent::Time => TIME,
    Intent::Date => DATE,
    Intent::Thanks => THANKS,
    Intent::WellbeingQuestion => WELLBEING_QUESTION,
    Intent::WellbeingAnswer => WELLBEING_ANSWER,
    Intent::Help => HELP,
    Intent::Capabilities => CAPABILITIES,
    Intent::Identity => IDENTITY,
    Intent::Creator => CREATOR,
    Intent::HowItWorks => HOW_IT_WORKS,
    Intent::Joke => JOKE,
    Intent::Organization => ORGANIZATION,
    Intent::Unknown => &[],
  }
}

/// The merged classification table. Built once per model generation and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
  tables: BTreeMap<Intent, WeightMap>,
}

impl Lexicon {
  pub fn seed() -> Self {
    let mut tables = BTreeMap::new();
    for intent in Intent::ALL {
      let entries = seed_entries(intent);
      if entries.is_empty() {
        continue;
      }
      let mut weights = WeightMap::default();
      for (key, weight) in entries {
        weights.insert(key, *weight);
      }
      tables.insert(intent, weights);
    }
    Self { tables }
  }

  /// Seed table with the learned model laid over it.
  pub fn merged(model: &AdaptiveModel) -> Self {
    let mut lexicon = Self::seed();
    for (intent, learned) in model.iter() {
      lexicon.tables.entry(intent).or_default().absorb(learned);
    }
    lexicon
  }

  pub fn weights(&self, intent: Intent) -> Option<&WeightMap> {
    self.tables.get(&intent)
  }

  /// Tables in enumeration order.
  pub fn iter(&self) -> impl Iterator<Item = (Intent, &WeightMap)> {
    self.tables.iter().map(|(i, w)| (*i, w))
  }
}
