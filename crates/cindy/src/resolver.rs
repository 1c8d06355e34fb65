//! Intent classification.
//!
//! Two stages: an ordered list of curated patterns that short-circuit with
//! full confidence, then additive keyword/phrase scoring against the merged
//! [`Lexicon`]. Classification is deterministic for a given lexicon.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use crate::entities::{self, EntityMap};
use crate::intent::Intent;
use crate::lexicon::{normalize, Lexicon};

pub const PATTERN_CONFIDENCE: f32 = 1.0;
pub const MAX_SCORED_CONFIDENCE: f32 = 0.95;
const SCORE_SCALE: f32 = 10.0;

/// Priority-ordered short-circuit patterns, matched against the lowercased
/// question. The first match wins.
pub const SPECIAL_CASES: &[(Intent, &str)] = &[
  (Intent::Time, r"quelle heure|\bl'heure\b|\bheure est[- ]il|\bheure actuelle\b"),
  (Intent::Date, r"quel jour|quelle (?:est la )?date|\bla date\b|on est (?:le )?combien"),
  (
    Intent::Weather,
    r"\bm[ée]t[ée]o\b|quel temps|\btemps (?:fait|fera|va faire)|va[- ]t[- ]il (?:pleuvoir|neiger)|\bil (?:pleut|neige)\b|pleut[- ]il|\btemp[ée]rature\b",
  ),
  (
    Intent::WellbeingQuestion,
    r"comment (?:ça|ca) va|comment vas[- ]tu|comment allez[- ]vous|\btu vas bien\b|^(?:ça|ca) va\s*\?",
  ),
  (
    Intent::Identity,
    r"qui es[- ]tu|qui [êe]tes[- ]vous|\btu es qui\b|comment (?:tu t'appelles|t'appelles[- ]tu|vous appelez[- ]vous)|quel est ton nom|pr[ée]sente[- ]toi",
  ),
  (Intent::Thanks, r"\bmerci\b|je te remercie|\bthanks\b"),
  (
    Intent::Creator,
    r"qui (?:t'a|vous a) (?:cr[ée]|con[çc]u|programm|d[ée]velopp|fait)|ton cr[ée]ateur|ta cr[ée]atrice|\bcindy singer\b",
  ),
  (
    Intent::Capabilities,
    r"que (?:sais|peux)[- ]tu faire|qu'est[- ]ce que tu (?:sais|peux) faire|tes (?:capacit[ée]s|fonctionnalit[ée]s|comp[ée]tences)|de quoi es[- ]tu capable",
  ),
  (
    Intent::HowItWorks,
    r"comment (?:est[- ]ce que )?tu fonctionnes|comment fonctionnes[- ]tu|comment marches[- ]tu|comment tu marches|ton fonctionnement",
  ),
  (
    Intent::Joke,
    r"(?:raconte|dis)[- ]moi une (?:autre )?blague|une autre blague|fais[- ]moi rire|\bjoke\b",
  ),
  (Intent::Greeting, r"^(?:bonjour|salut|hello|coucou|bonsoir|hey)\b"),
  (Intent::Organization, r"digital factory|ton entreprise|quelle (?:entreprise|soci[ée]t[ée])"),
];

static SPECIAL_CASE_REGEXES: Lazy<Vec<(Intent, Regex)>> = Lazy::new(|| {
  SPECIAL_CASES
    .iter()
    .map(|(intent, pattern)| (*intent, Regex::new(pattern).expect("special-case pattern is valid")))
    .collect()
});

/// Vocabulary that pulls an ambiguous "temps" towards the weather sense.
const WEATHER_CUES: &[&str] = &[
  "fait", "fera", "faire", "météo", "meteo", "pluie", "pleut", "pleuvoir", "chaud", "froid",
  "beau", "soleil", "neige", "nuage", "nuageux", "vent", "orage", "température", "degrés",
  "couvert", "dehors",
];

/// Vocabulary that pulls an ambiguous "temps" towards the duration/clock sense.
const TIME_CUES: &[&str] = &[
  "combien", "heure", "heures", "minute", "minutes", "secondes", "depuis", "reste", "passe",
  "durée", "longtemps", "perdre", "vite",
];

/// Asking for a duration; these outrank a mentioned place ("combien de temps
/// pour aller à Lyon").
const DURATION_CUES: &[&str] = &["combien", "depuis", "durée", "longtemps", "reste"];

const AMBIGUOUS_TEMPS: &str = "temps";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
  /// A curated pattern fired.
  Pattern,
  /// Keyword/phrase scoring cleared the threshold.
  Lexicon,
  /// Nothing cleared the threshold.
  Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
  pub intent: Intent,
  pub confidence: f32,
  /// Raw lexicon score of the winner; zero for pattern hits and fallbacks.
  pub score: u32,
  pub matched_by: MatchSource,
  pub entities: EntityMap,
}

impl Classification {
  fn unknown(entities: EntityMap) -> Self {
    Self { intent: Intent::Unknown, confidence: 0.0, score: 0, matched_by: MatchSource::Fallback, entities }
  }
}

/// First special-case intent whose pattern matches `text`.
pub fn special_case(text: &str) -> Option<Intent> {
  let lower = text.trim().to_lowercase().replace('’', "'");
  SPECIAL_CASE_REGEXES.iter().find(|(_, re)| re.is_match(&lower)).map(|(intent, _)| *intent)
}

/// Which sense of "temps" the question uses. Duration questions win first,
/// then weather vocabulary or a place, then clock vocabulary; weather otherwise.
pub fn temps_sense(tokens: &HashSet<&str>, entities: &EntityMap) -> Intent {
  let has_cue = |cues: &[&str]| cues.iter().any(|cue| tokens.contains(*cue));
  if has_cue(DURATION_CUES) {
    Intent::Time
  } else if entities.place().is_some() || has_cue(WEATHER_CUES) {
    Intent::Weather
  } else if has_cue(TIME_CUES) {
    Intent::Time
  } else {
    Intent::Weather
  }
}

#[derive(Debug, Clone)]
pub struct IntentResolver {
  lexicon: Lexicon,
  min_score: u32,
}

impl IntentResolver {
  pub fn new(lexicon: Lexicon, min_score: u32) -> Self {
    Self { lexicon, min_score }
  }

  pub fn lexicon(&self) -> &Lexicon {
    &self.lexicon
  }

  pub fn classify(&self, text: &str) -> Classification {
    if text.trim().is_empty() {
      return Classification::unknown(EntityMap::new());
    }

    let entities = entities::extract(text);

    if let Some(intent) = special_case(text) {
      tracing::debug!(%intent, "special-case pattern matched");
      return Classification {
        intent,
        confidence: PATTERN_CONFIDENCE,
        score: 0,
        matched_by: MatchSource::Pattern,
        entities,
      };
    }

    let (intent, score) = self.best_score(text, &entities);
    if score < self.min_score || intent.is_unknown() {
      tracing::debug!(score, min_score = self.min_score, "below threshold, falling back to unknown");
      return Classification::unknown(entities);
    }

    Classification {
      intent,
      confidence: (score as f32 / SCORE_SCALE).min(MAX_SCORED_CONFIDENCE),
      score,
      matched_by: MatchSource::Lexicon,
      entities,
    }
  }

  /// Score every intent; the strictly highest wins, ties keep the earlier intent.
  fn best_score(&self, text: &str, entities: &EntityMap) -> (Intent, u32) {
    let normalized = normalize(text);
    let tokens: HashSet<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    let padded = format!(" {normalized} ");
    let sense = tokens.contains(AMBIGUOUS_TEMPS).then(|| temps_sense(&tokens, entities));

    let mut best = (Intent::Unknown, 0);
    for (intent, weights) in self.lexicon.iter() {
      let mut score = 0u32;
      for (key, weight) in &weights.keywords {
        if !tokens.contains(key.as_str()) {
          continue;
        }
        if key == AMBIGUOUS_TEMPS && matches!(intent, Intent::Weather | Intent::Time) && sense != Some(intent) {
          continue;
        }
        score = score.saturating_add(*weight);
      }
      for (phrase, weight) in &weights.phrases {
        if padded.contains(&format!(" {phrase} ")) {
          score = score.saturating_add(*weight);
        }
      }
      if score > best.1 {
        best = (intent, score);
      }
    }
    tracing::debug!(intent = %best.0, score = best.1, "lexicon scoring");
    best
  }
}
