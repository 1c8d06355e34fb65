//! Best-effort extraction of places and numbers from a question.
//!
//! Place detection runs three layers and keeps the first hit:
//! weather phrasing templates, known city names, then bare prepositions.
//! False positives are tolerated since the weather pipeline falls back to the
//! default location for anything it cannot resolve.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::gazetteer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Place,
  Number,
}

impl EntityKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      EntityKind::Place => "place",
      EntityKind::Number => "number",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityMap(BTreeMap<EntityKind, String>);

impl EntityMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, kind: EntityKind, value: impl Into<String>) {
    self.0.insert(kind, value.into());
  }

  pub fn get(&self, kind: EntityKind) -> Option<&str> {
    self.0.get(&kind).map(String::as_str)
  }

  pub fn place(&self) -> Option<&str> {
    self.get(EntityKind::Place)
  }

  pub fn number(&self) -> Option<&str> {
    self.get(EntityKind::Number)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &str)> {
    self.0.iter().map(|(k, v)| (*k, v.as_str()))
  }
}

const WORD: &str = r"[a-zà-ÿœ]+(?:-[a-zà-ÿœ]+)*";

/// Weather phrasings, tried in order against the lowercased question.
const WEATHER_TEMPLATES: &[&str] = &[
  r"\b(?:météo|meteo|temps|température|temperature|climat)\s+(?:à|a|au|en|de|pour|sur)\s+(WORD)",
  r"\b(?:fait-il|fait il|fera-t-il|fera t il|pleut-il|pleut il|neige-t-il|pleuvoir|va-t-il|va t il)\s+(?:à|a|au|en|pour|sur)\s+(WORD)",
  r"\b(?:pluie|pleut|neige|neiger|soleil|chaud|froid|beau|vent)\s+(?:à|a|au|en|de|pour|sur)\s+(WORD)",
];

static TEMPLATE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
  WEATHER_TEMPLATES
    .iter()
    .map(|t| Regex::new(&t.replace("WORD", WORD)).expect("weather template is valid"))
    .collect()
});

static PREPOSITION_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(&format!(r"(?:^|\s)(?:à|au|aux|en|pour|sur)\s+({WORD})")).expect("preposition pattern is valid")
});

static NUMBER_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\b\d+\b").expect("number pattern is valid"));

/// Words that follow a preposition without naming a place.
const STOP_WORDS: &[&str] = &[
  "demain", "aujourd", "hier", "matin", "soir", "midi", "nuit", "semaine", "weekend", "week-end",
  "moment", "heure", "heures", "temps", "pluie", "météo", "meteo", "moi", "toi", "lui", "nous",
  "vous", "eux", "elle", "elles", "il", "ils", "on", "ce", "cet", "cette", "ces", "ça", "ca",
  "la", "le", "les", "l", "un", "une", "des", "du", "mon", "ma", "mes", "ton", "ta", "tes",
  "son", "sa", "ses", "notre", "nos", "votre", "vos", "quel", "quelle", "quels", "quelles",
  "quoi", "combien", "maintenant", "ville", "général", "fait", "forme", "plus", "cours",
  "ligne", "avance", "retard", "revoir", "secours", "plaisir", "bientôt", "fois", "ici",
  "effet", "attendant", "tout", "bref", "face", "vrai", "train", "rire", "aller", "faire",
  "partir", "venir", "rentrer", "arriver", "rouler", "marcher", "voyager", "être", "avoir",
];

/// Lowercase particles kept in lowercase inside compound place names.
const PARTICLES: &[&str] = &["en", "sur", "de", "la", "le", "les", "du", "des", "lès"];

fn is_stop_word(candidate: &str) -> bool {
  STOP_WORDS.contains(&candidate)
}

/// Title-case a place name: "aix-en-provence" becomes "Aix-en-Provence".
pub fn title_case(raw: &str) -> String {
  let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
  let mut result = String::with_capacity(collapsed.len());
  let mut word = String::new();
  let mut index = 0;

  for c in collapsed.chars() {
    if c == '-' || c == ' ' {
      push_word(&mut result, &word, index);
      index += 1;
      word.clear();
      result.push(c);
    } else {
      word.push(c);
    }
  }
  push_word(&mut result, &word, index);
  result
}

fn push_word(out: &mut String, word: &str, index: usize) {
  if index > 0 && PARTICLES.contains(&word) {
    out.push_str(word);
    return;
  }
  let mut chars = word.chars();
  if let Some(first) = chars.next() {
    out.extend(first.to_uppercase());
    out.push_str(chars.as_str());
  }
}

fn first_candidate(regex: &Regex, text: &str) -> Option<String> {
  regex
    .captures_iter(text)
    .filter_map(|caps| caps.get(1))
    .map(|m| m.as_str())
    .find(|candidate| !is_stop_word(candidate))
    .map(title_case)
}

/// Pull a place name out of the question, if any.
pub fn extract_place(text: &str) -> Option<String> {
  let lower = text.to_lowercase();

  if let Some(place) = TEMPLATE_REGEXES.iter().find_map(|re| first_candidate(re, &lower)) {
    return Some(place);
  }

  if let Some(mention) = gazetteer::find_mention(text) {
    return Some(title_case(mention));
  }

  first_candidate(&PREPOSITION_REGEX, &lower)
}

pub fn extract_number(text: &str) -> Option<String> {
  NUMBER_REGEX.find(text).map(|m| m.as_str().to_string())
}

/// Never fails; an empty map means nothing plausible was found.
pub fn extract(text: &str) -> EntityMap {
  let mut entities = EntityMap::new();
  if let Some(place) = extract_place(text) {
    entities.insert(EntityKind::Place, place);
  }
  if let Some(number) = extract_number(text) {
    entities.insert(EntityKind::Number, number);
  }
  entities
}
