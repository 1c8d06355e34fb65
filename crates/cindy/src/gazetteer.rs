//! Built-in coordinates for common French cities. Consulted before the
//! geocoding service and by the entity extractor to spot bare city names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::weather::ResolvedLocation;

#[derive(Debug, Clone, Copy)]
pub struct KnownPlace {
  pub key: &'static str,
  pub name: &'static str,
  pub latitude: f64,
  pub longitude: f64,
}

const fn place(key: &'static str, name: &'static str, latitude: f64, longitude: f64) -> KnownPlace {
  KnownPlace { key, name, latitude, longitude }
}

pub const KNOWN_PLACES: &[KnownPlace] = &[
  place("paris", "Paris", 48.8567, 2.3508),
  place("marseille", "Marseille", 43.2965, 5.3698),
  place("lyon", "Lyon", 45.7578, 4.8320),
  place("toulouse", "Toulouse", 43.6043, 1.4437),
  place("nice", "Nice", 43.7034, 7.2663),
  place("nantes", "Nantes", 47.2184, -1.5536),
  place("strasbourg", "Strasbourg", 48.5734, 7.7521),
  place("montpellier", "Montpellier", 43.6119, 3.8772),
  place("bordeaux", "Bordeaux", 44.8378, -0.5792),
  place("lille", "Lille", 50.6292, 3.0573),
  place("rennes", "Rennes", 48.1173, -1.6778),
  place("reims", "Reims", 49.2583, 4.0317),
  place("toulon", "Toulon", 43.1242, 5.9280),
  place("saint-étienne", "Saint-Étienne", 45.4397, 4.3872),
  place("angers", "Angers", 47.4784, -0.5632),
  place("grenoble", "Grenoble", 45.1885, 5.7245),
  place("dijon", "Dijon", 47.3220, 5.0415),
  place("nîmes", "Nîmes", 43.8367, 4.3601),
  place("aix-en-provence", "Aix-en-Provence", 43.5297, 5.4474),
  place("nancy", "Nancy", 48.6921, 6.1844),
  place("metz", "Metz", 49.1193, 6.1757),
];

const COUNTRY: &str = "France";

static MENTION_REGEX: Lazy<Regex> = Lazy::new(|| {
  let mut keys: Vec<&str> = KNOWN_PLACES.iter().map(|p| p.key).collect();
  // Longest first so "toulon" never shadows "toulouse" at the same offset
  keys.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));
  let alternation = keys.iter().map(|k| regex::escape(k)).collect::<Vec<_>>().join("|");
  Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("gazetteer pattern is valid")
});

/// Case-insensitive lookup by city name.
pub fn lookup(name: &str) -> Option<ResolvedLocation> {
  let wanted = name.trim().to_lowercase();
  KNOWN_PLACES.iter().find(|p| p.key == wanted).map(|p| ResolvedLocation {
    name: p.name.to_string(),
    country: COUNTRY.to_string(),
    latitude: p.latitude,
    longitude: p.longitude,
  })
}

/// The earliest known city mentioned in `text`, with the casing the user typed.
pub fn find_mention(text: &str) -> Option<&str> {
  MENTION_REGEX.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lookup_is_case_insensitive() {
    let lyon = lookup("LYON").unwrap();
    assert_eq!(lyon.name, "Lyon");
    assert_eq!(lyon.country, "France");
    assert!((lyon.latitude - 45.7578).abs() < 1e-9);

    assert_eq!(lookup("Saint-Étienne").unwrap().name, "Saint-Étienne");
    assert!(lookup("Tokyo").is_none());
  }

  #[test]
  fn test_find_mention_prefers_earliest_and_whole_words() {
    assert_eq!(find_mention("entre Nantes et Lyon"), Some("Nantes"));
    assert_eq!(find_mention("il fait beau à TOULOUSE"), Some("TOULOUSE"));
    assert_eq!(find_mention("aix-en-provence ou paris ?"), Some("aix-en-provence"));
    assert_eq!(find_mention("une nicette"), None);
  }
}
