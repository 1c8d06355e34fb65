//! French names for dates rendered by chrono, which only speaks English.

use chrono::{DateTime, TimeZone};

const DAYS: [(&str, &str); 7] = [
  ("Monday", "lundi"),
  ("Tuesday", "mardi"),
  ("Wednesday", "mercredi"),
  ("Thursday", "jeudi"),
  ("Friday", "vendredi"),
  ("Saturday", "samedi"),
  ("Sunday", "dimanche"),
];

const MONTHS: [(&str, &str); 12] = [
  ("January", "janvier"),
  ("February", "février"),
  ("March", "mars"),
  ("April", "avril"),
  ("May", "mai"),
  ("June", "juin"),
  ("July", "juillet"),
  ("August", "août"),
  ("September", "septembre"),
  ("October", "octobre"),
  ("November", "novembre"),
  ("December", "décembre"),
];

/// Replace English weekday and month names with their French equivalents.
pub fn translate(english: &str) -> String {
  let mut text = english.to_string();
  for (en, fr) in DAYS.iter().chain(MONTHS.iter()) {
    text = text.replace(en, fr);
  }
  text
}

/// "lundi 19 octobre 2026"
pub fn long_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
  Tz::Offset: std::fmt::Display,
{
  translate(&at.format("%A %-d %B %Y").to_string())
}

/// "14:05"
pub fn clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
  Tz::Offset: std::fmt::Display,
{
  at.format("%H:%M").to_string()
}

pub fn capitalize(text: &str) -> String {
  let mut chars = text.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
