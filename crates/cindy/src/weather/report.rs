use chrono::{DateTime, Local};
use serde::Serialize;

use super::{CurrentConditions, ResolvedLocation, Units};
use crate::calendar;
use crate::error::WeatherError;

const CONNECTIVITY_APOLOGY: &str =
  "Désolé, je n'ai pas pu récupérer la météo en raison d'une erreur de connexion. Veuillez réessayer plus tard.";
const DATA_APOLOGY: &str =
  "Désolé, une erreur s'est produite lors de la récupération des données météo. Veuillez réessayer.";

/// User-facing text for a failed lookup. Carries no weather data.
pub fn apology(error: &WeatherError) -> &'static str {
  if error.is_connectivity() {
    CONNECTIVITY_APOLOGY
  } else {
    DATA_APOLOGY
  }
}

/// WMO weather interpretation codes.
pub fn describe_code(code: u32) -> &'static str {
  match code {
    0 => "Ciel dégagé",
    1 => "Principalement dégagé",
    2 => "Partiellement nuageux",
    3 => "Nuageux",
    45 => "Brouillard",
    48 => "Brouillard givrant",
    51 => "Bruine légère",
    53 => "Bruine modérée",
    55 => "Bruine dense",
    56 => "Bruine verglaçante légère",
    57 => "Bruine verglaçante dense",
    61 => "Pluie légère",
    63 => "Pluie modérée",
    65 => "Pluie forte",
    66 => "Pluie verglaçante légère",
    67 => "Pluie verglaçante forte",
    71 => "Chute de neige légère",
    73 => "Chute de neige modérée",
    75 => "Chute de neige forte",
    77 => "Grains de neige",
    80 => "Averses de pluie légères",
    81 => "Averses de pluie modérées",
    82 => "Averses de pluie violentes",
    85 => "Averses de neige légères",
    86 => "Averses de neige fortes",
    95 => "Orage",
    96 => "Orage avec grêle légère",
    99 => "Orage avec grêle forte",
    _ => "Météo inconnue",
  }
}

pub fn icon_for_code(code: u32) -> &'static str {
  match code {
    0 => "☀️",
    1 => "🌤️",
    2 => "⛅",
    3 => "☁️",
    45 => "🌫️",
    48 => "🌫️❄️",
    51 | 53 | 55 => "🌦️",
    56 | 57 | 66 | 67 => "🌧️❄️",
    61 | 63 | 65 => "🌧️",
    71 | 73 | 75 => "❄️",
    77 | 85 => "🌨️",
    80 | 81 => "🌦️",
    82 => "🌧️",
    86 => "🌨️❄️",
    95 => "⛈️",
    96 | 99 => "⛈️❄️",
    _ => "🌍",
  }
}

fn whole(value: f64) -> i64 {
  value.round() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
  pub location: ResolvedLocation,
  pub temperature: f64,
  pub apparent_temperature: f64,
  pub humidity: f64,
  pub wind_speed: f64,
  pub weather_code: u32,
  pub description: String,
  pub icon: String,
  pub units: Units,
  pub observed_at: DateTime<Local>,
}

impl WeatherReport {
  pub fn new(location: ResolvedLocation, conditions: CurrentConditions, observed_at: DateTime<Local>) -> Self {
    Self {
      location,
      temperature: conditions.temperature,
      apparent_temperature: conditions.apparent_temperature,
      humidity: conditions.humidity,
      wind_speed: conditions.wind_speed,
      weather_code: conditions.weather_code,
      description: describe_code(conditions.weather_code).to_string(),
      icon: icon_for_code(conditions.weather_code).to_string(),
      units: conditions.units,
      observed_at,
    }
  }

  pub fn render(&self) -> String {
    let today = calendar::capitalize(&calendar::long_date(&self.observed_at));
    let units = &self.units;
    [
      format!("📆  {today}"),
      String::new(),
      format!(
        "📍  {}  {}  {}{}",
        self.location.display_name(),
        self.icon,
        whole(self.temperature),
        units.temperature
      ),
      format!("    {}", self.description),
      String::new(),
      format!("🌡️  Ressentie: {}{}", whole(self.apparent_temperature), units.temperature),
      format!("💦  Humidité: {}{}", whole(self.humidity), units.humidity),
      format!("💨  Vent: {} {}", whole(self.wind_speed), units.wind_speed),
      String::new(),
      format!("⏳  Mise à jour: {}", self.observed_at.format("%Y-%m-%d %H:%M:%S")),
    ]
    .join("\n")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn report(code: u32) -> WeatherReport {
    let conditions = CurrentConditions {
      temperature: 18.6,
      apparent_temperature: 17.2,
      humidity: 64.0,
      wind_speed: 12.4,
      weather_code: code,
      units: Units::default(),
    };
    let at = Local.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap();
    WeatherReport::new(ResolvedLocation::paris(), conditions, at)
  }

  #[test]
  fn test_unknown_codes_map_to_generic_entry() {
    assert_eq!(describe_code(42), "Météo inconnue");
    assert_eq!(icon_for_code(42), "🌍");
    assert_eq!(describe_code(63), "Pluie modérée");
  }

  #[test]
  fn test_render_layout() {
    let text = report(0).render();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "📆  Lundi 19 octobre 2026");
    assert_eq!(lines[2], "📍  Paris, France  ☀️  19°C");
    assert_eq!(lines[3], "    Ciel dégagé");
    assert_eq!(lines[5], "🌡️  Ressentie: 17°C");
    assert_eq!(lines[6], "💦  Humidité: 64%");
    assert_eq!(lines[7], "💨  Vent: 12 km/h");
    assert_eq!(lines[9], "⏳  Mise à jour: 2026-10-19 14:05:00");
  }

  #[test]
  fn test_apology_depends_on_failure_kind() {
    assert_eq!(apology(&WeatherError::timeout("forecast", 5)), CONNECTIVITY_APOLOGY);
    assert_eq!(apology(&WeatherError::payload("forecast", "missing current")), DATA_APOLOGY);
  }
}
