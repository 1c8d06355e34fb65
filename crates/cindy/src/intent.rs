use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the user meant. Declaration order doubles as the tie-break order
/// when two intents score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
  Greeting,
  Farewell,
  Weather,
  Time,
  Date,
  Thanks,
  WellbeingQuestion,
  WellbeingAnswer,
  Help,
  Capabilities,
  Identity,
  Creator,
  HowItWorks,
  Joke,
  Organization,
  Unknown,
}

impl Intent {
  pub const ALL: [Intent; 16] = [
    Intent::Greeting,
    Intent::Farewell,
    Intent::Weather,
    Intent::Time,
    Intent::Date,
    Intent::Thanks,
    Intent::WellbeingQuestion,
    Intent::WellbeingAnswer,
    Intent::Help,
    Intent::Capabilities,
    Intent::Identity,
    Intent::Creator,
    Intent::HowItWorks,
    Intent::Joke,
    Intent::Organization,
    Intent::Unknown,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Intent::Greeting => "greeting",
      Intent::Farewell => "farewell",
      Intent::Weather => "weather",
      Intent::Time => "time",
      Intent::Date => "date",
      Intent::Thanks => "thanks",
      Intent::WellbeingQuestion => "wellbeing_question",
      Intent::WellbeingAnswer => "wellbeing_answer",
      Intent::Help => "help",
      Intent::Capabilities => "capabilities",
      Intent::Identity => "identity",
      Intent::Creator => "creator",
      Intent::HowItWorks => "how_it_works",
      Intent::Joke => "joke",
      Intent::Organization => "organization",
      Intent::Unknown => "unknown",
    }
  }

  pub fn is_unknown(&self) -> bool {
    matches!(self, Intent::Unknown)
  }
}

impl fmt::Display for Intent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntentName(pub String);

impl fmt::Display for UnknownIntentName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown intent name '{}'", self.0)
  }
}

impl std::error::Error for UnknownIntentName {}

impl FromStr for Intent {
  type Err = UnknownIntentName;

  /// Accepts both `how_it_works` and `how-it-works` spellings.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_lowercase().replace('-', "_");
    Intent::ALL
      .iter()
      .copied()
      .find(|intent| intent.as_str() == wanted)
      .ok_or_else(|| UnknownIntentName(s.to_string()))
  }
}
