//! Cindy - French Conversational Assistant
//!
//! Classifies free-form questions into intents, extracts places and numbers,
//! fetches current weather, replies from curated templates, and learns keyword
//! weights from its own interaction history.

pub mod assistant;
pub mod calendar;
pub mod config;
pub mod entities;
pub mod error;
pub mod gazetteer;
pub mod intent;
pub mod journal;
pub mod lexicon;
pub mod resolver;
pub mod responses;
pub mod stats;
pub mod trainer;
pub mod weather;

pub use assistant::{Answer, Assistant, RetrainSummary};
pub use config::Config;
pub use entities::{EntityKind, EntityMap};
pub use error::{CindyError, Result, WeatherError};
pub use intent::Intent;
pub use resolver::{Classification, IntentResolver, MatchSource};
