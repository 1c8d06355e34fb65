//! Durable storage: the append-only interaction log (JSON Lines) and the
//! learned model document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::entities::EntityMap;
use crate::error::{CindyError, Result};
use crate::intent::Intent;
use crate::lexicon::AdaptiveModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
  pub question: String,
  pub reply: String,
  pub intent: Intent,
  pub confidence: f32,
  #[serde(default)]
  pub entities: EntityMap,
  pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
  pub fn new(
    question: impl Into<String>,
    reply: impl Into<String>,
    intent: Intent,
    confidence: f32,
    entities: EntityMap,
  ) -> Self {
    Self {
      question: question.into(),
      reply: reply.into(),
      intent,
      confidence,
      entities,
      timestamp: Utc::now(),
    }
  }
}

fn ensure_parent(path: &Path) -> Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent).map_err(|e| CindyError::io(parent, e))?;
    }
  }
  Ok(())
}

/// Serialize `value` as pretty JSON and swap it into place with a rename, so
/// readers see either the old document or the new one.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  ensure_parent(path)?;
  let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
  let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| CindyError::io(dir, e))?;
  serde_json::to_writer_pretty(&mut file, value).map_err(|e| CindyError::json(path, e))?;
  file.write_all(b"\n").map_err(|e| CindyError::io(path, e))?;
  file.as_file().sync_all().map_err(|e| CindyError::io(path, e))?;
  file.persist(path).map_err(|e| CindyError::persist(path, e.to_string()))?;
  Ok(())
}

#[derive(Debug, Clone)]
pub struct InteractionLog {
  path: PathBuf,
}

impl InteractionLog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn append(&self, record: &InteractionRecord) -> Result<()> {
    ensure_parent(&self.path)?;
    let line = serde_json::to_string(record).map_err(|e| CindyError::json(&self.path, e))?;
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .map_err(|e| CindyError::io(&self.path, e))?;
    writeln!(file, "{line}").map_err(|e| CindyError::io(&self.path, e))?;
    Ok(())
  }

  /// Every record in insertion order. A missing log is an empty history;
  /// lines that do not parse are skipped.
  pub fn read_all(&self) -> Result<Vec<InteractionRecord>> {
    let file = match fs::File::open(&self.path) {
      Ok(f) => f,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(CindyError::io(&self.path, e)),
    };

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
      let line = line.map_err(|e| CindyError::io(&self.path, e))?;
      if line.trim().is_empty() {
        continue;
      }
      match serde_json::from_str::<InteractionRecord>(&line) {
        Ok(record) => records.push(record),
        Err(e) => tracing::warn!(line = index + 1, "skipping malformed interaction: {e}"),
      }
    }
    Ok(records)
  }

  /// The last `limit` records, oldest first. A limit of zero returns everything.
  pub fn recent(&self, limit: usize) -> Result<Vec<InteractionRecord>> {
    let mut records = self.read_all()?;
    if limit > 0 && records.len() > limit {
      records.drain(..records.len() - limit);
    }
    Ok(records)
  }

  pub fn len(&self) -> Result<usize> {
    Ok(self.read_all()?.len())
  }

  pub fn is_empty(&self) -> Result<bool> {
    Ok(self.len()? == 0)
  }
}

#[derive(Debug, Clone)]
pub struct ModelStore {
  path: PathBuf,
}

impl ModelStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// `Ok(None)` when no model has been written yet.
  pub fn load(&self) -> Result<Option<AdaptiveModel>> {
    let content = match fs::read_to_string(&self.path) {
      Ok(c) => c,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(CindyError::io(&self.path, e)),
    };
    let model = serde_json::from_str(&content).map_err(|e| CindyError::json(&self.path, e))?;
    Ok(Some(model))
  }

  pub fn save(&self, model: &AdaptiveModel) -> Result<()> {
    write_json_atomic(&self.path, model)
  }
}
