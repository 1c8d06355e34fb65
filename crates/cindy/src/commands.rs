use anyhow::Result;
use chrono::Local;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use cindy::{Answer, Assistant};

const EXIT_WORDS: &[&str] = &["quit", "exit", "quitter"];

fn print_answer(agent: &str, answer: &Answer) {
  println!("{} {}", format!("{agent}:").magenta().bold(), answer.reply);
  if !answer.suggestions.is_empty() {
    println!();
    println!("{}", "Suggestions :".dimmed());
    for suggestion in &answer.suggestions {
      println!("  {} {}", "•".dimmed(), suggestion);
    }
  }
}

pub async fn ask(assistant: &Assistant, question: &str, json: bool) -> Result<()> {
  let answer = assistant.ask(question).await;
  if json {
    println!("{}", serde_json::to_string_pretty(&answer)?);
  } else {
    print_answer(&assistant.config().agent_name, &answer);
  }
  Ok(())
}

pub async fn chat(assistant: &Assistant, verbose: bool) -> Result<()> {
  let agent = assistant.config().agent_name.clone();
  bentley::event!("{agent} est prête. Tapez 'quit' pour sortir.");

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    let question = line.trim();
    if EXIT_WORDS.contains(&question.to_lowercase().as_str()) {
      break;
    }
    if question.is_empty() {
      continue;
    }
    let answer = assistant.ask(question).await;
    if verbose {
      bentley::verbose!("intent {} (confidence {:.2})", answer.intent, answer.confidence);
    }
    print_answer(&agent, &answer);
    println!();
  }

  bentley::event!("À bientôt !");
  Ok(())
}

pub fn classify(assistant: &Assistant, question: &str) -> Result<()> {
  let result = assistant.classify(question);
  println!("{}: {}", "intent".bold(), result.intent.to_string().cyan());
  println!("{}: {:.2}", "confidence".bold(), result.confidence);
  println!("{}: {}", "score".bold(), result.score);
  println!("{}: {}", "matched by".bold(), serde_json::to_string(&result.matched_by)?.trim_matches('"'));
  if result.entities.is_empty() {
    println!("{}: -", "entities".bold());
  } else {
    for (kind, value) in result.entities.iter() {
      println!("{}: {}", kind.as_str().bold(), value);
    }
  }
  Ok(())
}

pub async fn train(assistant: &Assistant) -> Result<()> {
  match assistant.retrain().await? {
    Some(summary) => {
      bentley::success!(
        "Model retrained from {} interactions ({} keywords, {} phrases)",
        summary.records,
        summary.keywords,
        summary.phrases
      );
    }
    None => bentley::warn!("A retrain is already running"),
  }
  Ok(())
}

pub fn history(assistant: &Assistant, limit: usize, json: bool) -> Result<()> {
  let log = assistant.interaction_log();
  if log.is_empty()? {
    bentley::info!("No interactions logged yet in {}", log.path().display());
    return Ok(());
  }

  let records = assistant.history(limit)?;
  if json {
    println!("{}", serde_json::to_string_pretty(&records)?);
    return Ok(());
  }

  for record in &records {
    let when = record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    println!("{} {} {}", when.to_string().dimmed(), format!("[{}]", record.intent).cyan(), record.question.bold());
    println!("    {}", record.reply);
  }
  Ok(())
}

pub fn stats(assistant: &Assistant, json: bool) -> Result<()> {
  let stats = assistant.write_statistics()?;
  if json {
    println!("{}", serde_json::to_string_pretty(&stats)?);
    return Ok(());
  }

  println!("{} {}", "Interactions:".bold(), stats.total);
  if stats.total == 0 {
    return Ok(());
  }

  println!("\n{}", "Intents".bold());
  for (intent, count) in &stats.intents {
    let confidence = stats.average_confidence.get(intent).copied().unwrap_or(0.0);
    println!("  {:<20} {:>5}  (confiance moyenne {:.2})", intent.cyan(), count, confidence);
    if let Some(values) = stats.top_entities.get(intent) {
      let listed: Vec<String> = values.iter().map(|v| format!("{} ×{}", v.value, v.count)).collect();
      println!("  {:<20} {}", "", listed.join(", ").dimmed());
    }
  }

  println!("\n{}", "Questions fréquentes".bold());
  for entry in &stats.top_questions {
    println!("  {:>4}  {}", entry.count, entry.value);
  }

  bentley::success!("Statistics written to {}", assistant.config().statistics_path().display());
  Ok(())
}
