use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cindy::{Assistant, Config};

mod commands;

#[derive(Parser)]
#[command(name = "cindy")]
#[command(
  about = "Cindy - French Conversational Assistant\nAnswers everyday questions (time, date, weather, small talk) and learns from its history"
)]
#[command(version)]
struct Cli {
  /// Configuration file (defaults: .cindy.json, cindy.json, ~/.cindy/config.json)
  #[arg(long, global = true, env = "CINDY_CONFIG")]
  config: Option<PathBuf>,
  /// Show debug diagnostics on stderr
  #[arg(short, long, global = true)]
  verbose: bool,
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Ask a single question
  Ask {
    /// The question (words are joined with spaces)
    #[arg(required = true)]
    question: Vec<String>,
    /// Print the full structured answer as JSON
    #[arg(long)]
    json: bool,
  },
  /// Interactive conversation on stdin, until EOF or "quit"
  Chat,
  /// Show how a question is classified, without logging it
  Classify {
    #[arg(required = true)]
    question: Vec<String>,
  },
  /// Show the latest logged exchanges
  History {
    /// How many exchanges to show (0 for all)
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
    /// Print the records as JSON
    #[arg(long)]
    json: bool,
  },
  /// Retrain the adaptive model from the full interaction log
  Train,
  /// Summarize the interaction log and write statistics.json
  Stats {
    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  bentley::init_tracing(cli.verbose);

  if let Err(e) = run(cli).await {
    bentley::error!("{e:#}");
    std::process::exit(1);
  }
  Ok(())
}

async fn run(cli: Cli) -> Result<()> {
  let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
  let assistant = Assistant::new(config);

  match cli.command {
    Commands::Ask { question, json } => {
      commands::ask(&assistant, &question.join(" "), json).await?;
    }
    Commands::Chat => {
      commands::chat(&assistant, cli.verbose).await?;
    }
    Commands::Classify { question } => {
      commands::classify(&assistant, &question.join(" "))?;
    }
    Commands::History { limit, json } => {
      commands::history(&assistant, limit, json)?;
    }
    Commands::Train => {
      commands::train(&assistant).await?;
    }
    Commands::Stats { json } => {
      commands::stats(&assistant, json)?;
    }
  }

  Ok(())
}
