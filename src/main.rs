use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use study_readiness::config::Config;
use study_readiness::input::read_json;
use study_readiness::logging::init_tracing;
use study_readiness::study::{EngineConfig, ReviewOptions, ReviewableItem, StudyEngine, StudySnapshot};

#[derive(Parser)]
#[command(name = "study-readiness", about = "Exam readiness scoring and study planning", version)]
struct Cli {
    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score per-subject and overall readiness for a snapshot
    Assess {
        /// Snapshot JSON file
        snapshot: PathBuf,
    },

    /// Generate the day-by-day study plan up to the exam
    Plan {
        /// Snapshot JSON file
        snapshot: PathBuf,
    },

    /// List reviewable items that are due, most urgent first
    Due {
        /// JSON array of reviewable items
        items: PathBuf,
    },

    /// Compute the next review for every item in the file
    Review {
        /// JSON array of reviewable items
        items: PathBuf,
        /// Mastery estimate applied to every item for this review
        #[arg(long)]
        mastery: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config);

    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(Utc::now);
    let today = cli.today.unwrap_or_else(|| now.date_naive());
    let engine = StudyEngine::new(EngineConfig::from_env());

    match cli.command {
        Command::Assess { snapshot } => {
            let snapshot: StudySnapshot = read_json(&snapshot)?;
            let report = engine.assess(&snapshot, today).context("readiness unavailable")?;
            print_json(&report)
        }
        Command::Plan { snapshot } => {
            let snapshot: StudySnapshot = read_json(&snapshot)?;
            let plan = engine.plan(&snapshot, today).context("cannot generate study plan")?;
            print_json(&plan)
        }
        Command::Due { items } => {
            let items: Vec<ReviewableItem> = read_json(&items)?;
            let due = engine.due_queue(&items, now);
            tracing::debug!(total = items.len(), due = due.len(), "due queue selected");
            print_json(&due)
        }
        Command::Review { items, mastery } => {
            let items: Vec<ReviewableItem> = read_json(&items)?;
            let mut options = ReviewOptions::at(now);
            if let Some(m) = mastery {
                options = options.with_mastery(m);
            }
            let reviewed = items
                .iter()
                .map(|item| {
                    engine
                        .review(item, &options)
                        .map(|patch| item.apply(&patch))
                        .with_context(|| format!("cannot schedule item {}", item.id))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&reviewed)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}
