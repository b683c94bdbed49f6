use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use symptomscope::classifier::{RuleSet, GREETING};
use symptomscope::config::EngineConfig;
use symptomscope::pipeline::SymptomTracker;
use symptomscope::store::{JsonlLogStore, LogStore, RecentQuery};
use symptomscope::{aggregate, overview};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "symptomscope",
    version,
    about = "Symptom classification, extraction and tracking"
)]
struct Cli {
    /// JSON-lines symptom log
    #[arg(long = "store", default_value = "symptom_logs.jsonl", global = true)]
    store: PathBuf,
    #[arg(long = "user", default_value = "local", global = true)]
    user: String,
    /// Rule cascade as JSON (defaults to the built-in rules)
    #[arg(long = "rules", global = true)]
    rules: Option<PathBuf>,
    /// Seconds to wait on the store before giving up
    #[arg(long = "timeout", default_value_t = 5, global = true)]
    timeout_secs: u64,
    /// Records loaded for statistics
    #[arg(long = "history", default_value_t = 30, global = true)]
    history: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer messages and log the ones naming symptoms. Reads stdin when no message is given.
    Chat { message: Option<String> },
    Classify { message: String },
    Extract { message: String },
    Severity { message: String },
    /// Save a manual entry
    Log {
        #[arg(long = "symptom", required = true)]
        symptoms: Vec<String>,
        #[arg(long = "severity", default_value_t = 5)]
        severity: i32,
        #[arg(long = "notes")]
        notes: Option<String>,
    },
    Trend {
        #[arg(long = "days", default_value_t = 7)]
        days: usize,
        /// Last day of the window (YYYY-MM-DD), defaults to today
        #[arg(long = "date")]
        date: Option<NaiveDate>,
    },
    Top {
        #[arg(long = "top", default_value_t = 5)]
        top: usize,
    },
    Average,
    Recent {
        #[arg(long = "limit", default_value_t = 5)]
        limit: usize,
        #[arg(long = "oldest-first", default_value_t = false)]
        oldest_first: bool,
    },
    Overview,
    /// Print the active rule cascade as JSON
    Rules,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(p) => RuleSet::load(p)?,
        None => RuleSet::standard(),
    };
    let config = EngineConfig {
        store_timeout_secs: cli.timeout_secs,
        tracker_history_limit: cli.history,
        ..Default::default()
    };
    let store = Arc::new(JsonlLogStore::new(&cli.store));
    let tracker = SymptomTracker::new(Arc::clone(&store))
        .with_rules(rules.clone())
        .with_config(config.clone());

    match cli.command {
        Command::Chat { message } => run_chat(&tracker, &cli.user, message).await?,
        Command::Classify { message } => {
            println!("{}", serde_json::to_string_pretty(&rules.classify(&message))?);
        }
        Command::Extract { message } => {
            println!("{}", serde_json::to_string(&symptomscope::extract_symptoms(&message))?);
        }
        Command::Severity { message } => {
            let severity = symptomscope::parse_severity(&message);
            println!("{}", serde_json::json!({ "severity": severity }));
        }
        Command::Log { symptoms, severity, notes } => {
            let entry = tracker
                .record_manual(&cli.user, symptoms, severity, notes.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        Command::Trend { days, date } => {
            let history = tracker.history(&cli.user).await?;
            let reference = date.unwrap_or_else(|| Local::now().date_naive());
            let trend = aggregate::compute_daily_trend(&history, days, reference, &Local);
            println!("{}", serde_json::to_string_pretty(&trend)?);
        }
        Command::Top { top } => {
            let history = tracker.history(&cli.user).await?;
            let top = aggregate::compute_top_symptoms(&history, top);
            println!("{}", serde_json::to_string_pretty(&top)?);
        }
        Command::Average => {
            let history = tracker.history(&cli.user).await?;
            let average = aggregate::compute_average_severity(&history);
            println!("{}", serde_json::json!({ "average_severity": average }));
        }
        Command::Recent { limit, oldest_first } => {
            let mut q = RecentQuery::latest(limit);
            if oldest_first {
                q = q.oldest_first();
            }
            let entries = store.query_recent(&cli.user, &q).await?;
            for e in entries {
                println!("{}", serde_json::to_string(&e)?);
            }
        }
        Command::Overview => {
            let out = overview::load_overview(&*store, &cli.user, &config, &Local::now()).await?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Rules => {
            println!("{}", rules.to_json()?);
        }
    }
    Ok(())
}

async fn run_chat<S: LogStore>(
    tracker: &SymptomTracker<S>,
    user: &str,
    message: Option<String>,
) -> anyhow::Result<()> {
    let mut pending = Vec::new();
    let mut handle = |line: &str| -> anyhow::Result<()> {
        if let Some(turn) = tracker.handle_message(user, line) {
            // Reply goes out before the append is known to have landed
            println!("{}", serde_json::to_string(&turn.reply())?);
            pending.push(turn);
        }
        Ok(())
    };

    match message {
        Some(m) => handle(&m)?,
        None => {
            eprintln!("{GREETING}");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                handle(&line)?;
            }
        }
    }

    // The append task already logs its own failure
    for turn in pending {
        let _ = turn.persisted().await;
    }
    Ok(())
}
