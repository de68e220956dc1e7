use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};

use statuswatch::store::{JsonFileStore, StateStore};
use statuswatch::TargetState;

#[derive(Parser)]
#[command(name = "statuswatch-cli")]
#[command(about = "Read-only inspection of the statuswatch state file", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "status.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current status of every target
    Status,
    /// Recent checks of one target, newest first
    History {
        /// Target URL as it appears in the config
        url: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Dump the whole snapshot as JSON
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let store = JsonFileStore::new(&cli.state);
    let snapshot = store.read_all()?;

    match cli.command {
        Commands::Status => {
            if snapshot.is_empty() {
                println!("No targets recorded in {}", cli.state.display());
            }
            for (url, state) in snapshot.iter() {
                print_status(url, state);
            }
        }
        Commands::History { url, limit } => {
            let Some(state) = snapshot.get(&url) else {
                return Err(format!("{} is not in {}", url, cli.state.display()).into());
            };
            for record in state.history.iter().rev().take(limit) {
                let mut line = format!(
                    "Checked at: {} - Status: {} ({})",
                    local_time(record.timestamp),
                    record.classification,
                    seconds(record.latency_secs)
                );
                if let Some(detail) = &record.detail {
                    line.push_str(&format!(" - {detail}"));
                }
                println!("{line}");
            }
        }
        Commands::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}

fn print_status(url: &str, state: &TargetState) {
    println!("{url}");
    println!(
        "  status:  {}{}",
        state.classification,
        if state.alert_active { "  [ALERT]" } else { "" }
    );
    println!("  last:    {}", seconds(state.last_latency_secs));
    println!(
        "  average: {} (last {})",
        seconds(state.average_latency_secs),
        state.valid_samples
    );
    println!(
        "  streaks: {} up / {} degraded",
        state.stable_streak, state.degraded_streak
    );
    println!(
        "  checked: {}",
        state.last_check.map(local_time).unwrap_or_else(|| "Never".to_string())
    );
    if let Some(detail) = &state.last_detail {
        println!("  detail:  {detail}");
    }
}

fn seconds(value: f64) -> String {
    if value > 0.0 {
        format!("{value:.2} s")
    } else {
        "-- s".to_string()
    }
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%b %d, %Y, %I:%M:%S %p")
        .to_string()
}
