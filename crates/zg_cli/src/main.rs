//! zg CLI
//!
//! Fixtures, standings, playoffs and calendar adjustment over a tournament snapshot file.
//! Results go to stdout as JSON; logs go to stderr.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "zg")]
#[command(about = "Tournament scheduling and standings over JSON snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Generate the regular-season calendar
    Fixtures {
        /// Tournament snapshot JSON
        #[arg(long)]
        snapshot: PathBuf,

        /// Fixture request JSON (match days, schedule mode, fields, start date)
        #[arg(long)]
        request: PathBuf,

        /// Store the generated matches back into the snapshot
        #[arg(long, default_value = "false")]
        write: bool,
    },

    /// Print the league table
    Standings {
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Seed the top of the table into a playoff bracket
    Playoffs {
        #[arg(long)]
        snapshot: PathBuf,

        /// Bracket size: 4 or 8
        #[arg(long, default_value = "8")]
        size: usize,

        /// First playoff day (YYYY-MM-DD)
        #[arg(long)]
        start_date: chrono::NaiveDate,

        /// First kick-off (HH:MM)
        #[arg(long)]
        start_time: String,

        #[arg(long, default_value = "1")]
        field: u32,

        /// Skip the third-place match
        #[arg(long, default_value = "false")]
        no_third_place: bool,

        /// Two-legged quarterfinals and semifinals
        #[arg(long, default_value = "false")]
        home_and_away: bool,

        #[arg(long, default_value = "false")]
        write: bool,
    },

    /// Re-plan unplayed rounds after teams drop out
    Adjust {
        #[arg(long)]
        snapshot: PathBuf,

        /// Reference date when no round is finished yet (defaults to the local date)
        #[arg(long)]
        today: Option<chrono::NaiveDate>,

        /// Regenerate even when the analysis does not call for it
        #[arg(long, default_value = "false")]
        force: bool,

        #[arg(long, default_value = "false")]
        double_round: bool,

        #[arg(long, default_value = "false")]
        write: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use zg_cli::{run_adjust, run_fixtures, run_playoffs, run_standings, SnapshotStore};
    use zg_core::models::time_format::parse_time;
    use zg_core::{AdjustOptions, BracketOptions, EngineSettings, FixtureRequest};

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = EngineSettings::from_env()?;

    match cli.command {
        Commands::Fixtures { snapshot, request, write } => {
            let mut store = SnapshotStore::load(&snapshot)?;
            let raw = std::fs::read_to_string(&request)
                .with_context(|| format!("Failed to read request: {}", request.display()))?;
            let request: FixtureRequest = serde_json::from_str(&raw).context("Failed to parse fixture request")?;

            let out = run_fixtures(&mut store, request, write)?;
            print_json(&out)?;
            save_if(&store, &snapshot, write)?;
        }

        Commands::Standings { snapshot } => {
            let store = SnapshotStore::load(&snapshot)?;
            print_json(&run_standings(&store)?)?;
        }

        Commands::Playoffs {
            snapshot,
            size,
            start_date,
            start_time,
            field,
            no_third_place,
            home_and_away,
            write,
        } => {
            let mut store = SnapshotStore::load(&snapshot)?;
            let options = BracketOptions {
                start_date,
                start_time: parse_time(&start_time)?,
                field,
                third_place_match: !no_third_place,
                home_and_away,
            };

            let out = run_playoffs(&mut store, size, &options, &settings, write)?;
            print_json(&out)?;
            save_if(&store, &snapshot, write)?;
        }

        Commands::Adjust { snapshot, today, force, double_round, write } => {
            let mut store = SnapshotStore::load(&snapshot)?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let options = AdjustOptions { double_round, force };

            let out = run_adjust(&mut store, today, options, &settings, write)?;
            print_json(&out)?;
            save_if(&store, &snapshot, write && out.applied.is_some())?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(feature = "cli")]
fn save_if(store: &zg_cli::SnapshotStore, path: &Path, write: bool) -> Result<()> {
    if write {
        store.save(path)?;
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("zg CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
