//! impart CLI — analyze one Dart file and surface missing-import fixes.
//!
//! This binary is the UI collaborator for `impart-client`: it renders the
//! core's events on the terminal, reads the user's selection, and applies
//! (or prints) the resulting edit. Logs go to stderr so stdout stays clean
//! for the prompt.

mod config;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use impart_client::{AnalyzerClient, ClientEvent, ImportEdit};

use crate::config::ConfigFile;

/// Analyze a Dart file and suggest imports for unresolved symbols.
#[derive(Debug, Parser)]
#[command(name = "impart", version)]
struct Cli {
    /// Dart source file to analyze.
    file: PathBuf,

    /// Analyzer executable (overrides the config file).
    #[arg(long)]
    analyzer: Option<String>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds to wait for diagnostics.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Write the chosen import into the file instead of printing it.
    #[arg(long)]
    apply: bool,
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.file.extension().and_then(|e| e.to_str()) != Some("dart") {
        bail!("{} is not a Dart file", cli.file.display());
    }
    let file = cli
        .file
        .canonicalize()
        .with_context(|| format!("resolving {}", cli.file.display()))?;

    let config_file = match &cli.config {
        Some(path) => config::load(path)?,
        None => ConfigFile::default(),
    };
    let analyzer_config = config_file.into_config(cli.analyzer.clone())?;

    let mut client = AnalyzerClient::start(analyzer_config)?;
    client.analyze_file(&file).await?;
    println!("Analyzing {} for missing imports...", file.display());

    let outcome = drive(&mut client, Duration::from_secs(cli.timeout)).await;
    client.stop().await;

    match outcome {
        Outcome::Chosen(path) => {
            let edit = client.confirm_import(&path);
            if cli.apply {
                apply_edit(&file, &edit)?;
                println!("Added {} to {}", edit.insert_text().trim_end(), file.display());
            } else {
                println!("{}", edit.insert_text().trim_end());
            }
        }
        Outcome::Cancelled => println!("No import added."),
        Outcome::NoSuggestions => println!("No missing imports found."),
        Outcome::Silent => println!("No diagnostics arrived within {}s.", cli.timeout),
        Outcome::Stopped => println!("Analyzer stopped before reporting diagnostics."),
    }

    Ok(())
}

enum Outcome {
    Chosen(String),
    Cancelled,
    NoSuggestions,
    Silent,
    Stopped,
}

/// React to core events until a decision is reached or `timeout` passes.
async fn drive(client: &mut AnalyzerClient, timeout: Duration) -> Outcome {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        match tokio::time::timeout_at(deadline, client.next_event()).await {
            Err(_) => return Outcome::Silent,
            Ok(None) => return Outcome::Stopped,
            Ok(Some(ClientEvent::UnresolvedSymbols { count })) => {
                println!("Found {count} unresolved symbols.");
            }
            Ok(Some(ClientEvent::NoSuggestions)) => return Outcome::NoSuggestions,
            Ok(Some(ClientEvent::ImportChoices { paths })) => {
                return match pick(&paths) {
                    Some(path) => Outcome::Chosen(path),
                    None => Outcome::Cancelled,
                };
            }
            Ok(Some(ClientEvent::SessionStopped { reason })) => {
                tracing::warn!(?reason, "Analyzer stopped before a decision");
                return Outcome::Stopped;
            }
            Ok(Some(ClientEvent::ApplyImport { .. })) => {}
        }
    }
}

/// Present a numbered choice list and read one selection from stdin.
///
/// An empty line or anything unparseable cancels.
fn pick(paths: &[String]) -> Option<String> {
    println!("Select import to add:");
    for (i, path) in paths.iter().enumerate() {
        println!("  {}) {path}", i + 1);
    }
    print!("> ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    std::io::stdin().read_line(&mut line).ok()?;
    let choice: usize = line.trim().parse().ok()?;
    paths.get(choice.checked_sub(1)?).cloned()
}

fn apply_edit(file: &Path, edit: &ImportEdit) -> Result<()> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let updated = format!("{}{contents}", edit.insert_text());
    std::fs::write(file, updated).with_context(|| format!("writing {}", file.display()))?;
    Ok(())
}
