//! Drawing Chain CLI
//!
//! Evaluate match requests offline and inspect the scoring configuration.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use drawchain_cli::ConfigFormat;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "drawchain")]
#[command(about = "Score relay drawing matches from JSON requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Evaluate a match request file
    Evaluate {
        /// Input request JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output result JSON file path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pretty-print the result JSON
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print the effective scoring configuration
    Config {
        /// Output format: yaml or json
        #[arg(long, default_value = "yaml")]
        format: ConfigFormat,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate { r#in, out, pretty } => {
            let evaluation = drawchain_cli::evaluate_file(&r#in, out.as_deref(), pretty)?;

            match out {
                Some(path) => {
                    eprintln!("Match evaluated: {}", r#in.display());
                    eprintln!("   Rounds: {}", evaluation.result.rounds_played);
                    eprintln!("   Winner: {}", evaluation.result.winner);
                    for line in evaluation.leaderboard() {
                        eprintln!("   {line}");
                    }
                    eprintln!("   Result: {}", path.display());
                }
                None => println!("{}", evaluation.json),
            }
        }

        Commands::Config { format } => {
            let config = drawchain_core::ScoringConfig::from_env_or_default();
            print!("{}", drawchain_cli::render_config(&config, format)?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("drawchain CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
