//! siteconsent - cookie consent for a personal website
//!
//! Shows the consent banner in a terminal preview of the site and manages
//! the stored decision from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use siteconsent::commands::{self, Decision, OutputFormat};
use siteconsent::config::SitePaths;
use siteconsent::tui;

#[derive(Parser)]
#[command(name = "siteconsent")]
#[command(author, version, about = "Cookie-consent banner and legal disclosures for a personal website")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize siteconsent (first-time setup)
    Init,

    /// Open the site preview with the consent banner
    Tui,

    /// Show the stored consent decision
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Accept every cookie category
    Accept,

    /// Reject every optional cookie category
    Reject,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr, or to a file while the TUI owns the terminal
fn init_tracing(paths: &SitePaths, to_file: bool) -> Result<()> {
    if to_file {
        std::fs::create_dir_all(&paths.root).context("Failed to create siteconsent root")?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&paths.log_file)
            .context("Failed to open log file")?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = SitePaths::new()?;
    init_tracing(&paths, matches!(cli.command, Commands::Tui))?;

    match cli.command {
        Commands::Init => {
            commands::init(&paths)?;
        }
        Commands::Tui => {
            let mut app = tui::TuiApp::new(&paths)?;
            app.run()?;
        }
        Commands::Show { json } => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Summary
            };
            commands::show(&paths, format)?;
        }
        Commands::Accept => {
            commands::decide(&paths, Decision::AcceptAll)?;
        }
        Commands::Reject => {
            commands::decide(&paths, Decision::RejectAll)?;
        }
    }

    Ok(())
}
