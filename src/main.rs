use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use permsort::logging;
use permsort::model::Level;
use permsort::session::Session;
use permsort::settings::{LoadedSettings, SettingsPaths};
use permsort::tui::{self, TuiRunOptions};

#[derive(Parser)]
#[command(name = "permsort")]
#[command(about = "Reconcile permission allow-lists across local, repo and user settings", long_about = None)]
struct Cli {
    /// Project directory holding .claude/ (defaults to current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// User settings file (defaults to $HOME/.claude/settings.json)
    #[arg(long, global = true)]
    user_settings: Option<PathBuf>,

    /// Append logs to this file (or set PERMSORT_LOG)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive reconciliation (default)
    Tui,

    /// Print per-level permissions, duplicates and the default resolution
    Status {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = logging::resolve_log_path(cli.log_file) {
        logging::init(&path)?;
    }

    let project = match cli.project {
        Some(p) => p,
        None => std::env::current_dir().context("get current dir")?,
    };
    let paths = SettingsPaths::discover(&project, cli.user_settings)?;
    tracing::info!(project = %project.display(), "starting");

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => tui::run(TuiRunOptions { paths })?,
        Commands::Status { json } => {
            let settings = LoadedSettings::load(&paths)?;
            let session = Session::load(&settings.sources());
            if json {
                let out = serde_json::json!({
                    "levels": Level::ALL.map(|l| serde_json::json!({
                        "level": l,
                        "path": settings.path(l),
                        "present": session.is_present(l),
                        "permissions": session.level_view(l),
                    })),
                    "duplicates": session.duplicates(),
                    "pending": session.change_set(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).context("serialize status json")?
                );
            } else {
                for level in Level::ALL {
                    let view = session.level_view(level);
                    let marker = if session.is_present(level) {
                        ""
                    } else {
                        " (no file)"
                    };
                    println!(
                        "{} ({}){} {}",
                        level,
                        view.len(),
                        marker,
                        settings.path(level).display()
                    );
                    for name in view {
                        println!("  {}", name);
                    }
                }
                if session.has_unresolved_duplicates() {
                    println!();
                    println!("default resolution:");
                    for line in session.change_set().summary_lines() {
                        println!("  {}", line);
                    }
                }
            }
        }
    }

    Ok(())
}
