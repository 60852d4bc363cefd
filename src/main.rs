//! # Tick
//!
//! A terminal to-do list for time-bounded tasks. Each task has a start and an
//! end; it shows as *upcoming* until it starts, *ongoing* afterwards, and
//! *completed* once checked off.
//!
//! ## Usage
//!
//! ```bash
//! # Add a task (local time)
//! tick add "Write report" --start "2025-12-01 09:00" --end "2025-12-01 11:00"
//!
//! # List tasks grouped by status
//! tick list
//! tick list --status upcoming
//!
//! # Check off an ongoing task (any unique id prefix works)
//! tick complete 3f2a
//!
//! # Edit a task that hasn't started yet
//! tick edit 3f2a --title "Write final report"
//!
//! # Live view that picks up changes from other tick commands
//! tick watch
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/tick/tasks.json`
//! *   macOS: `~/Library/Application Support/tick/tasks.json`
//! *   Windows: `%APPDATA%\tick\tasks.json`
//!
//! You can override this by setting the `TICK_DB` environment variable.
//! Logging is enabled through `RUST_LOG`.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tick::commands::*;
use tick::models::TaskStatus;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tick")]
#[command(about = "To-do list for time-bounded tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Start in YYYY-MM-DD HH:MM (defaults to the next half hour)
        #[arg(short, long)]
        start: Option<String>,
        /// End in YYYY-MM-DD HH:MM (defaults to one hour after the start)
        #[arg(short, long)]
        end: Option<String>,
        /// Add the task already completed (only if it has started)
        #[arg(short, long)]
        completed: bool,
    },
    /// List tasks grouped by status
    List {
        /// Only show these statuses (upcoming, ongoing, completed)
        #[arg(short, long, value_delimiter = ',')]
        status: Vec<TaskStatus>,
    },
    /// Mark a task as complete
    Complete {
        id: String,
    },
    /// Mark a task as not complete
    Uncomplete {
        id: String,
    },
    /// Edit a task that hasn't started yet
    Edit {
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New start
        #[arg(short, long)]
        start: Option<String>,
        /// New end
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Reset the database (delete all tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Live task list, refreshed from disk every minute, with start-time alerts
    Watch,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

fn main() {
    // Tracing is opt-in via RUST_LOG.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Commands::Add { title, description, start, end, completed }) => cmd_add(title, description, start, end, completed, false),
        Some(Commands::List { status }) => cmd_list(status),
        Some(Commands::Complete { id }) => cmd_complete(id, true, false),
        Some(Commands::Uncomplete { id }) => cmd_complete(id, false, false),
        Some(Commands::Edit { id, title, description, start, end }) => cmd_edit(id, title, description, start, end, false),
        Some(Commands::Remove { id }) => cmd_remove(id, false),
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Watch) => cmd_watch(),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tick", &mut io::stdout());
            Ok(())
        }
        None => cmd_list(Vec::new()),
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
