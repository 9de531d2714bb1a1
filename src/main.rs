//! yatl CLI: yet another todo list.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use yatl::error::{StoreError, YatlError};
use yatl::persist::ListFile;
use yatl::session::{Session, SessionConfig};
use yatl::task::TaskId;
use yatl::tui::{TodoTui, View};
use yatl::{export, paths, view};

#[derive(Parser)]
#[command(name = "yatl", version, about = "Yet another todo list")]
struct Cli {
    /// Path to the todo list file [default: $YATL_PATH, then $HOME].
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current tasks in priority order (the default).
    Review,

    /// Add a new task.
    Add {
        /// Task description.
        description: String,

        /// Importance score (higher = more important).
        #[arg(short, long)]
        importance: f64,

        /// Cost score (higher = more time-consuming).
        #[arg(short, long)]
        cost: f64,
    },

    /// Mark a task as completed.
    Done {
        /// Task id, as shown by review.
        id: TaskId,
    },

    /// Revert a completed task to incomplete.
    Undo {
        /// Task id, as shown by review.
        id: TaskId,
    },

    /// Delete a task.
    Rm {
        /// Task id, as shown by review.
        id: TaskId,

        /// Skip the confirmation prompt for incomplete tasks.
        #[arg(long)]
        yes: bool,
    },

    /// Open the interactive checklist.
    Ui,

    /// Show the tasks on a cost-vs-importance quadrant plot.
    Plot,

    /// Print the task list as JSON.
    Export,

    /// Adopt autosaved edits left behind by an unclean shutdown.
    Recover,

    /// Drop autosaved edits left behind by an unclean shutdown.
    Discard,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let path = match cli.path {
        Some(path) => path,
        None => paths::resolve_default_path()?,
    };

    match cli.command.unwrap_or(Commands::Review) {
        Commands::Review => {
            let session = Session::open(SessionConfig::new(path))?;
            if session.store().is_empty() {
                println!("nothing to do");
            }
            for task in session.store().tasks() {
                println!("{}", view::review_line(task));
            }
        }

        Commands::Add {
            description,
            importance,
            cost,
        } => {
            let mut session = Session::open(SessionConfig::new(path))?;
            let id = session.add(&description, importance, cost)?;
            session.commit()?;
            println!("added task {id}: {description}");
        }

        Commands::Done { id } => {
            let mut session = Session::open(SessionConfig::new(path))?;
            match session.mark_complete(id) {
                Ok(at) => {
                    session.commit()?;
                    println!("[{}] task {id} completed at {at}", view::COMPLETE_MARK);
                }
                // Informational, not a failure: report the existing
                // completion and leave everything untouched.
                Err(YatlError::Store(StoreError::AlreadyCompleted { completed_at, .. })) => {
                    println!("task {id} was already completed on {completed_at}");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Commands::Undo { id } => {
            let mut session = Session::open(SessionConfig::new(path))?;
            session.unmark_complete(id)?;
            session.commit()?;
            println!("task {id} is open again");
        }

        Commands::Rm { id, yes } => {
            let mut session = Session::open(SessionConfig::new(path))?;
            let task = session
                .store()
                .get(id)
                .ok_or(YatlError::from(StoreError::NotFound { id }))?;

            if !task.is_complete() && !yes {
                let prompt = format!("delete incomplete task {id} \"{}\"? [y/N] ", task.description());
                if !confirm(&prompt)? {
                    println!("not deleted");
                    return Ok(());
                }
            }
            let removed = session.remove(id)?;
            session.commit()?;
            println!("deleted task {id}: {}", removed.description());
        }

        Commands::Ui => {
            let session = Session::open(SessionConfig::new(path))?;
            TodoTui::new(session, View::Checklist).run()?;
        }

        Commands::Plot => {
            let session = Session::open(SessionConfig::new(path))?;
            TodoTui::new(session, View::Plot).run()?;
        }

        Commands::Export => {
            let session = Session::open(SessionConfig::new(path))?;
            let exported = export::tasks(session.store());
            println!(
                "{}",
                serde_json::to_string_pretty(&exported).into_diagnostic()?
            );
        }

        Commands::Recover => {
            let mut file = ListFile::new(path);
            file.adopt_shadow()?;
            println!("recovered autosaved edits into {}", file.path().display());
        }

        Commands::Discard => {
            let mut file = ListFile::new(path);
            if !file.has_shadow() {
                println!("no autosaved edits at {}", file.shadow().display());
            } else {
                file.discard_shadow()?;
                println!("dropped autosaved edits at {}", file.shadow().display());
            }
        }
    }

    Ok(())
}

/// Ask a yes/no question on stdin. Defaults to no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush().into_diagnostic()?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .into_diagnostic()?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
