//! Command surface: one-shot subcommands and the interactive shell.
//!
//! A one-shot command behaves like a single page visit: load, perform one action,
//! render. The shell keeps the same `App` (and so the same cache) across lines.

use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument, warn};

use crate::app::{App, StateRef};
use crate::protocol::ChallengeForm;
use crate::render::{render_list, render_reference};
use crate::util::split_words;

/// Terminal client for the retos (challenges) API.
#[derive(Debug, Parser)]
#[command(name = "retos", author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides RETOS_API_URL and RETOS_CONFIG_PATH's `api_url`).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Action(Action),
    /// Interactive session; the local cache lives until `exit`.
    Shell,
}

/// Actions available both as subcommands and as shell lines.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// List challenges, optionally filtered.
    List(ListArgs),
    /// Create a challenge (the category is created if it does not exist).
    Create(CreateArgs),
    /// Change the state of a challenge.
    SetState(SetStateArgs),
    /// Delete a challenge.
    Delete(DeleteArgs),
    /// Show difficulties, states and categories.
    Refs,
    /// Check that the backend answers.
    Ping,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Category name substring (case-insensitive). With --remote: exact category name.
    #[arg(long, short = 'c', default_value = "")]
    pub category: String,

    /// Difficulty id.
    #[arg(long, short = 'd', default_value = "")]
    pub difficulty: String,

    /// Filter on the server instead of the local cache.
    #[arg(long)]
    pub remote: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Category name; reused if it already exists (case-insensitive).
    #[arg(long, default_value = "")]
    pub category: String,
    /// Difficulty id.
    #[arg(long, default_value = "")]
    pub difficulty: String,
    /// State id.
    #[arg(long, default_value = "")]
    pub state: String,
}

impl From<CreateArgs> for ChallengeForm {
    fn from(a: CreateArgs) -> Self {
        ChallengeForm {
            title: a.title,
            description: a.description,
            category_name: a.category,
            difficulty_id: a.difficulty,
            state_id: a.state,
        }
    }
}

#[derive(Debug, Args)]
pub struct SetStateArgs {
    pub id: i64,
    /// State id or name (e.g. 2 or "En proceso").
    pub state: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: i64,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// One line typed in the shell.
#[derive(Debug, Parser)]
#[command(name = "retos>", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Action(Action),
    /// Remove the local filter.
    Clear,
    /// Fetch the whole collection again.
    Reload,
    /// Leave the shell.
    #[command(alias = "quit")]
    Exit,
}

pub const DELETE_CANCELLED_NOTICE: &str = "Eliminación cancelada";
pub const DELETE_UNCONFIRMED_NOTICE: &str = "No se pudo confirmar la eliminación; usa --yes";

fn prompt_delete(id: i64) -> Result<bool, dialoguer::Error> {
    Confirm::new()
        .with_prompt(format!("¿Seguro que quieres eliminar el reto {id}?"))
        .default(false)
        .interact()
}

/// Turn the prompt answer into a go/no-go. Anything but an explicit yes leaves a notice.
fn confirmed(app: &mut App, id: i64, answer: Result<bool, dialoguer::Error>) -> bool {
    match answer {
        Ok(true) => true,
        Ok(false) => {
            debug!(target: "reto", id, "Deletion cancelled");
            app.notices_mut().error(DELETE_CANCELLED_NOTICE);
            false
        }
        Err(e) => {
            warn!(target: "reto", id, error = %e, "Delete confirmation unavailable");
            app.notices_mut().error(DELETE_UNCONFIRMED_NOTICE);
            false
        }
    }
}

/// Run one action against an already loaded `App` and return the text to print.
#[instrument(level = "debug", skip(app))]
pub async fn perform(app: &mut App, action: Action) -> String {
    match action {
        Action::List(args) => {
            if args.remote {
                let view = match app.filter_remote(&args.category, &args.difficulty).await {
                    Some(list) => render_list(&list),
                    None => String::new(),
                };
                app.with_notices(view)
            } else {
                app.apply_filter(&args.category, &args.difficulty);
                app.render()
            }
        }
        Action::Create(args) => {
            app.create_challenge(&args.into()).await;
            app.render()
        }
        Action::SetState(args) => {
            app.change_state(args.id, StateRef::parse(&args.state)).await;
            app.render()
        }
        Action::Delete(args) => {
            if args.yes || confirmed(app, args.id, prompt_delete(args.id)) {
                app.delete_challenge(args.id).await;
            }
            app.render()
        }
        Action::Refs => {
            app.load_reference().await;
            let view = render_reference(&app.store().reference);
            app.with_notices(view)
        }
        Action::Ping => {
            let view = match app.api().health().await {
                Ok(m) => m,
                Err(e) => format!("✖ {}", e.notice("Backend no disponible")),
            };
            app.with_notices(view)
        }
    }
}

/// One-shot: load the page the action needs, perform it, return the view.
pub async fn run_once(app: &mut App, action: Action) -> String {
    match &action {
        Action::Refs | Action::Ping => {}
        Action::Create(_) => app.load_reference().await,
        _ => app.load_page().await,
    }
    perform(app, action).await
}

/// Interactive loop over stdin. Returns when stdin closes or on `exit`.
pub async fn run_shell(app: &mut App) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    app.load_page().await;
    let view = app.render();
    stdout.write_all(format!("{view}\n").as_bytes()).await?;
    info!(target: "retos_client", "Shell started");

    loop {
        stdout.write_all(b"retos> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else { break };
        if line.trim().is_empty() {
            continue;
        }

        let Some(words) = split_words(&line) else {
            stdout.write_all("Comillas sin cerrar\n".as_bytes()).await?;
            continue;
        };
        let out = match ShellLine::try_parse_from(words) {
            Ok(ShellLine { command: ShellCommand::Exit }) => break,
            Ok(ShellLine { command: ShellCommand::Clear }) => {
                app.clear_filter();
                app.render()
            }
            Ok(ShellLine { command: ShellCommand::Reload }) => {
                app.reload().await;
                app.render()
            }
            Ok(ShellLine { command: ShellCommand::Action(action) }) => perform(app, action).await,
            Err(e) => {
                warn!(target: "retos_client", kind = ?e.kind(), "Unparsed shell line");
                e.to_string()
            }
        };
        stdout.write_all(format!("{}\n", out.trim_end()).as_bytes()).await?;
    }

    info!(target: "retos_client", "Shell closed");
    Ok(())
}
