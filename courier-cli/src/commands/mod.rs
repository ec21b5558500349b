//! Commands module
//!
//! Defines all CLI commands and their handlers. Every command is a route:
//! it resolves to a [`Route`] and hands over to the [`Router`].

mod form;

pub use form::FormArgs;

use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::Write;
use std::sync::Arc;

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::router::{Navigation, Route, Router};
use courier_client::JobService;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the status of all jobs (route `/`)
    Status,
    /// Create and submit a new job (route `/details`)
    New {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Edit an existing job and submit it (route `/details/<id>`)
    Edit {
        /// Job ID or unambiguous prefix
        id: String,

        #[command(flatten)]
        form: FormArgs,

        /// Show the edited form without submitting it
        #[arg(long)]
        dry_run: bool,
    },
    /// Open a route by path, e.g. `/` or `/details/<id>`
    Open {
        /// Route path
        path: String,

        #[command(flatten)]
        form: FormArgs,

        /// Submit the form after applying edits
        #[arg(long)]
        submit: bool,
    },
}

/// Handle a CLI command
///
/// Resolves the command to a route and navigates to it, writing the
/// rendered view to stdout.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let service: Arc<dyn JobService> = Arc::new(config.client()?);
    let mut stdout = std::io::stdout();

    run(command, service, &mut stdout).await?;
    stdout.flush().context("Failed to flush output")?;
    Ok(())
}

async fn run(command: Commands, service: Arc<dyn JobService>, out: &mut dyn Write) -> Result<()> {
    let (route, nav) = match command {
        Commands::Status => (Route::Status, Navigation::default()),
        Commands::New { form } => (
            Route::Details(None),
            Navigation {
                events: form.into_events()?,
                submit: true,
            },
        ),
        Commands::Edit { id, form, dry_run } => {
            let id = resolve_job_id(service.as_ref(), &id).await?;
            (
                Route::Details(Some(id)),
                Navigation {
                    events: form.into_events()?,
                    submit: !dry_run,
                },
            )
        }
        Commands::Open { path, form, submit } => {
            let route = match Route::parse(&path)? {
                Route::Details(Some(id)) => {
                    Route::Details(Some(resolve_job_id(service.as_ref(), &id).await?))
                }
                other => other,
            };
            (
                route,
                Navigation {
                    events: form.into_events()?,
                    submit,
                },
            )
        }
    };

    Router::new(service).navigate(&route, nav, out).await
}
