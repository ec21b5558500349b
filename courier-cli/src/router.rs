//! Client-side routing
//!
//! Maps paths onto views and drives a view through its lifecycle:
//! load, apply form edits, optionally submit, render.

use anyhow::{Result, bail};
use std::fmt;
use std::io::{IsTerminal, Write};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use courier_client::JobService;

use crate::views::{FormEvent, RequestState, RequestView, StatusView};

const DETAILS: &str = "details";

/// A client-side location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the job status list
    Status,
    /// `/details/{id}` edits a job; `/details` creates one
    Details(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unknown route '{0}', expected '/', '/details' or '/details/<id>'")]
    Unknown(String),

    #[error("job id in route '{0}' is not valid percent-encoded UTF-8")]
    InvalidId(String),
}

impl Route {
    /// Parse a path such as `/`, `/details` or `/details/42`
    ///
    /// Query strings, fragments and trailing slashes are ignored. The id
    /// segment is percent-decoded.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();

        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Route::Status),
            [DETAILS] => Ok(Route::Details(None)),
            [DETAILS, id] => urlencoding::decode(id)
                .map(|id| Route::Details(Some(id.into_owned())))
                .map_err(|_| RouteError::InvalidId(path.to_string())),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }

    /// Path of this route, with the id percent-encoded as one segment
    pub fn path(&self) -> String {
        match self {
            Route::Status => "/".to_string(),
            Route::Details(None) => format!("/{}", DETAILS),
            Route::Details(Some(id)) => format!("/{}/{}", DETAILS, urlencoding::encode(id)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

/// What to do with a view once it is loaded
#[derive(Debug, Default)]
pub struct Navigation {
    /// Form edits applied after the initial fetch
    pub events: Vec<FormEvent>,
    /// Submit the form after applying the edits
    pub submit: bool,
}

/// Dispatches routes to views
///
/// Holds only the service handle; every navigation builds a fresh view.
pub struct Router {
    service: Arc<dyn JobService>,
}

impl Router {
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self { service }
    }

    /// Show the view for `route`, writing its final rendering to `out`
    ///
    /// Fails when the initial fetch or the submission failed, after the
    /// failure has been rendered.
    pub async fn navigate(
        &self,
        route: &Route,
        nav: Navigation,
        out: &mut dyn Write,
    ) -> Result<()> {
        tracing::debug!("Navigating to {}", route);

        match route {
            Route::Status => {
                if !nav.events.is_empty() || nav.submit {
                    tracing::warn!("Form options have no effect on the status view");
                }
                self.show_status(out).await
            }
            Route::Details(id) => self.show_request(id.clone(), nav, out).await,
        }
    }

    async fn show_status(&self, out: &mut dyn Write) -> Result<()> {
        let mut view = StatusView::new();
        show_loading(|w| view.render(w));

        view.load(self.service.as_ref()).await;
        view.render(out)?;

        if view.failed() {
            bail!("Could not load the job list");
        }
        Ok(())
    }

    async fn show_request(
        &self,
        id: Option<String>,
        nav: Navigation,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut view = RequestView::new(id);
        if view.target().is_some() {
            show_loading(|w| view.render(w));
        }
        view.load(self.service.as_ref()).await;

        if let RequestState::LoadFailed(_) = view.state() {
            view.render(out)?;
            bail!("Could not load job {}", view.target().unwrap_or_default());
        }

        for event in nav.events {
            view.apply(event)?;
        }
        if view.is_dirty() {
            tracing::debug!(
                "Form edited: '{}' with {} header row(s)",
                view.form().name,
                view.form().headers().len()
            );
        }

        if nav.submit {
            view.submit(self.service.as_ref()).await;
        }

        view.render(out)?;

        if let RequestState::SubmitFailed(_) = view.state() {
            bail!("Job submission failed");
        }
        Ok(())
    }
}

/// Render a pending view to stderr while the fetch runs
fn show_loading(render: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) {
    let mut stderr = std::io::stderr();
    if !stderr.is_terminal() {
        return;
    }
    if let Err(e) = render(&mut stderr) {
        tracing::debug!("Could not render loading indicator: {}", e);
    }
}
