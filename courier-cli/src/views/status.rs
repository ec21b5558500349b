//! Status view
//!
//! Lists every job known to the service with a link to its detail route.

use colored::*;
use courier_client::JobService;
use courier_core::domain::job::{Job, StatusKind};
use std::io::{self, Write};

use super::Remote;
use crate::router::Route;

const HEADINGS: [&str; 4] = ["NAME", "SUBMITTED", "STATUS", "DETAILS"];

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow<'a> {
    pub name: &'a str,
    pub submitted: &'a str,
    pub status: &'a str,
    pub link: Route,
}

impl<'a> From<&'a Job> for StatusRow<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            name: &job.name,
            submitted: &job.submitted_time,
            status: &job.status,
            link: Route::Details(Some(job.id.clone())),
        }
    }
}

/// Job status list
#[derive(Debug)]
pub struct StatusView {
    jobs: Remote<Vec<Job>>,
}

impl StatusView {
    pub fn new() -> Self {
        Self {
            jobs: Remote::Pending,
        }
    }

    /// Fetch the job collection
    pub async fn load(&mut self, service: &dyn JobService) {
        self.jobs = Remote::from_result(service.list_jobs().await);

        match &self.jobs {
            Remote::Ready(jobs) => tracing::debug!("Loaded {} job(s)", jobs.len()),
            Remote::Failed(reason) => tracing::error!("Failed to fetch jobs: {}", reason),
            Remote::Pending => {}
        }
    }

    pub fn failed(&self) -> bool {
        matches!(self.jobs, Remote::Failed(_))
    }

    /// Table rows; empty unless the collection has loaded
    pub fn rows(&self) -> Vec<StatusRow<'_>> {
        self.jobs
            .ready()
            .map(|jobs| jobs.iter().map(StatusRow::from).collect())
            .unwrap_or_default()
    }

    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        match &self.jobs {
            Remote::Pending => writeln!(out, "{}", "Loading...".dimmed()),
            Remote::Failed(reason) => {
                writeln!(out, "{}", "Error fetching jobs".red().bold())?;
                writeln!(out, "  {}", reason.dimmed())
            }
            Remote::Ready(jobs) if jobs.is_empty() => {
                writeln!(out, "{}", "No jobs found.".yellow())
            }
            Remote::Ready(_) => self.render_table(out),
        }
    }

    fn render_table(&self, out: &mut dyn Write) -> io::Result<()> {
        let rows = self.rows();
        let links: Vec<String> = rows.iter().map(|r| r.link.path()).collect();

        let mut widths = HEADINGS.map(str::len);
        for (row, link) in rows.iter().zip(&links) {
            let cells = [row.name, row.submitted, row.status, link.as_str()];
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let heading = HEADINGS
            .iter()
            .zip(widths)
            .map(|(h, w)| format!("{:<w$}", h, w = w))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", heading.trim_end().bold())?;

        for (row, link) in rows.iter().zip(&links) {
            writeln!(
                out,
                "{}  {}  {}  {}",
                format!("{:<w$}", row.name, w = widths[0]),
                format!("{:<w$}", row.submitted, w = widths[1]).dimmed(),
                colorize_status(&format!("{:<w$}", row.status, w = widths[2])),
                link.cyan()
            )?;
        }

        Ok(())
    }
}

impl Default for StatusView {
    fn default() -> Self {
        Self::new()
    }
}

/// Colorize a (padded) status label for display
fn colorize_status(status: &str) -> ColoredString {
    match StatusKind::classify(status) {
        StatusKind::Queued => status.yellow(),
        StatusKind::Running => status.cyan(),
        StatusKind::Succeeded => status.green(),
        StatusKind::Failed => status.red(),
        StatusKind::Other => status.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeJobService, sample_job};

    fn rendered(view: &StatusView) -> String {
        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_pending_view_shows_loading() {
        let view = StatusView::new();
        assert!(rendered(&view).contains("Loading..."));
        assert!(view.rows().is_empty());
    }

    #[tokio::test]
    async fn test_one_row_per_job() {
        let jobs = vec![
            sample_job("1", "Ping"),
            sample_job("2", "Pong"),
            sample_job("3", "Ping"),
        ];
        let service = FakeJobService::with_jobs(jobs.clone());
        let mut view = StatusView::new();

        view.load(&service).await;
        let rows = view.rows();

        assert_eq!(rows.len(), jobs.len());
        for (row, job) in rows.iter().zip(&jobs) {
            assert!(row.link.path().contains(&job.id));
        }
    }

    #[tokio::test]
    async fn test_single_job_scenario() {
        let service = FakeJobService::with_jobs(vec![Job {
            id: "1".to_string(),
            name: "Ping".to_string(),
            submitted_time: "2024-01-01T00:00:00Z".to_string(),
            execution_time: None,
            status: "done".to_string(),
        }]);
        let mut view = StatusView::new();

        view.load(&service).await;

        assert_eq!(
            view.rows(),
            vec![StatusRow {
                name: "Ping",
                submitted: "2024-01-01T00:00:00Z",
                status: "done",
                link: Route::Details(Some("1".to_string())),
            }]
        );

        let text = rendered(&view);
        assert!(text.contains("Ping"));
        assert!(text.contains("2024-01-01T00:00:00Z"));
        assert!(text.contains("done"));
        assert!(text.contains("/details/1"));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let service = FakeJobService::with_jobs(Vec::new());
        let mut view = StatusView::new();

        view.load(&service).await;

        assert!(view.rows().is_empty());
        assert!(!view.failed());
        assert!(rendered(&view).contains("No jobs found."));
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let service = FakeJobService::failing();
        let mut view = StatusView::new();

        view.load(&service).await;

        assert!(view.failed());
        assert!(matches!(view.jobs, Remote::Failed(_)));
        assert!(view.rows().is_empty());
        assert!(rendered(&view).contains("Error fetching jobs"));
    }
}
