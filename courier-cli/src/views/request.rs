//! Request view
//!
//! The create/edit form for a single job. The form is an explicit view-model:
//! it changes only through [`FormEvent`]s and tracks its own lifecycle in
//! [`RequestState`].
//!
//! ```text
//! Idle ─▶ Loading ─▶ Ready ─▶ Submitting ─▶ Submitted
//!            │                    │
//!            ▼                    ▼
//!        LoadFailed          SubmitFailed ─▶ Submitting
//! ```
//!
//! The create flow goes from `Idle` straight to `Ready`.

use chrono::{DateTime, SecondsFormat, Utc};
use colored::*;
use courier_client::JobService;
use courier_core::domain::form::{FormError, HttpMethod, JobForm};
use serde_json::Value as JsonValue;
use std::io::{self, Write};
use thiserror::Error;

use super::describe;

/// A discrete change to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    SetName(String),
    SetMethod(HttpMethod),
    /// Append one blank header row
    AddHeader,
    SetHeaderKey { index: usize, key: String },
    SetHeaderValue { index: usize, value: String },
    /// Fill the trailing blank row, or append a new one
    PushHeader { key: String, value: String },
    RemoveHeader(usize),
    SetBody(String),
    /// `None` means run now
    SetExecutionTime(Option<DateTime<Utc>>),
}

/// Lifecycle of a request view
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Loading,
    LoadFailed(String),
    Ready,
    Submitting,
    /// Raw response body from the service
    Submitted(JsonValue),
    /// Raw error payload; the form stays editable and submittable
    SubmitFailed(JsonValue),
}

impl RequestState {
    fn label(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::LoadFailed(_) => "load failed",
            RequestState::Ready => "ready",
            RequestState::Submitting => "submitting",
            RequestState::Submitted(_) => "submitted",
            RequestState::SubmitFailed(_) => "submit failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("the form cannot be edited while {0}")]
    NotEditable(&'static str),
}

/// A form snapshot handed to the service on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Job to update; `None` creates a new job
    pub target: Option<String>,
    pub form: JobForm,
}

/// Create/edit form for one job
#[derive(Debug)]
pub struct RequestView {
    target: Option<String>,
    form: JobForm,
    dirty: bool,
    state: RequestState,
}

impl RequestView {
    /// New view for `target`, or for a new job when `None`
    pub fn new(target: Option<String>) -> Self {
        Self {
            target,
            form: JobForm::default(),
            dirty: false,
            state: RequestState::Idle,
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn form(&self) -> &JobForm {
        &self.form
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// True once a field-change event has changed the form
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_editable(&self) -> bool {
        matches!(
            self.state,
            RequestState::Ready | RequestState::SubmitFailed(_)
        )
    }

    pub fn can_submit(&self) -> bool {
        self.is_editable()
    }

    // =============================================================================
    // Initial fetch
    // =============================================================================

    /// Leave `Idle`
    ///
    /// Returns the id to fetch for the edit flow. The create flow needs no
    /// fetch and becomes `Ready` immediately.
    pub fn begin_load(&mut self) -> Option<String> {
        if self.state != RequestState::Idle {
            tracing::warn!("Ignoring load in state {}", self.state.label());
            return None;
        }

        match &self.target {
            Some(id) => {
                self.state = RequestState::Loading;
                Some(id.clone())
            }
            None => {
                self.state = RequestState::Ready;
                None
            }
        }
    }

    /// Hydrate the form from the fetched job
    pub fn finish_load(&mut self, result: courier_client::Result<JobForm>) {
        if self.state != RequestState::Loading {
            tracing::warn!("Ignoring fetch result in state {}", self.state.label());
            return;
        }

        match result {
            Ok(form) => {
                self.form = form;
                self.dirty = false;
                self.state = RequestState::Ready;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to fetch job {}: {}",
                    self.target.as_deref().unwrap_or_default(),
                    e
                );
                self.state = RequestState::LoadFailed(describe(&e));
            }
        }
    }

    /// Run the initial fetch, if any
    pub async fn load(&mut self, service: &dyn JobService) {
        if let Some(id) = self.begin_load() {
            let result = service.get_job(&id).await;
            self.finish_load(result);
        }
    }

    // =============================================================================
    // Editing
    // =============================================================================

    /// Apply one field-change event
    ///
    /// Rejected events leave the form untouched.
    pub fn apply(&mut self, event: FormEvent) -> Result<(), ViewError> {
        if !self.is_editable() {
            return Err(ViewError::NotEditable(self.state.label()));
        }

        let before = self.form.clone();
        let form = &mut self.form;

        match event {
            FormEvent::SetName(name) => form.name = name,
            FormEvent::SetMethod(method) => form.method = method,
            FormEvent::AddHeader => {
                form.add_header();
            }
            FormEvent::SetHeaderKey { index, key } => form.header_mut(index)?.key = key,
            FormEvent::SetHeaderValue { index, value } => form.header_mut(index)?.value = value,
            FormEvent::PushHeader { key, value } => {
                form.push_header(key, value);
            }
            FormEvent::RemoveHeader(index) => {
                form.remove_header(index)?;
            }
            FormEvent::SetBody(body) => form.body = body,
            FormEvent::SetExecutionTime(at) => form.execution_time = at,
        }

        if self.form != before {
            self.dirty = true;
        }
        Ok(())
    }

    // =============================================================================
    // Submission
    // =============================================================================

    /// Enter `Submitting` and snapshot the form
    ///
    /// Returns `None` when a submission is already in flight or the form is
    /// not in a submittable state.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            tracing::debug!("Submit ignored in state {}", self.state.label());
            return None;
        }

        self.state = RequestState::Submitting;
        Some(Submission {
            target: self.target.clone(),
            form: self.form.clone(),
        })
    }

    /// Record the outcome of the in-flight submission
    pub fn finish_submit(&mut self, result: courier_client::Result<JsonValue>) {
        if self.state != RequestState::Submitting {
            tracing::warn!(
                "Ignoring submission result in state {}",
                self.state.label()
            );
            return;
        }

        match result {
            Ok(response) => {
                tracing::info!("Job '{}' submitted", self.form.name);
                self.dirty = false;
                self.state = RequestState::Submitted(response);
            }
            Err(e) => {
                tracing::warn!("Job submission failed: {}", e);
                self.state = RequestState::SubmitFailed(e.payload());
            }
        }
    }

    /// Submit the form: create without a target, update with one
    ///
    /// Returns whether a request was issued.
    pub async fn submit(&mut self, service: &dyn JobService) -> bool {
        let Some(submission) = self.begin_submit() else {
            return false;
        };

        let result = match &submission.target {
            Some(id) => service.update_job(id, &submission.form).await,
            None => service.create_job(&submission.form).await,
        };

        self.finish_submit(result);
        true
    }

    // =============================================================================
    // Rendering
    // =============================================================================

    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        let id = self.target.as_deref().unwrap_or_default();

        match &self.state {
            RequestState::Idle if self.target.is_some() => {
                return writeln!(out, "{}", format!("Loading job {}...", id).dimmed());
            }
            RequestState::Loading => {
                return writeln!(out, "{}", format!("Loading job {}...", id).dimmed());
            }
            RequestState::LoadFailed(reason) => {
                writeln!(out, "{}", format!("Error fetching job {}", id).red().bold())?;
                return writeln!(out, "  {}", reason.dimmed());
            }
            _ => {}
        }

        let title = match &self.target {
            Some(id) => format!("Job {}", id),
            None => "Service Request Form".to_string(),
        };
        if self.dirty {
            writeln!(out, "{} {}", title.bold(), "(modified)".yellow())?;
        } else {
            writeln!(out, "{}", title.bold())?;
        }
        writeln!(out)?;

        self.render_fields(out)?;
        writeln!(out)?;

        let control = match self.state {
            RequestState::Submitting => "[ Submitting... ]".dimmed(),
            RequestState::Submitted(_) => "[ Submitted ]".dimmed(),
            _ => "[ Submit ]".bold(),
        };
        writeln!(out, "{}", control)?;

        match &self.state {
            RequestState::Submitted(response) => {
                writeln!(out)?;
                writeln!(out, "{}", "Response".green().bold())?;
                writeln!(out, "{}", pretty_json(response))?;
            }
            RequestState::SubmitFailed(payload) => {
                writeln!(out)?;
                writeln!(out, "{}", "Error".red().bold())?;
                writeln!(out, "{}", pretty_json(payload).red())?;
            }
            _ => {}
        }

        Ok(())
    }

    fn render_fields(&self, out: &mut dyn Write) -> io::Result<()> {
        let form = &self.form;

        writeln!(out, "  {:<16}{}", "Name:", or_empty(&form.name))?;

        let methods = HttpMethod::ALL
            .iter()
            .map(|m| {
                if *m == form.method {
                    format!("[{}]", m).cyan().bold().to_string()
                } else {
                    m.to_string().dimmed().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "  {:<16}{}", "API Method:", methods)?;

        writeln!(out, "  Headers:")?;
        for (i, header) in form.headers().iter().enumerate() {
            writeln!(
                out,
                "    {}. {} = {}",
                i + 1,
                or_empty(&header.key),
                or_empty(&header.value)
            )?;
        }

        writeln!(out, "  Body:")?;
        if form.body.is_empty() {
            writeln!(out, "    {}", "(empty)".dimmed())?;
        } else {
            for line in form.body.lines() {
                writeln!(out, "    {}", line)?;
            }
        }

        let at = match form.execution_time {
            Some(at) => at.to_rfc3339_opts(SecondsFormat::Secs, true).normal(),
            None => "now".dimmed(),
        };
        writeln!(out, "  {:<16}{}", "Execution Time:", at)
    }
}

fn or_empty(text: &str) -> ColoredString {
    if text.is_empty() {
        "(empty)".dimmed()
    } else {
        text.normal()
    }
}

fn pretty_json(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeJobService};
    use chrono::TimeZone;
    use courier_core::domain::form::Header;

    fn rendered(view: &RequestView) -> String {
        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    async fn ready_create_view() -> RequestView {
        let mut view = RequestView::new(None);
        view.load(&FakeJobService::default()).await;
        view
    }

    fn ping_form() -> JobForm {
        serde_json::from_str(
            r#"{"name":"Ping","apiDetails":"GET","headers":[{"key":"","value":""}],"body":"","executionTime":null}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_flow_skips_loading() {
        let service = FakeJobService::default();
        let mut view = RequestView::new(None);

        assert_eq!(view.begin_load(), None);
        assert_eq!(view.state(), &RequestState::Ready);
        assert_eq!(view.form(), &JobForm::default());
        assert!(!view.is_dirty());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_flow_hydrates_from_fetch() {
        let service = FakeJobService::default().with_form("1", ping_form());
        let mut view = RequestView::new(Some("1".to_string()));

        assert_eq!(view.begin_load(), Some("1".to_string()));
        assert_eq!(view.state(), &RequestState::Loading);
        assert!(rendered(&view).contains("Loading job 1"));

        view.finish_load(service.get_job("1").await);

        assert_eq!(view.state(), &RequestState::Ready);
        assert_eq!(view.form(), &ping_form());
        assert_eq!(view.form().method, HttpMethod::Get);
        assert_eq!(view.form().headers(), &[Header::default()]);
        assert!(!view.is_dirty());

        let text = rendered(&view);
        assert!(text.contains("Ping"));
        assert!(text.contains("[GET]"));
        assert!(text.contains("1. "));
        assert!(!text.contains("2. "));
    }

    #[tokio::test]
    async fn test_edit_flow_fetch_failure() {
        let service = FakeJobService::default();
        let mut view = RequestView::new(Some("missing".to_string()));

        view.load(&service).await;

        assert!(matches!(view.state(), RequestState::LoadFailed(_)));
        assert!(!view.can_submit());
        assert!(matches!(
            view.apply(FormEvent::SetName("x".to_string())),
            Err(ViewError::NotEditable(_))
        ));
        assert!(rendered(&view).contains("Error fetching job missing"));
    }

    #[tokio::test]
    async fn test_create_submission_sends_current_values() {
        let service = FakeJobService::default();
        let mut view = ready_create_view().await;

        let events = vec![
            FormEvent::SetName("Ping".to_string()),
            FormEvent::SetMethod(HttpMethod::Put),
            FormEvent::SetHeaderKey {
                index: 0,
                key: "X-B".to_string(),
            },
            FormEvent::SetHeaderValue {
                index: 0,
                value: "2".to_string(),
            },
            FormEvent::AddHeader,
            FormEvent::SetHeaderKey {
                index: 1,
                key: "X-A".to_string(),
            },
            FormEvent::SetHeaderValue {
                index: 1,
                value: "1".to_string(),
            },
            FormEvent::SetBody("{}".to_string()),
        ];
        for event in events {
            view.apply(event).unwrap();
        }
        assert!(view.is_dirty());

        assert!(view.submit(&service).await);

        let mut expected = JobForm::default();
        expected.name = "Ping".to_string();
        expected.method = HttpMethod::Put;
        expected.set_headers(vec![Header::new("X-B", "2"), Header::new("X-A", "1")]);
        expected.body = "{}".to_string();

        assert_eq!(service.calls(), vec![Call::Create(expected)]);
        assert!(matches!(view.state(), RequestState::Submitted(_)));
        assert!(!view.is_dirty());
        assert!(rendered(&view).contains("Response"));
    }

    #[tokio::test]
    async fn test_edit_submission_updates_target() {
        let service = FakeJobService::default().with_form("1", ping_form());
        let mut view = RequestView::new(Some("1".to_string()));
        view.load(&service).await;

        let at = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        view.apply(FormEvent::SetExecutionTime(Some(at))).unwrap();
        assert!(view.submit(&service).await);

        let mut expected = ping_form();
        expected.execution_time = Some(at);
        assert_eq!(
            service.calls(),
            vec![
                Call::Get("1".to_string()),
                Call::Update("1".to_string(), expected)
            ]
        );
    }

    #[tokio::test]
    async fn test_no_second_submission_while_in_flight() {
        let service = FakeJobService::default();
        let mut view = ready_create_view().await;

        let first = view.begin_submit();
        assert!(first.is_some());
        assert!(!view.can_submit());

        assert_eq!(view.begin_submit(), None);
        assert!(!view.submit(&service).await);
        assert!(service.calls().is_empty());
        assert!(rendered(&view).contains("Submitting..."));

        view.finish_submit(Ok(serde_json::json!({ "id": "1" })));
        assert!(matches!(view.state(), RequestState::Submitted(_)));
    }

    #[tokio::test]
    async fn test_empty_reply_counts_as_submitted() {
        let mut view = ready_create_view().await;

        view.begin_submit().unwrap();
        view.finish_submit(Ok(JsonValue::Null));

        assert_eq!(view.state(), &RequestState::Submitted(JsonValue::Null));
        let text = rendered(&view);
        assert!(text.contains("Response"));
        assert!(text.contains("null"));
        assert!(!text.contains("Error"));
    }

    #[tokio::test]
    async fn test_edits_rejected_while_submitting() {
        let mut view = ready_create_view().await;
        view.begin_submit().unwrap();

        let err = view.apply(FormEvent::AddHeader).unwrap_err();

        assert!(matches!(err, ViewError::NotEditable("submitting")));
        assert_eq!(view.form().headers().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_allows_retry() {
        let service = FakeJobService::default().rejecting_submissions();
        let mut view = ready_create_view().await;

        assert!(view.submit(&service).await);
        match view.state() {
            RequestState::SubmitFailed(payload) => {
                assert_eq!(payload["status"], 500);
                assert_eq!(payload["error"]["error"], "queue full");
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert!(view.can_submit());

        let text = rendered(&view);
        assert!(text.contains("Error"));
        assert!(text.contains("[ Submit ]"));

        view.apply(FormEvent::SetName("retry".to_string())).unwrap();
        assert!(view.submit(&service).await);
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_add_header_appends_blank_row() {
        let mut view = ready_create_view().await;
        view.apply(FormEvent::PushHeader {
            key: "Accept".to_string(),
            value: "*/*".to_string(),
        })
        .unwrap();
        let before = view.form().headers().to_vec();

        view.apply(FormEvent::AddHeader).unwrap();

        let after = view.form().headers();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], before.as_slice());
        assert!(after[before.len()].is_blank());
    }

    #[tokio::test]
    async fn test_bad_header_index_changes_nothing() {
        let mut view = ready_create_view().await;

        let err = view
            .apply(FormEvent::SetHeaderKey {
                index: 4,
                key: "k".to_string(),
            })
            .unwrap_err();

        assert!(matches!(
            err,
            ViewError::Form(FormError::NoSuchHeader { index: 4, len: 1 })
        ));
        assert_eq!(view.form(), &JobForm::default());
        assert!(!view.is_dirty());
    }

    #[tokio::test]
    async fn test_unchanged_value_is_not_dirty() {
        let mut view = ready_create_view().await;

        view.apply(FormEvent::SetMethod(HttpMethod::Post)).unwrap();
        assert!(!view.is_dirty());

        view.apply(FormEvent::RemoveHeader(0)).unwrap();
        assert!(!view.is_dirty());

        view.apply(FormEvent::SetMethod(HttpMethod::Delete)).unwrap();
        assert!(view.is_dirty());
        assert!(rendered(&view).contains("(modified)"));
    }
}
