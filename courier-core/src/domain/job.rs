//! Job domain types

use serde::{Deserialize, Serialize};

/// Job record as returned by the job listing endpoint
///
/// Timestamps are kept exactly as the service sent them and are displayed
/// verbatim. `status` is a free-form label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(alias = "jobName")]
    pub name: String,
    #[serde(alias = "submissionDate")]
    pub submitted_time: String,
    #[serde(default, alias = "execution")]
    pub execution_time: Option<String>,
    pub status: String,
}

/// Well-known status words, used only for display highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Queued,
    Running,
    Succeeded,
    Failed,
    Other,
}

impl Job {
    /// Classify the free-form status label
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::classify(&self.status)
    }
}

impl StatusKind {
    /// Map a status label onto a well-known kind, case-insensitively
    pub fn classify(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "queued" | "pending" | "scheduled" => StatusKind::Queued,
            "running" | "in_progress" | "in-progress" => StatusKind::Running,
            "done" | "succeeded" | "success" | "completed" => StatusKind::Succeeded,
            "failed" | "error" | "timedout" | "timed_out" => StatusKind::Failed,
            _ => StatusKind::Other,
        }
    }
}
