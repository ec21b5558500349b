//! In-memory job service for view and command tests

use async_trait::async_trait;
use courier_client::{ClientError, JobService, Result};
use courier_core::domain::form::JobForm;
use courier_core::domain::job::Job;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// A request received by [`FakeJobService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(String),
    Create(JobForm),
    Update(String, JobForm),
}

/// Job service double that records every call
#[derive(Debug, Default)]
pub struct FakeJobService {
    /// `None` makes the listing fail
    jobs: Option<Vec<Job>>,
    forms: HashMap<String, JobForm>,
    reject_submissions: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeJobService {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Some(jobs),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, id: &str, form: JobForm) -> Self {
        self.forms.insert(id.to_string(), form);
        self
    }

    pub fn rejecting_submissions(mut self) -> Self {
        self.reject_submissions = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn submission_result(&self, id: &str) -> Result<JsonValue> {
        if self.reject_submissions {
            return Err(ClientError::api_error(500, r#"{"error":"queue full"}"#));
        }
        Ok(json!({ "id": id, "status": "queued" }))
    }
}

#[async_trait]
impl JobService for FakeJobService {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.record(Call::List);
        self.jobs
            .clone()
            .ok_or_else(|| ClientError::api_error(503, "unavailable"))
    }

    async fn get_job(&self, id: &str) -> Result<JobForm> {
        self.record(Call::Get(id.to_string()));
        self.forms
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Job {}", id)))
    }

    async fn create_job(&self, form: &JobForm) -> Result<JsonValue> {
        self.record(Call::Create(form.clone()));
        self.submission_result("new")
    }

    async fn update_job(&self, id: &str, form: &JobForm) -> Result<JsonValue> {
        self.record(Call::Update(id.to_string(), form.clone()));
        self.submission_result(id)
    }
}

pub fn sample_job(id: &str, name: &str) -> Job {
    Job {
        id: id.to_string(),
        name: name.to_string(),
        submitted_time: "2024-01-01T00:00:00Z".to_string(),
        execution_time: None,
        status: "queued".to_string(),
    }
}
