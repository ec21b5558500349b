//! Job endpoints of the job service

use async_trait::async_trait;
use courier_core::domain::form::JobForm;
use courier_core::domain::job::Job;
use courier_core::dto::job::decode_job_listing;
use serde_json::Value as JsonValue;

use crate::JobServiceClient;
use crate::error::{ClientError, Result};
use crate::service::JobService;

#[async_trait]
impl JobService for JobServiceClient {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let url = self.jobs_url(None)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let payload: JsonValue = self.handle_response(response).await?;

        decode_job_listing(payload)
            .map_err(|e| ClientError::ParseError(format!("Failed to decode job listing: {}", e)))
    }

    async fn get_job(&self, id: &str) -> Result<JobForm> {
        let url = self.job_url(id)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        self.handle_response(response).await.map_err(|e| {
            if e.is_not_found() {
                ClientError::NotFound(format!("Job {}", id))
            } else {
                e
            }
        })
    }

    async fn create_job(&self, form: &JobForm) -> Result<JsonValue> {
        let url = self.jobs_url(None)?;
        tracing::info!("Creating job '{}' ({})", form.name, form.method);

        let response = self.client.post(url).json(form).send().await?;

        self.handle_submission_response(response).await
    }

    async fn update_job(&self, id: &str, form: &JobForm) -> Result<JsonValue> {
        let url = self.job_url(id)?;
        tracing::info!("Updating job {} '{}' ({})", id, form.name, form.method);

        let response = self.client.put(url).json(form).send().await?;

        self.handle_submission_response(response).await
    }
}

impl JobServiceClient {
    fn job_url(&self, id: &str) -> Result<reqwest::Url> {
        if id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "Job id cannot be empty".to_string(),
            ));
        }
        self.jobs_url(Some(id))
    }
}
