//! Job service abstraction
//!
//! The operations a front-end needs from the external job service.

use async_trait::async_trait;
use courier_core::domain::form::JobForm;
use courier_core::domain::job::Job;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Operations offered by the external job service
#[async_trait]
pub trait JobService: Send + Sync {
    /// Lists every job known to the service
    ///
    /// A payload that is not a sequence yields an empty list.
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    /// Fetches the editable definition of one job
    ///
    /// # Arguments
    /// * `id` - The job identifier assigned by the service
    async fn get_job(&self, id: &str) -> Result<JobForm>;

    /// Creates a job from a form
    ///
    /// # Returns
    /// The service's response body, whatever its shape
    async fn create_job(&self, form: &JobForm) -> Result<JsonValue>;

    /// Replaces the definition of an existing job
    ///
    /// # Arguments
    /// * `id` - The job identifier assigned by the service
    /// * `form` - The new definition
    ///
    /// # Returns
    /// The service's response body, whatever its shape
    async fn update_job(&self, id: &str, form: &JobForm) -> Result<JsonValue>;
}
