//! Courier HTTP Client
//!
//! A small, type-safe HTTP client for the external job service.
//!
//! Every endpoint lives under one configurable base URL:
//! `GET /jobs`, `GET /jobs/{id}`, `POST /jobs` and `PUT /jobs/{id}`.
//! Front-ends depend on the [`JobService`] trait so they can be driven by
//! this client or by an in-memory implementation.
//!
//! # Example
//!
//! ```no_run
//! use courier_client::{JobService, JobServiceClient};
//! use courier_core::domain::form::JobForm;
//!
//! #[tokio::main]
//! async fn main() -> courier_client::Result<()> {
//!     let client = JobServiceClient::new("http://localhost:3000");
//!
//!     let mut form = JobForm::default();
//!     form.name = "Ping".to_string();
//!     let created = client.create_job(&form).await?;
//!
//!     println!("Created: {}", created);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod service;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use service::JobService;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// HTTP client for the job service API
#[derive(Debug, Clone)]
pub struct JobServiceClient {
    /// Base URL of the job service (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl JobServiceClient {
    /// Create a new job service client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the job service (e.g., "http://localhost:3000")
    ///
    /// # Example
    /// ```
    /// use courier_client::JobServiceClient;
    ///
    /// let client = JobServiceClient::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new job service client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use courier_client::JobServiceClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = JobServiceClient::with_client("http://localhost:3000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the job service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL of the job collection, or of one job when `id` is given
    ///
    /// The id is percent-encoded as a single path segment.
    pub(crate) fn jobs_url(&self, id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "Base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().push("jobs");
            if let Some(id) = id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle the reply to a create or update request
    ///
    /// Any 2xx status is a success. The body is returned as JSON when it
    /// parses, as a string when it does not, and as `null` when it is empty.
    async fn handle_submission_response(&self, response: reqwest::Response) -> Result<JsonValue> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let text = response.text().await?;
        Ok(submission_payload(text))
    }
}

fn submission_payload(text: String) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(&text).unwrap_or(JsonValue::String(text))
}
