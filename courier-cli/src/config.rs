//! Configuration module
//!
//! Handles CLI configuration: where the job service lives and how long to
//! wait for it.

use anyhow::{Context, Result};
use courier_client::JobServiceClient;
use std::time::Duration;

/// Default job service base URL
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3000";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the job service
    pub service_url: String,

    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.service_url.is_empty() {
            anyhow::bail!("service_url cannot be empty");
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            anyhow::bail!("service_url must start with http:// or https://");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }

    /// Build a job service client from this configuration
    pub fn client(&self) -> Result<JobServiceClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(JobServiceClient::with_client(&self.service_url, http_client))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
