//! ID resolver module
//!
//! Lets users type a short, unambiguous prefix of a job id instead of the
//! full id. Ids are opaque strings, so resolution is a plain prefix match
//! against the job listing.

use anyhow::{Result, anyhow, bail};
use courier_client::JobService;

/// Resolve a job id or prefix to a full job id
///
/// An exact id match wins. Otherwise exactly one job must start with the
/// given prefix. Input that matches nothing, or a listing that cannot be
/// fetched, leaves the input unchanged for the service to judge.
///
/// # Errors
/// Returns an error if the input is blank or the prefix matches several jobs.
pub async fn resolve_job_id(service: &dyn JobService, id_or_prefix: &str) -> Result<String> {
    if id_or_prefix.trim().is_empty() {
        bail!("Job id cannot be empty");
    }

    let jobs = match service.list_jobs().await {
        Ok(jobs) => jobs,
        Err(e) => {
            tracing::warn!("Could not list jobs to resolve '{}': {}", id_or_prefix, e);
            return Ok(id_or_prefix.to_string());
        }
    };

    if jobs.iter().any(|j| j.id == id_or_prefix) {
        return Ok(id_or_prefix.to_string());
    }

    let matches: Vec<_> = jobs
        .iter()
        .filter(|j| j.id.starts_with(id_or_prefix))
        .collect();

    match matches.len() {
        0 => {
            tracing::debug!("No job id starts with '{}', using it as is", id_or_prefix);
            Ok(id_or_prefix.to_string())
        }
        1 => {
            tracing::debug!("Resolved '{}' to job {}", id_or_prefix, matches[0].id);
            Ok(matches[0].id.clone())
        }
        _ => {
            let ids: Vec<&str> = matches.iter().map(|j| j.id.as_str()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                id_or_prefix,
                ids.join(", ")
            ))
        }
    }
}
