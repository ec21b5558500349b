//! Views
//!
//! Each view is an explicit view-model: it owns its fetch state and renders
//! itself to any writer. Nothing here talks to a terminal directly.

pub mod request;
pub mod status;

pub use request::{FormEvent, RequestState, RequestView};
pub use status::StatusView;

use courier_client::ClientError;

/// State of a read from the job service
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    /// Request issued, no answer yet
    Pending,
    /// Data arrived
    Ready(T),
    /// The read failed; holds a human-readable reason
    Failed(String),
}

impl<T> Remote<T> {
    pub fn from_result(result: courier_client::Result<T>) -> Self {
        match result {
            Ok(data) => Remote::Ready(data),
            Err(e) => Remote::Failed(describe(&e)),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Remote::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Short reason for a failed read
fn describe(err: &ClientError) -> String {
    match err {
        ClientError::ApiError { status, .. } => format!("service answered with status {}", status),
        other => other.to_string(),
    }
}
