//! Job DTOs for job service communication

use serde_json::Value as JsonValue;

use crate::domain::job::Job;

/// Decode the body of the job listing endpoint
///
/// A JSON array is decoded element by element; any other payload (an error
/// object, `null`, a bare string) is treated as an empty collection.
pub fn decode_job_listing(payload: JsonValue) -> Result<Vec<Job>, serde_json::Error> {
    match payload {
        JsonValue::Array(items) => items.into_iter().map(serde_json::from_value).collect(),
        other => {
            tracing::warn!(
                "Job listing is not a sequence ({}), treating it as empty",
                json_kind(&other)
            );
            Ok(Vec::new())
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
