//! Job form domain types
//!
//! `JobForm` is the read/write shape of the detail view: it is what the
//! service returns for a single job and what is sent on create and update.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Formats accepted for a zone-less execution time, most specific first
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Errors raised while editing a job form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("header row {index} does not exist (form has {len} row(s))")]
    NoSuchHeader { index: usize, len: usize },

    #[error("unknown method '{0}', expected one of GET, POST, PUT, DELETE")]
    UnknownMethod(String),

    #[error("invalid execution time '{0}'")]
    InvalidExecutionTime(String),
}

/// HTTP method of the request a job performs
///
/// Serialized in upper case; any case is accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Every selectable method, in menu order
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Post,
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormError::UnknownMethod(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single header row. Both sides are free text and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

/// Editable request definition used to create and update a job
///
/// The header list is never empty: a form always has at least one (possibly
/// blank) row to edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobForm {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "apiDetails", default)]
    pub method: HttpMethod,

    #[serde(default = "blank_headers", deserialize_with = "deserialize_headers")]
    headers: Vec<Header>,

    #[serde(default)]
    pub body: String,

    /// Scheduled execution time; `None` means run now
    #[serde(default, deserialize_with = "deserialize_execution_time")]
    pub execution_time: Option<DateTime<Utc>>,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            method: HttpMethod::Post,
            headers: blank_headers(),
            body: String::new(),
            execution_time: None,
        }
    }
}

impl JobForm {
    /// Header rows in entry order
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Replace all header rows, keeping at least one row
    pub fn set_headers(&mut self, headers: Vec<Header>) {
        self.headers = if headers.is_empty() {
            blank_headers()
        } else {
            headers
        };
    }

    /// Append one blank header row
    pub fn add_header(&mut self) -> usize {
        self.headers.push(Header::default());
        self.headers.len() - 1
    }

    /// Mutable access to an existing header row
    pub fn header_mut(&mut self, index: usize) -> Result<&mut Header, FormError> {
        let len = self.headers.len();
        self.headers
            .get_mut(index)
            .ok_or(FormError::NoSuchHeader { index, len })
    }

    /// Remove the header row at `index`
    ///
    /// Removing the only row clears it instead so the form keeps one row.
    pub fn remove_header(&mut self, index: usize) -> Result<Header, FormError> {
        let len = self.headers.len();
        if index >= len {
            return Err(FormError::NoSuchHeader { index, len });
        }

        if len == 1 {
            return Ok(std::mem::take(&mut self.headers[0]));
        }

        Ok(self.headers.remove(index))
    }

    /// Set a header from a `key`/`value` pair, filling a trailing blank row
    /// before appending a new one
    pub fn push_header(&mut self, key: impl Into<String>, value: impl Into<String>) -> usize {
        let index = match self.headers.last() {
            Some(last) if last.is_blank() => self.headers.len() - 1,
            _ => self.add_header(),
        };
        self.headers[index] = Header::new(key, value);
        index
    }
}

/// Parse an execution time sent by the service or typed by a user
///
/// RFC 3339 values keep their offset; zone-less values are taken as UTC.
pub fn parse_execution_time(input: &str) -> Result<DateTime<Utc>, FormError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    parse_naive_execution_time(input)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FormError::InvalidExecutionTime(input.to_string()))
}

/// Parse a zone-less `YYYY-MM-DDTHH:MM[:SS]` date-time
pub fn parse_naive_execution_time(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input.trim(), fmt).ok())
}

fn blank_headers() -> Vec<Header> {
    vec![Header::default()]
}

fn deserialize_headers<'de, D>(deserializer: D) -> Result<Vec<Header>, D::Error>
where
    D: Deserializer<'de>,
{
    let headers = Option::<Vec<Header>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(if headers.is_empty() {
        blank_headers()
    } else {
        headers
    })
}

fn deserialize_execution_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_execution_time(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
