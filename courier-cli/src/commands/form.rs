//! Form flags
//!
//! Translates command-line flags into form events for the request view.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::Args;
use courier_core::domain::form::{HttpMethod, parse_naive_execution_time};
use std::path::PathBuf;

use crate::views::FormEvent;

/// Field edits applied to the job form
#[derive(Args, Debug, Default, Clone)]
pub struct FormArgs {
    /// Job name
    #[arg(long)]
    pub name: Option<String>,

    /// HTTP method the job performs (GET, POST, PUT, DELETE)
    #[arg(short = 'X', long, value_parser = parse_method)]
    pub method: Option<HttpMethod>,

    /// Header as KEY=VALUE; repeat to add several, in order
    #[arg(short = 'H', long = "header", value_parser = parse_key_val)]
    pub headers: Vec<(String, String)>,

    /// Replace the key of a header row, as ROW=KEY (rows numbered as shown)
    #[arg(long = "header-key", value_parser = parse_row_assignment)]
    pub header_keys: Vec<(usize, String)>,

    /// Replace the value of a header row, as ROW=VALUE
    #[arg(long = "header-value", value_parser = parse_row_assignment)]
    pub header_values: Vec<(usize, String)>,

    /// Append this many blank header rows
    #[arg(long = "add-header", action = clap::ArgAction::Count)]
    pub add_headers: u8,

    /// Remove the header row with this number (as shown in the form)
    #[arg(long = "remove-header", value_parser = parse_row_number)]
    pub remove_headers: Vec<usize>,

    /// Request body
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the request body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Scheduled execution time (RFC 3339, or local YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_local_datetime, conflicts_with = "now")]
    pub at: Option<DateTime<Utc>>,

    /// Run as soon as possible, clearing any scheduled execution time
    #[arg(long)]
    pub now: bool,
}

impl FormArgs {
    /// Convert the flags into form events
    ///
    /// Row edits and removals run first, removals highest row first, so row
    /// numbers refer to the form as loaded. New headers are pushed afterwards
    /// in the order given, then any blank rows are appended.
    pub fn into_events(self) -> Result<Vec<FormEvent>> {
        let mut events = Vec::new();

        events.extend(
            self.header_keys
                .into_iter()
                .map(|(row, key)| FormEvent::SetHeaderKey { index: row - 1, key }),
        );
        events.extend(
            self.header_values
                .into_iter()
                .map(|(row, value)| FormEvent::SetHeaderValue {
                    index: row - 1,
                    value,
                }),
        );

        let mut removals = self.remove_headers;
        removals.sort_unstable();
        removals.dedup();
        events.extend(removals.into_iter().rev().map(|row| FormEvent::RemoveHeader(row - 1)));

        events.extend(
            self.headers
                .into_iter()
                .map(|(key, value)| FormEvent::PushHeader { key, value }),
        );
        events.extend((0..self.add_headers).map(|_| FormEvent::AddHeader));

        if let Some(name) = self.name {
            events.push(FormEvent::SetName(name));
        }

        if let Some(method) = self.method {
            events.push(FormEvent::SetMethod(method));
        }

        let body = match (self.body, self.body_file) {
            (Some(body), _) => Some(body),
            (None, Some(path)) => Some(
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read body file {}", path.display()))?,
            ),
            (None, None) => None,
        };
        if let Some(body) = body {
            events.push(FormEvent::SetBody(body));
        }

        if self.now {
            events.push(FormEvent::SetExecutionTime(None));
        } else if let Some(at) = self.at {
            events.push(FormEvent::SetExecutionTime(Some(at)));
        }

        Ok(events)
    }
}

fn parse_method(s: &str) -> Result<HttpMethod> {
    Ok(s.parse::<HttpMethod>()?)
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Parse a 1-based header row number
fn parse_row_number(s: &str) -> Result<usize> {
    let row: usize = s
        .parse()
        .with_context(|| format!("invalid row number `{}`", s))?;
    if row == 0 {
        anyhow::bail!("row numbers start at 1");
    }
    Ok(row)
}

/// Parse a ROW=TEXT header row assignment
fn parse_row_assignment(s: &str) -> Result<(usize, String)> {
    let (row, text) = parse_key_val(s)?;
    Ok((parse_row_number(&row)?, text))
}

/// Parse an RFC 3339 date-time, or a zone-less one in the local time zone
fn parse_local_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = parse_naive_execution_time(s)
        .ok_or_else(|| anyhow::anyhow!("invalid date-time `{}`", s))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("`{}` is ambiguous or skipped in the local time zone", s))
}
