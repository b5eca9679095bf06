//! Server-asserted timestamps.
//!
//! The server is free to send any string here (the reference server emits
//! naive local ISO-8601 without an offset). Timestamps are therefore stored
//! verbatim and only interpreted when rendering. A frame is never rejected
//! because its timestamp does not parse.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Naive ISO-8601 layout, fractional seconds optional.
const NAIVE_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Wall-clock layout used for display.
const DISPLAY_FORMAT: &str = "%H:%M";

/// Instant as asserted by the server, kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a raw timestamp string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw text as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort parse into the wall-clock time the server wrote.
    ///
    /// RFC 3339 values keep their own offset's local time. `None` if the text
    /// matches neither RFC 3339 nor naive ISO-8601.
    pub fn parse(&self) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(&self.0)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(&self.0, NAIVE_ISO_FORMAT))
            .ok()
    }

    /// `HH:MM` form for rendering, falling back to the raw text.
    pub fn display_time(&self) -> String {
        self.parse().map_or_else(|| self.0.clone(), |dt| dt.format(DISPLAY_FORMAT).to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
