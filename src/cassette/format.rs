//! Cassette data structures for recording and replaying request executors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded request and its outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Rendered entity type descriptor the request was made for.
    pub entity_type: String,
    /// Requested URL.
    pub url: String,
    /// Outcome, `{"Ok": response}` or `{"Err": message}`.
    pub output: serde_json::Value,
}

impl Interaction {
    /// Whether this interaction answers a request for `entity_type` at `url`.
    #[must_use]
    pub fn matches(&self, entity_type: &str, url: &str) -> bool {
        self.entity_type == entity_type && self.url == url
    }
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}
