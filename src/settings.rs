//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::live::http::DEFAULT_TIMEOUT;
use crate::error::{Error, Result};

/// Tracing filter directive variable.
pub const LOG_VAR: &str = "LAZYLINK_LOG";
/// Cassette path to record live interactions to.
pub const RECORD_VAR: &str = "LAZYLINK_RECORD";
/// Cassette path to replay interactions from.
pub const REPLAY_VAR: &str = "LAZYLINK_REPLAY";
/// Live request timeout, in whole seconds.
pub const TIMEOUT_VAR: &str = "LAZYLINK_HTTP_TIMEOUT_SECS";

/// How requests reach the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorMode {
    /// Plain HTTP.
    Live,
    /// HTTP, with every interaction written to a cassette.
    Record(PathBuf),
    /// Responses served from a cassette; no network access.
    Replay(PathBuf),
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Tracing filter directive.
    pub log_filter: String,
    /// Executor stack to build.
    pub mode: ExecutorMode,
    /// Timeout of live requests.
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self { log_filter: "info".into(), mode: ExecutorMode::Live, http_timeout: DEFAULT_TIMEOUT }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup. Blank values count as
    /// unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] if both a record and a replay cassette are
    /// configured or the timeout is not a whole number of seconds.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mode = match (get(RECORD_VAR), get(REPLAY_VAR)) {
            (Some(_), Some(_)) => {
                return Err(Error::Settings(format!("{RECORD_VAR} and {REPLAY_VAR} are mutually exclusive")))
            }
            (Some(path), None) => ExecutorMode::Record(PathBuf::from(path)),
            (None, Some(path)) => ExecutorMode::Replay(PathBuf::from(path)),
            (None, None) => ExecutorMode::Live,
        };

        let http_timeout = match get(TIMEOUT_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| Error::Settings(format!("{TIMEOUT_VAR}={raw:?}: {e}")))?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            log_filter: get(LOG_VAR).unwrap_or_else(|| "info".into()),
            mode,
            http_timeout,
        })
    }
}
