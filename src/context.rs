//! Service context wiring a [`Client`] to its executor stack.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::adapters::live::HttpExecutor;
use crate::adapters::recording::RecordingExecutor;
use crate::adapters::replaying::ReplayingExecutor;
use crate::cassette::recorder::CassetteRecorder;
use crate::client::Client;
use crate::error::Result;
use crate::ports::RequestExecutor;
use crate::settings::{ExecutorMode, Settings};

/// Bundles the client with whatever must happen when the session ends.
///
/// Constructors wire up different executor stacks (live, recording,
/// replaying).
pub struct ServiceContext {
    /// Client backed by the configured executor.
    pub client: Client,
    /// Recording executor; its cassette is written on finish or drop.
    recording: Option<Arc<RecordingExecutor>>,
}

impl ServiceContext {
    /// Builds the stack selected by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the replay
    /// cassette cannot be loaded.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match &settings.mode {
            ExecutorMode::Live => Self::live(settings.http_timeout),
            ExecutorMode::Record(path) => Self::recording(path, settings.http_timeout),
            ExecutorMode::Replay(path) => Self::replaying(path),
        }
    }

    /// Creates a context around any executor.
    pub fn with_executor(executor: impl RequestExecutor + 'static) -> Self {
        Self { client: Client::new(executor), recording: None }
    }

    /// Creates a live context performing real HTTP requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(timeout: Duration) -> Result<Self> {
        Ok(Self::with_executor(HttpExecutor::new(timeout)?))
    }

    /// Creates a live context that records every interaction to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(path: &Path, timeout: Duration) -> Result<Self> {
        Ok(Self::recording_with(HttpExecutor::new(timeout)?, path))
    }

    /// Creates a context recording the interactions of `inner` to `path`.
    pub fn recording_with(inner: impl RequestExecutor + 'static, path: &Path) -> Self {
        info!(path = %path.display(), "recording requests");
        let recording = Arc::new(RecordingExecutor::new(inner, CassetteRecorder::new(path, "lazylink-session")));
        Self { client: Client::new(Arc::clone(&recording)), recording: Some(recording) }
    }

    /// Creates a context serving every request from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "replaying requests");
        Ok(Self::with_executor(ReplayingExecutor::load(path)?))
    }

    /// Ends the session, writing the cassette when recording.
    ///
    /// Returns the cassette path, if one was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(mut self) -> Result<Option<PathBuf>> {
        self.recording.take().map(|recording| recording.finish()).transpose()
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recording) = self.recording.take() {
            if let Err(e) = recording.finish() {
                warn!(error = %e, "failed to write cassette");
            }
        }
    }
}
