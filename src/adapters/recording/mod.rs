//! Recording adapter that captures executor interactions to a cassette.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::cassette::recorder::CassetteRecorder;
use crate::entity_type::EntityType;
use crate::error::{BoxError, Result};
use crate::ports::{RequestExecutor, Response};

/// Serialize a `Result<T, E>` using the Ok/Err cassette convention.
///
/// - `Ok(v)` is stored as `{"Ok": v}`
/// - `Err(e)` is stored as `{"Err": e.to_string()}`
pub(crate) fn record_result<T, E>(result: &std::result::Result<T, E>) -> Value
where
    T: Serialize,
    E: std::fmt::Display,
{
    match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(inner) => json!({ "Ok": inner }),
            Err(e) => json!({ "Err": format!("unserializable output: {e}") }),
        },
        Err(e) => json!({ "Err": e.to_string() }),
    }
}

/// Records every request while delegating to an inner executor.
pub struct RecordingExecutor {
    inner: Box<dyn RequestExecutor>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingExecutor {
    /// Wraps `inner`, appending each outcome to `recorder`.
    pub fn new(inner: impl RequestExecutor + 'static, recorder: CassetteRecorder) -> Self {
        Self { inner: Box::new(inner), recorder: Arc::new(Mutex::new(recorder)) }
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Write the cassette with everything recorded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(&self) -> Result<PathBuf> {
        let recorder = self.recorder.lock().unwrap_or_else(PoisonError::into_inner);
        let path = recorder.save()?;
        info!(path = %path.display(), interactions = recorder.len(), "cassette written");
        Ok(path)
    }
}

impl RequestExecutor for RecordingExecutor {
    fn request(&self, entity_type: &EntityType, url: &str) -> std::result::Result<Response, BoxError> {
        let result = self.inner.request(entity_type, url);
        let output = record_result(&result);
        self.recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(entity_type.type_name(), url, output);
        result
    }
}
