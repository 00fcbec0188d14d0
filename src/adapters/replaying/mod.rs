//! Replaying adapter that serves recorded executor interactions.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::entity_type::EntityType;
use crate::error::{BoxError, Result};
use crate::ports::{RequestExecutor, Response};

/// Deserialize a recorded output using the Ok/Err cassette convention.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(output: Value) -> std::result::Result<T, BoxError> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = match output {
        Value::Object(mut map) if map.contains_key("Ok") => map.remove("Ok").unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(value).map_err(|e| format!("malformed cassette output: {e}").into())
}

/// Serves recorded responses instead of performing requests.
#[derive(Debug)]
pub struct ReplayingExecutor {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingExecutor {
    /// Creates an executor backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    /// Loads the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        CassetteReplayer::load(path).map(Self::new)
    }
}

impl RequestExecutor for ReplayingExecutor {
    fn request(&self, entity_type: &EntityType, url: &str) -> std::result::Result<Response, BoxError> {
        let output = {
            let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
            replayer.next_interaction(&entity_type.type_name(), url)?.output.clone()
        };
        replay_result(output)
    }
}
