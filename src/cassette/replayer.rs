//! Replays recorded interactions from a cassette.

use std::collections::HashMap;
use std::path::Path;

use super::format::{Cassette, Interaction};
use crate::error::{Error, Result};

/// Key for indexing interactions by requested type and URL.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct RequestKey {
    entity_type: String,
    url: String,
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per (type, url) pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<RequestKey, Vec<Interaction>>,
    cursors: HashMap<RequestKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<RequestKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = RequestKey {
                entity_type: interaction.entity_type.clone(),
                url: interaction.url.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Read and parse a YAML cassette file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Cassette(format!("failed to read {}: {e}", path.display())))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| Error::Cassette(format!("failed to parse {}: {e}", path.display())))?;
        Ok(Self::new(&cassette))
    }

    /// Return the next interaction for the given type and URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cassette`] if nothing was recorded for the pair, listing
    /// the recorded pairs, or if every recorded interaction for it has
    /// already been served.
    pub fn next_interaction(&mut self, entity_type: &str, url: &str) -> Result<&Interaction> {
        let key = RequestKey { entity_type: entity_type.to_string(), url: url.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{} {}", k.entity_type, k.url)).collect();
            available.sort();
            return Err(Error::Cassette(format!(
                "no interactions recorded for {entity_type} {url}; recorded: [{}]",
                available.join(", ")
            )));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(Error::Cassette(format!(
                "cassette exhausted: all {} interactions for {entity_type} {url} have been served",
                queue.len()
            )));
        };
        *cursor += 1;
        Ok(interaction)
    }
}
