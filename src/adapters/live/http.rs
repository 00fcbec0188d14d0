//! Live request executor over HTTP using a blocking `reqwest` client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, LINK};
use tracing::debug;

use crate::entity_type::EntityType;
use crate::error::{BoxError, Error, Result};
use crate::ports::{RequestExecutor, Response};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches JSON resources and their `Link` headers.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    /// Creates an executor whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Executor`] if the HTTP client cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Executor(Box::new(e)))?;
        Ok(Self { client })
    }
}

impl RequestExecutor for HttpExecutor {
    fn request(&self, entity_type: &EntityType, url: &str) -> std::result::Result<Response, BoxError> {
        let response = self.client.get(url).header(ACCEPT, "application/json").send()?;

        let status = response.status();
        let links: Vec<String> = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let text = response.text()?;
        debug!(url, status = status.as_u16(), links = links.len(), entity_type = %entity_type, "received response");

        if !status.is_success() {
            return Err(format!("GET {url} failed ({}): {}", status.as_u16(), text.trim()).into());
        }

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| -> BoxError { format!("invalid JSON from {url}: {e}").into() })?
        };

        Ok(Response::from_headers(links, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_is_an_executor_error() {
        let executor = HttpExecutor::new(Duration::from_millis(200)).unwrap();
        let result = executor.request(&EntityType::of::<String>(), "http://127.0.0.1:9/unreachable");
        assert!(result.is_err());
    }
}
