//! Request executor port: fetches a resource and its link pool.

use serde::{Deserialize, Serialize};

use crate::entity_type::EntityType;
use crate::error::BoxError;
use crate::link::split_header;

/// Payload and link pool of one fetched resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Every link of the response, one per entry.
    pub links: Vec<String>,
    /// The decoded payload; `null` when the resource has no body.
    pub body: serde_json::Value,
}

impl Response {
    /// Creates a response from an already split link pool.
    pub fn new<I, S>(links: I, body: serde_json::Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { links: links.into_iter().map(Into::into).collect(), body }
    }

    /// Creates a response from raw `Link` header values, which may each carry
    /// several comma-separated links.
    pub fn from_headers<I, S>(header_values: I, body: serde_json::Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let links = header_values.into_iter().flat_map(|v| split_header(v.as_ref())).collect();
        Self { links, body }
    }
}

/// Performs the request for a given type and URL.
///
/// Implementations perform the transport call, decode the body and collect
/// the link pool. The client is only as thread-safe as its executor.
pub trait RequestExecutor: Send + Sync {
    /// Fetches `url`, expecting a payload of shape `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the body cannot be decoded.
    /// The client hands this error to its caller untouched.
    fn request(&self, entity_type: &EntityType, url: &str) -> Result<Response, BoxError>;
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for Box<E> {
    fn request(&self, entity_type: &EntityType, url: &str) -> Result<Response, BoxError> {
        (**self).request(entity_type, url)
    }
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for std::sync::Arc<E> {
    fn request(&self, entity_type: &EntityType, url: &str) -> Result<Response, BoxError> {
        (**self).request(entity_type, url)
    }
}
