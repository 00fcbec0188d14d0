//! Client entry point: fetches resources and wires lazy resolution into them.
//!
//! Every fetched payload is correlated against its link pool before any
//! resolver is attached, so each entity's resolver sees its complete anchor
//! map from the start.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::debug;
use url::Url;

use crate::correlate::{correlate, Shape};
use crate::entity::Fetchable;
use crate::entity_type::EntityType;
use crate::error::{Error, Result};
use crate::ports::{RequestExecutor, Response};

type ExecutorFactory = Box<dyn FnOnce() -> Box<dyn RequestExecutor> + Send>;

struct Inner {
    executor: OnceLock<Box<dyn RequestExecutor>>,
    factory: Mutex<Option<ExecutorFactory>>,
}

/// Fetches resources through a [`RequestExecutor`] and attaches resolvers.
///
/// Cloning is cheap; clones share the executor. The client is thread-safe as
/// long as its executor is.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// Creates a client using the given executor.
    pub fn new(executor: impl RequestExecutor + 'static) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Box::new(executor) as Box<dyn RequestExecutor>);
        Self { inner: Arc::new(Inner { executor: cell, factory: Mutex::new(None) }) }
    }

    /// Creates a client whose executor is built on first use.
    ///
    /// The factory runs at most once, even under concurrent first use; every
    /// caller observes the same executor.
    pub fn deferred<E, F>(factory: F) -> Self
    where
        E: RequestExecutor + 'static,
        F: FnOnce() -> E + Send + 'static,
    {
        let factory: ExecutorFactory =
            Box::new(move || Box::new(factory()) as Box<dyn RequestExecutor>);
        Self {
            inner: Arc::new(Inner { executor: OnceLock::new(), factory: Mutex::new(Some(factory)) }),
        }
    }

    fn executor(&self) -> &dyn RequestExecutor {
        let executor = self.inner.executor.get_or_init(|| {
            let factory = self
                .inner
                .factory
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
                .expect("executor factory runs only once");
            debug!("constructing deferred request executor");
            factory()
        });
        &**executor
    }

    /// Fetches `url` as `T`, inferring the descriptor from `T`.
    ///
    /// Returns `None` when the payload is `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelativeUrl`] before any request if `url` is not an
    /// absolute http(s) URL, [`Error::Executor`] if the executor fails,
    /// [`Error::Payload`] if the body does not decode as `T`, and
    /// [`Error::DuplicateItem`] if the link pool is ambiguous.
    pub fn get<T: Fetchable>(&self, url: &str) -> Result<Option<T>> {
        self.get_as(&T::entity_type(), url)
    }

    /// Fetches `url` as `T`, sending the given descriptor to the executor.
    ///
    /// # Errors
    ///
    /// See [`Client::get`].
    pub fn get_as<T: Fetchable>(&self, entity_type: &EntityType, url: &str) -> Result<Option<T>> {
        let response = self.fetch(entity_type, url)?;
        if response.body.is_null() {
            return Ok(None);
        }

        let mut value: T = serde_json::from_value(response.body)?;
        let correlation = correlate(&response.links, Shape::of(entity_type))?;
        value.attach(&correlation, self);
        Ok(Some(value))
    }

    /// Performs the raw request without decoding or correlating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelativeUrl`] for non-absolute URLs and
    /// [`Error::Executor`] carrying the executor's own error.
    pub fn fetch(&self, entity_type: &EntityType, url: &str) -> Result<Response> {
        ensure_absolute(url)?;
        debug!(url, entity_type = %entity_type, "requesting resource");
        self.executor().request(entity_type, url).map_err(Error::Executor)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("executor_ready", &self.inner.executor.get().is_some())
            .finish()
    }
}

fn ensure_absolute(url: &str) -> Result<()> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(Error::RelativeUrl(url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(Response);

    impl RequestExecutor for Fixed {
        fn request(&self, _entity_type: &EntityType, _url: &str) -> std::result::Result<Response, BoxError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl RequestExecutor for Failing {
        fn request(&self, _entity_type: &EntityType, url: &str) -> std::result::Result<Response, BoxError> {
            Err(format!("connection refused: {url}").into())
        }
    }

    #[test]
    fn relative_url_is_rejected_before_request() {
        let client = Client::new(Failing);
        let err = client.fetch(&EntityType::of::<String>(), "/invalid").unwrap_err();
        assert_eq!(err.to_string(), "URL must be absolute but /invalid was passed");

        let err = client.fetch(&EntityType::of::<String>(), "ftp://host/x").unwrap_err();
        assert!(matches!(err, Error::RelativeUrl(_)));
    }

    #[test]
    fn executor_error_is_propagated() {
        let client = Client::new(Failing);
        let err = client.fetch(&EntityType::of::<String>(), "http://dummy").unwrap_err();
        let inner = err.into_executor_error().unwrap();
        assert_eq!(inner.to_string(), "connection refused: http://dummy");
    }

    #[test]
    fn fetch_returns_raw_response() {
        let response = Response::new(["</a>; rel=\"self\""], serde_json::json!("body"));
        let client = Client::new(Fixed(response.clone()));
        assert_eq!(client.fetch(&EntityType::of::<String>(), "https://dummy/a").unwrap(), response);
    }

    #[test]
    fn deferred_executor_is_built_once_under_concurrency() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        let client = Client::deferred(|| {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Fixed(Response::default())
        });
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let client = client.clone();
                scope.spawn(move || {
                    client.fetch(&EntityType::of::<String>(), "http://dummy").unwrap();
                });
            }
        });

        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
        assert!(format!("{client:?}").contains("executor_ready: true"));
    }
}
