//! Crate-wide error type.

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while encoding, correlating or resolving links.
#[derive(Error, Debug)]
pub enum Error {
    /// A placeholder in a link template has no substitution value.
    #[error("no substitution value for placeholder @{key} in {template}")]
    MissingSubstitution {
        /// The placeholder name without the leading `@`.
        key: String,
        /// The rendered link the placeholder was found in.
        template: String,
    },

    /// None of the composed declarations carried a self configuration.
    #[error("no self configuration declared")]
    MissingSelfConfig,

    /// A client request was made with a relative URL.
    #[error("URL must be absolute but {0} was passed")]
    RelativeUrl(String),

    /// A link string does not follow the wire grammar.
    #[error("invalid link {link:?}: {reason}")]
    InvalidLink {
        /// The offending link string.
        link: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Two item links in one response share an anchor or a URL.
    #[error("item {anchor:?} appears more than once in the link pool")]
    DuplicateItem {
        /// The colliding item anchor or URL.
        anchor: String,
    },

    /// A dynamic resolution had neither a descriptor nor a declared field type.
    #[error("cannot determine the entity type for anchor {anchor:?}; the accessor declared no type")]
    MissingTypeContext {
        /// The anchor being resolved.
        anchor: String,
    },

    /// The request executor failed. The source error is passed through untouched.
    #[error("request executor failed: {0}")]
    Executor(#[source] BoxError),

    /// The fetched payload could not be deserialized into the requested shape.
    #[error("payload does not match the requested type: {0}")]
    Payload(#[from] serde_json::Error),

    /// A cassette could not be read, parsed or written.
    #[error("cassette error: {0}")]
    Cassette(String),

    /// Invalid environment configuration.
    #[error("settings error: {0}")]
    Settings(String),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the executor's original error if this is an executor failure.
    #[must_use]
    pub fn into_executor_error(self) -> Option<BoxError> {
        match self {
            Self::Executor(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
