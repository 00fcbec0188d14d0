//! Port traits defining external boundaries.
//!
//! The core only talks to the outside world through the request executor.
//! Implementations live in `src/adapters/`.

pub mod request;

pub use request::{RequestExecutor, Response};
