//! Implementations of the request executor port.

pub mod live;
pub mod recording;
pub mod replaying;
