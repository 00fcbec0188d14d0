//! Cassette format for recording and replaying request executors.

pub mod format;
pub mod recorder;
pub mod replayer;
