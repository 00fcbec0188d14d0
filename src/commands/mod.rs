//! Command dispatch and handlers.

pub mod correlate;
pub mod encode;
pub mod fetch;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Correlate { multiple } => correlate::run(*multiple),
        Command::Fetch { url, multiple } => fetch::run(url, *multiple),
    }
}
