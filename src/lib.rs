//! Hypermedia links for lazily loaded entity relations.
//!
//! The server side encodes each entity into `self`/`item` and `related`
//! links with [`LinkEncoder`]. The client side fetches resources through a
//! [`Client`], correlates the returned link pool back to the entities and
//! attaches a [`Resolver`] to each, so relations are fetched on first access
//! and at most once.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod client;
pub mod commands;
pub mod context;
pub mod correlate;
pub mod encode;
pub mod entity;
pub mod entity_type;
pub mod error;
pub mod link;
pub mod metadata;
pub mod ports;
pub mod resolve;
pub mod settings;

pub use client::Client;
pub use correlate::{correlate, AnchorMap, Correlation, Shape};
pub use encode::{LinkEncoder, Linkable};
pub use entity::{init_field, Fetchable, LazyEntity};
pub use entity_type::{EntityType, RawKind};
pub use error::{BoxError, Error, Result};
pub use link::{Link, LinkBuilder, Rel};
pub use metadata::{compose, Declaration, EntityMetadata, RelatedConfig, SelfConfig, Substitutions};
pub use ports::{RequestExecutor, Response};
pub use resolve::Resolver;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution
/// fails. Help and version output are not errors.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
