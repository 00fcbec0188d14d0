//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `lazylink`.
#[derive(Debug, Parser)]
#[command(name = "lazylink", version, about = "Generate, correlate and follow hypermedia links")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the links of one entity, one per line.
    Encode(EncodeArgs),
    /// Read links from stdin and print the anchor maps as JSON.
    Correlate {
        /// Treat the links as describing an array or collection.
        #[arg(long)]
        multiple: bool,
    },
    /// Fetch a resource and print its payload and anchor maps as JSON.
    Fetch {
        /// Absolute URL of the resource.
        url: String,
        /// Expect an array or collection payload.
        #[arg(long)]
        multiple: bool,
    },
}

/// Arguments of `lazylink encode`.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Self path template, e.g. `/incidents/@id`.
    #[arg(long)]
    pub path: String,
    /// Key identifying the entity within a collection.
    #[arg(long)]
    pub identified_by: String,
    /// Encode as a collection element (`rel="item"`) instead of `rel="self"`.
    #[arg(long)]
    pub item: bool,
    /// Subordinate relation `anchor=path`; an empty path uses the anchor.
    #[arg(long = "related", value_name = "ANCHOR=PATH", value_parser = parse_pair)]
    pub related: Vec<(String, String)>,
    /// Detached relation `anchor=path`.
    #[arg(long = "detached", value_name = "ANCHOR=PATH", value_parser = parse_pair)]
    pub detached: Vec<(String, String)>,
    /// Placeholder value `key=value`.
    #[arg(long = "value", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub values: Vec<(String, String)>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
    if key.trim().is_empty() {
        return Err(format!("expected KEY=VALUE, got {raw:?}"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
