//! `lazylink encode` command.

use crate::cli::EncodeArgs;
use crate::encode::LinkEncoder;
use crate::error::Result;
use crate::metadata::{compose, Declaration, RelatedConfig, SelfConfig};

/// Execute the `encode` command, printing one link per line.
///
/// # Errors
///
/// Returns an error string if a template references a missing value.
pub fn run(args: &EncodeArgs) -> std::result::Result<(), String> {
    for link in links(args).map_err(|e| e.to_string())? {
        println!("{link}");
    }
    Ok(())
}

/// Renders the links described by `args`.
///
/// # Errors
///
/// See [`LinkEncoder::generate_links`].
pub fn links(args: &EncodeArgs) -> Result<Vec<String>> {
    let mut declaration = Declaration::linkable(SelfConfig::new(&args.path, &args.identified_by));
    for (anchor, path) in &args.related {
        declaration = declaration.related(RelatedConfig::subordinate(anchor, path));
    }
    for (anchor, path) in &args.detached {
        declaration = declaration.related(RelatedConfig::detached(anchor, path));
    }
    for (key, value) in &args.values {
        declaration = declaration.value(key, value);
    }

    let metadata = compose([&declaration])?;
    if args.item {
        LinkEncoder::array(std::slice::from_ref(&metadata)).generate_links()
    } else {
        LinkEncoder::single(&metadata).generate_links()
    }
}
