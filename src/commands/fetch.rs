//! `lazylink fetch` command.

use serde_json::{json, Value};

use crate::client::Client;
use crate::context::ServiceContext;
use crate::correlate::{correlate, Shape};
use crate::entity_type::{EntityType, RawKind};
use crate::error::Result;
use crate::settings::Settings;

use super::correlate::to_json;

/// Descriptor name used for untyped payloads.
const JSON_TYPE: &str = "json";

/// Execute the `fetch` command with the executor stack from the environment.
///
/// # Errors
///
/// Returns an error string if settings are invalid or the fetch fails.
pub fn run(url: &str, multiple: bool) -> std::result::Result<(), String> {
    let settings = Settings::from_env().map_err(|e| e.to_string())?;
    let ctx = ServiceContext::from_settings(&settings).map_err(|e| e.to_string())?;

    let result = fetch(&ctx.client, url, multiple);

    // Write the cassette even when the fetch failed.
    if let Some(path) = ctx.finish().map_err(|e| e.to_string())? {
        eprintln!("Recording saved to: {}", path.display());
    }

    println!("{:#}", result.map_err(|e| e.to_string())?);
    Ok(())
}

/// Fetches `url` and pairs its payload with the correlated anchor maps.
///
/// # Errors
///
/// Propagates client and correlation errors.
pub fn fetch(client: &Client, url: &str, multiple: bool) -> Result<Value> {
    let entity_type = if multiple {
        EntityType::wrapping(RawKind::List, JSON_TYPE)
    } else {
        EntityType::named(JSON_TYPE)
    };

    let response = client.fetch(&entity_type, url)?;
    if response.body.is_null() {
        return Ok(json!({ "body": null, "links": {} }));
    }
    let correlation = correlate(&response.links, Shape::of(&entity_type))?;
    Ok(json!({ "body": response.body, "links": to_json(&correlation) }))
}
