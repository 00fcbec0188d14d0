//! `lazylink correlate` command.

use std::collections::BTreeMap;
use std::io::Read;

use serde_json::Value;

use crate::correlate::{correlate, AnchorMap, Correlation, Shape};
use crate::error::Result;
use crate::link::split_header;

/// Execute the `correlate` command over the links on stdin.
///
/// # Errors
///
/// Returns an error string if stdin cannot be read or the links are ambiguous.
pub fn run(multiple: bool) -> std::result::Result<(), String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    let output = correlate_input(&input, multiple).map_err(|e| e.to_string())?;
    println!("{output:#}");
    Ok(())
}

/// Correlates links given one per line, or comma-joined as in a header.
///
/// # Errors
///
/// See [`correlate`].
pub fn correlate_input(input: &str, multiple: bool) -> Result<Value> {
    let links: Vec<String> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(split_header)
        .collect();
    let shape = if multiple { Shape::Multiple } else { Shape::Single };
    Ok(to_json(&correlate(&links, shape)?))
}

/// Renders a correlation with sorted keys.
#[must_use]
pub fn to_json(correlation: &Correlation) -> Value {
    fn sorted(map: &AnchorMap) -> BTreeMap<&str, &str> {
        map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    match correlation {
        Correlation::Single(map) => serde_json::json!(sorted(map)),
        Correlation::Items(items) => {
            let items: BTreeMap<&str, BTreeMap<&str, &str>> =
                items.iter().map(|(id, map)| (id.as_str(), sorted(map))).collect();
            serde_json::json!(items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_entity_links() {
        let input = "</1>; rel=\"self\"\n</1/children>; rel=\"related\"; anchor=\"#children\"\n\n";
        assert_eq!(correlate_input(input, false).unwrap(), json!({"children": "/1/children"}));
    }

    #[test]
    fn header_style_input_is_split() {
        let input = "</1>; rel=\"item\"; anchor=\"#1\", </1/c>; rel=\"related\"; anchor=\"/1#c\"\n</2>; rel=\"item\"; anchor=\"#2\"";
        assert_eq!(
            correlate_input(input, true).unwrap(),
            json!({"1": {"c": "/1/c"}, "2": {}})
        );
    }

    #[test]
    fn duplicate_items_are_an_error() {
        let input = "</1>; rel=\"item\"; anchor=\"#1\"\n</2>; rel=\"item\"; anchor=\"#1\"";
        assert!(correlate_input(input, true).is_err());
    }
}
