//! Correlates a response's link pool back to the entities it describes.
//!
//! For a single-entity response every related link belongs to that entity.
//! For array and collection responses each `item` link names one entity by
//! its anchor, and related links are assigned to it by matching their anchor
//! against the item's URL followed by `#`.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::entity_type::EntityType;
use crate::error::{Error, Result};
use crate::link::{Link, Rel};

/// Relation name to related resource URL, for one entity.
pub type AnchorMap = HashMap<String, String>;

/// Whether a response carries one entity or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single entity.
    Single,
    /// An array or collection of entities.
    Multiple,
}

impl Shape {
    /// Shape of a payload of the given type.
    #[must_use]
    pub fn of(entity_type: &EntityType) -> Self {
        if entity_type.has_multiple() {
            Self::Multiple
        } else {
            Self::Single
        }
    }
}

/// Anchor maps of every entity in one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// The single entity's anchor map.
    Single(AnchorMap),
    /// Anchor maps keyed by item anchor.
    Items(HashMap<String, AnchorMap>),
}

impl Correlation {
    /// Anchor map for the entity with the given correlation identifier.
    ///
    /// Single-entity correlations ignore the identifier. For many entities an
    /// entity without an identifier, or one not named by any item link, gets
    /// an empty map.
    #[must_use]
    pub fn links_for(&self, identifier: Option<&str>) -> AnchorMap {
        match self {
            Self::Single(map) => map.clone(),
            Self::Items(items) => {
                let Some(identifier) = identifier else {
                    warn!("entity has no correlation identifier; lazy resolution is disabled");
                    return AnchorMap::new();
                };
                items.get(identifier).cloned().unwrap_or_else(|| {
                    debug!(identifier, "no item link for entity");
                    AnchorMap::new()
                })
            }
        }
    }

    /// Number of anchor maps produced.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Items(items) => items.len(),
        }
    }

    /// `true` when no entity received an anchor map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Correlates the link pool of one response.
///
/// Links that do not follow the wire grammar are skipped with a warning.
///
/// # Errors
///
/// Returns [`Error::DuplicateItem`] if two item links share an anchor or a
/// URL, since their relations could not be told apart.
pub fn correlate<S: AsRef<str>>(links: &[S], shape: Shape) -> Result<Correlation> {
    let parsed: Vec<Link> = links.iter().filter_map(|raw| parse_or_skip(raw.as_ref())).collect();

    match shape {
        Shape::Single => Ok(Correlation::Single(correlate_single(&parsed))),
        Shape::Multiple => correlate_items(&parsed).map(Correlation::Items),
    }
}

fn parse_or_skip(raw: &str) -> Option<Link> {
    match raw.parse::<Link>() {
        Ok(link) => Some(link),
        Err(err) => {
            warn!(%err, "skipping malformed link");
            None
        }
    }
}

fn related(links: &[Link]) -> impl Iterator<Item = &Link> {
    links.iter().filter(|l| l.rel == Rel::Related)
}

fn correlate_single(links: &[Link]) -> AnchorMap {
    let mut map = AnchorMap::new();
    for link in related(links) {
        match link.anchor_name() {
            Some(name) => insert_first(&mut map, name, &link.url),
            None => warn!(url = %link.url, "related link without anchor"),
        }
    }
    map
}

fn correlate_items(links: &[Link]) -> Result<HashMap<String, AnchorMap>> {
    let mut items: HashMap<String, AnchorMap> = HashMap::new();
    let mut item_urls: HashMap<&str, &str> = HashMap::new();

    for item in links.iter().filter(|l| l.rel == Rel::Item) {
        let Some(anchor) = item.anchor_name() else {
            warn!(url = %item.url, "item link without anchor");
            continue;
        };
        if items.contains_key(anchor) {
            return Err(Error::DuplicateItem { anchor: anchor.to_string() });
        }
        if item_urls.insert(item.url.as_str(), anchor).is_some() {
            return Err(Error::DuplicateItem { anchor: item.url.clone() });
        }

        let prefix = format!("{}#", item.url);
        let mut map = AnchorMap::new();
        for link in related(links) {
            if let Some(name) = link.anchor.as_deref().and_then(|a| a.strip_prefix(&prefix)) {
                insert_first(&mut map, name, &link.url);
            }
        }
        items.insert(anchor.to_string(), map);
    }

    Ok(items)
}

fn insert_first(map: &mut AnchorMap, name: &str, url: &str) {
    if map.contains_key(name) {
        warn!(anchor = name, url, "duplicate relation anchor; keeping the first link");
        return;
    }
    map.insert(name.to_string(), url.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> AnchorMap {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn single_shape_collects_all_related_links() {
        let links = [
            "<http://dummy/1>; rel=\"self\"",
            "<http://dummy/1/children>; rel=\"related\"; anchor=\"#children\"",
            "<http://dummy/owners/3>; rel=\"related\"; anchor=\"#owner\"",
        ];

        let correlation = correlate(&links, Shape::Single).unwrap();

        assert_eq!(
            correlation,
            Correlation::Single(map(&[
                ("children", "http://dummy/1/children"),
                ("owner", "http://dummy/owners/3"),
            ]))
        );
        assert_eq!(correlation.links_for(None).len(), 2);
    }

    #[test]
    fn multiple_shape_keeps_items_apart() {
        let links = [
            "<http://dummy/1>; rel=\"item\"; anchor=\"#1\"",
            "<http://dummy/1/children>; rel=\"related\"; anchor=\"http://dummy/1#children\"",
            "<http://dummy/2>; rel=\"item\"; anchor=\"#2\"",
            "<http://dummy/2/children>; rel=\"related\"; anchor=\"http://dummy/2#children\"",
        ];

        let correlation = correlate(&links, Shape::Multiple).unwrap();

        assert_eq!(correlation.len(), 2);
        assert_eq!(
            correlation.links_for(Some("1")),
            map(&[("children", "http://dummy/1/children")])
        );
        assert_eq!(
            correlation.links_for(Some("2")),
            map(&[("children", "http://dummy/2/children")])
        );
    }

    #[test]
    fn url_prefix_match_is_exact() {
        // "/a/1" must not claim the relations of "/a/10".
        let links = [
            "</a/1>; rel=\"item\"; anchor=\"#1\"",
            "</a/10>; rel=\"item\"; anchor=\"#10\"",
            "</a/10/x>; rel=\"related\"; anchor=\"/a/10#x\"",
            "</A/1/y>; rel=\"related\"; anchor=\"/A/1#y\"",
        ];

        let correlation = correlate(&links, Shape::Multiple).unwrap();

        assert!(correlation.links_for(Some("1")).is_empty());
        assert_eq!(correlation.links_for(Some("10")), map(&[("x", "/a/10/x")]));
    }

    #[test]
    fn items_without_relations_get_empty_maps() {
        let links = ["</a/1>; rel=\"item\"; anchor=\"#1\"", "</a/2>; rel=\"item\"; anchor=\"#2\""];
        let correlation = correlate(&links, Shape::Multiple).unwrap();
        assert_eq!(correlation.len(), 2);
        assert!(correlation.links_for(Some("2")).is_empty());
    }

    #[test]
    fn missing_identifier_gets_empty_map() {
        let links = ["</a/1>; rel=\"item\"; anchor=\"#1\"", "</a/1/b>; rel=\"related\"; anchor=\"/a/1#b\""];
        let correlation = correlate(&links, Shape::Multiple).unwrap();
        assert!(correlation.links_for(None).is_empty());
        assert!(correlation.links_for(Some("unknown")).is_empty());
    }

    #[test]
    fn duplicate_item_anchor_is_rejected() {
        let links = ["</a/1>; rel=\"item\"; anchor=\"#1\"", "</b/1>; rel=\"item\"; anchor=\"#1\""];
        let err = correlate(&links, Shape::Multiple).unwrap_err();
        assert!(matches!(err, Error::DuplicateItem { ref anchor } if anchor == "1"));
    }

    #[test]
    fn duplicate_item_url_is_rejected() {
        let links = ["</a/1>; rel=\"item\"; anchor=\"#1\"", "</a/1>; rel=\"item\"; anchor=\"#2\""];
        let err = correlate(&links, Shape::Multiple).unwrap_err();
        assert!(matches!(err, Error::DuplicateItem { ref anchor } if anchor == "/a/1"));
    }

    #[test]
    fn malformed_links_are_skipped() {
        let links = ["garbage", "</a/b>; rel=\"related\"; anchor=\"#b\""];
        let correlation = correlate(&links, Shape::Single).unwrap();
        assert_eq!(correlation.links_for(None), map(&[("b", "/a/b")]));
    }

    #[test]
    fn shape_follows_entity_type() {
        assert_eq!(Shape::of(&EntityType::list_of::<u8>()), Shape::Multiple);
        assert_eq!(Shape::of(&EntityType::array_of::<u8>()), Shape::Multiple);
        assert_eq!(Shape::of(&EntityType::of::<u8>()), Shape::Single);
        assert_eq!(Shape::of(&EntityType::optional_of::<u8>()), Shape::Single);
    }
}
