//! Per-type link metadata: self path, declared relations and substitution values.
//!
//! Entity types describe themselves with [`Declaration`]s. A type that extends
//! another composes its ancestors' declarations with its own via [`compose`],
//! which yields the effective [`EntityMetadata`] used by the encoder.

use std::collections::BTreeMap;
use std::fmt::Display;

use url::form_urlencoded;

use crate::error::{Error, Result};

/// Canonical path template of an entity and the key that identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfConfig {
    /// Relative path template, e.g. `/persons/@id`.
    pub path: String,
    /// Substitution key naming the entity inside a collection response.
    pub identified_by: String,
}

impl SelfConfig {
    /// Creates a self configuration.
    pub fn new(path: impl Into<String>, identified_by: impl Into<String>) -> Self {
        Self { path: path.into(), identified_by: identified_by.into() }
    }
}

/// One declared relation of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedConfig {
    /// Relation name, used as the anchor.
    pub anchor: String,
    /// Path template of the related resource.
    pub path: String,
    /// Whether `path` is appended to the owning entity's URL.
    pub subordinate: bool,
}

impl RelatedConfig {
    /// Creates a relation. An empty `path` falls back to the anchor name.
    pub fn new(anchor: impl Into<String>, path: impl Into<String>, subordinate: bool) -> Self {
        let anchor = anchor.into();
        let path = path.into();
        let path = if path.trim().is_empty() { anchor.clone() } else { path };
        Self { anchor, path, subordinate }
    }

    /// A relation whose path is appended to the owner's URL.
    pub fn subordinate(anchor: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(anchor, path, true)
    }

    /// A relation whose path stands on its own.
    pub fn detached(anchor: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(anchor, path, false)
    }
}

/// Placeholder values for one entity instance, stored form-url-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    /// Creates an empty substitution map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, rendering it with `Display` and encoding it for URLs.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        let encoded: String = form_urlencoded::byte_serialize(value.to_string().as_bytes()).collect();
        self.values.insert(key.into(), encoded);
    }

    /// Returns the encoded value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no values are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copies every value of `other` into `self`, overriding existing keys.
    pub fn merge(&mut self, other: &Substitutions) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}

/// Link metadata declared directly on one type, without its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    /// Self configuration, if this type declares one.
    pub self_config: Option<SelfConfig>,
    /// Relations declared on this type, in declaration order.
    pub relations: Vec<RelatedConfig>,
    /// Substitution values contributed by this type.
    pub substitutions: Substitutions,
}

impl Declaration {
    /// Starts a declaration carrying a self configuration.
    #[must_use]
    pub fn linkable(self_config: SelfConfig) -> Self {
        Self { self_config: Some(self_config), ..Self::default() }
    }

    /// Starts a declaration that only contributes relations or values.
    #[must_use]
    pub fn partial() -> Self {
        Self::default()
    }

    /// Appends a relation.
    #[must_use]
    pub fn related(mut self, config: RelatedConfig) -> Self {
        self.relations.push(config);
        self
    }

    /// Adds a substitution value.
    #[must_use]
    pub fn value(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.substitutions.insert(key, value);
        self
    }
}

/// Effective link metadata of one entity instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    /// Self configuration.
    pub self_config: SelfConfig,
    /// Relations, ancestors first.
    pub relations: Vec<RelatedConfig>,
    /// Substitution values, closer declarations overriding outer ones.
    pub substitutions: Substitutions,
}

/// Folds declarations outermost-first into effective metadata.
///
/// Relations are concatenated in order, substitution values of later
/// declarations override earlier ones, and the last declared self
/// configuration wins.
///
/// # Errors
///
/// Returns [`Error::MissingSelfConfig`] if no declaration carries a self
/// configuration.
pub fn compose<'a, I>(declarations: I) -> Result<EntityMetadata>
where
    I: IntoIterator<Item = &'a Declaration>,
{
    let mut self_config = None;
    let mut relations = Vec::new();
    let mut substitutions = Substitutions::new();

    for declaration in declarations {
        if let Some(config) = &declaration.self_config {
            self_config = Some(config.clone());
        }
        relations.extend(declaration.relations.iter().cloned());
        substitutions.merge(&declaration.substitutions);
    }

    let self_config = self_config.ok_or(Error::MissingSelfConfig)?;
    Ok(EntityMetadata { self_config, relations, substitutions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_related_path_falls_back_to_anchor() {
        let config = RelatedConfig::subordinate("friends", "");
        assert_eq!(config.path, "friends");
        assert!(config.subordinate);
    }

    #[test]
    fn substitution_values_are_form_encoded() {
        let subs = Substitutions::new().with("name", "Jane Doe").with("q", "a/b&c").with("id", 42);
        assert_eq!(subs.get("name"), Some("Jane+Doe"));
        assert_eq!(subs.get("q"), Some("a%2Fb%26c"));
        assert_eq!(subs.get("id"), Some("42"));
        assert_eq!(subs.len(), 3);
    }

    #[test]
    fn compose_appends_relations_ancestor_first() {
        let base = Declaration::linkable(SelfConfig::new("/people/@id", "id"))
            .related(RelatedConfig::subordinate("friends", "/friends"))
            .value("id", 1);
        let child = Declaration::partial()
            .related(RelatedConfig::detached("employer", "/companies/@company"))
            .value("company", "acme");

        let metadata = compose([&base, &child]).unwrap();

        let anchors: Vec<_> = metadata.relations.iter().map(|r| r.anchor.as_str()).collect();
        assert_eq!(anchors, ["friends", "employer"]);
        assert_eq!(metadata.self_config.path, "/people/@id");
        assert_eq!(metadata.substitutions.get("id"), Some("1"));
        assert_eq!(metadata.substitutions.get("company"), Some("acme"));
    }

    #[test]
    fn compose_lets_closer_declarations_override() {
        let base = Declaration::linkable(SelfConfig::new("/people/@id", "id")).value("id", 1);
        let child = Declaration::linkable(SelfConfig::new("/employees/@id", "id")).value("id", 2);

        let metadata = compose([&base, &child]).unwrap();

        assert_eq!(metadata.self_config.path, "/employees/@id");
        assert_eq!(metadata.substitutions.get("id"), Some("2"));
    }

    #[test]
    fn compose_without_self_config_fails() {
        let only = Declaration::partial().value("id", 1);
        assert!(matches!(compose([&only]), Err(Error::MissingSelfConfig)));
    }
}
