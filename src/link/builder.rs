//! Builds self, item and related links from metadata templates.

use std::sync::LazyLock;

use regex::Regex;

use super::{Link, Rel};
use crate::error::{Error, Result};
use crate::metadata::{RelatedConfig, SelfConfig, Substitutions};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("placeholder pattern is valid"));

/// Accumulates one link's template before placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    rel: Rel,
    anchor: Option<String>,
    url: String,
}

impl LinkBuilder {
    fn start(rel: Rel, anchor: Option<String>) -> Self {
        Self { rel, anchor, url: String::new() }
    }

    /// Self link of a single-entity response.
    #[must_use]
    pub fn self_link(config: &SelfConfig) -> Self {
        Self::start(Rel::SelfLink, None).append_path(&config.path)
    }

    /// Item link of an entity inside a collection or array response.
    #[must_use]
    pub fn item(config: &SelfConfig) -> Self {
        Self::start(Rel::Item, Some(format!("#@{}", config.identified_by))).append_path(&config.path)
    }

    /// Related link of the entity described by `base`.
    ///
    /// The anchor is chained onto the owner's URL unless the owner is a self
    /// link, so relations of different items stay distinguishable.
    #[must_use]
    pub fn related(config: &RelatedConfig, base: &LinkBuilder) -> Self {
        let mut anchor = format!("#{}", config.anchor);
        if base.rel != Rel::SelfLink {
            anchor.insert_str(0, &base.url);
        }

        let mut builder = Self::start(Rel::Related, Some(anchor));
        if config.subordinate {
            builder = builder.append_path(&base.url);
        }
        builder.append_path(&config.path)
    }

    /// Relation kind of the link being built.
    #[must_use]
    pub fn rel(&self) -> Rel {
        self.rel
    }

    /// URL template accumulated so far.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn append_path(mut self, path: &str) -> Self {
        if !path.starts_with('/') {
            self.url.push('/');
        }
        self.url.push_str(path);
        if path.ends_with('/') {
            self.url.pop();
        }
        self
    }

    /// Substitutes every placeholder and returns the finished link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSubstitution`] if a placeholder has no value.
    pub fn build(&self, substitutions: &Substitutions) -> Result<Link> {
        let template = Link::new(self.rel, self.url.clone(), self.anchor.clone()).to_string();
        let url = substitute(&self.url, substitutions, &template)?;
        let anchor =
            self.anchor.as_deref().map(|a| substitute(a, substitutions, &template)).transpose()?;
        Ok(Link::new(self.rel, url, anchor))
    }
}

/// Replaces `@name` placeholders in `input` with values from `substitutions`.
fn substitute(input: &str, substitutions: &Substitutions, template: &str) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(input) {
        let whole = captures.get(0).expect("group 0 always matches");
        let key = &captures[1];
        let value = substitutions.get(key).ok_or_else(|| Error::MissingSubstitution {
            key: key.to_string(),
            template: template.to_string(),
        })?;
        output.push_str(&input[last..whole.start()]);
        output.push_str(value);
        last = whole.end();
    }
    output.push_str(&input[last..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linkable() -> SelfConfig {
        SelfConfig::new("/tests/@id", "id")
    }

    fn tasks() -> RelatedConfig {
        RelatedConfig::new("tasks", "/tasks", true)
    }

    fn subs() -> Substitutions {
        Substitutions::new().with("id", "4567")
    }

    #[test]
    fn build_self() {
        let link = LinkBuilder::self_link(&linkable()).build(&subs()).unwrap();
        assert_eq!(link.to_string(), "</tests/4567>; rel=\"self\"");
    }

    #[test]
    fn build_item() {
        let link = LinkBuilder::item(&linkable()).build(&subs()).unwrap();
        assert_eq!(link.to_string(), "</tests/4567>; rel=\"item\"; anchor=\"#4567\"");
    }

    #[test]
    fn build_related_by_item() {
        let link = LinkBuilder::related(&tasks(), &LinkBuilder::item(&linkable()))
            .build(&subs())
            .unwrap();
        assert_eq!(
            link.to_string(),
            "</tests/4567/tasks>; rel=\"related\"; anchor=\"/tests/4567#tasks\""
        );
    }

    #[test]
    fn build_related_by_self() {
        let link = LinkBuilder::related(&tasks(), &LinkBuilder::self_link(&linkable()))
            .build(&subs())
            .unwrap();
        assert_eq!(link.to_string(), "</tests/4567/tasks>; rel=\"related\"; anchor=\"#tasks\"");
    }

    #[test]
    fn detached_relation_uses_own_path_only() {
        let config = RelatedConfig::detached("friends", "/friends?person=@id");
        let link = LinkBuilder::related(&config, &LinkBuilder::item(&linkable()))
            .build(&subs())
            .unwrap();
        assert_eq!(link.url, "/friends?person=4567");
        assert_eq!(link.anchor.as_deref(), Some("/tests/4567#friends"));
    }

    #[test]
    fn paths_are_normalized() {
        let config = SelfConfig::new("tests/@id/", "id");
        let link = LinkBuilder::self_link(&config).build(&subs()).unwrap();
        assert_eq!(link.url, "/tests/4567");

        let related = RelatedConfig::subordinate("tasks", "tasks/");
        let link = LinkBuilder::related(&related, &LinkBuilder::self_link(&config))
            .build(&subs())
            .unwrap();
        assert_eq!(link.url, "/tests/4567/tasks");
    }

    #[test]
    fn missing_substitution_fails() {
        let err = LinkBuilder::self_link(&linkable()).build(&Substitutions::new()).unwrap_err();
        match err {
            Error::MissingSubstitution { key, template } => {
                assert_eq!(key, "id");
                assert!(template.contains("/tests/@id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn placeholders_in_anchor_are_substituted() {
        let config = RelatedConfig::subordinate("@kind", "/@kind");
        let link = LinkBuilder::related(&config, &LinkBuilder::self_link(&linkable()))
            .build(&subs().with("kind", "notes"))
            .unwrap();
        assert_eq!(link.to_string(), "</tests/4567/notes>; rel=\"related\"; anchor=\"#notes\"");
    }

    #[test]
    fn substituted_values_are_encoded() {
        let config = SelfConfig::new("/people/@name", "name");
        let link = LinkBuilder::self_link(&config)
            .build(&Substitutions::new().with("name", "Jane Doe"))
            .unwrap();
        assert_eq!(link.url, "/people/Jane+Doe");
    }
}
