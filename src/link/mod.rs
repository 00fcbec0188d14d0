//! Link data unit and its wire grammar.
//!
//! A link renders as `<url>; rel="kind"` optionally followed by
//! `; anchor="[owner-url]#name"`. Parsing is whitespace-insensitive around
//! `;` and accepts parameters in any order.

pub mod builder;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub use builder::LinkBuilder;

/// Role a link plays relative to its owning entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rel {
    /// The entity of a single-entity response.
    SelfLink,
    /// One entity inside a collection or array response.
    Item,
    /// A relation of the owning entity.
    Related,
}

impl Rel {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfLink => "self",
            Self::Item => "item",
            Self::Related => "related",
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Self::SelfLink),
            "item" => Ok(Self::Item),
            "related" => Ok(Self::Related),
            other => Err(format!("unknown relation kind {other:?}")),
        }
    }
}

/// An encoded relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    /// Relation kind.
    pub rel: Rel,
    /// Target URL.
    pub url: String,
    /// Anchor value, `[owner-url]#name`.
    pub anchor: Option<String>,
}

impl Link {
    /// Creates a link.
    pub fn new(rel: Rel, url: impl Into<String>, anchor: Option<String>) -> Self {
        Self { rel, url: url.into(), anchor }
    }

    /// The text after the first `#` of the anchor.
    #[must_use]
    pub fn anchor_name(&self) -> Option<&str> {
        self.anchor.as_deref().and_then(|a| a.split_once('#')).map(|(_, name)| name)
    }

    /// The text before the first `#` of the anchor; empty for unchained anchors.
    #[must_use]
    pub fn anchor_owner(&self) -> Option<&str> {
        self.anchor.as_deref().and_then(|a| a.split_once('#')).map(|(owner, _)| owner)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>; rel=\"{}\"", self.url, self.rel)?;
        if let Some(anchor) = &self.anchor {
            write!(f, "; anchor=\"{anchor}\"")?;
        }
        Ok(())
    }
}

impl FromStr for Link {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidLink { link: s.to_string(), reason: reason.into() };

        let trimmed = s.trim();
        let rest = trimmed.strip_prefix('<').ok_or_else(|| invalid("missing '<'"))?;
        let (url, params) = rest.split_once('>').ok_or_else(|| invalid("missing '>'"))?;

        let mut rel = None;
        let mut anchor = None;
        for param in split_outside_quotes(params, ';') {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (key, value) = param.split_once('=').ok_or_else(|| invalid("parameter without '='"))?;
            let value = unquote(value.trim());
            match key.trim() {
                "rel" => rel = Some(value.parse::<Rel>().map_err(|reason| invalid(&reason))?),
                "anchor" => anchor = Some(value.to_string()),
                _ => {}
            }
        }

        let rel = rel.ok_or_else(|| invalid("missing rel parameter"))?;
        Ok(Self { rel, url: url.trim().to_string(), anchor })
    }
}

/// Splits a Link header value holding several comma-separated links.
#[must_use]
pub fn split_header(value: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_url = false;

    for c in value.chars() {
        match c {
            '"' if !in_url => in_quotes = !in_quotes,
            '<' if !in_quotes => in_url = true,
            '>' if !in_quotes => in_url = false,
            ',' if !in_quotes && !in_url => {
                push_trimmed(&mut links, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    push_trimmed(&mut links, &current);
    links
}

fn push_trimmed(links: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if !candidate.is_empty() {
        links.push(candidate.to_string());
    }
}

fn split_outside_quotes(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in input.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == separator && !in_quotes {
            parts.push(&input[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unquote(value: &str) -> &str {
    value.strip_prefix('"').and_then(|v| v.strip_suffix('"')).unwrap_or(value)
}
