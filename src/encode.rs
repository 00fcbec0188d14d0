//! Server-side link generation for entities, arrays and collections.
//!
//! A single entity yields a `self` link plus its related links. Every entity
//! of an array or collection yields an `item` link plus related links whose
//! anchors are chained onto the item's URL. Links are always relative with a
//! leading `/` and no trailing one; adding scheme and host is up to the caller.

use tracing::{debug, warn};

use crate::error::Result;
use crate::link::{Link, LinkBuilder};
use crate::metadata::{EntityMetadata, RelatedConfig, SelfConfig, Substitutions};

/// Capability of an entity type that can be encoded into links.
pub trait Linkable {
    /// Self path template and identifying key.
    fn self_config(&self) -> SelfConfig;

    /// Declared relations, in declaration order.
    fn relations(&self) -> Vec<RelatedConfig> {
        Vec::new()
    }

    /// Placeholder values of this instance.
    fn substitutions(&self) -> Substitutions;
}

impl Linkable for EntityMetadata {
    fn self_config(&self) -> SelfConfig {
        self.self_config.clone()
    }

    fn relations(&self) -> Vec<RelatedConfig> {
        self.relations.clone()
    }

    fn substitutions(&self) -> Substitutions {
        self.substitutions.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Single,
    Array,
    Collection,
}

/// Generates the links of one encodable value.
pub struct LinkEncoder<'a> {
    strategy: Strategy,
    entities: Vec<&'a dyn Linkable>,
}

impl<'a> LinkEncoder<'a> {
    /// Encoder for a single entity.
    pub fn single<T: Linkable>(entity: &'a T) -> Self {
        Self { strategy: Strategy::Single, entities: vec![entity] }
    }

    /// Encoder for an array of entities. An empty array yields no links.
    pub fn array<T: Linkable>(entities: &'a [T]) -> Self {
        Self {
            strategy: Strategy::Array,
            entities: entities.iter().map(|e| e as &dyn Linkable).collect(),
        }
    }

    /// Encoder for a collection of entities.
    ///
    /// Returns `None` and logs a warning when the collection is empty, since
    /// there is no element to encode.
    pub fn collection<T, I>(entities: I) -> Option<Self>
    where
        T: Linkable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let entities: Vec<&'a dyn Linkable> =
            entities.into_iter().map(|e| e as &dyn Linkable).collect();
        if entities.is_empty() {
            warn!(
                type_name = std::any::type_name::<T>(),
                "skipping link generation: collection is empty"
            );
            return None;
        }
        Some(Self { strategy: Strategy::Collection, entities })
    }

    /// Encoder for an optional entity.
    ///
    /// Returns `None` and logs a warning when there is no value.
    pub fn optional<T: Linkable>(entity: Option<&'a T>) -> Option<Self> {
        if entity.is_none() {
            warn!(type_name = std::any::type_name::<T>(), "skipping link generation: no value");
        }
        entity.map(Self::single)
    }

    /// Generates all links, rendered in wire format.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingSubstitution`] if a template references a
    /// value the entity does not provide. Encoding aborts at the first failure.
    pub fn generate_links(&self) -> Result<Vec<String>> {
        Ok(self.generate()?.iter().map(ToString::to_string).collect())
    }

    /// Generates all links as [`Link`] values.
    ///
    /// # Errors
    ///
    /// See [`LinkEncoder::generate_links`].
    pub fn generate(&self) -> Result<Vec<Link>> {
        let start: fn(&SelfConfig) -> LinkBuilder = match self.strategy {
            Strategy::Single => LinkBuilder::self_link,
            Strategy::Array | Strategy::Collection => LinkBuilder::item,
        };

        let mut links = Vec::new();
        for entity in &self.entities {
            links.extend(process(*entity, start)?);
        }
        debug!(strategy = ?self.strategy, count = links.len(), "generated links");
        Ok(links)
    }
}

fn process(entity: &dyn Linkable, start: fn(&SelfConfig) -> LinkBuilder) -> Result<Vec<Link>> {
    let owner = start(&entity.self_config());
    let substitutions = entity.substitutions();

    std::iter::once(owner.clone())
        .chain(entity.relations().iter().map(|rel| LinkBuilder::related(rel, &owner)))
        .map(|builder| builder.build(&substitutions))
        .collect()
}
