//! Lazy-hook surface implemented by client-side entity types.
//!
//! An entity keeps its [`Resolver`] in a field skipped by serde and routes
//! each lazily loaded relation through [`init_field`] from its accessor:
//!
//! ```
//! use lazylink::{init_field, LazyEntity, Resolver, Result};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Parent {
//!     id: u32,
//!     #[serde(default)]
//!     children: Option<Vec<Child>>,
//!     #[serde(skip)]
//!     resolver: Option<Resolver>,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Child {
//!     id: u32,
//!     #[serde(skip)]
//!     resolver: Option<Resolver>,
//! }
//!
//! impl LazyEntity for Parent {
//!     fn identifier(&self) -> Option<String> {
//!         Some(self.id.to_string())
//!     }
//!     fn resolver(&self) -> Option<&Resolver> {
//!         self.resolver.as_ref()
//!     }
//!     fn set_resolver(&mut self, resolver: Resolver) {
//!         self.resolver = Some(resolver);
//!     }
//! }
//!
//! impl LazyEntity for Child {
//!     fn identifier(&self) -> Option<String> {
//!         Some(self.id.to_string())
//!     }
//!     fn resolver(&self) -> Option<&Resolver> {
//!         self.resolver.as_ref()
//!     }
//!     fn set_resolver(&mut self, resolver: Resolver) {
//!         self.resolver = Some(resolver);
//!     }
//! }
//!
//! impl Parent {
//!     fn children(&mut self) -> Result<Option<&Vec<Child>>> {
//!         init_field(self.resolver.as_ref(), "children", &mut self.children)?;
//!         Ok(self.children.as_ref())
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::correlate::Correlation;
use crate::entity_type::EntityType;
use crate::error::Result;
use crate::ports::Response;
use crate::resolve::Resolver;

/// Capability of an entity that can lazily resolve its relations.
pub trait LazyEntity {
    /// Correlation identifier matching this entity's item anchor in a
    /// collection response.
    fn identifier(&self) -> Option<String> {
        None
    }

    /// The attached resolver, if the entity came from a [`Client`].
    fn resolver(&self) -> Option<&Resolver>;

    /// Attaches a resolver.
    fn set_resolver(&mut self, resolver: Resolver);

    /// Declared payload type of the field behind `anchor`.
    fn field_type(&self, _anchor: &str) -> Option<EntityType> {
        None
    }

    /// Resolves `anchor` without static typing.
    ///
    /// The descriptor falls back to [`LazyEntity::field_type`]. Returns `None`
    /// when no resolver is attached.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve_dynamic`].
    fn resolve_field(&self, anchor: &str, descriptor: Option<EntityType>) -> Result<Option<Response>>
    where
        Self: Sized,
    {
        match self.resolver() {
            Some(resolver) => resolver.resolve_dynamic(anchor, descriptor, || self.field_type(anchor)),
            None => Ok(None),
        }
    }
}

/// A payload shape the client can fetch and wire resolvers into.
pub trait Fetchable: DeserializeOwned {
    /// Descriptor sent to the executor for this shape.
    fn entity_type() -> EntityType;

    /// Attaches a resolver to every entity of the payload.
    fn attach(&mut self, correlation: &Correlation, client: &Client);
}

impl<T> Fetchable for T
where
    T: LazyEntity + DeserializeOwned,
{
    fn entity_type() -> EntityType {
        EntityType::of::<T>()
    }

    fn attach(&mut self, correlation: &Correlation, client: &Client) {
        let links = correlation.links_for(self.identifier().as_deref());
        self.set_resolver(Resolver::new(client.clone(), links));
    }
}

impl<T> Fetchable for Vec<T>
where
    T: LazyEntity + DeserializeOwned,
{
    fn entity_type() -> EntityType {
        EntityType::list_of::<T>()
    }

    fn attach(&mut self, correlation: &Correlation, client: &Client) {
        for entity in self.iter_mut() {
            entity.attach(correlation, client);
        }
    }
}

impl<T> Fetchable for Option<T>
where
    T: LazyEntity + DeserializeOwned,
{
    fn entity_type() -> EntityType {
        EntityType::optional_of::<T>()
    }

    fn attach(&mut self, correlation: &Correlation, client: &Client) {
        if let Some(entity) = self {
            entity.attach(correlation, client);
        }
    }
}

/// Lazily fills a relation field from its anchor.
///
/// Does nothing when no resolver is attached. A field that already holds a
/// value only marks its anchor resolved; an empty field is resolved at most
/// once.
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn init_field<T: Fetchable>(
    resolver: Option<&Resolver>,
    anchor: &str,
    slot: &mut Option<T>,
) -> Result<()> {
    match resolver {
        Some(resolver) => resolver.init(anchor, slot),
        None => Ok(()),
    }
}
