//! Per-entity resolution state.
//!
//! Each anchor starts unseen and becomes resolved on its first resolution
//! attempt, whether or not a link exists and whether or not the fetch
//! succeeds. Only the first attempt on an anchor with a link fetches.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::client::Client;
use crate::correlate::AnchorMap;
use crate::entity::Fetchable;
use crate::entity_type::EntityType;
use crate::error::{Error, Result};
use crate::ports::Response;

/// Lazy resolver attached to exactly one entity instance.
pub struct Resolver {
    client: Client,
    links: AnchorMap,
    resolved: Mutex<HashSet<String>>,
}

impl Resolver {
    /// Creates a resolver over a complete anchor map.
    #[must_use]
    pub fn new(client: Client, links: AnchorMap) -> Self {
        Self { client, links, resolved: Mutex::new(HashSet::new()) }
    }

    /// Marks `anchor` resolved without fetching.
    ///
    /// Returns `true` if the anchor was not resolved before.
    pub fn mark_resolved(&self, anchor: &str) -> bool {
        self.resolved.lock().unwrap_or_else(PoisonError::into_inner).insert(anchor.to_string())
    }

    /// Whether `anchor` has been resolved.
    #[must_use]
    pub fn is_resolved(&self, anchor: &str) -> bool {
        self.resolved.lock().unwrap_or_else(PoisonError::into_inner).contains(anchor)
    }

    /// URL recorded for `anchor`, if any.
    #[must_use]
    pub fn link(&self, anchor: &str) -> Option<&str> {
        self.links.get(anchor).map(String::as_str)
    }

    /// Every anchor this resolver knows a link for.
    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    /// Marks `anchor` resolved and returns its URL if this call is the one
    /// that must fetch it.
    fn claim(&self, anchor: &str) -> Option<&str> {
        let first = self.mark_resolved(anchor);
        let Some(url) = self.link(anchor) else {
            debug!(anchor, "no link for anchor");
            return None;
        };
        if !first {
            debug!(anchor, "anchor already resolved");
            return None;
        }
        Some(url)
    }

    /// Resolves `anchor` as `T`, with the descriptor inferred from `T`.
    ///
    /// # Errors
    ///
    /// Propagates any [`Client::get`] error; the anchor stays resolved.
    pub fn resolve<T: Fetchable>(&self, anchor: &str) -> Result<Option<T>> {
        self.resolve_as(anchor, &T::entity_type())
    }

    /// Resolves `anchor` as `T`, sending the given descriptor to the executor.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn resolve_as<T: Fetchable>(&self, anchor: &str, entity_type: &EntityType) -> Result<Option<T>> {
        match self.claim(anchor) {
            Some(url) => self.client.get_as(entity_type, url),
            None => Ok(None),
        }
    }

    /// Resolves `anchor` without static typing, returning the raw response.
    ///
    /// The descriptor falls back to `context`, the type declared by the
    /// accessor that triggered resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTypeContext`] if a fetch is due but neither a
    /// descriptor nor a context type is available; otherwise propagates
    /// [`Client::fetch`] errors. The anchor stays resolved in every case.
    pub fn resolve_dynamic<F>(
        &self,
        anchor: &str,
        descriptor: Option<EntityType>,
        context: F,
    ) -> Result<Option<Response>>
    where
        F: FnOnce() -> Option<EntityType>,
    {
        let Some(url) = self.claim(anchor) else {
            return Ok(None);
        };
        let entity_type = descriptor
            .or_else(context)
            .ok_or_else(|| Error::MissingTypeContext { anchor: anchor.to_string() })?;
        self.client.fetch(&entity_type, url).map(Some)
    }

    /// Fills `slot` from `anchor` unless it already holds a value.
    ///
    /// A present value only marks the anchor resolved.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn init<T: Fetchable>(&self, anchor: &str, slot: &mut Option<T>) -> Result<()> {
        if slot.is_some() {
            self.mark_resolved(anchor);
            return Ok(());
        }
        *slot = self.resolve(anchor)?;
        Ok(())
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Resolver").field("links", &self.links).field("resolved", &*resolved).finish()
    }
}
