//! Descriptor of a requested payload shape.
//!
//! The request executor uses an [`EntityType`] to decide how to deserialize
//! a response and whether to expect one value or many.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outer shape of a requested payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawKind {
    /// A plain value type, by name.
    Named(String),
    /// A fixed sequence of elements.
    Array,
    /// An ordered collection.
    List,
    /// An unordered collection of distinct elements.
    Set,
    /// Zero or one element.
    Optional,
}

/// Describes the payload type requested from the executor.
///
/// Two descriptors are equal iff their raw and element kinds are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityType {
    raw: RawKind,
    element: Option<String>,
}

impl EntityType {
    /// A plain value type with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { raw: RawKind::Named(name.into()), element: None }
    }

    /// A shape wrapping elements of the given type name.
    pub fn wrapping(raw: RawKind, element: impl Into<String>) -> Self {
        match raw {
            RawKind::Named(name) => Self::named(name),
            raw => Self { raw, element: Some(element.into()) },
        }
    }

    /// The value type `T`.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    /// An array of `T`.
    #[must_use]
    pub fn array_of<T>() -> Self {
        Self::wrapping(RawKind::Array, std::any::type_name::<T>())
    }

    /// A list of `T`.
    #[must_use]
    pub fn list_of<T>() -> Self {
        Self::wrapping(RawKind::List, std::any::type_name::<T>())
    }

    /// A set of `T`.
    #[must_use]
    pub fn set_of<T>() -> Self {
        Self::wrapping(RawKind::Set, std::any::type_name::<T>())
    }

    /// An optional `T`.
    #[must_use]
    pub fn optional_of<T>() -> Self {
        Self::wrapping(RawKind::Optional, std::any::type_name::<T>())
    }

    /// Outer shape.
    #[must_use]
    pub fn raw_kind(&self) -> &RawKind {
        &self.raw
    }

    /// Element type name of wrapping shapes.
    #[must_use]
    pub fn element_kind(&self) -> Option<&str> {
        self.element.as_deref()
    }

    /// The type of the individual entities this shape carries.
    #[must_use]
    pub fn entity_kind(&self) -> &str {
        match (&self.raw, &self.element) {
            (RawKind::Named(name), _) => name,
            (_, Some(element)) => element,
            (_, None) => "",
        }
    }

    /// `true` for arrays.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.raw == RawKind::Array
    }

    /// `true` for generic shapes carrying a type argument; arrays are not parameterized.
    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        matches!(self.raw, RawKind::List | RawKind::Set | RawKind::Optional)
    }

    /// `true` when the payload holds many entities.
    #[must_use]
    pub fn has_multiple(&self) -> bool {
        matches!(self.raw, RawKind::Array | RawKind::List | RawKind::Set)
    }

    /// Human-readable name, e.g. `List<app::Child>` or `app::Child[]`.
    #[must_use]
    pub fn type_name(&self) -> String {
        let element = self.entity_kind();
        match &self.raw {
            RawKind::Named(name) => name.clone(),
            RawKind::Array => format!("{element}[]"),
            RawKind::List => format!("List<{element}>"),
            RawKind::Set => format!("Set<{element}>"),
            RawKind::Optional => format!("Optional<{element}>"),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}
