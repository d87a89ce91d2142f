// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Serialization names of resource types.
//!
//! Embedded resources are keyed by a relation name derived from their type:
//! the singular form for a single object, the plural form for an array.
//! Names resolve from the type alone so an empty collection still gets one.

use crate::error::{HalError, Result};
use serde::Deserialize;
use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;

/// Identifies the type a relation name is resolved for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeHint {
    id: Option<TypeId>,
    name: Cow<'static, str>,
}

impl TypeHint {
    pub fn of<T: ?Sized + 'static>() -> TypeHint {
        TypeHint {
            id: Some(TypeId::of::<T>()),
            name: Cow::Borrowed(type_name::<T>()),
        }
    }

    /// A hint carrying only a declared name, for resources without a
    /// dedicated Rust type (e.g. `serde_json::Value` payloads).
    pub fn named(name: impl Into<String>) -> TypeHint {
        TypeHint {
            id: None,
            name: Cow::Owned(name.into()),
        }
    }

    pub fn type_id(&self) -> Option<TypeId> {
        self.id
    }

    /// The full type name, e.g. `shop::model::OrderDto`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last path segment without generic arguments, e.g. `OrderDto`.
    ///
    /// `None` for types that have no usable declared name such as tuples,
    /// slices or references.
    pub fn declared_name(&self) -> Option<&str> {
        let base = match self.name.find('<') {
            Some(index) => {
                tracing::warn!(type_name = %self.name, "ignoring generic arguments of type name");
                &self.name[..index]
            }
            None => &self.name[..],
        };

        let declared = base.rsplit("::").next().unwrap_or(base);
        let valid = declared
            .chars()
            .next()
            .map_or(false, |c| c.is_alphabetic() || c == '_')
            && declared.chars().all(|c| c.is_alphanumeric() || c == '_');

        if valid {
            Some(declared)
        } else {
            None
        }
    }
}

/// Singular and plural serialization names of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationName {
    singular: String,
    plural: String,
}

impl RelationName {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> RelationName {
        RelationName {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Regular plural: the singular with an `s` appended.
    pub fn regular(singular: impl Into<String>) -> RelationName {
        let singular = singular.into();
        let plural = format!("{}s", singular);

        RelationName { singular, plural }
    }

    pub fn singular(&self) -> &str {
        &self.singular
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }
}

/// A configured naming override. `plural` defaults to the regular plural.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RelationOverride {
    pub singular: String,
    #[serde(default)]
    pub plural: Option<String>,
}

impl From<RelationOverride> for RelationName {
    fn from(value: RelationOverride) -> RelationName {
        match value.plural {
            Some(plural) => RelationName::new(value.singular, plural),
            None => RelationName::regular(value.singular),
        }
    }
}

/// Resolves relation names: registered overrides first, then the default
/// heuristic.
///
/// ```
/// use halwrap::relation::{RelationName, RelationResolver, TypeHint};
///
/// struct OrderDto;
/// struct Person;
///
/// let resolver = RelationResolver::new()
///     .strip_suffix("Dto")
///     .register::<Person>(RelationName::new("person", "people"));
///
/// let order = resolver.resolve(&TypeHint::of::<OrderDto>()).unwrap();
/// let person = resolver.resolve(&TypeHint::of::<Person>()).unwrap();
///
/// assert_eq!((order.singular(), order.plural()), ("order", "orders"));
/// assert_eq!((person.singular(), person.plural()), ("person", "people"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RelationResolver {
    by_type: HashMap<TypeId, RelationName>,
    by_name: HashMap<String, RelationName>,
    strip_suffix: Option<String>,
}

impl RelationResolver {
    pub fn new() -> RelationResolver {
        RelationResolver::default()
    }

    /// Suffix token removed from declared names before lower-casing, so that
    /// `OrderDto` becomes `order` rather than `orderdto`. Matched case-insensitively.
    pub fn strip_suffix(mut self, suffix: impl Into<String>) -> RelationResolver {
        self.strip_suffix = Some(suffix.into());
        self
    }

    pub fn register<T: ?Sized + 'static>(mut self, name: RelationName) -> RelationResolver {
        self.by_type.insert(TypeId::of::<T>(), name);
        self
    }

    /// Registers an override keyed by declared type name, as found in configuration.
    pub fn register_name(
        mut self,
        declared_name: impl Into<String>,
        name: RelationName,
    ) -> RelationResolver {
        self.by_name.insert(declared_name.into(), name);
        self
    }

    pub fn resolve_of<T: ?Sized + 'static>(&self) -> Result<RelationName> {
        self.resolve(&TypeHint::of::<T>())
    }

    pub fn resolve(&self, hint: &TypeHint) -> Result<RelationName> {
        if let Some(name) = hint.type_id().and_then(|id| self.by_type.get(&id)) {
            return Ok(name.clone());
        }

        let declared = match hint.declared_name() {
            Some(declared) => declared,
            None => bail!(HalError::UnresolvableRelationName(hint.name().into())),
        };

        if let Some(name) = self.by_name.get(declared) {
            return Ok(name.clone());
        }

        let stem = match &self.strip_suffix {
            Some(suffix) => strip_suffix(declared, suffix),
            None => declared,
        };

        Ok(RelationName::regular(stem.to_lowercase()))
    }
}

/// Strips `suffix` unless nothing would be left.
fn strip_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() || name.len() <= suffix.len() {
        return name;
    }

    let split = name.len() - suffix.len();
    if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(suffix) {
        &name[..split]
    } else {
        name
    }
}
