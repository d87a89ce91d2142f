// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Error types and utilities.

use crate::uri_template::Rule;
pub use failure::Error;
use failure::*;

/// Either `Ok(T)` or `Err(failure::Error)`.
pub type Result<T> = ::std::result::Result<T, failure::Error>;

/// A parser error.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ParserError {
    /// Given invalid `Rule` variant to `from_rule`
    #[fail(display = "Expected a rule of type {} but given {} instead", _0, _1)]
    InvalidRule(Rule, Rule),
}

/// Misuse of the hypermedia API.
///
/// All of these surface synchronously at construction or expansion time. Use
/// `Error::downcast_ref::<HalError>()` to tell them apart.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum HalError {
    /// The template is malformed, e.g. unbalanced braces or an unknown operator.
    #[fail(display = "Invalid URI template {:?}: {}", _0, _1)]
    TemplateSyntax(String, String),

    /// A `{name}` variable had no value bound at expansion time.
    #[fail(display = "No value bound for mandatory template variable {:?}", _0)]
    MissingMandatoryVariable(String),

    /// Two links in the same collection share a relation.
    #[fail(display = "Duplicate link relation {:?}", _0)]
    DuplicateRelation(String),

    /// A link without a relation cannot be keyed under `_links`.
    #[fail(display = "Link to {:?} has no relation", _0)]
    MissingRelation(String),

    /// List items disagree on their embedded slot shape.
    #[fail(
        display = "List items mix embedded shapes: expected {} but found {}",
        _0, _1
    )]
    HeterogeneousEmbeddedShape(String, String),

    /// No usable serialization name could be derived for a type.
    #[fail(display = "Cannot resolve a relation name for type {:?}", _0)]
    UnresolvableRelationName(String),

    #[fail(display = "Page size must be greater than zero")]
    InvalidPageSize,

    /// Resource fields are flattened at the document root, so a resource must
    /// serialize to a JSON object.
    #[fail(display = "Resource of type {:?} does not serialize to an object", _0)]
    NonObjectResource(String),

    /// A flattened resource field would collide with `_links` or `_embedded`.
    #[fail(display = "Resource of type {:?} has reserved property {:?}", _0, _1)]
    ReservedProperty(String, String),

    #[fail(display = "Invalid base URL {:?}: {}", _0, _1)]
    InvalidBaseUrl(String, String),
}
