// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Main resource wrappers and their embedded slot.

use crate::embedded::HalEmbeddedWrapper;
use crate::error::Result;
use crate::header::Links;
use crate::link::Link;
use crate::uri::BaseUrl;
use serde::{Serialize, Serializer};
use std::fmt::{self, Display};

/// Embedded type of a wrapper that embeds nothing. Has no values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoEmbedded {}

impl Serialize for NoEmbedded {
    fn serialize<S: Serializer>(&self, _serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        match *self {}
    }
}

/// What a resource wrapper embeds.
///
/// `Absent` and an empty `List` are different documents: the first omits
/// `_embedded`, the second renders an empty array.
#[derive(Clone, Debug, PartialEq)]
pub enum EmbeddedSlot<E> {
    Absent,
    Single(HalEmbeddedWrapper<E>),
    List(Vec<HalEmbeddedWrapper<E>>),
}

impl<E> EmbeddedSlot<E> {
    pub fn shape(&self) -> EmbeddedShape {
        match self {
            EmbeddedSlot::Absent => EmbeddedShape::Absent,
            EmbeddedSlot::Single(_) => EmbeddedShape::Single,
            EmbeddedSlot::List(_) => EmbeddedShape::List,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.shape() == EmbeddedShape::Absent
    }

    fn prepend_base_url(self, base: &BaseUrl) -> EmbeddedSlot<E> {
        match self {
            EmbeddedSlot::Absent => EmbeddedSlot::Absent,
            EmbeddedSlot::Single(embedded) => EmbeddedSlot::Single(embedded.prepend_base_url(base)),
            EmbeddedSlot::List(items) => EmbeddedSlot::List(
                items
                    .into_iter()
                    .map(|item| item.prepend_base_url(base))
                    .collect(),
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddedShape {
    Absent,
    Single,
    List,
}

impl Display for EmbeddedShape {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmbeddedShape::Absent => write!(formatter, "absent"),
            EmbeddedShape::Single => write!(formatter, "single"),
            EmbeddedShape::List => write!(formatter, "list"),
        }
    }
}

/// A main resource with its links and an optional embedded payload.
///
/// There is always a resource; callers holding an optional value branch
/// before wrapping. Builders consume the wrapper and return a new one.
///
/// ```
/// use halwrap::embedded::HalEmbeddedWrapper;
/// use halwrap::link::Link;
/// use halwrap::resource::{EmbeddedShape, HalResourceWrapper};
///
/// let wrapper = HalResourceWrapper::wrap("order")
///     .with_links(vec![Link::as_self_of("/orders/1")])
///     .unwrap()
///     .with_embedded_resource(Some(HalEmbeddedWrapper::wrap("customer")));
///
/// assert_eq!(wrapper.embedded_shape(), EmbeddedShape::Single);
/// assert_eq!(wrapper.links().len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HalResourceWrapper<R, E = NoEmbedded> {
    resource: R,
    links: Links,
    embedded: EmbeddedSlot<E>,
}

impl<R> HalResourceWrapper<R, NoEmbedded> {
    /// Wraps `resource` without links and without embedded payload.
    pub fn wrap(resource: R) -> HalResourceWrapper<R, NoEmbedded> {
        HalResourceWrapper {
            resource,
            links: Links::new(),
            embedded: EmbeddedSlot::Absent,
        }
    }
}

impl<R, E> HalResourceWrapper<R, E> {
    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn into_resource(self) -> R {
        self.resource
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn embedded(&self) -> &EmbeddedSlot<E> {
        &self.embedded
    }

    pub fn embedded_shape(&self) -> EmbeddedShape {
        self.embedded.shape()
    }

    /// Adds links; fails on a repeated relation within `links` or against the
    /// links already present.
    pub fn with_links<I: IntoIterator<Item = Link>>(self, links: I) -> Result<HalResourceWrapper<R, E>> {
        Ok(HalResourceWrapper {
            links: self.links.with(links)?,
            ..self
        })
    }

    /// Embeds a single resource; `None` leaves the slot absent.
    pub fn with_embedded_resource<F>(
        self,
        embedded: Option<HalEmbeddedWrapper<F>>,
    ) -> HalResourceWrapper<R, F> {
        HalResourceWrapper {
            resource: self.resource,
            links: self.links,
            embedded: match embedded {
                Some(embedded) => EmbeddedSlot::Single(embedded),
                None => EmbeddedSlot::Absent,
            },
        }
    }

    /// Embeds a list of resources. An empty list is kept as such and renders
    /// as an empty array.
    pub fn with_embedded_list<F>(self, items: Vec<HalEmbeddedWrapper<F>>) -> HalResourceWrapper<R, F> {
        HalResourceWrapper {
            resource: self.resource,
            links: self.links,
            embedded: EmbeddedSlot::List(items),
        }
    }

    /// Prefixes every relative href, embedded ones included, with `base`.
    pub fn prepend_base_url(self, base: &BaseUrl) -> HalResourceWrapper<R, E> {
        HalResourceWrapper {
            resource: self.resource,
            links: self.links.prepend_base_url(base),
            embedded: self.embedded.prepend_base_url(base),
        }
    }
}
