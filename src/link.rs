// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Link values and their transformations.

use crate::error::Result;
use crate::param::{Bindings, ListStyle, Value};
use crate::uri::{self, BaseUrl};
use crate::uri_template::{self, UriTemplate};
use serde::Serialize;

/// IANA registered relation names used by this crate.
pub mod rel {
    pub const SELF: &str = "self";
    pub const FIRST: &str = "first";
    pub const PREV: &str = "prev";
    pub const NEXT: &str = "next";
    pub const LAST: &str = "last";
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A hypermedia link.
///
/// Links are immutable values: every transformation returns a new link.
/// `templated` always tells whether `href` still holds template expressions.
///
/// The relation is not part of the serialized attributes; collections key
/// links by it instead.
///
/// ```
/// use halwrap::link::Link;
/// use halwrap::param::Bindings;
///
/// let link = Link::of("/users/{userId}")
///     .slash("/orders")
///     .with_rel("orders");
///
/// assert!(link.is_templated());
///
/// let link = link.expand(&Bindings::new().with("userId", 7u64)).unwrap();
///
/// assert_eq!(link.href(), "/users/7/orders");
/// assert!(!link.is_templated());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    href: String,
    #[serde(skip)]
    rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hreflang: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    templated: bool,
    #[serde(skip_serializing_if = "is_false")]
    deprecated: bool,
}

impl Link {
    /// A link without relation.
    pub fn of(href: impl Into<String>) -> Link {
        let href = href.into();
        let templated = uri_template::is_templated(&href);

        Link {
            href,
            rel: None,
            title: None,
            media_type: None,
            hreflang: None,
            templated,
            deprecated: false,
        }
    }

    /// A `self` link to `href`.
    pub fn as_self_of(href: impl Into<String>) -> Link {
        Link::of(href).with_rel(rel::SELF)
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn rel(&self) -> Option<&str> {
        self.rel.as_ref().map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().map(String::as_str)
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_ref().map(String::as_str)
    }

    pub fn hreflang(&self) -> Option<&str> {
        self.hreflang.as_ref().map(String::as_str)
    }

    pub fn is_templated(&self) -> bool {
        self.templated
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Appends a path segment, keeping exactly one `/` at the joint.
    ///
    /// Works on the raw href, so unexpanded variables are carried along.
    pub fn slash(&self, segment: &str) -> Link {
        self.with_href(uri::slash(&self.href, segment))
    }

    pub fn with_rel(&self, rel: impl Into<String>) -> Link {
        Link {
            rel: Some(rel.into()),
            ..self.clone()
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Link {
        Link {
            title: Some(title.into()),
            ..self.clone()
        }
    }

    pub fn with_type(&self, media_type: impl Into<String>) -> Link {
        Link {
            media_type: Some(media_type.into()),
            ..self.clone()
        }
    }

    pub fn with_hreflang(&self, hreflang: impl Into<String>) -> Link {
        Link {
            hreflang: Some(hreflang.into()),
            ..self.clone()
        }
    }

    pub fn with_deprecated(&self, deprecated: bool) -> Link {
        Link {
            deprecated,
            ..self.clone()
        }
    }

    /// Same attributes, different target.
    pub(crate) fn with_href(&self, href: String) -> Link {
        Link {
            templated: uri_template::is_templated(&href),
            href,
            ..self.clone()
        }
    }

    /// Expands the href as a URI template with non-composite list rendering.
    pub fn expand(&self, bindings: &Bindings) -> Result<Link> {
        self.expand_with(bindings, ListStyle::default())
    }

    pub fn expand_with(&self, bindings: &Bindings, style: ListStyle) -> Result<Link> {
        if !self.href.contains('{') {
            return Ok(self.clone());
        }

        let template = UriTemplate::parse(&self.href)?;
        let href = template.expand_with(bindings, style)?;

        Ok(self.with_href(href))
    }

    /// Expands binding `values` to the template variables in order of appearance.
    ///
    /// ```
    /// use halwrap::link::Link;
    ///
    /// let link = Link::of("/users/{userId}/orders/{orderId}")
    ///     .expand_positional(vec![1u64, 2u64])
    ///     .unwrap();
    ///
    /// assert_eq!(link.href(), "/users/1/orders/2");
    /// ```
    pub fn expand_positional<I, V>(&self, values: I) -> Result<Link>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if !self.href.contains('{') {
            return Ok(self.clone());
        }

        let template = UriTemplate::parse(&self.href)?;
        let bindings = template.bind_positional(values);

        Ok(self.with_href(template.expand(&bindings)?))
    }

    /// Prefixes a relative href with `base`. Absolute hrefs are kept as they are.
    pub fn prepend_base_url(&self, base: &BaseUrl) -> Link {
        if uri::is_absolute(&self.href) {
            return self.clone();
        }

        self.with_href(base.prepend(&self.href))
    }
}
