// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Links to handler operations.
//!
//! The host web framework resolves an operation to a path template plus
//! path and query parameter bindings; a [`RouteRef`] turns that into a link.

use crate::assembler::RequestContext;
use crate::error::Result;
use crate::link::Link;
use crate::param::{Bindings, ListStyle, Value};
use crate::uri_template::{self, UriTemplate};
use std::mem;

/// A resolved reference to a handler operation.
///
/// ```
/// use halwrap::route::RouteRef;
///
/// let link = RouteRef::new("/users/{userId}/orders")
///     .path_param("userId", 7u64)
///     .query_param("status", "open")
///     .query_param("tags", vec!["new", "sale"])
///     .to_link()
///     .unwrap();
///
/// assert_eq!(link.href(), "/users/7/orders?status=open&tags=new&tags=sale");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRef {
    path_template: String,
    path_params: Bindings,
    query_params: Vec<(String, Value)>,
}

impl RouteRef {
    pub fn new(path_template: impl Into<String>) -> RouteRef {
        RouteRef {
            path_template: path_template.into(),
            path_params: Bindings::new(),
            query_params: vec![],
        }
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> RouteRef {
        self.path_params.insert(name, value);
        self
    }

    /// Adds a query parameter. Lists are exploded, absent values are left out
    /// and repeated names accumulate their values.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> RouteRef {
        let name = name.into();
        let value = value.into();

        match self.query_params.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => {
                let current = mem::replace(existing, Value::Absent);
                *existing = current.append(value);
            }
            None => self.query_params.push((name, value)),
        }

        self
    }

    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    pub fn to_link(&self) -> Result<Link> {
        self.to_link_with(ListStyle::default())
    }

    /// Builds the link with the list style of `context`.
    pub fn to_link_in(&self, context: &RequestContext) -> Result<Link> {
        self.to_link_with(context.list_style())
    }

    /// Builds the link, rendering list query parameters with `style`.
    ///
    /// Query parameters named by a variable of the path template bind to it;
    /// the others are encoded into the query string as given, whatever their
    /// name.
    pub fn to_link_with(&self, style: ListStyle) -> Result<Link> {
        let path = UriTemplate::parse(&self.path_template)?;
        let referenced = path.variable_names();

        let mut bindings = self.path_params.clone();
        let mut pairs = vec![];
        for (name, value) in &self.query_params {
            if referenced.contains(&name.as_str()) {
                bindings.insert(name.clone(), value.clone());
            } else {
                pairs.extend(uri_template::query_pairs(name, value, true, style));
            }
        }

        let mut href = path.expand_with(&bindings, style)?;
        if !pairs.is_empty() {
            href.push(if href.contains('?') { '&' } else { '?' });
            href.push_str(&pairs.join("&"));
        }

        Ok(Link::of(href))
    }
}
