// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

use crate::error::Result;
use crate::header::Links;
use crate::link::Link;
use crate::uri::BaseUrl;

/// A secondary resource embedded in a main resource.
///
/// Carries links but no embedded slot of its own: embedding stops at one level.
#[derive(Clone, Debug, PartialEq)]
pub struct HalEmbeddedWrapper<E> {
    resource: E,
    links: Links,
}

impl<E> HalEmbeddedWrapper<E> {
    pub fn wrap(resource: E) -> HalEmbeddedWrapper<E> {
        HalEmbeddedWrapper {
            resource,
            links: Links::new(),
        }
    }

    pub fn resource(&self) -> &E {
        &self.resource
    }

    pub fn into_resource(self) -> E {
        self.resource
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn with_links<I: IntoIterator<Item = Link>>(self, links: I) -> Result<HalEmbeddedWrapper<E>> {
        Ok(HalEmbeddedWrapper {
            links: self.links.with(links)?,
            resource: self.resource,
        })
    }

    pub fn prepend_base_url(self, base: &BaseUrl) -> HalEmbeddedWrapper<E> {
        HalEmbeddedWrapper {
            links: self.links.prepend_base_url(base),
            resource: self.resource,
        }
    }
}
