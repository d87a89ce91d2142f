// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Collections of resource wrappers.

use crate::error::{HalError, Result};
use crate::header::Links;
use crate::link::Link;
use crate::pagination::HalPageInfo;
use crate::relation::TypeHint;
use crate::resource::{HalResourceWrapper, NoEmbedded};
use crate::uri::BaseUrl;

/// An ordered collection of resource wrappers with its own links and
/// optional page metadata.
///
/// The type hint names the collection when there are no items to look at.
/// All items share one embedded shape.
#[derive(Clone, Debug, PartialEq)]
pub struct HalListWrapper<R, E = NoEmbedded> {
    items: Vec<HalResourceWrapper<R, E>>,
    links: Links,
    page_info: Option<HalPageInfo>,
    type_hint: TypeHint,
}

impl<R: 'static, E> HalListWrapper<R, E> {
    /// Wraps `items` in order, typed after `R`.
    pub fn wrap(items: Vec<HalResourceWrapper<R, E>>) -> Result<HalListWrapper<R, E>> {
        if let Some(first) = items.first() {
            let expected = first.embedded_shape();
            if let Some(other) = items.iter().find(|item| item.embedded_shape() != expected) {
                bail!(HalError::HeterogeneousEmbeddedShape(
                    expected.to_string(),
                    other.embedded_shape().to_string()
                ));
            }
        }

        Ok(HalListWrapper {
            items,
            links: Links::new(),
            page_info: None,
            type_hint: TypeHint::of::<R>(),
        })
    }

    /// A list without items, named after `R`.
    pub fn empty() -> HalListWrapper<R, E> {
        HalListWrapper {
            items: vec![],
            links: Links::new(),
            page_info: None,
            type_hint: TypeHint::of::<R>(),
        }
    }
}

impl<R, E> HalListWrapper<R, E> {
    pub fn items(&self) -> &[HalResourceWrapper<R, E>] {
        &self.items
    }

    pub fn into_items(self) -> Vec<HalResourceWrapper<R, E>> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn page_info(&self) -> Option<&HalPageInfo> {
        self.page_info.as_ref()
    }

    pub fn type_hint(&self) -> &TypeHint {
        &self.type_hint
    }

    /// Names the collection after `hint` instead of the item type.
    pub fn with_type_hint(self, hint: TypeHint) -> HalListWrapper<R, E> {
        HalListWrapper {
            type_hint: hint,
            ..self
        }
    }

    pub fn with_links<I: IntoIterator<Item = Link>>(self, links: I) -> Result<HalListWrapper<R, E>> {
        Ok(HalListWrapper {
            links: self.links.with(links)?,
            ..self
        })
    }

    pub fn with_page_info(self, page_info: HalPageInfo) -> HalListWrapper<R, E> {
        HalListWrapper {
            page_info: Some(page_info),
            ..self
        }
    }

    /// Prefixes list links and every item's links with `base`.
    pub fn prepend_base_url(self, base: &BaseUrl) -> HalListWrapper<R, E> {
        HalListWrapper {
            items: self
                .items
                .into_iter()
                .map(|item| item.prepend_base_url(base))
                .collect(),
            links: self.links.prepend_base_url(base),
            page_info: self.page_info,
            type_hint: self.type_hint,
        }
    }
}
