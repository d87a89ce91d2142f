// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Relation-keyed link collections.

use crate::error::{HalError, Result};
use crate::link::Link;
use crate::uri::BaseUrl;
use percent_encoding::{utf8_percent_encode, EncodeSet};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A collection of links, at most one per relation.
///
/// Serializes as the HAL `_links` object, `{"<rel>": {"href": ...}, ...}`, in
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Links {
    links: Vec<Link>,
}

impl Links {
    pub fn new() -> Links {
        Links::default()
    }

    /// Builds a collection, failing on a link without relation or on a
    /// repeated relation.
    pub fn try_from_links<I: IntoIterator<Item = Link>>(links: I) -> Result<Links> {
        Links::new().with(links)
    }

    /// Returns a copy of this collection with `links` appended.
    pub fn with<I: IntoIterator<Item = Link>>(&self, links: I) -> Result<Links> {
        let mut result = self.clone();
        for link in links {
            result.push(link)?;
        }
        Ok(result)
    }

    fn push(&mut self, link: Link) -> Result<()> {
        let rel = match link.rel() {
            Some(rel) => rel,
            None => bail!(HalError::MissingRelation(link.href().into())),
        };

        ensure!(
            !self.contains(rel),
            HalError::DuplicateRelation(rel.into())
        );

        self.links.push(link);

        Ok(())
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.rel() == Some(rel))
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.get(rel).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Relations in insertion order.
    pub fn rels(&self) -> Vec<&str> {
        self.links.iter().filter_map(Link::rel).collect()
    }

    pub fn prepend_base_url(&self, base: &BaseUrl) -> Links {
        Links {
            links: self
                .links
                .iter()
                .map(|link| link.prepend_base_url(base))
                .collect(),
        }
    }

    /// Renders the collection as an RFC 8288 `Link` header value.
    ///
    /// Non-ASCII titles use the RFC 8187 extended notation `title*`.
    ///
    /// ```
    /// use halwrap::header::Links;
    /// use halwrap::link::Link;
    ///
    /// let links = Links::try_from_links(vec![
    ///     Link::of("/orders?page=2").with_rel("next"),
    ///     Link::of("/orders?page=0").with_rel("prev").with_title("àbac"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     links.to_header_value(),
    ///     r#"</orders?page=2>; rel="next", </orders?page=0>; rel="prev"; title*=UTF-8''%C3%A0bac"#
    /// );
    /// ```
    pub fn to_header_value(&self) -> String {
        self.links
            .iter()
            .map(header_link)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Encodes every byte outside the RFC 8187 `attr-char` set.
#[derive(Clone, Copy, Debug)]
struct AttrCharEncodeSet;

impl EncodeSet for AttrCharEncodeSet {
    fn contains(&self, byte: u8) -> bool {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => false,
            b'!' | b'#' | b'$' | b'&' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => false,
            _ => true,
        }
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn header_link(link: &Link) -> String {
    let mut parts = vec![format!("<{}>", link.href())];

    if let Some(rel) = link.rel() {
        parts.push(format!("rel={}", quoted(rel)));
    }

    if let Some(title) = link.title() {
        if title.is_ascii() {
            parts.push(format!("title={}", quoted(title)));
        } else {
            let value = utf8_percent_encode(title, AttrCharEncodeSet);
            parts.push(format!("title*=UTF-8''{}", value));
        }
    }

    if let Some(media_type) = link.media_type() {
        parts.push(format!("type={}", quoted(media_type)));
    }

    if let Some(hreflang) = link.hreflang() {
        parts.push(format!("hreflang={}", hreflang));
    }

    parts.join("; ")
}

impl IntoIterator for Links {
    type Item = Link;
    type IntoIter = std::vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.links.len()))?;
        for link in &self.links {
            if let Some(rel) = link.rel() {
                map.serialize_entry(rel, link)?;
            }
        }
        map.end()
    }
}
