// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Page metadata and navigation links for paginated lists.

use crate::error::{HalError, Result};
use crate::header::Links;
use crate::link::{rel, Link};
use crate::list::HalListWrapper;
use crate::param::Bindings;
use crate::uri_template::UriTemplate;
use serde::Serialize;
use std::fmt::{self, Display};

const PAGING_PARAMS: [&str; 3] = ["page", "size", "sort"];

/// The `page` block of a paginated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HalPageInfo {
    size: u32,
    total_elements: u64,
    total_pages: u64,
    number: u64,
}

impl HalPageInfo {
    /// Derives page metadata from a page size, the total element count and
    /// the offset of the first element on the current page.
    ///
    /// ```
    /// use halwrap::pagination::HalPageInfo;
    ///
    /// let page = HalPageInfo::assemble(2, 6, 4).unwrap();
    ///
    /// assert_eq!(page.current_page_number(), 2);
    /// assert_eq!(page.total_pages(), 3);
    /// ```
    pub fn assemble(page_size: u32, total_elements: u64, offset: u64) -> Result<HalPageInfo> {
        ensure!(page_size > 0, HalError::InvalidPageSize);

        let size = u64::from(page_size);
        let total_pages = total_elements / size + u64::from(total_elements % size != 0);

        Ok(HalPageInfo {
            size: page_size,
            total_elements,
            total_pages,
            number: offset / size,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.size
    }

    pub fn current_page_number(&self) -> u64 {
        self.number
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    fn has_previous(&self) -> bool {
        self.number > 0
    }

    fn has_next(&self) -> bool {
        self.number < self.total_pages.saturating_sub(1)
    }

    fn has_last(&self) -> bool {
        self.has_next()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Display for SortDirection {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(formatter, "asc"),
            SortDirection::Descending => write!(formatter, "desc"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
    property: String,
    direction: SortDirection,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> SortOrder {
        SortOrder {
            property: property.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(property: impl Into<String>) -> SortOrder {
        SortOrder {
            property: property.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl Display for SortOrder {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{},{}", self.property, self.direction)
    }
}

/// Ordered sort orders, rendered as repeated `sort=property,direction`
/// query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortCriteria(Vec<SortOrder>);

impl SortCriteria {
    pub fn new() -> SortCriteria {
        SortCriteria::default()
    }

    pub fn by(order: SortOrder) -> SortCriteria {
        SortCriteria(vec![order])
    }

    pub fn then(mut self, order: SortOrder) -> SortCriteria {
        self.0.push(order);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<SortOrder> {
        self.0.iter()
    }

    fn query_values(&self) -> Vec<String> {
        self.0.iter().map(SortOrder::to_string).collect()
    }
}

/// Derives `self`, `first`, `prev`, `next` and `last` links from `base`.
///
/// `self` is always present. `first` and `prev` only appear past the first
/// page, `next` and `last` only before the last one. Every link keeps the
/// attributes and path of `base` and differs only in `page`, `size` and
/// `sort`. Paging parameters already in `base`, as literal pairs or as
/// template variables, are replaced; its other optional variables stay
/// unbound.
pub fn derive_navigation_links(
    base: &Link,
    page: &HalPageInfo,
    sort: &SortCriteria,
) -> Result<Links> {
    let base_template = UriTemplate::parse(base.href())?.without_query_params(&PAGING_PARAMS);
    let template = UriTemplate::parse(&format!("{}{{?page,size,sort*}}", base_template))?;

    let page_link = |number: u64, relation: &str| -> Result<Link> {
        let bindings = Bindings::new()
            .with("page", number)
            .with("size", page.page_size())
            .with("sort", sort.query_values());
        let href = template.expand(&bindings)?;

        Ok(base.with_href(href).with_rel(relation))
    };

    let number = page.current_page_number();
    let mut links = vec![page_link(number, rel::SELF)?];

    if page.has_previous() {
        links.push(page_link(0, rel::FIRST)?);
        links.push(page_link(number - 1, rel::PREV)?);
    }

    if page.has_next() {
        links.push(page_link(number + 1, rel::NEXT)?);
    }

    if page.has_last() {
        links.push(page_link(page.total_pages() - 1, rel::LAST)?);
    }

    Links::try_from_links(links)
}

impl<R, E> HalListWrapper<R, E> {
    /// Attaches `page` and the navigation links derived from `base`.
    pub fn paginate(self, page: HalPageInfo, base: &Link, sort: &SortCriteria) -> Result<HalListWrapper<R, E>> {
        let links = derive_navigation_links(base, &page, sort)?;

        Ok(self.with_links(links)?.with_page_info(page))
    }
}
