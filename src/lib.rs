// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! HAL+JSON wrappers for domain values.
//!
//! A domain value is wrapped together with its links
//! ([`HalResourceWrapper`]), optionally with embedded values, or as a list
//! ([`HalListWrapper`]) with optional page metadata. Assemblers build those
//! wrappers from link callbacks and [`HalRenderer`] turns them into
//! `application/hal+json` documents.
//!
//! ```
//! use halwrap::{HalRenderer, HalResourceWrapper, Link};
//! use serde_json::json;
//!
//! let wrapper = HalResourceWrapper::wrap(json!({ "name": "Ada" }))
//!     .with_links(vec![
//!         Link::as_self_of("/people/{id}").expand_positional(vec!["1"]).unwrap(),
//!         Link::of("/people/1/friends{?page}").with_rel("friends"),
//!     ])
//!     .unwrap();
//!
//! let document = HalRenderer::default().to_value(&wrapper).unwrap();
//!
//! assert_eq!(document["_links"]["self"]["href"], json!("/people/1"));
//! assert_eq!(document["_links"]["friends"]["templated"], json!(true));
//! ```

#[macro_use]
extern crate failure;

extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod assembler;
pub mod config;
pub mod embedded;
pub mod error;
pub mod header;
pub mod link;
pub mod list;
pub mod pagination;
pub mod param;
pub mod reactive;
pub mod relation;
pub mod render;
pub mod resource;
pub mod route;
pub mod uri;
pub mod uri_template;

pub use crate::assembler::{
    EmbeddingHalWrapperAssembler, EmbeddingHalWrapperAssemblerExt, FlatHalWrapperAssembler,
    FlatHalWrapperAssemblerExt, RequestContext,
};
pub use crate::config::HalConfig;
pub use crate::embedded::HalEmbeddedWrapper;
pub use crate::error::{HalError, Result};
pub use crate::header::Links;
pub use crate::link::Link;
pub use crate::list::HalListWrapper;
pub use crate::pagination::{HalPageInfo, SortCriteria, SortOrder};
pub use crate::param::{Bindings, ListStyle, Value};
pub use crate::reactive::{ReactiveEmbeddingHalWrapperAssembler, ReactiveFlatHalWrapperAssembler};
pub use crate::relation::{RelationName, RelationResolver, TypeHint};
pub use crate::render::{HalDocument, HalRenderer, MEDIA_TYPE};
pub use crate::resource::{EmbeddedShape, HalResourceWrapper, NoEmbedded};
pub use crate::route::RouteRef;
pub use crate::uri::BaseUrl;
pub use crate::uri_template::UriTemplate;
