// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Startup configuration.
//!
//! ```
//! use halwrap::config::HalConfig;
//!
//! let config = HalConfig::from_json(r#"{
//!     "strip_suffix": "Dto",
//!     "base_url": "https://api.example.org",
//!     "relations": { "Person": { "singular": "person", "plural": "people" } },
//!     "list_style": "composite"
//! }"#).unwrap();
//!
//! let name = config.resolver().resolve(&halwrap::relation::TypeHint::named("Person")).unwrap();
//!
//! assert_eq!(name.plural(), "people");
//! ```

use crate::assembler::RequestContext;
use crate::error::Result;
use crate::param::ListStyle;
use crate::relation::{RelationOverride, RelationResolver};
use crate::render::HalRenderer;
use crate::uri::BaseUrl;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HalConfig {
    /// Suffix stripped from type names before deriving relation names.
    pub strip_suffix: Option<String>,
    /// Origin prefixed to relative hrefs.
    pub base_url: Option<String>,
    /// Relation names keyed by declared type name.
    pub relations: BTreeMap<String, RelationOverride>,
    /// Default rendering of exploded list parameters, carried by the
    /// request context.
    pub list_style: ListStyle,
}

impl HalConfig {
    pub fn from_json(input: &str) -> Result<HalConfig> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn resolver(&self) -> RelationResolver {
        let resolver = match &self.strip_suffix {
            Some(suffix) => RelationResolver::new().strip_suffix(suffix.clone()),
            None => RelationResolver::new(),
        };

        self.relations
            .iter()
            .fold(resolver, |resolver, (type_name, name)| {
                resolver.register_name(type_name.clone(), name.clone().into())
            })
    }

    pub fn renderer(&self) -> HalRenderer {
        HalRenderer::new(self.resolver())
    }

    pub fn base_url(&self) -> Result<Option<BaseUrl>> {
        match &self.base_url {
            Some(input) => Ok(Some(BaseUrl::parse(input)?)),
            None => Ok(None),
        }
    }

    /// A request context with the configured base URL and list style.
    pub fn context(&self) -> Result<RequestContext> {
        let context = match self.base_url()? {
            Some(base_url) => RequestContext::with_base_url(base_url),
            None => RequestContext::new(),
        };

        Ok(context.with_list_style(self.list_style))
    }
}
