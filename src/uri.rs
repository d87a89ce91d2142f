// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Href helpers: path joining and origin prefixing.

use crate::error::{HalError, Result};
use std::fmt::{self, Display};
use url::Url;

/// The origin a relative href is resolved against, e.g. `https://api.example.org:8443`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl BaseUrl {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> BaseUrl {
        BaseUrl {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Parses the origin part of `input`; any path or query is dropped and a
    /// port equal to the scheme default is omitted.
    ///
    /// ```
    /// use halwrap::uri::BaseUrl;
    ///
    /// let base = BaseUrl::parse("https://example.org:443/ignored").unwrap();
    ///
    /// assert_eq!(base.to_string(), "https://example.org");
    /// ```
    pub fn parse(input: &str) -> Result<BaseUrl> {
        let url =
            Url::parse(input).map_err(|err| HalError::InvalidBaseUrl(input.into(), err.to_string()))?;

        let host = match url.host_str() {
            Some(host) => host.to_string(),
            None => bail!(HalError::InvalidBaseUrl(input.into(), "no host".into())),
        };

        Ok(BaseUrl {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Prefixes a relative `href` with this origin. Absolute hrefs are
    /// returned unchanged.
    pub fn prepend(&self, href: &str) -> String {
        if is_absolute(href) {
            return href.to_string();
        }

        if href.starts_with('/') {
            format!("{}{}", self, href)
        } else {
            format!("{}/{}", self, href)
        }
    }
}

impl Display for BaseUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self.port {
            Some(port) => write!(formatter, "{}://{}:{}", self.scheme, self.host, port),
            None => write!(formatter, "{}://{}", self.scheme, self.host),
        }
    }
}

/// Whether `href` carries its own scheme.
pub fn is_absolute(href: &str) -> bool {
    !href.starts_with('/') && Url::parse(href).is_ok()
}

/// Joins `href` and `segment` with exactly one `/`. An empty segment only
/// collapses trailing slashes of `href`.
///
/// ```
/// use halwrap::uri::slash;
///
/// assert_eq!(slash("/users/", "/42"), "/users/42");
/// assert_eq!(slash("/users", "42"), "/users/42");
/// ```
pub fn slash(href: &str, segment: &str) -> String {
    let left = href.trim_end_matches('/');
    let right = segment.trim_start_matches('/');

    if right.is_empty() {
        return if left.len() < href.len() {
            format!("{}/", left)
        } else {
            href.to_string()
        };
    }

    format!("{}/{}", left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_never_doubles_or_drops() {
        let hrefs = ["/users", "/users/", "/users//", "http://x.org/users", "http://x.org/users/"];
        let segments = ["42", "/42", "//42", "42/orders", "/42/orders"];

        for href in &hrefs {
            for segment in &segments {
                let actual = slash(href, segment);
                let joined = actual.splitn(2, "users").nth(1).expect("keeps prefix");

                assert!(joined.starts_with("/42"), "{} + {} = {}", href, segment, actual);
                assert!(!joined.contains("//"), "{} + {} = {}", href, segment, actual);
            }
        }
    }

    #[test]
    fn slash_on_empty_href() {
        assert_eq!(slash("", "users"), "/users");
    }

    #[test]
    fn slash_with_empty_segment() {
        assert_eq!(slash("/users", ""), "/users");
        assert_eq!(slash("/users", "/"), "/users");
        assert_eq!(slash("/users//", ""), "/users/");
        assert_eq!(slash("/users///", "//"), "/users/");
        assert_eq!(slash("/", ""), "/");
    }

    #[test]
    fn slash_keeps_template_text() {
        assert_eq!(slash("/users/{id}/", "/orders"), "/users/{id}/orders");
    }

    #[test]
    fn parse_base_url_with_port() {
        let actual = BaseUrl::parse("http://localhost:8080/api?x=1").expect("valid url");

        assert_eq!(actual, BaseUrl::new("http", "localhost", Some(8080)));
        assert_eq!(actual.to_string(), "http://localhost:8080");
    }

    #[test]
    fn parse_base_url_rejects_relative() {
        let err = BaseUrl::parse("/relative").unwrap_err();

        match err.downcast_ref::<HalError>() {
            Some(HalError::InvalidBaseUrl(input, _)) => assert_eq!(input, "/relative"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn prepend_relative() {
        let base = BaseUrl::new("https", "example.org", None);

        assert_eq!(base.prepend("/orders/1"), "https://example.org/orders/1");
        assert_eq!(base.prepend("orders/1"), "https://example.org/orders/1");
    }

    #[test]
    fn prepend_absolute_is_noop() {
        let base = BaseUrl::new("https", "example.org", None);

        assert_eq!(base.prepend("http://other.org/x"), "http://other.org/x");
    }
}
