// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! URI templates, a practical subset of RFC 6570.
//!
//! Supported expressions:
//!
//! * `{name}` a mandatory variable substituted in place.
//! * `{?a,b}` optional query parameters, each omitted when unbound.
//! * `{&a}` optional query parameters continuing an open query string.
//! * `{?name*}` an exploded, list-valued query parameter rendered according to
//!   a [`ListStyle`].
//!
//! ```
//! use halwrap::param::Bindings;
//! use halwrap::uri_template::UriTemplate;
//!
//! let template = UriTemplate::parse("/products/{id}{?fields}").unwrap();
//! let uri = template.expand(&Bindings::new().with("id", 7u64)).unwrap();
//!
//! assert_eq!(uri, "/products/7");
//! ```

use crate::error::{HalError, ParserError, Result};
use crate::param::{Bindings, ListStyle, Value};
use percent_encoding::{utf8_percent_encode, EncodeSet, PATH_SEGMENT_ENCODE_SET, QUERY_ENCODE_SET};
use pest::{iterators::Pair, Parser};
use std::fmt::{self, Display};

#[derive(Parser)]
#[grammar = "uri_template.pest"]
pub struct UriTemplateParser;

impl Display for Rule {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{:?}", self)
    }
}

/// Query values keep `,` so composite lists stay readable but must not leak
/// separators or template braces into the surrounding query string.
#[derive(Clone, Copy, Debug)]
struct QueryValueEncodeSet;

impl EncodeSet for QueryValueEncodeSet {
    fn contains(&self, byte: u8) -> bool {
        match byte {
            b'&' | b'=' | b'+' | b'%' | b'{' | b'}' => true,
            _ => QUERY_ENCODE_SET.contains(byte),
        }
    }
}

fn encode_path(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string()
}

fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QueryValueEncodeSet).to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    /// `{name}`, substituted into the path.
    Mandatory,
    /// `{?name}` or `{&name}`, appended to the query string when bound.
    Optional,
}

/// A single variable of a template expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarSpec {
    name: String,
    kind: VarKind,
    exploded: bool,
}

impl VarSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    fn from_rule(pair: Pair<Rule>) -> Result<VarSpec> {
        ensure!(
            pair.as_rule() == Rule::varspec,
            ParserError::InvalidRule(Rule::varspec, pair.as_rule())
        );

        let mut name = String::new();
        let mut exploded = false;

        for inner_pair in pair.into_inner() {
            match inner_pair.as_rule() {
                Rule::varname => name.push_str(inner_pair.as_str()),

                Rule::explode => exploded = true,

                _ => unreachable!(),
            }
        }

        Ok(VarSpec {
            name,
            kind: VarKind::Optional,
            exploded,
        })
    }

    /// The `name=value` pairs this variable contributes to a query string.
    fn query_pairs(&self, value: Option<&Value>, style: ListStyle) -> Vec<String> {
        match value {
            Some(value) => query_pairs(&self.name, value, self.exploded, style),
            None => vec![],
        }
    }
}

/// Encoded `name=value` pairs of a query parameter. Absent values and empty
/// lists give none; lists are repeated per item unless composite.
pub(crate) fn query_pairs(name: &str, value: &Value, exploded: bool, style: ListStyle) -> Vec<String> {
    if value.is_empty() {
        return vec![];
    }

    let name = encode_query(name);
    let items = value.items();
    let composite = match value {
        Value::List(_) => !exploded || style == ListStyle::Composite,
        _ => false,
    };

    if composite {
        let joined: Vec<String> = items.into_iter().map(encode_query).collect();
        vec![format!("{}={}", name, joined.join(","))]
    } else {
        items
            .into_iter()
            .map(|item| format!("{}={}", name, encode_query(item)))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Path,
    Query,
    Continuation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Expression {
        operator: Operator,
        variables: Vec<VarSpec>,
    },
}

impl Segment {
    fn from_expression(pair: Pair<Rule>) -> Result<Segment> {
        ensure!(
            pair.as_rule() == Rule::expression,
            ParserError::InvalidRule(Rule::expression, pair.as_rule())
        );

        let mut operator = Operator::Path;
        let mut variables = vec![];

        for inner_pair in pair.into_inner() {
            match inner_pair.as_rule() {
                Rule::path => {
                    let name = inner_pair.as_str().to_string();
                    variables.push(VarSpec {
                        name,
                        kind: VarKind::Mandatory,
                        exploded: false,
                    });
                }

                Rule::query => {
                    for query_pair in inner_pair.into_inner() {
                        match query_pair.as_rule() {
                            Rule::query_operator => {
                                operator = match query_pair.as_str() {
                                    "&" => Operator::Continuation,
                                    _ => Operator::Query,
                                };
                            }

                            Rule::varspec => variables.push(VarSpec::from_rule(query_pair)?),

                            _ => unreachable!(),
                        }
                    }
                }

                _ => unreachable!(),
            }
        }

        Ok(Segment::Expression {
            operator,
            variables,
        })
    }
}

impl Display for Segment {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Literal(text) => write!(formatter, "{}", text),

            Segment::Expression {
                operator,
                variables,
            } => {
                let prefix = match operator {
                    Operator::Path => "",
                    Operator::Query => "?",
                    Operator::Continuation => "&",
                };
                let specs: Vec<String> = variables
                    .iter()
                    .map(|var| {
                        if var.exploded {
                            format!("{}*", var.name)
                        } else {
                            var.name.clone()
                        }
                    })
                    .collect();

                write!(formatter, "{{{}{}}}", prefix, specs.join(","))
            }
        }
    }
}

/// A parsed URI template. Parse once, expand many times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    pub fn parse(input: &str) -> Result<UriTemplate> {
        let rule = UriTemplateParser::parse(Rule::template, input)
            .map_err(|err| HalError::TemplateSyntax(input.into(), err.to_string()))?
            .next()
            .ok_or_else(|| HalError::TemplateSyntax(input.into(), "empty template".into()))?;

        UriTemplate::from_rule(rule)
    }

    pub fn from_rule(pair: Pair<Rule>) -> Result<UriTemplate> {
        ensure!(
            pair.as_rule() == Rule::template,
            ParserError::InvalidRule(Rule::template, pair.as_rule())
        );

        let source = pair.as_str().to_string();
        let mut segments = vec![];

        for inner_pair in pair.into_inner() {
            match inner_pair.as_rule() {
                Rule::literal => segments.push(Segment::Literal(inner_pair.as_str().into())),

                Rule::expression => segments.push(Segment::from_expression(inner_pair)?),

                Rule::EOI => (),

                _ => unreachable!(),
            }
        }

        Ok(UriTemplate { source, segments })
    }

    /// The template text as given to `parse`.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn variables(&self) -> impl Iterator<Item = &VarSpec> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(_) => None,
                Segment::Expression { variables, .. } => Some(variables),
            })
            .flatten()
    }

    /// Distinct variable names in order of first appearance.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        for var in self.variables() {
            if !names.contains(&var.name()) {
                names.push(var.name());
            }
        }
        names
    }

    pub fn has_variables(&self) -> bool {
        self.variables().next().is_some()
    }

    /// A copy of this template without the query parameters `names`, written
    /// either as literal `name=value` pairs or as query expression variables.
    /// Query expressions left without variables are dropped.
    ///
    /// ```
    /// use halwrap::uri_template::UriTemplate;
    ///
    /// let template = UriTemplate::parse("/products?page=3&q=x{?category,size}").unwrap();
    ///
    /// assert_eq!(
    ///     template.without_query_params(&["page", "size"]).as_str(),
    ///     "/products?q=x{?category}"
    /// );
    /// ```
    pub fn without_query_params(&self, names: &[&str]) -> UriTemplate {
        let mut segments = vec![];
        let mut source_query_open = false;
        let mut query_started = false;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    let (path, query) = if source_query_open {
                        ("", &text[..])
                    } else {
                        match text.find('?') {
                            Some(index) => {
                                source_query_open = true;
                                (&text[..index], &text[index + 1..])
                            }
                            None => (&text[..], ""),
                        }
                    };

                    let kept: Vec<&str> = query
                        .split('&')
                        .filter(|pair| !pair.is_empty())
                        .filter(|pair| !names.contains(&pair.split('=').next().unwrap_or("")))
                        .collect();

                    let mut literal = path.to_string();
                    if !kept.is_empty() {
                        literal.push(if query_started { '&' } else { '?' });
                        literal.push_str(&kept.join("&"));
                        query_started = true;
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(literal));
                    }
                }

                Segment::Expression {
                    operator: Operator::Path,
                    ..
                } => segments.push(segment.clone()),

                Segment::Expression {
                    operator,
                    variables,
                } => {
                    let variables: Vec<VarSpec> = variables
                        .iter()
                        .filter(|var| !names.contains(&var.name()))
                        .cloned()
                        .collect();

                    if !variables.is_empty() {
                        let operator = if query_started { *operator } else { Operator::Query };
                        segments.push(Segment::Expression {
                            operator,
                            variables,
                        });
                        query_started = true;
                    }
                }
            }
        }

        let source = segments.iter().map(Segment::to_string).collect();

        UriTemplate { source, segments }
    }

    /// Binds `values` to the template variables in order of appearance.
    /// Surplus values are ignored; missing ones stay unbound.
    pub fn bind_positional<I, V>(&self, values: I) -> Bindings
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.variable_names()
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value.into()))
            .collect()
    }

    /// Expands with the default, non-composite list style.
    pub fn expand(&self, bindings: &Bindings) -> Result<String> {
        self.expand_with(bindings, ListStyle::default())
    }

    pub fn expand_with(&self, bindings: &Bindings, style: ListStyle) -> Result<String> {
        let mut uri = String::with_capacity(self.source.len());
        let mut query_open = false;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    query_open |= text.contains('?');
                    uri.push_str(text);
                }

                Segment::Expression {
                    operator: Operator::Path,
                    variables,
                } => {
                    for var in variables {
                        let value = match bindings.get(&var.name) {
                            Some(value) if !value.is_empty() => value,
                            _ => bail!(HalError::MissingMandatoryVariable(var.name.clone())),
                        };
                        let encoded: Vec<String> =
                            value.items().into_iter().map(encode_path).collect();
                        uri.push_str(&encoded.join(","));
                    }
                }

                Segment::Expression {
                    operator,
                    variables,
                } => {
                    for var in variables {
                        for pair in var.query_pairs(bindings.get(&var.name), style) {
                            let open = query_open || *operator == Operator::Continuation;
                            uri.push(if open { '&' } else { '?' });
                            uri.push_str(&pair);
                            query_open = true;
                        }
                    }
                }
            }
        }

        tracing::trace!(template = %self.source, uri = %uri, "expanded uri template");

        Ok(uri)
    }
}

impl Display for UriTemplate {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.source)
    }
}

/// Whether `href` still carries template expressions.
///
/// Text that does not parse as a template is treated as a plain href.
pub fn is_templated(href: &str) -> bool {
    href.contains('{')
        && UriTemplate::parse(href)
            .map(|template| template.has_variables())
            .unwrap_or(false)
}
