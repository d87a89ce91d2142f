// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Values bound to URI template variables.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::iter::FromIterator;

/// A value bound to a template variable: absent, a scalar or a list of scalars.
///
/// `Option`s convert into `Value::Absent` when `None`, which lets callers bind
/// optional query parameters without branching:
///
/// ```
/// use halwrap::param::Value;
///
/// let category: Option<&str> = None;
///
/// assert_eq!(Value::from(category), Value::Absent);
/// assert_eq!(Value::from(vec!["new", "sale"]).to_string(), "new,sale");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Absent,
    Scalar(String),
    List(Vec<String>),
}

impl Value {
    /// An absent value or an empty list binds nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Scalar(_) => false,
            Value::List(values) => values.is_empty(),
        }
    }

    /// The scalars of this value, a scalar being a one-element list.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Value::Absent => vec![],
            Value::Scalar(value) => vec![value.as_str()],
            Value::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Concatenates the items of both values; absent values contribute nothing.
    pub fn append(self, other: Value) -> Value {
        match (self, other) {
            (Value::Absent, other) => other,
            (value, Value::Absent) => value,
            (value, other) => Value::List(
                value
                    .items()
                    .into_iter()
                    .chain(other.items())
                    .map(String::from)
                    .collect(),
            ),
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.items().join(","))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Scalar(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Scalar(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Value {
        Value::Scalar(s.clone())
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Value {
        Value::List(values)
    }
}

impl From<Vec<&str>> for Value {
    fn from(values: Vec<&str>) -> Value {
        Value::List(values.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Value {
    fn from(values: &[&str]) -> Value {
        Value::List(values.iter().map(|value| value.to_string()).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}

macro_rules! scalar_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Value {
                    Value::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(bool, i32, i64, u32, u64, usize);

/// How a list bound to an exploded query variable `{?name*}` is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    /// `name=v1&name=v2`
    NonComposite,
    /// `name=v1,v2`
    Composite,
}

impl Default for ListStyle {
    fn default() -> ListStyle {
        ListStyle::NonComposite
    }
}

/// Variable name to value bindings for a template expansion.
///
/// Names the template does not reference are ignored.
///
/// ```
/// use halwrap::param::{Bindings, Value};
///
/// let bindings = Bindings::new().with("id", 42u64).with("tags", vec!["new"]);
///
/// assert_eq!(bindings.get("id"), Some(&Value::Scalar("42".into())));
/// assert_eq!(bindings.get("missing"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, Value>);

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    /// Adds a binding, replacing any previous value for `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Bindings {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges `other` into this set; `other` wins on conflicting names.
    pub fn merge(mut self, other: &Bindings) -> Bindings {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Bindings {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}
