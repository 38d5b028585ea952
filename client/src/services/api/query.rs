//! Query-string building. Absent filter values are omitted entirely.

use std::fmt::Display;

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Push only when `value` is present.
    pub fn opt<V: Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Push only when `value` is present and not blank.
    pub fn opt_text(self, key: &str, value: Option<&str>) -> Self {
        self.opt(key, value.map(str::trim).filter(|v| !v.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

/// Filter types that turn themselves into a [`Query`].
pub trait QueryParams {
    fn to_query(&self) -> Query;
}

impl QueryParams for Query {
    fn to_query(&self) -> Query {
        self.clone()
    }
}

impl QueryParams for () {
    fn to_query(&self) -> Query {
        Query::new()
    }
}
