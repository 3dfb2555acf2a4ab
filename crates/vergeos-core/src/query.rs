//! Convenience builders for HTTP query parameters.
//!
//! [`QueryParams`] is a lightweight helper for assembling URL query pairs from
//! optional values; [`ListQuery`] captures the parameters common to every
//! VergeOS list endpoint (filter, field selection, pagination, sort).

use crate::filter::Filter;
use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Parameters accepted by every VergeOS list endpoint.
#[derive(Debug, Default, Clone)]
pub struct ListQuery {
    /// Rendered filter expression.
    pub filter: Option<String>,
    /// Fields to return, joined with commas on the wire.
    pub fields: Vec<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Skip this many results.
    pub offset: Option<u32>,
    /// Sort specification (prefix a field with `-` for descending).
    pub sort: Option<String>,
}

impl ListQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter from a [`Filter`] builder; empty filters are ignored.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter.into_query();
        self
    }

    /// Set the filter from a raw expression string.
    #[must_use]
    pub fn with_filter_str(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.is_empty() { None } else { Some(filter) };
        self
    }

    /// Select the fields to return.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the result limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the result offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the sort specification.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Convert into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("filter", self.filter.as_deref());
        if !self.fields.is_empty() {
            params.push("fields", self.fields.join(","));
        }
        params.push_opt("limit", self.limit);
        params.push_opt("offset", self.offset);
        params.push_opt("sort", self.sort.as_deref());
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("name", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_collects_pairs_in_order() {
        let mut params = QueryParams::new();
        params.push("limit", 5u32);
        params.push_opt("offset", Some(10u32));
        assert_eq!(
            params.into_pairs(),
            vec![("limit", "5".to_string()), ("offset", "10".to_string())]
        );
    }

    #[test]
    fn list_query_empty_yields_no_pairs() {
        assert!(ListQuery::new().to_pairs().is_empty());
    }

    #[test]
    fn list_query_joins_fields_with_commas() {
        let query = ListQuery::new().with_fields(["$key", "name", "enabled"]);
        assert_eq!(
            query.to_pairs(),
            vec![("fields", "$key,name,enabled".to_string())]
        );
    }

    #[test]
    fn list_query_renders_filter_and_pagination() {
        let query = ListQuery::new()
            .with_filter(Filter::new().eq("enabled", true))
            .with_limit(100)
            .with_offset(50)
            .with_sort("-timestamp");
        let pairs = query.to_pairs();
        assert!(pairs.contains(&("filter", "enabled eq true".to_string())));
        assert!(pairs.contains(&("limit", "100".to_string())));
        assert!(pairs.contains(&("offset", "50".to_string())));
        assert!(pairs.contains(&("sort", "-timestamp".to_string())));
    }

    #[test]
    fn list_query_ignores_empty_filter() {
        let query = ListQuery::new().with_filter(Filter::new());
        assert!(query.to_pairs().is_empty());
        let query = ListQuery::new().with_filter_str("");
        assert!(query.to_pairs().is_empty());
    }
}
