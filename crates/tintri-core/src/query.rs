//! Convenience builder for HTTP query parameters.
//!
//! Filters on list endpoints are ordered string pairs; a key may repeat to
//! express multi-value filters, so the builder keeps pairs rather than a map.

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

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
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

    /// Append using a mapping function when the value is present.
    pub fn push_opt_with<T, F>(&mut self, key: &'static str, value: Option<T>, mut map: F)
    where
        F: FnMut(T) -> String,
    {
        if let Some(value) = value {
            self.pairs.push((key, map(value)));
        }
    }

    /// Append the same key once per value.
    pub fn push_all<I, T>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for value in values {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
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

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("name", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_opt_with_applies_mapper() {
        let mut params = QueryParams::new();
        params.push_opt_with("live", Some(true), |live| {
            if live { "TRUE" } else { "FALSE" }.to_string()
        });
        assert_eq!(params.into_pairs(), vec![("live", "TRUE".to_string())]);
    }

    #[test]
    fn push_all_repeats_the_key() {
        let mut params = QueryParams::new();
        params.push_all("uuid", ["a-1", "a-2"]);
        assert_eq!(
            params.into_pairs(),
            vec![
                ("uuid", "a-1".to_string()),
                ("uuid", "a-2".to_string()),
            ]
        );
    }

    #[test]
    fn order_is_preserved() {
        let mut params = QueryParams::new();
        params.push("queryType", "TOP_DOCS_BY_TIME");
        params.push("limit", 1);
        params.push("type", "USER_GENERATED_SNAPSHOT");
        let keys: Vec<_> = params.as_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["queryType", "limit", "type"]);
    }
}
