//! Paginated list envelope returned by collection endpoints.
//!
//! List responses carry a total count (`filteredTotal` when a filter was
//! applied, `absoluteTotal` otherwise), an item array, and, while more pages
//! remain, a `next` field holding the query string for the following page.
//! Absence of `next` marks the final page.

use serde::Deserialize;

/// One page of a collection response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Total matching the applied filter, when the endpoint reports one.
    #[serde(default)]
    pub filtered_total: Option<u64>,
    /// Unfiltered total, when the endpoint reports one.
    #[serde(default)]
    pub absolute_total: Option<u64>,
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Query string for the next page; `None` on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// Offset of this page, when reported.
    #[serde(default)]
    pub offset: Option<u64>,
    /// Page size limit, when reported.
    #[serde(default)]
    pub limit: Option<u64>,
}

impl<T> Page<T> {
    /// Reported total, preferring `filteredTotal` over `absoluteTotal`.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.filtered_total.or(self.absolute_total)
    }

    /// Returns true when no further pages remain.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Query string for the next page, sanitized.
    ///
    /// Some Global Center builds append a bogus `&replicationHasIssue`
    /// filter to their next links; it is stripped here.
    #[must_use]
    pub fn next_query(&self) -> Option<&str> {
        let next = self.next.as_deref()?;
        match next.find("&replicationHasIssue") {
            Some(chop) => Some(&next[..chop]),
            None => Some(next),
        }
    }
}
