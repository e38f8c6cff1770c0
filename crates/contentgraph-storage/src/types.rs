//! Query and result types used by the store traits.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultList<T> {
    /// The items of the requested page.
    pub items: Vec<T>,
    /// Total count of matching items across all pages.
    pub total: i64,
}

impl<T> ResultList<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    /// A result whose total is the number of items.
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self { items, total }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for ResultList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// OData style list query, as accepted by the content store.
///
/// Rendered with [`ODataQuery::to_query_string`], e.g. `?$top=30&$skip=5`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ODataQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
}

impl ODataQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    #[must_use]
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_orderby(mut self, orderby: impl Into<String>) -> Self {
        self.orderby = Some(orderby.into());
        self
    }

    /// Renders the query as `?$top=..&$skip=..&$search=..&$filter=..&$orderby=..`.
    ///
    /// Parts that are not set (or blank) are omitted; string values are
    /// URL-encoded. Returns an empty string when nothing is set.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5);

        if let Some(top) = self.top {
            parts.push(format!("$top={top}"));
        }
        if let Some(skip) = self.skip {
            parts.push(format!("$skip={skip}"));
        }

        let strings = [
            ("$search", &self.search),
            ("$filter", &self.filter),
            ("$orderby", &self.orderby),
        ];
        for (name, value) in strings {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                parts.push(format!("{name}={}", urlencoding::encode(value)));
            }
        }

        if parts.is_empty() {
            return String::new();
        }

        format!("?{}", parts.join("&"))
    }
}

/// What to query from the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentQuery {
    /// Fetch exactly these ids; missing ids are omitted from the result.
    Ids(BTreeSet<Uuid>),
    /// Run an OData list query.
    OData(ODataQuery),
}

impl ContentQuery {
    pub fn ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self::Ids(ids.into_iter().collect())
    }
}

/// Which version of an entity to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EtagVersion {
    /// The current version.
    #[default]
    Any,
    /// A specific version.
    Exact(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_top_skip() {
        let query = ODataQuery::new().with_top(30).with_skip(5);
        assert_eq!(query.to_query_string(), "?$top=30&$skip=5");
    }

    #[test]
    fn test_query_string_empty() {
        assert_eq!(ODataQuery::new().to_query_string(), "");
        assert_eq!(ODataQuery::new().with_search("  ").to_query_string(), "");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let query = ODataQuery::new()
            .with_search("hello world")
            .with_filter("data/count/iv eq 1")
            .with_orderby("created desc");
        assert_eq!(
            query.to_query_string(),
            "?$search=hello%20world&$filter=data%2Fcount%2Fiv%20eq%201&$orderby=created%20desc"
        );
    }

    #[test]
    fn test_result_list() {
        let list = ResultList::from_items(vec![1, 2, 3]);
        assert_eq!(list.total, 3);
        assert_eq!(list.len(), 3);

        let list: ResultList<i32> = ResultList::new(vec![1], 10);
        assert_eq!(list.total, 10);
        assert!(!list.is_empty());
        assert!(ResultList::<i32>::default().is_empty());
    }

    #[test]
    fn test_content_query_ids_are_deduplicated() {
        let id = Uuid::new_v4();
        let ContentQuery::Ids(ids) = ContentQuery::ids([id, id]) else {
            panic!("expected ids query");
        };
        assert_eq!(ids.len(), 1);
    }
}
