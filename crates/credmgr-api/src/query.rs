// Query-string building for list and search requests.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Paging and sorting for list/search requests.
///
/// Every field is optional; absent fields are left out of the query string
/// so the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Page size.
    pub size: Option<u32>,
    /// Sort expression, e.g. `"id,asc"`.
    pub sort: Option<String>,
    /// Ask the server to eagerly load many-valued relationships.
    #[serde(default)]
    pub eagerload: bool,
}

impl ListQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sorted(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn eager(mut self) -> Self {
        self.eagerload = true;
        self
    }

    fn push_paging(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            params.push(("size", size.to_string()));
        }
        if let Some(ref sort) = self.sort {
            params.push(("sort", sort.clone()));
        }
    }

    /// Parameters for `GET /api/<resource>`.
    ///
    /// Always carries a `cacheBuster` so intermediaries never serve a stale list.
    pub fn list_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        self.push_paging(&mut params);
        if self.eagerload {
            params.push(("eagerload", "true".into()));
        }
        params.push(("cacheBuster", Utc::now().timestamp_millis().to_string()));
        params
    }

    /// Parameters for `GET /api/_search/<resource>`.
    pub fn search_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        params.push(("query", query.to_owned()));
        self.push_paging(&mut params);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn default_list_only_busts_cache() {
        let params = ListQuery::default().list_params();
        assert_eq!(keys(&params), vec!["cacheBuster"]);
    }

    #[test]
    fn list_carries_paging_sort_and_eagerload() {
        let params = ListQuery::page(2, 10).sorted("id,asc").eager().list_params();
        assert_eq!(
            keys(&params),
            vec!["page", "size", "sort", "eagerload", "cacheBuster"]
        );
        assert_eq!(params[0].1, "2");
        assert_eq!(params[1].1, "10");
        assert_eq!(params[2].1, "id,asc");
    }

    #[test]
    fn search_leads_with_query_and_has_no_cache_buster() {
        let params = ListQuery::page(0, 5).search_params("name:acme");
        assert_eq!(keys(&params), vec!["query", "page", "size"]);
        assert_eq!(params[0].1, "name:acme");
    }
}
