//! Request types and query string generation for the collection service.

use serde::Serialize;
use url::Url;

use crate::error::ApiError;
use crate::model::ItemId;

/// Parameters of a `GET /items` call.
///
/// `search` drives normal pagination; `ids` is only set when restoring a
/// persisted order and asks for that exact subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsRequest {
    pub offset: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub ids: Option<Vec<ItemId>>,
}

impl ItemsRequest {
    /// Creates a page request without filters.
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            search: None,
            ids: None,
        }
    }

    /// Filters by a search query. An empty query means unfiltered.
    pub fn search(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.search = if query.is_empty() { None } else { Some(query) };
        self
    }

    /// Restricts the result to an ordered id subset.
    pub fn ids(mut self, ids: Vec<ItemId>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Builds the full `/items` URL against `base_url`.
    pub fn to_url(&self, base_url: &str) -> Result<Url, ApiError> {
        let mut url = endpoint(base_url, "items")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("offset", &self.offset.to_string());
            pairs.append_pair("limit", &self.limit.to_string());
            if let Some(search) = &self.search {
                pairs.append_pair("search", search);
            }
            if let Some(ids) = &self.ids {
                pairs.append_pair("ids", &join_ids(ids));
            }
        }
        Ok(url)
    }
}

/// Body of `POST /select`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectBody<'a> {
    pub ids: &'a [ItemId],
    pub selected: bool,
}

/// Body of `POST /sort`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortBody<'a> {
    pub new_order: &'a [ItemId],
}

/// Joins a service endpoint path onto the base URL.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, ApiError> {
    let base = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))
}

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let url = ItemsRequest::page(40, 20)
            .search("foo bar")
            .to_url("http://localhost:3001/")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/items?offset=40&limit=20&search=foo+bar"
        );
    }

    #[test]
    fn test_empty_search_is_omitted() {
        let request = ItemsRequest::page(0, 20).search("");
        assert_eq!(request.search, None);
        let url = request.to_url("http://localhost:3001").unwrap();
        assert_eq!(url.query(), Some("offset=0&limit=20"));
    }

    #[test]
    fn test_ids_are_comma_joined() {
        let url = ItemsRequest::page(0, 20)
            .ids(vec![5, 3, 9])
            .to_url("http://localhost:3001")
            .unwrap();
        assert_eq!(url.query(), Some("offset=0&limit=20&ids=5%2C3%2C9"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ItemsRequest::page(0, 20).to_url("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_sort_body_field_name() {
        let json = serde_json::to_string(&SortBody { new_order: &[2, 1] }).unwrap();
        assert_eq!(json, r#"{"newOrder":[2,1]}"#);
        let json = serde_json::to_string(&SelectBody { ids: &[7], selected: true }).unwrap();
        assert_eq!(json, r#"{"ids":[7],"selected":true}"#);
    }
}
