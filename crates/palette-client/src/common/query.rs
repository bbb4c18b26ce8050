//! Query utilities for the Palette API
//!
//! Provides helpers for building filtered list queries and handling pagination.

use crate::common::{HttpClient, ListResponse, append_query};
use crate::error::PaletteError;
use serde::Deserialize;

/// Page size requested from list endpoints
pub const LIST_PAGE_LIMIT: u32 = 50;

/// Build the `filters` query value; Palette combines filter terms with `AND`
pub fn build_filter_query(filters: &[String]) -> Option<String> {
    let terms: Vec<&str> = filters
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(format!("filters={}", urlencoding::encode(&terms.join("AND"))))
    }
}

/// Query resources with optional filtering and pagination
pub async fn query_resources<T: for<'de> Deserialize<'de>>(
    http: &HttpClient,
    path: &str,
    filters: &[String],
    fetch_all: bool,
) -> Result<Vec<T>, PaletteError> {
    let mut url = append_query(path, &format!("limit={}", LIST_PAGE_LIMIT));

    if let Some(filter_query) = build_filter_query(filters) {
        url = append_query(&url, &filter_query);
    }

    if fetch_all {
        http.fetch_all_pages(&url).await
    } else {
        let response: ListResponse<T> = http.get(&url).await?;
        Ok(response.items)
    }
}
