//! Common utilities for the Palette API client
//!
//! Provides shared functionality used across all API modules.

pub mod query;

use crate::error::PaletteError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// List response wrapper from the Palette API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub listmeta: ListMeta,
}

/// Pagination metadata of a list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub count: u64,
    #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}

/// HTTP client wrapper with authentication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    project_uid: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, api_key: String, project_uid: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            project_uid,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Attach the authentication and scope headers to a request
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("ApiKey", &self.api_key)
            .header("Accept", "application/json");
        match &self.project_uid {
            Some(uid) => request.header("ProjectUid", uid),
            None => request,
        }
    }

    /// Map a non-success response to a `PaletteError`
    async fn check_status(method: &str, path: &str, response: Response) -> Result<Response, PaletteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(PaletteError::NotFound(format!(
                "Resource not found: {} - {}",
                path, body
            ))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PaletteError::Authentication(format!(
                "{} {} rejected: {} - {}",
                method, path, status, body
            ))),
            StatusCode::BAD_REQUEST => Err(PaletteError::InvalidRequest(format!(
                "{} {} failed: {} - {}",
                method, path, status, body
            ))),
            _ => Err(PaletteError::Api(format!(
                "{} {} failed: {} - {}",
                method, path, status, body
            ))),
        }
    }

    /// Decode a JSON body, keeping the start of the payload for error messages
    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, PaletteError> {
        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            PaletteError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Make a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, PaletteError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check_status("GET", path, response).await?;
        Self::decode(response).await
    }

    /// Make a GET request returning the raw body
    pub async fn get_text(&self, path: &str) -> Result<String, PaletteError> {
        let url = self.build_url(path);
        debug!("GET {} (text)", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check_status("GET", path, response).await?;
        Ok(response.text().await?)
    }

    /// Make a POST request
    pub async fn post<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PaletteError> {
        let url = self.build_url(path);
        debug!("POST {} with body: {}", url, serde_json::to_string_pretty(body).unwrap_or_default());

        let response = self
            .authorize(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check_status("POST", path, response).await?;
        Self::decode(response).await
    }

    /// Make a POST request whose response body is ignored
    pub async fn post_no_content<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), PaletteError> {
        self.send_no_content("POST", path, body).await
    }

    /// Make a PUT request
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), PaletteError> {
        self.send_no_content("PUT", path, body).await
    }

    /// Make a PATCH request
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), PaletteError> {
        self.send_no_content("PATCH", path, body).await
    }

    async fn send_no_content<B: Serialize + ?Sized>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<(), PaletteError> {
        let url = self.build_url(path);
        debug!("{} {} with body: {}", method, url, serde_json::to_string_pretty(body).unwrap_or_default());

        let builder = match method {
            "POST" => self.client.post(&url),
            "PUT" => self.client.put(&url),
            "PATCH" => self.client.patch(&url),
            other => {
                return Err(PaletteError::InvalidRequest(format!(
                    "Unsupported method with body: {}",
                    other
                )));
            }
        };

        let response = self
            .authorize(builder)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        Self::check_status(method, path, response).await?;
        Ok(())
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), PaletteError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self.authorize(self.client.delete(&url)).send().await?;
        Self::check_status("DELETE", path, response).await?;
        Ok(())
    }

    /// Fetch every page of a list endpoint, following continuation tokens
    pub async fn fetch_all_pages<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<Vec<T>, PaletteError> {
        let mut all_results = Vec::new();
        let mut continue_token: Option<String> = None;

        loop {
            let page_path = match &continue_token {
                Some(token) => append_query(path, &format!("continue={}", urlencoding::encode(token))),
                None => path.to_string(),
            };
            debug!("Fetching page: {}", page_path);

            let page: ListResponse<T> = self.get(&page_path).await?;
            all_results.extend(page.items);

            match page.listmeta.continue_token {
                Some(token) if !token.is_empty() => continue_token = Some(token),
                _ => break,
            }
        }

        Ok(all_results)
    }
}

/// Append a `key=value` pair to a path that may already carry a query string
pub fn append_query(path: &str, pair: &str) -> String {
    if path.contains('?') {
        format!("{}&{}", path, pair)
    } else {
        format!("{}?{}", path, pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http() -> HttpClient {
        HttpClient::new(Client::new(), "https://palette.example.com/".to_string(), "key".to_string(), None)
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(http().base_url(), "https://palette.example.com");
    }

    #[test]
    fn test_build_url_relative_and_absolute() {
        let http = http();
        assert_eq!(http.build_url("/v1/projects"), "https://palette.example.com/v1/projects");
        assert_eq!(http.build_url("https://other/v1/x"), "https://other/v1/x");
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("/v1/packs", "limit=50"), "/v1/packs?limit=50");
        assert_eq!(append_query("/v1/packs?limit=50", "continue=abc"), "/v1/packs?limit=50&continue=abc");
    }

    #[test]
    fn test_list_response_without_listmeta() {
        let parsed: ListResponse<serde_json::Value> = serde_json::from_str(r#"{"items": [1, 2]}"#)
            .expect("list response should decode");
        assert_eq!(parsed.items.len(), 2);
        assert!(parsed.listmeta.continue_token.is_none());
    }
}
