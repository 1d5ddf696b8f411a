//! HTTP client for the Custom Search `list` call

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;

/// Parameters of one `cse.list` call
#[derive(Debug, Clone)]
pub struct ListRequest<'a> {
    pub query: &'a str,
    pub search_engine_id: &'a str,
    pub num: u32,
    pub search_type: Option<&'static str>,
}

/// Decoded `cse.list` response; only the parts we read
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub items: Option<Vec<RawItem>>,
    #[serde(default)]
    error: Option<ErrorEnvelope>,
}

/// One entry of `items`; every field is optional on the wire
#[derive(Debug, Deserialize)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub image: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    code: Option<u16>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorEnvelope,
}

/// Client for the Custom Search JSON API
#[derive(Debug, Clone)]
pub struct CustomSearchClient {
    http: Client,
    base_url: String,
}

impl CustomSearchClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Run one search. The API key is sent as the `key` query parameter and
    /// is never logged.
    #[instrument(skip(self, api_key, request), fields(query = %request.query, num = request.num))]
    pub async fn list(&self, api_key: &str, request: &ListRequest<'_>) -> ApiResult<ListResponse> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("key", api_key)
                .append_pair("cx", request.search_engine_id)
                .append_pair("q", request.query)
                .append_pair("num", &request.num.to_string());
            if let Some(search_type) = request.search_type {
                pairs.append_pair("searchType", search_type);
            }
        }

        debug!(url = %self.base_url, search_type = ?request.search_type, "Sending Custom Search request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|r| r.error.message)
                .unwrap_or(body);
            error!(status = status.as_u16(), message = %message, "Custom Search API error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: ListResponse = serde_json::from_str(&body)?;

        if let Some(envelope) = decoded.error {
            let status = envelope.code.unwrap_or(status.as_u16());
            let message = envelope.message.unwrap_or_default();
            error!(status, message = %message, "Custom Search API returned an error envelope");
            return Err(ApiError::Status { status, message });
        }

        debug!(
            items = decoded.items.as_ref().map_or(0, Vec::len),
            "Custom Search request completed"
        );

        Ok(decoded)
    }
}
