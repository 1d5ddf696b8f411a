//! Common types for search requests, results, and health reports
//!
//! Every tool returns one of these shapes serialized as JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which flavour of search a tool performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    General,
    Web,
    Image,
}

impl SearchType {
    /// Upper bound on `num_results` for this search type
    pub fn max_results(self) -> u32 {
        match self {
            SearchType::General => 10,
            SearchType::Web | SearchType::Image => 5,
        }
    }

    /// Result count used when the caller does not pass one
    pub fn default_results(self) -> u32 {
        self.max_results()
    }

    /// Value of the endpoint's `searchType` parameter, unset for general search
    pub fn api_value(self) -> Option<&'static str> {
        match self {
            SearchType::General => None,
            SearchType::Web => Some("web"),
            SearchType::Image => Some("image"),
        }
    }

    /// Fixed label stored in every result's `source` field
    pub fn source_label(self) -> &'static str {
        match self {
            SearchType::General => "Google Custom Search",
            SearchType::Web => "Google Web Search",
            SearchType::Image => "Google Image Search",
        }
    }
}

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub num_results: u32,
    pub search_type: SearchType,
}

impl SearchRequest {
    /// Creates a request, clamping `num_results` to `1..=max` for the type.
    pub fn new(query: impl Into<String>, num_results: u32, search_type: SearchType) -> Self {
        Self {
            query: query.into(),
            num_results: num_results.clamp(1, search_type.max_results()),
            search_type,
        }
    }
}

/// A single normalized search result
///
/// General and web results carry a `snippet`; image results carry the
/// endpoint's `image` metadata object instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Map<String, Value>>,
    pub source: String,
}

impl SearchResult {
    pub fn text(title: String, link: String, snippet: String, search_type: SearchType) -> Self {
        Self {
            title,
            link,
            snippet: Some(snippet),
            image: None,
            source: search_type.source_label().to_string(),
        }
    }

    pub fn image(title: String, link: String, image: Map<String, Value>) -> Self {
        Self {
            title,
            link,
            snippet: None,
            image: Some(image),
            source: SearchType::Image.source_label().to_string(),
        }
    }
}

/// Structured error mapping returned instead of a result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Overall server health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Snapshot of the credential-related environment, with the API key redacted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    #[serde(rename = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub application_credentials: Option<String>,
    #[serde(rename = "GOOGLE_API_KEY")]
    pub api_key: Option<String>,
    #[serde(rename = "GOOGLE_CSE_ID")]
    pub search_engine_id: Option<String>,
}

/// Result of the health check tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub credentials_available: bool,
    pub search_engine_id_set: bool,
    /// Which resolution path won (`service_account`, `api_key`, `default`)
    pub auth_method: Option<String>,
    pub environment_variables: EnvironmentSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_num_results_clamped_per_type() {
        assert_eq!(SearchRequest::new("q", 100, SearchType::General).num_results, 10);
        assert_eq!(SearchRequest::new("q", 100, SearchType::Web).num_results, 5);
        assert_eq!(SearchRequest::new("q", 100, SearchType::Image).num_results, 5);
        assert_eq!(SearchRequest::new("q", 0, SearchType::General).num_results, 1);
        assert_eq!(SearchRequest::new("q", 3, SearchType::Web).num_results, 3);
    }

    #[test]
    fn test_query_preserved() {
        let request = SearchRequest::new("  rust \"async\" ", 5, SearchType::General);
        assert_eq!(request.query, "  rust \"async\" ");
    }

    #[test]
    fn test_api_values() {
        assert_eq!(SearchType::General.api_value(), None);
        assert_eq!(SearchType::Web.api_value(), Some("web"));
        assert_eq!(SearchType::Image.api_value(), Some("image"));
    }

    #[test]
    fn test_text_result_serialization() {
        let result = SearchResult::text(
            "Rust".into(),
            "https://www.rust-lang.org".into(),
            "A language".into(),
            SearchType::Web,
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "title": "Rust",
                "link": "https://www.rust-lang.org",
                "snippet": "A language",
                "source": "Google Web Search"
            })
        );
    }

    #[test]
    fn test_image_result_serialization() {
        let mut image = Map::new();
        image.insert("width".into(), json!(640));
        let result = SearchResult::image("Ferris".into(), "https://example.com/f.png".into(), image);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["image"]["width"], 640);
        assert_eq!(value["source"], "Google Image Search");
        assert!(value.get("snippet").is_none());
    }

    #[test]
    fn test_health_serialization_uses_env_names() {
        let status = HealthStatus {
            status: HealthState::Healthy,
            credentials_available: true,
            search_engine_id_set: false,
            auth_method: Some("api_key".into()),
            environment_variables: EnvironmentSnapshot {
                application_credentials: None,
                api_key: Some("***".into()),
                search_engine_id: None,
            },
        };

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["environment_variables"]["GOOGLE_API_KEY"], "***");
        assert!(value["environment_variables"]["GOOGLE_CSE_ID"].is_null());
    }
}
