//! MCP Server implementation for Google search
//!
//! Exposes general, web, and image search plus a health check. Search
//! failures are returned as `{"error": "..."}` tool errors, never as
//! protocol errors.

use anyhow::Result;
use mcp_common::{
    async_trait, decode_params, json_error, json_success, EmbeddableError, EmbeddableMcp,
    EmbeddableResult, McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::api::CustomSearchClient;
use crate::config::Config;
use crate::credentials::CredentialResolver;
use crate::dispatcher::SearchDispatcher;
use crate::health;
use crate::types::{ErrorBody, SearchRequest, SearchType};

const INSTRUCTIONS: &str = "Google Search MCP Server - provides tools for searching Google via \
     the Custom Search JSON API: general search, web search, and image search, plus a \
     health check. Requires GOOGLE_API_KEY and GOOGLE_CSE_ID.";

/// The main Google Search MCP Server
#[derive(Clone)]
pub struct GoogleSearchMcpServer {
    dispatcher: Arc<SearchDispatcher>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "The search query string")]
    pub query: String,
    #[schemars(description = "Number of results to return (default: 10, min: 1, max: 10)")]
    pub num_results: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    #[schemars(description = "The web search query string")]
    pub query: String,
    #[schemars(description = "Number of results to return (default: 5, min: 1, max: 5)")]
    pub num_results: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImageSearchParams {
    #[schemars(description = "The image search query string")]
    pub query: String,
    #[schemars(description = "Number of results to return (default: 5, min: 1, max: 5)")]
    pub num_results: Option<u32>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl GoogleSearchMcpServer {
    /// Server over the process environment, `gcp_auth`, and the configured endpoint
    pub fn new(config: Config) -> Result<Self> {
        let client = CustomSearchClient::new(&config.api)?;
        Ok(Self::with_dispatcher(SearchDispatcher::new(
            CredentialResolver::from_process(),
            client,
        )))
    }

    pub fn with_dispatcher(dispatcher: SearchDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            tool_router: Self::tool_router(),
        }
    }

    async fn run_search(
        &self,
        query: String,
        num_results: Option<u32>,
        search_type: SearchType,
    ) -> Result<CallToolResult, McpError> {
        let num_results = num_results.unwrap_or(search_type.default_results());
        let request = SearchRequest::new(query, num_results, search_type);

        match self.dispatcher.dispatch(request).await {
            Ok(results) => json_success(&results),
            Err(e) => json_error(&ErrorBody::from(e)),
        }
    }

    // ========================================================================
    // Search Tools
    // ========================================================================

    #[tool(
        description = "Perform a Google search and return results with title, link, and snippet (1 to 10 results)"
    )]
    async fn google_search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_search(params.query, params.num_results, SearchType::General)
            .await
    }

    #[tool(description = "Perform a web search using Google and return results (1 to 5 results)")]
    async fn google_search_web(
        &self,
        Parameters(params): Parameters<WebSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_search(params.query, params.num_results, SearchType::Web)
            .await
    }

    #[tool(
        description = "Search for images using Google and return title, link, and image metadata (1 to 5 results)"
    )]
    async fn google_search_images(
        &self,
        Parameters(params): Parameters<ImageSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_search(params.query, params.num_results, SearchType::Image)
            .await
    }

    // ========================================================================
    // Status Tools
    // ========================================================================

    #[tool(
        description = "Check the health and configuration of the Google Search server. The API key is never shown."
    )]
    async fn get_search_health(&self) -> Result<CallToolResult, McpError> {
        json_success(&health::check(self.dispatcher.resolver()).await)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for GoogleSearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for GoogleSearchMcpServer {
    fn server_name(&self) -> &str {
        "google-search"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "google_search" => {
                let params: SearchParams = decode_params(params)?;
                self.google_search(Parameters(params)).await.map_err(Into::into)
            }

            "google_search_web" => {
                let params: WebSearchParams = decode_params(params)?;
                self.google_search_web(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "google_search_images" => {
                let params: ImageSearchParams = decode_params(params)?;
                self.google_search_images(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            "get_search_health" => self.get_search_health().await.map_err(Into::into),

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::testing::FakeLoader;
    use crate::credentials::{API_KEY_VAR, SEARCH_ENGINE_ID_VAR};
    use crate::dispatcher::tests::dispatcher;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server(env: &[(&str, &str)], base_url: &str) -> GoogleSearchMcpServer {
        GoogleSearchMcpServer::with_dispatcher(dispatcher(env, FakeLoader::none(), base_url))
    }

    /// Parse the JSON text of a single-content tool result
    fn body(result: &CallToolResult) -> Value {
        let content = serde_json::to_value(&result.content[0]).unwrap();
        serde_json::from_str(content["text"].as_str().unwrap()).unwrap()
    }

    #[test]
    fn test_lists_all_tools() {
        let server = server(&[], "http://127.0.0.1:1");
        let mut names = server.tool_names();
        names.sort();
        assert_eq!(
            names,
            vec![
                "get_search_health",
                "google_search",
                "google_search_images",
                "google_search_web"
            ]
        );
    }

    #[test]
    fn test_search_tools_describe_result_bounds() {
        let server = server(&[], "http://127.0.0.1:1");
        for tool in server.list_tools() {
            if tool.name.starts_with("google_search") {
                let description = tool.description.as_deref().unwrap_or_default();
                assert!(description.contains("1 to "), "{}: {}", tool.name, description);
            }
        }
    }

    #[tokio::test]
    async fn test_zero_results_requests_one() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("num", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock)
            .await;

        let server = server(
            &[(API_KEY_VAR, "k"), (SEARCH_ENGINE_ID_VAR, "cx")],
            &mock.uri(),
        );
        let result = server
            .call_tool("google_search", json!({"query": "a", "num_results": 0}))
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[tokio::test]
    async fn test_every_search_tool_reports_missing_credentials() {
        let server = server(&[], "http://127.0.0.1:1");

        for tool in ["google_search", "google_search_web", "google_search_images"] {
            let result = server
                .call_tool(tool, json!({"query": "rust"}))
                .await
                .unwrap();
            assert_eq!(result.is_error, Some(true));
            assert_eq!(
                body(&result),
                json!({"error": "No Google credentials available"})
            );
        }
    }

    #[tokio::test]
    async fn test_missing_engine_id() {
        let server = server(&[(API_KEY_VAR, "k")], "http://127.0.0.1:1");

        let result = server
            .call_tool("google_search_images", json!({"query": "ferris"}))
            .await
            .unwrap();
        let error = body(&result)["error"].as_str().unwrap().to_string();
        assert!(error.contains("GOOGLE_CSE_ID"));
    }

    #[tokio::test]
    async fn test_default_num_results_per_tool() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("num", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [
                {"title": "a", "link": "https://a", "snippet": "sa"}
            ]})))
            .expect(1)
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(query_param("num", "5"))
            .and(query_param("searchType", "web"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock)
            .await;

        let server = server(
            &[(API_KEY_VAR, "k"), (SEARCH_ENGINE_ID_VAR, "cx")],
            &mock.uri(),
        );

        let general = server
            .call_tool("google_search", json!({"query": "a"}))
            .await
            .unwrap();
        assert!(!general.is_error.unwrap_or(false));
        assert_eq!(
            body(&general),
            json!([{"title": "a", "link": "https://a", "snippet": "sa", "source": "Google Custom Search"}])
        );

        let web = server
            .call_tool("google_search_web", json!({"query": "a"}))
            .await
            .unwrap();
        assert_eq!(body(&web), json!([]));
    }

    #[tokio::test]
    async fn test_health_redacts_key() {
        let server = server(&[(API_KEY_VAR, "very-secret")], "http://127.0.0.1:1");

        let result = server
            .call_tool("get_search_health", Value::Null)
            .await
            .unwrap();
        let health = body(&result);

        assert_eq!(health["status"], "healthy");
        assert_eq!(health["credentials_available"], true);
        assert_eq!(health["search_engine_id_set"], false);
        assert_eq!(health["environment_variables"]["GOOGLE_API_KEY"], "***");
        assert!(!health.to_string().contains("very-secret"));
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let server = server(&[], "http://127.0.0.1:1");
        let result = server.call_tool("google_search", json!({"num_results": 3})).await;
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = server(&[], "http://127.0.0.1:1");
        let result = server.call_tool("bing_search", json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }
}
