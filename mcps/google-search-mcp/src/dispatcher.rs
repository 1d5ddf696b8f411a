//! Search dispatch
//!
//! Turns one tool call into at most one Custom Search request. Every failure
//! comes back as a [`SearchError`]; nothing is retried.

use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiError, CustomSearchClient, ListRequest, RawItem};
use crate::credentials::{Credential, CredentialResolver, EnvSource, SEARCH_ENGINE_ID_VAR};
use crate::types::{ErrorBody, SearchRequest, SearchResult, SearchType};

/// Everything that can go wrong while serving a search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("No Google credentials available")]
    NoCredentials,

    #[error(
        "GOOGLE_CSE_ID environment variable not set{}",
        general_only(.0, " for Custom Search API")
    )]
    MissingSearchEngineId(SearchType),

    #[error(
        "Service account authentication not yet implemented{}",
        general_only(.0, " for search API")
    )]
    UnimplementedAuthPath(SearchType),

    #[error("Google API error: {0}")]
    RemoteApi(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// General search words its configuration errors more specifically
fn general_only(search_type: &SearchType, suffix: &'static str) -> &'static str {
    match search_type {
        SearchType::General => suffix,
        SearchType::Web | SearchType::Image => "",
    }
}

impl From<ApiError> for SearchError {
    fn from(err: ApiError) -> Self {
        if err.is_remote() {
            SearchError::RemoteApi(err.to_string())
        } else {
            SearchError::Unexpected(err.to_string())
        }
    }
}

impl From<SearchError> for ErrorBody {
    fn from(err: SearchError) -> Self {
        ErrorBody {
            error: err.to_string(),
        }
    }
}

/// Resolves credentials and forwards searches to the API
pub struct SearchDispatcher {
    resolver: CredentialResolver,
    client: CustomSearchClient,
}

impl SearchDispatcher {
    pub fn new(resolver: CredentialResolver, client: CustomSearchClient) -> Self {
        Self { resolver, client }
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    fn env(&self) -> &Arc<dyn EnvSource> {
        self.resolver.env()
    }

    /// Run one search with freshly resolved credentials
    pub async fn dispatch(&self, request: SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        let result = self.dispatch_inner(&request).await;

        match &result {
            Ok(results) => tracing::info!(
                "{:?} search for '{}' returned {} results",
                request.search_type,
                request.query,
                results.len()
            ),
            Err(e @ (SearchError::RemoteApi(_) | SearchError::Unexpected(_))) => {
                tracing::error!("{}", e)
            }
            Err(e) => tracing::warn!("{:?} search not performed: {}", request.search_type, e),
        }

        result
    }

    async fn dispatch_inner(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        let credential = self
            .resolver
            .resolve()
            .await
            .ok_or(SearchError::NoCredentials)?;

        match credential {
            Credential::ApiKey(key) => self.search_with_key(&key, request).await,
            // Token-based search is not wired up; keep the explicit stub.
            Credential::ServiceAccount(_) | Credential::Default(_) => {
                Err(SearchError::UnimplementedAuthPath(request.search_type))
            }
        }
    }

    async fn search_with_key(
        &self,
        api_key: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let search_engine_id = self
            .env()
            .non_empty(SEARCH_ENGINE_ID_VAR)
            .ok_or(SearchError::MissingSearchEngineId(request.search_type))?;

        // SearchRequest fields are public, so the bound is enforced here as well.
        let num = request
            .num_results
            .clamp(1, request.search_type.max_results());

        let list = ListRequest {
            query: &request.query,
            search_engine_id: &search_engine_id,
            num,
            search_type: request.search_type.api_value(),
        };

        let response = self.client.list(api_key, &list).await?;

        Ok(response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| to_result(item, request.search_type))
            .collect())
    }
}

fn to_result(item: RawItem, search_type: SearchType) -> SearchResult {
    let title = item.title.unwrap_or_default();
    let link = item.link.unwrap_or_default();
    match search_type {
        SearchType::Image => SearchResult::image(title, link, item.image.unwrap_or_default()),
        SearchType::General | SearchType::Web => {
            SearchResult::text(title, link, item.snippet.unwrap_or_default(), search_type)
        }
    }
}
