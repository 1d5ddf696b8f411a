//! Google Custom Search JSON API client
//!
//! This module wraps the `customsearch/v1` endpoint: one GET per call,
//! decoded into loosely-typed items so missing fields never fail a search.

pub mod client;
pub mod error;

pub use client::{CustomSearchClient, ListRequest, ListResponse, RawItem};
pub use error::{ApiError, ApiResult};
