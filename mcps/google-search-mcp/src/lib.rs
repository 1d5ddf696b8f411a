//! Google Search MCP Library
//!
//! Google Custom Search tools via MCP: general search, web search, image
//! search, and a health check.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use google_search_mcp::{Config, GoogleSearchMcpServer};
//!
//! let server = GoogleSearchMcpServer::new(Config::load()?)?;
//! // Serve via stdio, or call tools in-process through EmbeddableMcp
//! ```
//!
//! # Configuration
//! Credentials come from `GOOGLE_APPLICATION_CREDENTIALS`, `GOOGLE_API_KEY`
//! and `GOOGLE_CSE_ID`, read on every call. Endpoint settings live in
//! `~/.binks/google-search.toml` (or `GOOGLE_SEARCH_CONFIG_PATH`).

pub mod api;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod health;
pub mod server;
pub mod types;

pub use config::Config;
pub use credentials::{Credential, CredentialResolver};
pub use dispatcher::{SearchDispatcher, SearchError};
pub use server::GoogleSearchMcpServer;

// Re-export parameter types for direct API usage
pub use server::{ImageSearchParams, SearchParams, WebSearchParams};

// Re-export EmbeddableMcp trait for in-process usage
pub use mcp_common::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
