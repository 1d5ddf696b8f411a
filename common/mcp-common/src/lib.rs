//! MCP Common - Shared helpers for MCP servers
//!
//! - **Initialization**: [`init_tracing`] sends logs to stderr, keeping stdout for the protocol
//! - **Results**: [`json_success`] / [`json_error`] wrap serializable values in a `CallToolResult`
//! - **Embeddable**: [`EmbeddableMcp`] lets a host call tools in-process, without a transport

pub mod embeddable;
pub mod init;
pub mod result;

pub use embeddable::{decode_params, EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use init::{init_tracing, LogFormat};
pub use result::{json_error, json_success};

pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
