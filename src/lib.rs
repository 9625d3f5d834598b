//! linkding-mcp: MCP server for the Linkding bookmark manager
//!
//! This library lets AI assistants search bookmarks, create bookmarks and
//! list tags in a self-hosted Linkding instance through the Model Context
//! Protocol.
//!
//! # Architecture
//!
//! - **Linkding client**: typed, authenticated calls to the Linkding REST API
//! - **MCP server**: JSON-RPC dispatch, tool catalog and result rendering
//! - **Transports**: newline-delimited stdio, and request/response HTTP
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types
//! - [`linkding`] - Linkding REST API client
//! - [`mcp`] - MCP protocol implementation

pub mod config;
pub mod error;
pub mod linkding;
pub mod mcp;
