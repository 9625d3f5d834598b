//! Model Context Protocol (MCP) server implementation.
//!
//! This module exposes Linkding bookmark operations as MCP tools. The server
//! speaks JSON-RPC 2.0 over either of two transports.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         MCP Server                          │
//! │                                                             │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    │
//! │   │  Transport  │───▶│   Server    │───▶│   Tools     │    │
//! │   │(stdio, HTTP)│    │ (dispatch)  │    │  (handlers) │    │
//! │   └─────────────┘    └─────────────┘    └─────────────┘    │
//! │                                                │            │
//! │                                                ▼            │
//! │                                    ┌─────────────────────┐ │
//! │                                    │   Linkding client   │ │
//! │                                    └─────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Tools
//!
//! | Tool               | Linkding call             |
//! |--------------------|---------------------------|
//! | `search_bookmarks` | `GET /api/bookmarks/`     |
//! | `create_bookmark`  | `POST /api/bookmarks/`    |
//! | `get_tags`         | `GET /api/tags/`          |

pub mod format;
pub mod http;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::{LineTransport, StdioTransport, TransportError};
