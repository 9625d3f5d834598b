//! MCP server for Linkding bookmark management.
//!
//! This module owns method dispatch and the tool handlers. It is
//! transport-agnostic: [`McpServer::handle_message`] turns one incoming
//! message into at most one reply, and the stdio loop and the HTTP
//! router both call it.
//!
//! # Error classes
//!
//! - **Protocol errors** (unknown method or tool, malformed params) become
//!   JSON-RPC error replies with numeric codes.
//! - **Business errors** (missing URL, Linkding failures) become successful
//!   replies whose tool result has `isError` set.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::linkding::{BookmarkRequest, LinkdingApi};
use crate::mcp::format;
use crate::mcp::protocol::{
    negotiate_version, parse_message, ErrorCode, IncomingMessage, JsonRpcError,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, OutgoingMessage, RequestId,
    SERVER_NAME, SERVER_TITLE,
};
use crate::mcp::tools::{
    decode_args, find_tool, tool_definitions, BookmarkResult, CreateBookmarkArgs, GetTagsArgs,
    SearchBookmarksArgs, ToolCallResult, ToolKind, CREATED_MESSAGE,
};
use crate::mcp::transport::{LineTransport, StdioTransport, TransportError};

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session. Never true here.
    #[serde(rename = "listChanged", skip_serializing_if = "std::ops::Not::not")]
    pub list_changed: bool,
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            title: SERVER_TITLE.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// The MCP server.
///
/// Holds no per-session state, so one instance can be shared across
/// concurrent HTTP requests.
#[derive(Clone)]
pub struct McpServer {
    client: Arc<dyn LinkdingApi>,
}

impl McpServer {
    /// Creates a server that serves tool calls through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn LinkdingApi>) -> Self {
        Self { client }
    }

    /// Runs the server over stdin/stdout until EOF or a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails or a line is not valid JSON.
    pub async fn serve_stdio(&self) -> Result<(), TransportError> {
        let mut transport = StdioTransport::stdio();
        self.run_with_shutdown(&mut transport).await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> Result<(), TransportError> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, initiating graceful shutdown");
                Ok(())
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
                Ok(())
            }
            result = self.serve(transport) => result,
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> Result<(), TransportError> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                Ok(())
            }
            result = self.serve(transport) => result,
        }
    }

    /// Serves one session over a line transport.
    ///
    /// Messages are handled strictly one at a time. The session ends cleanly
    /// at EOF. A line that is not JSON is answered with a parse error and then
    /// ends the session with [`TransportError::Decode`].
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails, or on an undecodable line.
    pub async fn serve<R, W>(&self, transport: &mut LineTransport<R, W>) -> Result<(), TransportError>
    where
        R: tokio::io::AsyncBufRead + Unpin,
        W: tokio::io::AsyncWrite + Unpin,
    {
        while let Some(line) = transport.read_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let message = match parse_message(&line) {
                Ok(message) => message,
                Err(error) if error.code() == ErrorCode::ParseError.code() => {
                    tracing::error!("Received a line that is not valid JSON, closing session");
                    transport.write_message(&error.clone().into()).await?;
                    let details = error
                        .error
                        .data
                        .as_ref()
                        .and_then(|d| d.get("details"))
                        .and_then(Value::as_str)
                        .unwrap_or("invalid JSON")
                        .to_string();
                    return Err(TransportError::Decode(details));
                }
                Err(error) => {
                    transport.write_message(&error.into()).await?;
                    continue;
                }
            };

            if let Some(reply) = self.handle_message(message).await {
                transport.write_message(&reply).await?;
            }
        }

        tracing::info!("Input closed, ending session");
        Ok(())
    }

    /// Handles a parsed incoming message.
    ///
    /// Returns the reply to send, or `None` for notifications.
    pub async fn handle_message(&self, msg: IncomingMessage) -> Option<OutgoingMessage> {
        match msg {
            IncomingMessage::Request(req) => Some(self.handle_request(&req).await),
            IncomingMessage::Notification(ref notif) => {
                Self::handle_notification(notif);
                None
            }
        }
    }

    /// Handles an incoming request.
    pub async fn handle_request(&self, req: &JsonRpcRequest) -> OutgoingMessage {
        tracing::debug!(method = %req.method, id = %req.id, "Handling request");

        let response = match req.method.as_str() {
            "initialize" => Self::handle_initialize(req),
            "tools/list" => Ok(Self::handle_tools_list(req)),
            "tools/call" => self.handle_tools_call(req).await,
            "ping" => Ok(JsonRpcResponse::success(req.id.clone(), json!({}))),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        match response {
            Ok(resp) => resp.into(),
            Err(error) => {
                tracing::debug!(
                    method = %req.method,
                    code = error.code(),
                    message = %error.error.message,
                    "Request rejected"
                );
                error.into()
            }
        }
    }

    /// Handles an incoming notification.
    fn handle_notification(notif: &JsonRpcNotification) {
        match notif.method.as_str() {
            "notifications/initialized" => tracing::info!("Client initialised"),
            "notifications/cancelled" => {
                tracing::debug!("Client cancelled a request; calls are not interruptible");
            }
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    /// Handles the initialize request.
    ///
    /// Initialisation is acknowledged but does not gate later requests.
    fn handle_initialize(req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let params: InitializeParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                JsonRpcError::invalid_params(
                    req.id.clone(),
                    format!("Invalid initialize params: {e}"),
                )
            })?
            .ok_or_else(|| {
                JsonRpcError::invalid_params(req.id.clone(), "Missing initialize params")
            })?;

        let negotiated_version = negotiate_version(&params.protocol_version);

        tracing::info!(
            client = params.client_info.as_ref().map_or("unknown", |c| c.name.as_str()),
            requested = %params.protocol_version,
            negotiated = negotiated_version,
            "Initialize request"
        );

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({ "tools": tool_definitions() }))
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let params: ToolCallParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                JsonRpcError::invalid_params(
                    req.id.clone(),
                    format!("Invalid tool call params: {e}"),
                )
            })?
            .ok_or_else(|| {
                JsonRpcError::invalid_params(req.id.clone(), "Missing tool call params")
            })?;

        let result = self.call_tool(&req.id, &params.name, &params.arguments).await?;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Resolves, decodes and runs one tool invocation.
    ///
    /// # Errors
    ///
    /// Returns a protocol error for an unknown tool (-32601) or arguments
    /// that do not fit the tool's shape (-32602). Operation failures are
    /// reported inside the returned [`ToolCallResult`] instead.
    pub async fn call_tool(
        &self,
        id: &RequestId,
        name: &str,
        arguments: &Value,
    ) -> Result<ToolCallResult, JsonRpcError> {
        let Some(tool) = find_tool(name) else {
            return Err(JsonRpcError::tool_not_found(id.clone(), name));
        };

        tracing::info!(tool = tool.name, "Tool call");

        let invalid = |e: String| {
            JsonRpcError::invalid_params(id.clone(), format!("Invalid arguments for {name}: {e}"))
        };

        let result = match tool.kind {
            ToolKind::SearchBookmarks => {
                self.search_bookmarks(decode_args(arguments).map_err(invalid)?)
                    .await
            }
            ToolKind::CreateBookmark => {
                self.create_bookmark(decode_args(arguments).map_err(invalid)?)
                    .await
            }
            ToolKind::GetTags => self.get_tags(decode_args(arguments).map_err(invalid)?).await,
        };

        if result.is_error {
            tracing::warn!(
                tool = tool.name,
                error = result.first_text().unwrap_or_default(),
                "Tool call failed"
            );
        }

        Ok(result)
    }

    /// Searches bookmarks.
    async fn search_bookmarks(&self, args: SearchBookmarksArgs) -> ToolCallResult {
        match self
            .client
            .list_bookmarks(args.limit(), 0, args.query())
            .await
        {
            Ok(page) => ToolCallResult::text(format::bookmark_list(&page.results)),
            Err(e) => ToolCallResult::error(format!("Failed to search bookmarks: {e}")),
        }
    }

    /// Creates a bookmark.
    async fn create_bookmark(&self, args: CreateBookmarkArgs) -> ToolCallResult {
        let url = args.url.unwrap_or_default();
        if url.is_empty() {
            return ToolCallResult::error("URL is required");
        }

        let request = BookmarkRequest {
            title: args.title.unwrap_or_default(),
            description: args.description.unwrap_or_default(),
            tag_names: args.tags.unwrap_or_default(),
            ..BookmarkRequest::new(url)
        };

        let bookmark = match self.client.create_bookmark(&request).await {
            Ok(bookmark) => bookmark,
            Err(e) => return ToolCallResult::error(format!("Failed to create bookmark: {e}")),
        };

        let text = format::created_bookmark(&bookmark);
        let record = BookmarkResult {
            id: bookmark.id,
            url: bookmark.url,
            title: bookmark.title,
            description: bookmark.description,
            tags: bookmark.tag_names,
            success: true,
            message: CREATED_MESSAGE.to_string(),
        };

        match serde_json::to_value(&record) {
            Ok(value) => ToolCallResult::text(text).with_structured(value),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialise bookmark record");
                ToolCallResult::text(text)
            }
        }
    }

    /// Lists tags.
    async fn get_tags(&self, args: GetTagsArgs) -> ToolCallResult {
        match self.client.list_tags(args.limit(), 0).await {
            Ok(page) => ToolCallResult::text(format::tag_summary(&page.results)),
            Err(e) => ToolCallResult::error(format!("Failed to get tags: {e}")),
        }
    }
}
