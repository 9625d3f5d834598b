//! The tool catalog and the typed argument shapes of each tool.
//!
//! [`CATALOG`] is the single source of truth for what `tools/list`
//! advertises: schemas are generated from it, and the argument defaults it
//! publishes are the same constants the handlers apply.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Default `limit` for `search_bookmarks`.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Default `limit` for `get_tags`.
pub const DEFAULT_TAG_LIMIT: i64 = 50;

/// Confirmation message carried in the structured create result.
pub const CREATED_MESSAGE: &str = "Bookmark created successfully";

/// The tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// `search_bookmarks`
    SearchBookmarks,
    /// `create_bookmark`
    CreateBookmark,
    /// `get_tags`
    GetTags,
}

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A JSON string.
    String,
    /// A JSON integer.
    Integer,
    /// An array of strings.
    StringArray,
}

/// One parameter of a tool's input schema.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Argument name.
    pub name: &'static str,
    /// JSON type.
    pub kind: ParamKind,
    /// Description shown to the client.
    pub description: &'static str,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Default applied when the argument is omitted.
    pub default: Option<i64>,
}

impl ParamSpec {
    const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            default: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn with_default(mut self, default: i64) -> Self {
        self.default = Some(default);
        self
    }

    fn schema(&self) -> Value {
        let mut schema = match self.kind {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Integer => json!({ "type": "integer" }),
            ParamKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
        };
        schema["description"] = Value::from(self.description);
        if let Some(default) = self.default {
            schema["default"] = Value::from(default);
        }
        schema
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    /// Which handler serves this tool.
    pub kind: ToolKind,
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Input parameters, in schema order.
    pub params: &'static [ParamSpec],
    /// Whether calls return a structured [`BookmarkResult`].
    pub structured_output: bool,
}

impl ToolSpec {
    /// Generates the JSON Schema for this tool's arguments.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }

        schema
    }

    /// Builds the `tools/list` entry for this tool.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            input_schema: self.input_schema(),
            output_schema: self.structured_output.then(bookmark_result_schema),
        }
    }
}

/// Every tool the server exposes, in `tools/list` order.
pub const CATALOG: &[ToolSpec] = &[
    ToolSpec {
        kind: ToolKind::SearchBookmarks,
        name: "search_bookmarks",
        description: "Search bookmarks in Linkding",
        params: &[
            ParamSpec::optional("query", ParamKind::String, "Search query"),
            ParamSpec::optional(
                "limit",
                ParamKind::Integer,
                "Maximum number of results (default: 20)",
            )
            .with_default(DEFAULT_SEARCH_LIMIT),
        ],
        structured_output: false,
    },
    ToolSpec {
        kind: ToolKind::CreateBookmark,
        name: "create_bookmark",
        description: "Create a new bookmark in Linkding",
        params: &[
            ParamSpec::optional("url", ParamKind::String, "URL to bookmark").required(),
            ParamSpec::optional("title", ParamKind::String, "Bookmark title"),
            ParamSpec::optional("description", ParamKind::String, "Bookmark description"),
            ParamSpec::optional("tags", ParamKind::StringArray, "List of tags"),
        ],
        structured_output: true,
    },
    ToolSpec {
        kind: ToolKind::GetTags,
        name: "get_tags",
        description: "Get all available tags from Linkding",
        params: &[ParamSpec::optional(
            "limit",
            ParamKind::Integer,
            "Maximum number of tags to return (default: 50)",
        )
        .with_default(DEFAULT_TAG_LIMIT)],
        structured_output: false,
    },
];

/// Looks up a tool by name.
#[must_use]
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    CATALOG.iter().find(|t| t.name == name)
}

/// Returns the `tools/list` entries for the whole catalog.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    CATALOG.iter().map(ToolSpec::definition).collect()
}

fn bookmark_result_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "url": { "type": "string" },
            "title": { "type": "string" },
            "description": { "type": "string" },
            "tags": { "type": "array", "items": { "type": "string" } },
            "success": { "type": "boolean" },
            "message": { "type": "string" }
        },
        "required": ["id", "url", "title", "success"]
    })
}

/// A tool definition for the `tools/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
    /// JSON Schema for the structured result, when the tool returns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

/// Resolves a `limit` argument.
///
/// An omitted limit and an explicit `0` both mean "use the default".
#[must_use]
pub const fn limit_or_default(limit: Option<i64>, default: i64) -> i64 {
    match limit {
        None | Some(0) => default,
        Some(n) => n,
    }
}

/// Arguments of `search_bookmarks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchBookmarksArgs {
    /// Linkding search query; empty matches everything.
    pub query: Option<String>,
    /// Maximum number of results.
    pub limit: Option<i64>,
}

impl SearchBookmarksArgs {
    /// The query to send, empty when none was given.
    #[must_use]
    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    /// The limit to send after defaulting.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        limit_or_default(self.limit, DEFAULT_SEARCH_LIMIT)
    }
}

/// Arguments of `create_bookmark`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateBookmarkArgs {
    /// URL to bookmark. Required; checked by the handler.
    pub url: Option<String>,
    /// Bookmark title.
    pub title: Option<String>,
    /// Bookmark description.
    pub description: Option<String>,
    /// Tag names.
    pub tags: Option<Vec<String>>,
}

/// Arguments of `get_tags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GetTagsArgs {
    /// Maximum number of tags.
    pub limit: Option<i64>,
}

impl GetTagsArgs {
    /// The limit to send after defaulting.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        limit_or_default(self.limit, DEFAULT_TAG_LIMIT)
    }
}

/// Decodes a tool's argument mapping into its typed shape.
///
/// Absent (`null`) arguments decode as all-defaults; unknown keys are
/// ignored.
///
/// # Errors
///
/// Returns the decoder's message when a supplied value has the wrong type
/// or the arguments are not an object.
pub fn decode_args<T: DeserializeOwned + Default>(arguments: &Value) -> Result<T, String> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    T::deserialize(arguments).map_err(|e| e.to_string())
}

/// Structured record returned by `create_bookmark`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkResult {
    /// Identifier assigned by Linkding.
    pub id: i64,
    /// The bookmarked URL.
    pub url: String,
    /// Bookmark title.
    pub title: String,
    /// Bookmark description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Tag names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Always `true` for a created bookmark.
    pub success: bool,
    /// Confirmation message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
///
/// A result with `is_error` set is still a successful protocol exchange:
/// the invocation was well-formed but the operation failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Machine-readable result, for tools that publish an output schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
const fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            structured_content: None,
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            structured_content: None,
            is_error: true,
        }
    }

    /// Attaches a structured payload.
    #[must_use]
    pub fn with_structured(mut self, value: Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    /// Returns the text of the first content item.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}
