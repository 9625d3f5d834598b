//! Wire types for the Linkding REST API.
//!
//! Field names match the JSON produced and accepted by Linkding. String
//! fields that Linkding may send as `null` decode as empty strings so the
//! rest of the crate can treat "empty" and "absent" alike.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A bookmark as returned by the Linkding API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bookmark {
    /// Server-assigned identifier.
    pub id: i64,
    /// The bookmarked URL.
    #[serde(deserialize_with = "nullable_string")]
    pub url: String,
    /// Title of the bookmark.
    #[serde(deserialize_with = "nullable_string")]
    pub title: String,
    /// User-provided description.
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
    /// User-provided notes.
    #[serde(deserialize_with = "nullable_string")]
    pub notes: String,
    /// Web archive snapshot URL.
    #[serde(deserialize_with = "nullable_string")]
    pub web_archive_snapshot_url: String,
    /// URL of the site's favicon.
    #[serde(deserialize_with = "nullable_string")]
    pub favicon_url: String,
    /// URL of a preview image.
    #[serde(deserialize_with = "nullable_string")]
    pub preview_image_url: String,
    /// Whether the bookmark is archived.
    pub is_archived: bool,
    /// Whether the bookmark is marked as unread.
    pub unread: bool,
    /// Whether the bookmark is shared.
    pub shared: bool,
    /// Associated tag names, in server order.
    #[serde(deserialize_with = "nullable_vec")]
    pub tag_names: Vec<String>,
    /// When the bookmark was created.
    pub date_added: Option<DateTime<Utc>>,
    /// When the bookmark was last modified.
    pub date_modified: Option<DateTime<Utc>>,
}

/// A tag as returned by the Linkding API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Server-assigned identifier.
    pub id: i64,
    /// Tag name.
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    /// When the tag was created.
    pub date_added: Option<DateTime<Utc>>,
}

/// One page of a paginated Linkding collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Total number of items matching the query.
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    #[serde(default = "Vec::new", deserialize_with = "nullable_vec")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    /// Builds a single, complete page holding `results`.
    #[must_use]
    pub fn from_results(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}

/// A page of bookmarks from `GET /api/bookmarks/`.
pub type BookmarkPage = Page<Bookmark>;

/// A page of tags from `GET /api/tags/`.
pub type TagPage = Page<Tag>;

/// Body for creating or updating a bookmark.
///
/// Only `url` is always sent; every other field is left out of the JSON body
/// while it holds its zero value so Linkding applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookmarkRequest {
    /// The URL to bookmark.
    pub url: String,
    /// Optional title.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Optional notes.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Optional tag names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_names: Vec<String>,
    /// Mark the bookmark as unread.
    #[serde(skip_serializing_if = "is_false")]
    pub unread: bool,
    /// Share the bookmark.
    #[serde(skip_serializing_if = "is_false")]
    pub shared: bool,
    /// Archive the bookmark on creation.
    #[serde(skip_serializing_if = "is_false")]
    pub is_archived: bool,
    /// Skip Linkding's metadata scraping.
    #[serde(skip_serializing_if = "is_false")]
    pub disable_scraping: bool,
}

impl BookmarkRequest {
    /// Creates a request for `url` with every optional field unset.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
