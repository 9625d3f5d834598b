//! Human-readable rendering of Linkding results.
//!
//! MCP clients show this text to users and models verbatim, so the layout is
//! fixed: a count header, then one block per item in server order. Optional
//! lines (description, tags) are left out entirely when empty.

use std::fmt::Write as _;

use crate::linkding::{Bookmark, Tag};

/// Text returned by `get_tags` when Linkding has no tags.
pub const NO_TAGS: &str = "No tags found";

/// Renders tag names as a bracketed, space-separated list: `[a b c]`.
#[must_use]
pub fn tag_list(tags: &[String]) -> String {
    format!("[{}]", tags.join(" "))
}

/// Renders a bookmark search result.
#[must_use]
pub fn bookmark_list(bookmarks: &[Bookmark]) -> String {
    let mut out = format!("Found {} bookmarks:\n\n", bookmarks.len());
    for bookmark in bookmarks {
        let _ = write!(out, "• **{}**\n  URL: {}\n", bookmark.title, bookmark.url);
        if !bookmark.description.is_empty() {
            let _ = writeln!(out, "  Description: {}", bookmark.description);
        }
        if !bookmark.tag_names.is_empty() {
            let _ = writeln!(out, "  Tags: {}", tag_list(&bookmark.tag_names));
        }
        out.push('\n');
    }
    out
}

/// Renders a tag listing.
#[must_use]
pub fn tag_summary(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return NO_TAGS.to_string();
    }

    let mut out = format!("Found {} tags:\n\n", tags.len());
    for tag in tags {
        let _ = writeln!(out, "• {} (ID: {})", tag.name, tag.id);
    }
    out
}

/// Renders the confirmation for a newly created bookmark.
#[must_use]
pub fn created_bookmark(bookmark: &Bookmark) -> String {
    let mut out = format!(
        "✅ Bookmark created successfully!\n\n• **{}**\n  URL: {}\n  ID: {}",
        bookmark.title, bookmark.url, bookmark.id
    );
    if !bookmark.description.is_empty() {
        let _ = write!(out, "\n  Description: {}", bookmark.description);
    }
    if !bookmark.tag_names.is_empty() {
        let _ = write!(out, "\n  Tags: {}", tag_list(&bookmark.tag_names));
    }
    out
}
