//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use linkding_mcp::linkding::{
    ApiError, ApiResult, Bookmark, BookmarkPage, BookmarkRequest, LinkdingApi, Page, Tag, TagPage,
};
use linkding_mcp::mcp::McpServer;

/// A call observed by [`SubstituteApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListBookmarks {
        limit: i64,
        offset: i64,
        query: String,
    },
    CreateBookmark(BookmarkRequest),
    UpdateBookmark(i64, BookmarkRequest),
    DeleteBookmark(i64),
    ArchiveBookmark(i64),
    UnarchiveBookmark(i64),
    ListTags {
        limit: i64,
        offset: i64,
    },
}

/// In-memory stand-in for Linkding that records every call.
///
/// Created bookmarks echo the request back with id 7.
#[derive(Default)]
pub struct SubstituteApi {
    calls: Mutex<Vec<Call>>,
    pub bookmarks: Vec<Bookmark>,
    pub tags: Vec<Tag>,
    pub fail_status: Option<u16>,
}

impl SubstituteApi {
    pub fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks,
            ..Self::default()
        }
    }

    pub fn with_tags(tags: Vec<Tag>) -> Self {
        Self {
            tags,
            ..Self::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        self.fail_status
            .map_or(Ok(()), |status| Err(ApiError::Status { status }))
    }
}

#[async_trait]
impl LinkdingApi for SubstituteApi {
    async fn list_bookmarks(&self, limit: i64, offset: i64, query: &str) -> ApiResult<BookmarkPage> {
        self.record(Call::ListBookmarks {
            limit,
            offset,
            query: query.to_string(),
        })?;
        Ok(Page::from_results(self.bookmarks.clone()))
    }

    async fn create_bookmark(&self, request: &BookmarkRequest) -> ApiResult<Bookmark> {
        self.record(Call::CreateBookmark(request.clone()))?;
        Ok(Bookmark {
            id: 7,
            url: request.url.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            tag_names: request.tag_names.clone(),
            ..Bookmark::default()
        })
    }

    async fn update_bookmark(&self, id: i64, request: &BookmarkRequest) -> ApiResult<Bookmark> {
        self.record(Call::UpdateBookmark(id, request.clone()))?;
        Ok(Bookmark {
            id,
            url: request.url.clone(),
            ..Bookmark::default()
        })
    }

    async fn delete_bookmark(&self, id: i64) -> ApiResult<()> {
        self.record(Call::DeleteBookmark(id))
    }

    async fn archive_bookmark(&self, id: i64) -> ApiResult<()> {
        self.record(Call::ArchiveBookmark(id))
    }

    async fn unarchive_bookmark(&self, id: i64) -> ApiResult<()> {
        self.record(Call::UnarchiveBookmark(id))
    }

    async fn list_tags(&self, limit: i64, offset: i64) -> ApiResult<TagPage> {
        self.record(Call::ListTags { limit, offset })?;
        Ok(Page::from_results(self.tags.clone()))
    }
}

/// Builds a server over `api`, keeping a handle for call assertions.
pub fn server_with(api: &Arc<SubstituteApi>) -> McpServer {
    McpServer::new(Arc::clone(api) as Arc<dyn LinkdingApi>)
}

pub fn bookmark(id: i64, title: &str) -> Bookmark {
    Bookmark {
        id,
        url: format!("https://example.com/{id}"),
        title: title.to_string(),
        ..Bookmark::default()
    }
}

pub fn tag(id: i64, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        date_added: None,
    }
}
