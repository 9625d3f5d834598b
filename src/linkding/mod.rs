//! Linkding REST API client.
//!
//! Turns typed operation requests into authenticated HTTP calls against a
//! Linkding instance and decodes the responses:
//!
//! | Operation            | Request                                  | Success |
//! |----------------------|------------------------------------------|---------|
//! | `list_bookmarks`     | `GET /api/bookmarks/?limit=&offset=&q=`  | 200     |
//! | `create_bookmark`    | `POST /api/bookmarks/`                   | 201     |
//! | `update_bookmark`    | `PUT /api/bookmarks/{id}/`               | 200     |
//! | `delete_bookmark`    | `DELETE /api/bookmarks/{id}/`            | 204     |
//! | `archive_bookmark`   | `POST /api/bookmarks/{id}/archive/`      | 204     |
//! | `unarchive_bookmark` | `POST /api/bookmarks/{id}/unarchive/`    | 204     |
//! | `list_tags`          | `GET /api/tags/?limit=&offset=`          | 200     |
//!
//! Every request carries `Authorization: Token <api-token>`.

pub mod client;
pub mod error;
pub mod types;

pub use client::{parse_base_url, LinkdingApi, LinkdingClient, REQUEST_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use types::{Bookmark, BookmarkPage, BookmarkRequest, Page, Tag, TagPage};
