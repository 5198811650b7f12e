//! The bookmark record as stored in the `bookmarks` table.

use chrono::{DateTime, Utc};
use parallax::Keyed;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub uuid::Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub uuid::Uuid);

impl std::fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One row of the `bookmarks` table. Field names match the column names so
/// PostgREST responses and Realtime payloads deserialize directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub user_id: UserId,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Keyed for Bookmark {
    type Id = BookmarkId;
    type Owner = UserId;

    fn id(&self) -> &BookmarkId {
        &self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Bookmark {
    /// The hostname to display for this bookmark, with any scheme and
    /// leading `www.` stripped. Falls back to the raw url when there is no
    /// recognizable host.
    pub fn hostname(&self) -> &str {
        let rest = self
            .url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
            .unwrap_or(&self.url);
        let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
        host.strip_prefix("www.").unwrap_or(host)
    }
}

/// The unvalidated payload of a create request. Transient: built, validated,
/// submitted, and discarded.
#[derive(Clone, Debug, Serialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
}
