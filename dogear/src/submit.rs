//! User-initiated creates and deletes.
//!
//! Realtime never echoes a session's own changes back to it, so each
//! submission applies the matching optimistic transition to the session's
//! [`LiveView`] itself; confirmation-by-event only ever happens in *other*
//! sessions.

use parallax::{Error, LiveView, RecordStore, Session};

use crate::model::{Bookmark, BookmarkId, NewBookmark, UserId};

/// Prefix `https://` unless an explicit scheme is already present.
///
/// A best-effort heuristic, not URL validation - malformed hosts are the
/// store's problem, not ours.
fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Validate and create a bookmark, then make it visible locally.
///
/// Both inputs must be non-empty after trimming; otherwise this fails with
/// [`Error::Validation`] before any network call. On store success the
/// returned record (store-assigned id and timestamp) is inserted into the
/// view before this function returns, so the caller reads its own write
/// immediately. On store failure the view is untouched - there is no
/// optimistic artifact to roll back, since insertion only happens after
/// confirmation.
pub async fn submit_create<S>(
    store: &S,
    session: &Session<UserId>,
    view: &mut LiveView<Bookmark>,
    title: &str,
    raw_url: &str,
) -> Result<Bookmark, Error>
where
    S: RecordStore<Bookmark, Draft = NewBookmark>,
{
    let title = title.trim();
    let raw_url = raw_url.trim();
    if title.is_empty() || raw_url.is_empty() {
        return Err(Error::Validation(
            "title and url are both required".to_string(),
        ));
    }

    let draft = NewBookmark {
        title: title.to_string(),
        url: normalize_url(raw_url),
    };
    let bookmark = store.create(session.owner(), draft).await?;
    log::info!("Created bookmark {} ({})", bookmark.id, bookmark.title);
    view.apply_optimistic_insert(bookmark.clone());
    Ok(bookmark)
}

/// Delete a bookmark, removing it from the view immediately.
///
/// The removal is applied before the store is asked, so the UI responds
/// instantly. The delete request itself is scoped by `(id, owner)` on the
/// server; the owner argument is not a client-side safety check. If the
/// store call fails the record is *not* reinserted - see DESIGN.md.
pub async fn submit_delete<S>(
    store: &S,
    session: &Session<UserId>,
    view: &mut LiveView<Bookmark>,
    id: BookmarkId,
) -> Result<(), Error>
where
    S: RecordStore<Bookmark, Draft = NewBookmark>,
{
    view.apply_optimistic_remove(&id);
    store.delete(session.owner(), &id).await?;
    log::info!("Deleted bookmark {id}");
    Ok(())
}
