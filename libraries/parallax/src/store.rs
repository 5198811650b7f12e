//! The seam between the engine and the backing store.

use crate::error::Error;
use crate::model::Keyed;

/// Create/delete access to the backing store, scoped to an owner.
///
/// The store assigns ids and timestamps; clients never do. Deletion is scoped
/// by both id and owner *server-side* - the owner argument here is a request
/// parameter, not the safety boundary.
pub trait RecordStore<R: Keyed> {
    /// The unvalidated payload of a create request (for Dogear: a title and
    /// a raw url).
    type Draft;

    /// Create a record owned by `owner`. Returns the created record with its
    /// store-assigned id and timestamp.
    async fn create(&self, owner: &R::Owner, draft: Self::Draft) -> Result<R, Error>;

    /// Delete the record with `id`, provided it belongs to `owner`.
    async fn delete(&self, owner: &R::Owner, id: &R::Id) -> Result<(), Error>;
}
