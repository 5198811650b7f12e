//! The record and change-event shapes the engine works with.

use chrono::{DateTime, Utc};

/// A synced record, as far as this library cares: an opaque store-assigned
/// id, an owner, and a creation timestamp. Payload fields are the
/// application's business.
///
/// Id equality is the sole deduplication key. Two records with identical
/// payloads but different ids are different records.
pub trait Keyed {
    type Id: Eq + Clone + std::fmt::Debug;
    type Owner: Eq + Clone + std::fmt::Debug;

    fn id(&self) -> &Self::Id;
    fn owner(&self) -> &Self::Owner;
    fn created_at(&self) -> DateTime<Utc>;
}

/// A change delivered over the push channel.
///
/// Inserts carry the whole record. Deletes are tombstones: always an id,
/// sometimes an owner - the store does not guarantee ownership data on
/// deleted rows, so it is explicitly optional rather than assumed present.
#[derive(Clone, Debug)]
pub enum ChangeEvent<R: Keyed> {
    Insert(R),
    Delete {
        id: R::Id,
        owner: Option<R::Owner>,
    },
}

impl<R: Keyed> ChangeEvent<R> {
    /// The id of the record this event concerns.
    pub fn id(&self) -> &R::Id {
        match self {
            ChangeEvent::Insert(record) => record.id(),
            ChangeEvent::Delete { id, .. } => id,
        }
    }
}
