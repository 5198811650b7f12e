//! Owner-scoping of the raw event stream, applied per event before anything
//! reaches the [`LiveView`](crate::LiveView).

use crate::model::{ChangeEvent, Keyed};

/// Should this event be applied to a view scoped to `owner`?
///
/// Inserts require an exact owner match. Deletes also pass when the tombstone
/// carries no ownership data at all: a delete is only harmful if *missed*
/// (a stale record lingers forever), never if spurious (removing an absent id
/// is a no-op). The filter is conservative only where it has to be.
pub fn accept<R: Keyed>(event: &ChangeEvent<R>, owner: &R::Owner) -> bool {
    match event {
        ChangeEvent::Insert(record) => record.owner() == owner,
        ChangeEvent::Delete {
            owner: event_owner, ..
        } => match event_owner {
            Some(event_owner) => event_owner == owner,
            None => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Keyed;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Clone, Debug)]
    struct Note {
        id: &'static str,
        owner: &'static str,
        at: DateTime<Utc>,
    }

    impl Keyed for Note {
        type Id = &'static str;
        type Owner = &'static str;

        fn id(&self) -> &&'static str {
            &self.id
        }

        fn owner(&self) -> &&'static str {
            &self.owner
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    fn insert(owner: &'static str) -> ChangeEvent<Note> {
        ChangeEvent::Insert(Note {
            id: "n1",
            owner,
            at: Utc.timestamp_opt(0, 0).unwrap(),
        })
    }

    #[test]
    fn test_insert_for_session_owner_accepted() {
        assert!(accept(&insert("alice"), &"alice"));
    }

    #[test]
    fn test_insert_for_other_owner_discarded() {
        assert!(!accept(&insert("bob"), &"alice"));
    }

    #[test]
    fn test_delete_for_session_owner_accepted() {
        let event: ChangeEvent<Note> = ChangeEvent::Delete {
            id: "n1",
            owner: Some("alice"),
        };
        assert!(accept(&event, &"alice"));
    }

    #[test]
    fn test_delete_for_other_owner_discarded() {
        let event: ChangeEvent<Note> = ChangeEvent::Delete {
            id: "n1",
            owner: Some("bob"),
        };
        assert!(!accept(&event, &"alice"));
    }

    #[test]
    fn test_ownerless_tombstone_passes_through() {
        let event: ChangeEvent<Note> = ChangeEvent::Delete {
            id: "n1",
            owner: None,
        };
        assert!(accept(&event, &"alice"));
    }
}
