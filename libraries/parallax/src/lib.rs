//! This is a library for keeping several live views of one user's record
//! collection consistent. It was created for Dogear, so it doesn't include
//! much that was not needed for that project.
//!
//! The setup it assumes:
//! 1. Records live in a backing store that assigns ids and timestamps. Each
//!    record belongs to exactly one owner.
//! 2. A push channel delivers insert/delete change events for records as they
//!    are created and deleted by any session - except that a session's own
//!    mutations are never echoed back to it.
//! 3. Each open session (tab, device, window) keeps its own [`LiveView`],
//!    which is the single source of truth its presentation reads from.
//!
//! Because of (2), a session applies its own mutations to its view
//! optimistically, and because another session's events *do* arrive, every
//! transition is idempotent and order-tolerant: inserting an id that is
//! already present is a no-op, deleting an id that isn't there is a no-op.
//! That makes the "did I already apply this?" question disappear.
//!
//! Sounds simple, but there are a few tricky parts that this library handles:
//! the channel must have its auth token installed strictly before it is
//! subscribed (events delivered in between are silently dropped), out-of-order
//! delivery must not misplace records in the timestamp ordering, and delete
//! tombstones may arrive without ownership data and must not be filtered out.

pub mod error;
pub mod filter;
pub mod model;
pub mod session;
pub mod store;
pub mod subscription;
pub mod view;

pub use error::Error;
pub use filter::accept;
pub use model::{ChangeEvent, Keyed};
pub use session::Session;
pub use store::RecordStore;
pub use subscription::{PushChannel, Subscription};
pub use view::{ListenerKey, LiveView};
