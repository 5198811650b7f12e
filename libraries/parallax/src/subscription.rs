//! Lifecycle of one push-channel subscription per open view.

use std::marker::PhantomData;

use futures::{Stream, StreamExt};

use crate::error::Error;
use crate::model::{ChangeEvent, Keyed};
use crate::session::Session;

/// A push channel delivering change events for records in the store.
///
/// The channel only delivers events to armed subscribers: anything emitted
/// after `subscribe` but before `arm` is silently dropped on the server side.
/// [`Subscription::open`] encodes the required ordering; implementors should
/// fail `subscribe` when called unarmed rather than quietly miss events.
pub trait PushChannel<R: Keyed> {
    type Events: Stream<Item = ChangeEvent<R>> + Unpin;

    /// Install the session's access token into the channel's auth context.
    async fn arm(&mut self, access_token: &str) -> Result<(), Error>;

    /// Start delivery. The returned stream is lazy, unbounded, and not
    /// restartable; it ends when the subscription is torn down.
    async fn subscribe(&mut self) -> Result<Self::Events, Error>;

    /// Tear delivery down. Must be idempotent.
    fn unsubscribe(&mut self);
}

/// An open subscription: an armed channel plus its event stream.
///
/// Closing is idempotent and also happens on drop, so the channel is released
/// on every exit path - view teardown, session end, or an error unwinding
/// through the owner.
pub struct Subscription<R: Keyed, C: PushChannel<R>> {
    channel: C,
    events: Option<C::Events>,
    _record: PhantomData<R>,
}

impl<R: Keyed, C: PushChannel<R>> Subscription<R, C> {
    /// Arm the channel with the session's token, then subscribe - strictly in
    /// that order.
    ///
    /// Fails with [`Error::Channel`] if arming or subscribing fails; whether
    /// to retry is the caller's decision.
    pub async fn open(mut channel: C, session: &Session<R::Owner>) -> Result<Self, Error> {
        channel.arm(session.access_token()).await?;
        let events = channel.subscribe().await?;
        Ok(Subscription {
            channel,
            events: Some(events),
            _record: PhantomData,
        })
    }

    /// The next raw change event, or `None` once the subscription is closed
    /// or the channel ends the stream.
    pub async fn next_event(&mut self) -> Option<ChangeEvent<R>> {
        match &mut self.events {
            Some(events) => events.next().await,
            None => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.events.is_some()
    }

    /// Tear the subscription down. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.events.take().is_some() {
            self.channel.unsubscribe();
        }
    }
}

impl<R: Keyed, C: PushChannel<R>> Drop for Subscription<R, C> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use futures::channel::mpsc;
    use std::cell::RefCell;
    use std::rc::Rc;

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

    struct FakeChannel {
        calls: Rc<RefCell<Vec<&'static str>>>,
        fail_arm: bool,
        events: Option<mpsc::UnboundedReceiver<ChangeEvent<Note>>>,
    }

    impl FakeChannel {
        fn new(calls: Rc<RefCell<Vec<&'static str>>>) -> (Self, mpsc::UnboundedSender<ChangeEvent<Note>>) {
            let (sender, receiver) = mpsc::unbounded();
            (
                FakeChannel {
                    calls,
                    fail_arm: false,
                    events: Some(receiver),
                },
                sender,
            )
        }
    }

    impl PushChannel<Note> for FakeChannel {
        type Events = mpsc::UnboundedReceiver<ChangeEvent<Note>>;

        async fn arm(&mut self, _access_token: &str) -> Result<(), Error> {
            self.calls.borrow_mut().push("arm");
            if self.fail_arm {
                return Err(Error::Channel("auth rejected".to_string()));
            }
            Ok(())
        }

        async fn subscribe(&mut self) -> Result<Self::Events, Error> {
            self.calls.borrow_mut().push("subscribe");
            self.events
                .take()
                .ok_or_else(|| Error::Channel("already subscribed".to_string()))
        }

        fn unsubscribe(&mut self) {
            self.calls.borrow_mut().push("unsubscribe");
        }
    }

    impl<R: Keyed, C: PushChannel<R>> std::fmt::Debug for Subscription<R, C> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Subscription")
                .field("open", &self.events.is_some())
                .finish()
        }
    }

    fn session() -> Session<&'static str> {
        Session::new("alice", "jwt-abc").unwrap()
    }

    #[tokio::test]
    async fn test_arm_strictly_before_subscribe() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (channel, _sender) = FakeChannel::new(Rc::clone(&calls));
        let subscription = Subscription::open(channel, &session()).await.unwrap();
        assert_eq!(*calls.borrow(), vec!["arm", "subscribe"]);
        drop(subscription);
    }

    #[tokio::test]
    async fn test_arm_failure_aborts_before_subscribing() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (mut channel, _sender) = FakeChannel::new(Rc::clone(&calls));
        channel.fail_arm = true;
        let err = Subscription::open(channel, &session()).await.unwrap_err();
        assert!(matches!(err, Error::Channel(_)));
        assert_eq!(*calls.borrow(), vec!["arm"]);
    }

    #[tokio::test]
    async fn test_events_flow_in_delivery_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (channel, sender) = FakeChannel::new(Rc::clone(&calls));
        let mut subscription = Subscription::open(channel, &session()).await.unwrap();

        let note = Note {
            id: "n1",
            owner: "alice",
            at: Utc.timestamp_opt(0, 0).unwrap(),
        };
        sender
            .unbounded_send(ChangeEvent::Insert(note.clone()))
            .unwrap();
        sender
            .unbounded_send(ChangeEvent::Delete {
                id: "n1",
                owner: None,
            })
            .unwrap();

        assert!(matches!(
            subscription.next_event().await,
            Some(ChangeEvent::Insert(_))
        ));
        assert!(matches!(
            subscription.next_event().await,
            Some(ChangeEvent::Delete { id: "n1", .. })
        ));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (channel, _sender) = FakeChannel::new(Rc::clone(&calls));
        let mut subscription = Subscription::open(channel, &session()).await.unwrap();

        subscription.close();
        subscription.close();
        assert!(!subscription.is_open());
        assert_eq!(*calls.borrow(), vec!["arm", "subscribe", "unsubscribe"]);
    }

    #[tokio::test]
    async fn test_drop_tears_down_channel() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (channel, _sender) = FakeChannel::new(Rc::clone(&calls));
        let subscription = Subscription::open(channel, &session()).await.unwrap();
        drop(subscription);
        assert_eq!(*calls.borrow(), vec!["arm", "subscribe", "unsubscribe"]);
    }

    #[tokio::test]
    async fn test_next_event_after_close_returns_none() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (channel, sender) = FakeChannel::new(Rc::clone(&calls));
        let mut subscription = Subscription::open(channel, &session()).await.unwrap();
        subscription.close();

        let note = Note {
            id: "n1",
            owner: "alice",
            at: Utc.timestamp_opt(0, 0).unwrap(),
        };
        let _ = sender.unbounded_send(ChangeEvent::Insert(note));
        assert!(subscription.next_event().await.is_none());
    }
}
