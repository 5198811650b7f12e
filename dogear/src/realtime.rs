//! Supabase Realtime push channel.
//!
//! One websocket, one phoenix topic. `arm` installs the session's access
//! token; `subscribe` joins the topic with that token and spawns a reader
//! task that turns `postgres_changes` messages into [`ChangeEvent`]s, plus a
//! heartbeat task that keeps the socket alive. Joining without arming first
//! would mean the server delivers nothing (or, worse, events emitted before
//! the token arrives are silently dropped), so an unarmed subscribe fails
//! loudly instead.

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use parallax::{ChangeEvent, Error, PushChannel};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::config::Config;
use crate::model::{Bookmark, BookmarkId, UserId};

const TOPIC: &str = "realtime:public:bookmarks";
const HEARTBEAT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(25);

pub struct RealtimeChannel {
    endpoint: String,
    access_token: Option<String>,
    reader: Option<JoinHandle<()>>,
    heartbeat: Option<JoinHandle<()>>,
}

impl RealtimeChannel {
    pub fn new(config: &Config) -> Self {
        // http(s) base url -> ws(s) websocket endpoint.
        let ws_base = config
            .supabase_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        RealtimeChannel {
            endpoint: format!(
                "{ws_base}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
                config.supabase_anon_key
            ),
            access_token: None,
            reader: None,
            heartbeat: None,
        }
    }

    fn join_message(&self, access_token: &str) -> String {
        serde_json::json!({
            "topic": TOPIC,
            "event": "phx_join",
            "ref": "1",
            "payload": {
                "config": {
                    "postgres_changes": [
                        { "event": "INSERT", "schema": "public", "table": "bookmarks" },
                        { "event": "DELETE", "schema": "public", "table": "bookmarks" },
                    ],
                },
                "access_token": access_token,
            },
        })
        .to_string()
    }
}

impl PushChannel<Bookmark> for RealtimeChannel {
    type Events = mpsc::UnboundedReceiver<ChangeEvent<Bookmark>>;

    async fn arm(&mut self, access_token: &str) -> Result<(), Error> {
        self.access_token = Some(access_token.to_string());
        Ok(())
    }

    async fn subscribe(&mut self) -> Result<Self::Events, Error> {
        let Some(access_token) = self.access_token.clone() else {
            return Err(Error::Channel(
                "subscribe called before the channel was armed".to_string(),
            ));
        };

        // A re-subscribe must not leak the previous socket's tasks.
        self.unsubscribe();

        let (ws, _) = tokio_tungstenite::connect_async(&self.endpoint)
            .await
            .map_err(Error::channel)?;
        let (mut write, mut read) = ws.split();

        write
            .send(Message::Text(self.join_message(&access_token).into()))
            .await
            .map_err(Error::channel)?;

        // The join reply tells us whether the server accepted the token and
        // the postgres_changes config. Don't hand out a stream that will
        // never produce anything.
        loop {
            let message = read
                .next()
                .await
                .ok_or_else(|| Error::Channel("socket closed during join".to_string()))?
                .map_err(Error::channel)?;
            let Message::Text(text) = message else {
                continue;
            };
            let Ok(reply) = serde_json::from_str::<RealtimeMessage>(&text) else {
                continue;
            };
            if reply.event != "phx_reply" || reply.topic != TOPIC {
                continue;
            }
            let status = reply.payload["status"].as_str().unwrap_or("");
            if status != "ok" {
                return Err(Error::Channel(format!("join rejected: {}", reply.payload)));
            }
            break;
        }
        log::info!("Joined realtime topic {TOPIC}");

        let (events_tx, events_rx) = mpsc::unbounded();

        self.reader = Some(tokio::spawn(async move {
            while let Some(message) = read.next().await {
                let text = match message {
                    Ok(Message::Text(text)) => text,
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("Realtime socket error: {e}");
                        break;
                    }
                };
                if let Some(event) = parse_change(&text) {
                    if events_tx.unbounded_send(event).is_err() {
                        // Receiver dropped; the subscription is gone.
                        break;
                    }
                }
            }
            log::info!("Realtime reader finished");
        }));

        self.heartbeat = Some(tokio::spawn(async move {
            let mut heartbeat_ref: u64 = 2;
            loop {
                tokio::time::sleep(HEARTBEAT_INTERVAL).await;
                let heartbeat = serde_json::json!({
                    "topic": "phoenix",
                    "event": "heartbeat",
                    "ref": heartbeat_ref.to_string(),
                    "payload": {},
                })
                .to_string();
                if write.send(Message::Text(heartbeat.into())).await.is_err() {
                    break;
                }
                heartbeat_ref += 1;
            }
        }));

        Ok(events_rx)
    }

    fn unsubscribe(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.abort();
        }
    }
}

impl Drop for RealtimeChannel {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[derive(Deserialize)]
struct RealtimeMessage {
    topic: String,
    event: String,
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct PostgresChange {
    #[serde(rename = "type")]
    kind: String,
    record: Option<Bookmark>,
    old_record: Option<TombstoneRow>,
}

/// What the server reports for a deleted row. With the table's default
/// replica identity only the primary key is present; `user_id` may be
/// missing entirely.
#[derive(Deserialize)]
struct TombstoneRow {
    id: BookmarkId,
    user_id: Option<UserId>,
}

/// One incoming frame -> at most one change event. Replies, heartbeat acks,
/// system notices, and malformed payloads all map to `None`.
fn parse_change(text: &str) -> Option<ChangeEvent<Bookmark>> {
    let message: RealtimeMessage = serde_json::from_str(text).ok()?;
    if message.event != "postgres_changes" {
        return None;
    }
    let change: PostgresChange = serde_json::from_value(message.payload["data"].clone())
        .inspect_err(|e| log::error!("Unparseable postgres_changes payload: {e}"))
        .ok()?;

    match change.kind.as_str() {
        "INSERT" => Some(ChangeEvent::Insert(change.record?)),
        "DELETE" => {
            let tombstone = change.old_record?;
            Some(ChangeEvent::Delete {
                id: tombstone.id,
                owner: tombstone.user_id,
            })
        }
        other => {
            log::debug!("Ignoring postgres_changes of type {other}");
            None
        }
    }
}
