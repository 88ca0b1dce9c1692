// frontend/src/push.rs
//
// Push channel client.
//
// Frames look like { "event": "<name>", "data": <payload> }. The player
// server still double-encodes most payloads, so `data` may be a JSON string
// holding the real object; both shapes are accepted.
//
// The supervisor keeps one connection alive, reconnecting after a fixed
// delay, and forwards every decoded frame into the reconciler queue. A bad
// frame is logged and dropped; it never takes the connection down.

use crate::config::DashboardConfig;
use crate::dashboard::{DashboardEvent, LinkStatus};
use crate::error::PushError;
use cardash_shared::{
    DASHBOARD_UPDATE_EVENT, OBD_STATUS_EVENT, PLAYER_UPDATE_EVENT, PushMessage,
};
use futures_util::StreamExt;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

pub fn decode_frame(text: &str) -> Result<PushMessage, PushError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| PushError::Decode(e.to_string()))?;

    let data = match envelope.data {
        Value::String(inner) => {
            serde_json::from_str(&inner).map_err(|e| PushError::Decode(e.to_string()))?
        }
        other => other,
    };

    match envelope.event.as_str() {
        DASHBOARD_UPDATE_EVENT => payload(data).map(PushMessage::Telemetry),
        PLAYER_UPDATE_EVENT => payload(data).map(PushMessage::Player),
        OBD_STATUS_EVENT => payload(data).map(PushMessage::ObdStatus),
        other => Err(PushError::UnknownEvent(other.to_string())),
    }
}

fn payload<T: DeserializeOwned>(data: Value) -> Result<T, PushError> {
    serde_json::from_value(data).map_err(|e| PushError::Decode(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct PushListener {
    url: String,
    reconnect_delay: Duration,
}

impl PushListener {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_url(config.push_url(), config.reconnect_delay)
    }

    pub fn with_url(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run the supervisor until the event queue is closed.
    pub fn spawn(self, events: mpsc::Sender<DashboardEvent>) -> JoinHandle<()> {
        tokio::spawn(async move { self.supervise(events).await })
    }

    async fn supervise(self, events: mpsc::Sender<DashboardEvent>) {
        log::info!("[WS] supervisor starting ({})", self.url);

        loop {
            if events.is_closed() {
                break;
            }

            match self.connect_once(&events).await {
                Ok(()) => break,
                Err(e) => log::warn!("[WS] {e}"),
            }

            if events
                .send(DashboardEvent::Link(LinkStatus::Reconnecting))
                .await
                .is_err()
            {
                break;
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }

        log::info!("[WS] supervisor ended");
    }

    /// `Ok` means the reconciler went away; any `Err` is worth a reconnect.
    async fn connect_once(&self, events: &mpsc::Sender<DashboardEvent>) -> Result<(), PushError> {
        log::info!("[WS] connecting to {}", self.url);

        let (mut ws_stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| PushError::Transport(format!("connect failed: {e}")))?;

        log::info!("[WS] connected");
        if events
            .send(DashboardEvent::Link(LinkStatus::Connected))
            .await
            .is_err()
        {
            return Ok(());
        }

        while let Some(item) = ws_stream.next().await {
            let msg = item.map_err(|e| PushError::Transport(format!("read error: {e}")))?;

            match msg {
                Message::Text(text) => match decode_frame(text.as_str()) {
                    Ok(push) => {
                        log::trace!("[WS] {}", push.event_name());
                        if events.send(DashboardEvent::Push(push)).await.is_err() {
                            return Ok(());
                        }
                    }
                    Err(e) => log::warn!("[WS] dropping frame: {e}"),
                },
                Message::Close(frame) => {
                    log::info!("[WS] server closed: {frame:?}");
                    break;
                }
                _ => {}
            }
        }

        Err(PushError::Closed)
    }
}
