use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::domain::notification::Notification;
use crate::infra::channel::{EventStream, LiveChannel};

/// Frames the server sends on the live socket. Unknown frame types are
/// ignored so protocol growth does not break older clients.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    Notification { notification: Notification },
    #[serde(other)]
    Other,
}

/// Live channel over a WebSocket. Each subscribe opens a fresh
/// connection and sends the subscription frame for the active user, so
/// re-subscribing after a disconnect needs no extra protocol.
pub struct WsLiveChannel {
    url: Url,
    auth_token: Option<String>,
    capacity: usize,
}

impl WsLiveChannel {
    pub fn new(url: Url, auth_token: Option<String>, capacity: usize) -> Self {
        Self {
            url,
            auth_token,
            capacity,
        }
    }
}

#[async_trait]
impl LiveChannel for WsLiveChannel {
    async fn subscribe(&self, user_id: Uuid) -> anyhow::Result<EventStream> {
        let (socket, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = socket.split();

        let subscribe = json!({
            "type": "subscribe",
            "user_id": user_id,
            "token": self.auth_token,
        });
        write.send(Message::text(subscribe.to_string())).await?;

        let (tx, rx) = mpsc::channel(self.capacity);
        tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(err) => {
                        warn!(error = %err, "live socket read failed");
                        break;
                    }
                };

                match serde_json::from_str::<ServerFrame>(&text) {
                    Ok(ServerFrame::Notification { notification }) => {
                        if tx.send(notification).await.is_err() {
                            // Consumer unsubscribed.
                            break;
                        }
                    }
                    Ok(ServerFrame::Other) => {}
                    Err(err) => {
                        // One malformed frame must not end the stream.
                        warn!(error = %err, "dropping malformed live frame");
                    }
                }
            }

            let _ = write.close().await;
            debug!(%user_id, "live socket closed");
        });

        Ok(rx)
    }
}
