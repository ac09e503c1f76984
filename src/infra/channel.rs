use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::notification::Notification;

/// Inbound live-event stream for one subscription. The channel is
/// at-least-once and best-effort-ordered; the consumer dedups by id.
pub type EventStream = mpsc::Receiver<Notification>;

/// The standing push connection, reduced to its boundary contract: one
/// logical subscription per authenticated user. Subscribing again for
/// the same user replaces any previous stream, which is what makes a
/// reconnect just another subscribe for the active user.
#[async_trait]
pub trait LiveChannel: Send + Sync {
    async fn subscribe(&self, user_id: Uuid) -> anyhow::Result<EventStream>;
}
