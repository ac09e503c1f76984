use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::app::reconciler::FeedState;
use crate::domain::detail;
use crate::domain::message;
use crate::domain::notification::Notification;
use crate::error::FeedError;
use crate::infra::channel::LiveChannel;

/// Transient alert payload for an accepted live event: the rendered
/// action phrase plus the navigation target, if one resolved. The
/// presentation layer shows it until dismissed or until `ttl` elapses.
#[derive(Debug, Clone)]
pub struct Alert {
    pub message: String,
    pub link: Option<String>,
    pub ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Unsubscribed,
    Subscribing,
    Subscribed,
}

struct Inner {
    state: SubscriptionState,
    task: Option<JoinHandle<()>>,
    /// Bumped on every subscribe/unsubscribe; a connect attempt or a
    /// stream-end cleanup from a superseded subscription is ignored.
    epoch: u64,
}

/// Owns the live channel for one session: subscribes the active user,
/// routes every inbound event into the shared session state, and emits
/// the transient alert. Unsubscribe is idempotent and never fails.
pub struct SubscriptionManager {
    channel: Arc<dyn LiveChannel>,
    inner: Arc<Mutex<Inner>>,
}

impl SubscriptionManager {
    pub fn new(channel: Arc<dyn LiveChannel>) -> Self {
        Self {
            channel,
            inner: Arc::new(Mutex::new(Inner {
                state: SubscriptionState::Unsubscribed,
                task: None,
                epoch: 0,
            })),
        }
    }

    pub fn state(&self) -> SubscriptionState {
        self.inner.lock().state
    }

    /// (Re)subscribes the live channel for `user_id`, replacing any
    /// previous subscription.
    pub async fn subscribe(
        &self,
        user_id: Uuid,
        state: Arc<Mutex<FeedState>>,
        alerts: broadcast::Sender<Alert>,
        alert_ttl: Duration,
    ) -> Result<(), FeedError> {
        self.unsubscribe();

        let epoch = {
            let mut inner = self.inner.lock();
            inner.epoch += 1;
            inner.state = SubscriptionState::Subscribing;
            inner.epoch
        };

        let stream = match self.channel.subscribe(user_id).await {
            Ok(stream) => stream,
            Err(err) => {
                let mut inner = self.inner.lock();
                if inner.epoch == epoch {
                    inner.state = SubscriptionState::Unsubscribed;
                }
                return Err(FeedError::Channel(err));
            }
        };

        {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                // Superseded while connecting; drop the new stream.
                return Ok(());
            }
            inner.state = SubscriptionState::Subscribed;
        }

        let inner_ref = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let mut stream = stream;
            while let Some(event) = stream.recv().await {
                route_event(event, &state, &alerts, alert_ttl);
            }
            debug!(%user_id, "live event stream ended");

            let mut inner = inner_ref.lock();
            if inner.epoch == epoch {
                inner.state = SubscriptionState::Unsubscribed;
                inner.task = None;
            }
        });

        let mut inner = self.inner.lock();
        if inner.epoch == epoch && inner.state == SubscriptionState::Subscribed {
            inner.task = Some(task);
        }
        Ok(())
    }

    /// Tears down the subscription. Safe to call when already
    /// unsubscribed.
    pub fn unsubscribe(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        inner.state = SubscriptionState::Unsubscribed;
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Per-event pipeline: build the alert payload, prepend, count, emit.
/// Resolution is total, so a partial payload degrades to an empty
/// detail instead of stalling the feed.
fn route_event(
    event: Notification,
    state: &Mutex<FeedState>,
    alerts: &broadcast::Sender<Alert>,
    alert_ttl: Duration,
) {
    let detail = detail::resolve(&event);
    let message = message::phrase(&event.kind);
    let event_id = event.id;
    let kind = event.kind.as_str();

    let accepted = {
        let mut state = state.lock();
        let accepted = state.store.prepend(event);
        if accepted {
            state.unread.increment();
        }
        accepted
    };

    if accepted {
        debug!(%event_id, kind, "live event accepted");
        // The alert is fire-and-forget; nobody listening is fine.
        if alerts
            .send(Alert {
                message: message.to_string(),
                link: detail.link,
                ttl: alert_ttl,
            })
            .is_err()
        {
            debug!(%event_id, "no alert receivers");
        }
    } else {
        // At-least-once delivery: redeliveries are expected and must
        // not re-render or re-count.
        debug!(%event_id, kind, "duplicate live event dropped");
    }
}
