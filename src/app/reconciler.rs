use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app::pagination::Pager;
use crate::app::store::FeedStore;
use crate::app::subscription::{Alert, SubscriptionManager, SubscriptionState};
use crate::app::unread::UnreadCounter;
use crate::config::FeedConfig;
use crate::domain::detail::{self, DisplayDetail};
use crate::domain::message;
use crate::domain::notification::Notification;
use crate::error::FeedError;
use crate::infra::api::NotificationQuery;
use crate::infra::channel::LiveChannel;

/// Mutable session state shared between the reconciler and the
/// subscription routing task. One instance per active user session,
/// every mutation serialized behind a single lock.
pub struct FeedState {
    pub(crate) store: FeedStore,
    pub(crate) pager: Pager,
    pub(crate) unread: UnreadCounter,
    /// Bumped on every reset/teardown; a fetch completion whose
    /// generation no longer matches must be discarded rather than
    /// applied to the rebuilt state.
    pub(crate) generation: u64,
}

impl FeedState {
    fn new(limit: u32) -> Self {
        Self {
            store: FeedStore::new(),
            pager: Pager::new(limit),
            unread: UnreadCounter::new(),
            generation: 0,
        }
    }
}

/// Per-item render payload: the canonical event plus its lazily
/// resolved display data.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub event: Notification,
    pub detail: DisplayDetail,
    pub message: &'static str,
}

/// The externally consumed contract: initial load, fetch-more, live
/// ingestion, and reset-on-renavigation, composed over the store,
/// pager, unread counter, and subscription manager.
pub struct NotificationFeed {
    query: Arc<dyn NotificationQuery>,
    subscription: SubscriptionManager,
    state: Arc<Mutex<FeedState>>,
    alerts: broadcast::Sender<Alert>,
    page_limit: u32,
    alert_ttl: Duration,
}

impl NotificationFeed {
    pub fn new(
        query: Arc<dyn NotificationQuery>,
        channel: Arc<dyn LiveChannel>,
        config: &FeedConfig,
    ) -> Self {
        let (alerts, _) = broadcast::channel(config.channel_capacity);
        Self {
            query,
            subscription: SubscriptionManager::new(channel),
            state: Arc::new(Mutex::new(FeedState::new(config.page_limit))),
            alerts,
            page_limit: config.page_limit,
            alert_ttl: Duration::from_secs(config.alert_ttl_seconds),
        }
    }

    /// Fresh session start: clears all session state, subscribes the
    /// live channel for `user_id`, and fetches the first history page.
    /// A channel failure degrades to a history-only feed rather than
    /// failing the whole cycle; the next initialize re-attempts it.
    pub async fn initialize(&self, user_id: Uuid) -> Result<(), FeedError> {
        {
            let mut state = self.state.lock();
            state.generation += 1;
            state.store.reset();
            state.pager.reset();
            state.unread.reset();
        }

        if let Err(err) = self
            .subscription
            .subscribe(
                user_id,
                Arc::clone(&self.state),
                self.alerts.clone(),
                self.alert_ttl,
            )
            .await
        {
            warn!(%user_id, error = %err, "live subscription failed, continuing with history only");
        }

        self.request_next_page().await
    }

    /// The view-entered signal, including re-entry via in-app
    /// navigation. Zeroes the unread counter, then rebuilds the feed.
    /// The counter is reset before the refetch is issued, and the
    /// generation bump inside `initialize` discards any fetch still in
    /// flight from before re-entry, so the reset always wins.
    pub async fn on_view_entered(&self, user_id: Uuid) -> Result<(), FeedError> {
        self.state.lock().unread.reset();
        self.initialize(user_id).await
    }

    /// Scroll-near-end trigger. No-op while a fetch is in flight or
    /// once the history is exhausted.
    pub async fn request_next_page(&self) -> Result<(), FeedError> {
        let (page, generation) = {
            let mut state = self.state.lock();
            match state.pager.begin() {
                Some(page) => (page, state.generation),
                None => return Ok(()),
            }
        };

        debug!(page, "fetching notification page");
        let result = self.query.list(page, self.page_limit).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            // The session was reset or torn down while the fetch was in
            // flight; a late response must not touch the rebuilt state.
            debug!(page, "discarding stale page fetch");
            return Ok(());
        }

        match result {
            Ok(fetched_page) => {
                let fetched = fetched_page.notifications.len();
                let appended = state.store.append_page(fetched_page.notifications);
                state.pager.complete(fetched);
                debug!(
                    page,
                    fetched,
                    appended,
                    total_pages = fetched_page.total_pages,
                    "notification page applied"
                );
                Ok(())
            }
            Err(err) => {
                state.pager.fail();
                warn!(page, error = %err, "notification page fetch failed");
                Err(FeedError::Fetch(err))
            }
        }
    }

    /// Ordered feed snapshot with display data resolved per item.
    pub fn snapshot(&self) -> Vec<FeedItem> {
        let state = self.state.lock();
        state
            .store
            .items()
            .iter()
            .map(|event| FeedItem {
                detail: detail::resolve(event),
                message: message::phrase(&event.kind),
                event: event.clone(),
            })
            .collect()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().pager.loading()
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().pager.has_more()
    }

    pub fn unread_count(&self) -> u64 {
        self.state.lock().unread.count()
    }

    pub fn feed_len(&self) -> usize {
        self.state.lock().store.len()
    }

    pub fn subscription_state(&self) -> SubscriptionState {
        self.subscription.state()
    }

    /// New alert receiver; every accepted live event fans out to all
    /// current receivers.
    pub fn alerts(&self) -> broadcast::Receiver<Alert> {
        self.alerts.subscribe()
    }

    /// Session teardown: discards the effect of any in-flight fetch and
    /// releases the live subscription.
    pub fn shutdown(&self) {
        {
            let mut state = self.state.lock();
            state.generation += 1;
            state.pager.fail();
        }
        self.subscription.unsubscribe();
    }
}
