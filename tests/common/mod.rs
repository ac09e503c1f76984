#![allow(dead_code)]

//! Shared fixtures: synthetic collaborators and event builders, so the
//! feed core is exercised without any real backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

use aviso::app::reconciler::NotificationFeed;
use aviso::config::FeedConfig;
use aviso::domain::notification::{
    ActorRef, ImageRef, Notification, NotificationKind, PostRef,
};
use aviso::infra::api::{NotificationPage, NotificationQuery};
use aviso::infra::channel::{EventStream, LiveChannel};

// ---------------------------------------------------------------------------
// Event builders
// ---------------------------------------------------------------------------

pub fn actor(id: Uuid) -> ActorRef {
    ActorRef {
        id,
        username: Some("tester".to_string()),
        image: None,
    }
}

pub fn event(id: Uuid, kind: NotificationKind) -> Notification {
    Notification {
        id,
        actor: actor(Uuid::new_v4()),
        created_at: OffsetDateTime::now_utc(),
        kind,
    }
}

pub fn follow_event(id: Uuid) -> Notification {
    event(id, NotificationKind::Follow)
}

pub fn post_like_event(id: Uuid, post_id: Uuid) -> Notification {
    event(
        id,
        NotificationKind::PostLike {
            post: Some(PostRef {
                id: post_id,
                title: Some("Hello".to_string()),
                images: vec![ImageRef {
                    url: "u1".to_string(),
                }],
            }),
        },
    )
}

pub fn follow_events(n: usize) -> Vec<Notification> {
    (0..n).map(|_| follow_event(Uuid::new_v4())).collect()
}

// ---------------------------------------------------------------------------
// Scripted list-query collaborator
// ---------------------------------------------------------------------------

/// Pops pre-queued page results in order and records every request. An
/// optional gate holds each response until released, for exercising the
/// single-flight guard and stale-response handling.
pub struct ScriptedQuery {
    pages: Mutex<VecDeque<Result<NotificationPage, String>>>,
    requests: Mutex<Vec<(u32, u32)>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedQuery {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn push_page(&self, notifications: Vec<Notification>, total_pages: u32) {
        self.pages.lock().push_back(Ok(NotificationPage {
            notifications,
            total_pages,
        }));
    }

    pub fn push_error(&self, message: &str) {
        self.pages.lock().push_back(Err(message.to_string()));
    }

    /// Every `(page, limit)` pair requested so far, in order.
    pub fn requests(&self) -> Vec<(u32, u32)> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl NotificationQuery for ScriptedQuery {
    async fn list(&self, page: u32, limit: u32) -> Result<NotificationPage> {
        self.requests.lock().push((page, limit));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.pages.lock().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(NotificationPage {
                notifications: Vec::new(),
                total_pages: 1,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Loopback live channel
// ---------------------------------------------------------------------------

/// In-memory live channel: tests push synthetic events and the
/// subscription manager consumes them like any real stream.
pub struct LoopbackChannel {
    senders: Mutex<Vec<(Uuid, mpsc::Sender<Notification>)>>,
    pub fail_subscribe: AtomicBool,
}

impl LoopbackChannel {
    pub fn new() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
            fail_subscribe: AtomicBool::new(false),
        }
    }

    /// Delivers an event to every active subscription for `user_id`.
    pub async fn push(&self, user_id: Uuid, event: Notification) {
        let senders: Vec<_> = self
            .senders
            .lock()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, tx)| tx.clone())
            .collect();
        for tx in senders {
            let _ = tx.send(event.clone()).await;
        }
    }
}

#[async_trait]
impl LiveChannel for LoopbackChannel {
    async fn subscribe(&self, user_id: Uuid) -> Result<EventStream> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(anyhow!("subscribe refused"));
        }
        let (tx, rx) = mpsc::channel(16);
        self.senders.lock().push((user_id, tx));
        Ok(rx)
    }
}

// ---------------------------------------------------------------------------
// Feed assembly + polling helper
// ---------------------------------------------------------------------------

pub struct TestFeed {
    pub feed: Arc<NotificationFeed>,
    pub query: Arc<ScriptedQuery>,
    pub channel: Arc<LoopbackChannel>,
}

pub fn feed_config(limit: u32) -> FeedConfig {
    FeedConfig {
        page_limit: limit,
        ..FeedConfig::default()
    }
}

pub fn test_feed(limit: u32) -> TestFeed {
    test_feed_with(Arc::new(ScriptedQuery::new()), limit)
}

pub fn test_feed_with(query: Arc<ScriptedQuery>, limit: u32) -> TestFeed {
    let channel = Arc::new(LoopbackChannel::new());
    let query_dyn: Arc<dyn NotificationQuery> = query.clone();
    let channel_dyn: Arc<dyn LiveChannel> = channel.clone();
    let feed = Arc::new(NotificationFeed::new(
        query_dyn,
        channel_dyn,
        &feed_config(limit),
    ));
    TestFeed {
        feed,
        query,
        channel,
    }
}

/// Polls until `check` passes; panics after two seconds. The routing
/// task runs on the same runtime, so a few yields are all it needs.
pub async fn eventually(check: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not reached within 2s");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
