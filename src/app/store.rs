use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::notification::Notification;

/// Ordered, id-deduplicated collection of events for one user session.
/// Recency-descending: live pushes enter at the head, fetched history
/// pages at the tail. Push and fetch race to deliver the same backend
/// events; the seen-id set is what keeps an event from appearing twice
/// regardless of interleaving.
#[derive(Debug, Default)]
pub struct FeedStore {
    items: Vec<Notification>,
    seen: HashSet<Uuid>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Head-insert for a live-pushed event. Returns false without
    /// touching the feed when the id is already present.
    pub fn prepend(&mut self, event: Notification) -> bool {
        if !self.seen.insert(event.id) {
            return false;
        }
        self.items.insert(0, event);
        true
    }

    /// Tail-append for a fetched history page, already ordered
    /// recency-descending. Events whose id is already present (earlier
    /// pages or live pushes) are dropped from the batch; relative order
    /// of the remainder is preserved. Returns how many were appended.
    pub fn append_page(&mut self, events: Vec<Notification>) -> usize {
        let mut appended = 0;
        for event in events {
            if self.seen.insert(event.id) {
                self.items.push(event);
                appended += 1;
            }
        }
        appended
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.items.clone()
    }
}
