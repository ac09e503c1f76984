use thiserror::Error;

/// Failure taxonomy for the feed core. Per-event processing failures
/// never surface here: detail resolution is total and degrades to an
/// empty detail, and a malformed live frame is dropped at the channel
/// boundary without ending the stream.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A history page fetch failed. Pagination keeps its page and
    /// `has_more` so a later trigger re-attempts the same page; there
    /// is no automatic retry.
    #[error("notification page fetch failed: {0}")]
    Fetch(anyhow::Error),

    /// Subscribing the live channel failed. The subscription manager
    /// stays unsubscribed until the next initialize cycle.
    #[error("live channel subscription failed: {0}")]
    Channel(anyhow::Error),
}
