pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;

pub use crate::app::reconciler::{FeedItem, NotificationFeed};
pub use crate::app::subscription::{Alert, SubscriptionState};
pub use crate::config::FeedConfig;
pub use crate::domain::detail::DisplayDetail;
pub use crate::domain::notification::{Notification, NotificationKind};
pub use crate::error::FeedError;
