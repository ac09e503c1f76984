use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::domain::notification::Notification;

/// One page of notification history, recency-descending.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub total_pages: u32,
}

/// The paginated list-query collaborator.
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    async fn list(&self, page: u32, limit: u32) -> anyhow::Result<NotificationPage>;
}

/// HTTP implementation of the list query:
/// `GET {base}/notifications?page&limit` with an optional bearer token.
pub struct HttpNotificationQuery {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpNotificationQuery {
    pub fn new(base_url: Url, bearer_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            bearer_token,
        }
    }
}

#[async_trait]
impl NotificationQuery for HttpNotificationQuery {
    async fn list(&self, page: u32, limit: u32) -> anyhow::Result<NotificationPage> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot be a base"))?
            .pop_if_empty()
            .push("notifications");

        let mut request = self
            .client
            .get(url)
            .query(&[("page", page), ("limit", limit)]);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await?
            .error_for_status()?
            .json::<NotificationPage>()
            .await?;
        Ok(response)
    }
}
