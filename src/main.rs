use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use uuid::Uuid;

use aviso::app::reconciler::NotificationFeed;
use aviso::config::FeedConfig;
use aviso::infra::api::HttpNotificationQuery;
use aviso::infra::ws::WsLiveChannel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FeedConfig::from_env()?;
    let user_id: Uuid = std::env::var("USER_ID")
        .map_err(|_| anyhow!("missing required env var: USER_ID"))?
        .parse()
        .map_err(|err| anyhow!("invalid USER_ID: {}", err))?;

    let api_base = Url::parse(&config.api_base_url)
        .map_err(|err| anyhow!("invalid API_BASE_URL: {}", err))?;
    let ws_url = Url::parse(&config.ws_url).map_err(|err| anyhow!("invalid WS_URL: {}", err))?;

    let query = Arc::new(HttpNotificationQuery::new(
        api_base,
        config.auth_token.clone(),
    ));
    let channel = Arc::new(WsLiveChannel::new(
        ws_url,
        config.auth_token.clone(),
        config.channel_capacity,
    ));
    let feed = NotificationFeed::new(query, channel, &config);

    feed.initialize(user_id).await?;

    for item in feed.snapshot() {
        tracing::info!(
            event_id = %item.event.id,
            actor = %item.event.actor.id,
            message = item.message,
            link = item.detail.link.as_deref().unwrap_or("-"),
            "notification"
        );
    }
    tracing::info!(
        unread = feed.unread_count(),
        has_more = feed.has_more(),
        "feed ready, tailing live events"
    );

    let mut alerts = feed.alerts();
    loop {
        tokio::select! {
            alert = alerts.recv() => match alert {
                Ok(alert) => tracing::info!(
                    message = %alert.message,
                    link = alert.link.as_deref().unwrap_or("-"),
                    "alert"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "alert stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
            _ = shutdown_signal() => break,
        }
    }

    feed.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
