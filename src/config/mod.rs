use anyhow::{anyhow, Result};
use std::str::FromStr;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
pub const DEFAULT_ALERT_TTL_SECONDS: u64 = 5;

/// Runtime knobs for the feed core plus the endpoints the shipped
/// collaborators talk to. Library embedders can build one directly or
/// start from `Default`; the binary loads it from the environment.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub api_base_url: String,
    pub ws_url: String,
    pub auth_token: Option<String>,
    pub page_limit: u32,
    pub channel_capacity: usize,
    pub alert_ttl_seconds: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/v1".to_string(),
            ws_url: "ws://127.0.0.1:8080/v1/live".to_string(),
            auth_token: None,
            page_limit: DEFAULT_PAGE_LIMIT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            alert_ttl_seconds: DEFAULT_ALERT_TTL_SECONDS,
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self> {
        let page_limit: u32 = env_or_parse("PAGE_LIMIT", "10")?;
        if page_limit == 0 {
            return Err(anyhow!("PAGE_LIMIT must be at least 1"));
        }

        Ok(Self {
            api_base_url: env_or("API_BASE_URL", "http://127.0.0.1:8080/v1"),
            ws_url: env_or("WS_URL", "ws://127.0.0.1:8080/v1/live"),
            auth_token: std::env::var("AUTH_TOKEN").ok(),
            page_limit,
            channel_capacity: env_or_parse("CHANNEL_CAPACITY", "64")?,
            alert_ttl_seconds: env_or_parse("ALERT_TTL_SECONDS", "5")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
