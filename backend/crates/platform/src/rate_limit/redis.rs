//! Redis-backed quota store
//!
//! Uses a MULTI/EXEC pipeline over a sorted set so concurrent requests
//! for one identifier are serialized by Redis itself.

use std::time::Duration;

use redis::{IntoConnectionInfo, Value};

use super::store::{PipelineReplies, QuotaStore, StoreError, WindowEvent};
use super::{RateLimitConfig, RateLimitError};

/// Redis quota store
///
/// Opening the client performs no I/O; a connection is made for each
/// accounting call and dropped afterwards. Each call therefore pays a
/// TCP (and TLS, for `rediss://`) handshake plus a spawned connection
/// driver task. A long-lived `ConnectionManager` would avoid that cost,
/// at the price of process-wide connection state.
#[derive(Debug, Clone)]
pub struct RedisQuotaStore {
    client: redis::Client,
    timeout: Duration,
}

impl RedisQuotaStore {
    /// Build a client from `REDIS_URL` / `REDIS_TOKEN` style configuration
    ///
    /// Fails with [`RateLimitError::NotConfigured`] when either credential
    /// is absent, before any network call.
    pub fn from_config(config: &RateLimitConfig) -> Result<Self, RateLimitError> {
        let (Some(url), Some(token)) = (config.store_url.as_deref(), config.store_token.as_deref())
        else {
            let err = RateLimitError::NotConfigured;
            tracing::error!(
                url_present = config.store_url.is_some(),
                token_present = config.store_token.is_some(),
                error = %err,
                "Rate limit store not configured"
            );
            return Err(err);
        };

        Self::open(url, token, config.store_timeout).map_err(|e| {
            let err = RateLimitError::InitFailed(e.to_string());
            tracing::error!(error = %err, "Rate limit store initialization failed");
            err
        })
    }

    fn open(url: &str, token: &str, timeout: Duration) -> redis::RedisResult<Self> {
        let mut info = url.into_connection_info()?;
        info.redis.password = Some(token.to_string());
        let client = redis::Client::open(info)?;
        Ok(Self { client, timeout })
    }

    async fn run_pipeline(&self, event: &WindowEvent) -> redis::RedisResult<Vec<Value>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        redis::pipe()
            .atomic()
            .zrembyscore(&event.key, 0, event.window_start_ms)
            .zcard(&event.key)
            .zadd(&event.key, &event.member, event.now_ms)
            .expire(&event.key, event.ttl_secs as i64)
            .query_async(&mut conn)
            .await
    }
}

impl QuotaStore for RedisQuotaStore {
    async fn record_event(&self, event: &WindowEvent) -> Result<PipelineReplies, StoreError> {
        let values = tokio::time::timeout(self.timeout, self.run_pipeline(event))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))??;

        Ok(PipelineReplies::new(
            values.into_iter().map(integer_reply).collect(),
        ))
    }
}

fn integer_reply(value: Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(n),
        Value::BulkString(bytes) => std::str::from_utf8(&bytes).ok()?.parse().ok(),
        Value::SimpleString(s) => s.parse().ok(),
        _ => None,
    }
}
