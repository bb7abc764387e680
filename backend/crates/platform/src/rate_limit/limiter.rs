//! Daily window policy

use chrono::Utc;

use super::store::{QuotaStore, StoreError, WindowEvent};
use super::{KEY_PREFIX, RateLimitConfig, RateLimitError, RateLimitResult, WINDOW_SECS};

/// Sliding-window rate limiter over an injected [`QuotaStore`]
///
/// Holds no counts of its own: every decision is taken from the store's
/// reply, so any number of server instances sharing one store agree.
pub struct RateLimiter<S> {
    store: S,
}

impl<S> RateLimiter<S>
where
    S: QuotaStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record one request for `identifier` and decide whether it is allowed
    ///
    /// The request is recorded even when denied; the decision is taken on
    /// the count *before* insertion, so exactly `limit` requests per window
    /// are allowed.
    pub async fn check(
        &self,
        identifier: &str,
        limit: u32,
    ) -> Result<RateLimitResult, RateLimitError> {
        self.check_at(identifier, limit, Utc::now().timestamp_millis())
            .await
    }

    pub(crate) async fn check_at(
        &self,
        identifier: &str,
        limit: u32,
        now_ms: i64,
    ) -> Result<RateLimitResult, RateLimitError> {
        let window_ms = RateLimitConfig::window_ms();
        let event = WindowEvent {
            key: format!("{}{}", KEY_PREFIX, identifier),
            window_start_ms: now_ms - window_ms,
            now_ms,
            member: format!("{}-{:08x}", now_ms, rand::random::<u32>()),
            ttl_secs: WINDOW_SECS,
        };

        let count = self
            .store
            .record_event(&event)
            .await
            .and_then(|replies| replies.window_count().ok_or(StoreError::MalformedReply))
            .map_err(|e| {
                tracing::error!(identifier = %identifier, error = %e, "Rate limit pipeline failed");
                RateLimitError::Unavailable(e)
            })?;

        let count = u32::try_from(count).unwrap_or(u32::MAX);
        // remaining counts the request just recorded
        let result = RateLimitResult {
            allowed: count < limit,
            remaining: limit.saturating_sub(count.saturating_add(1)),
            reset_at_ms: now_ms + window_ms,
            limit,
        };

        if result.allowed {
            tracing::debug!(
                identifier = %identifier,
                count = count,
                remaining = result.remaining,
                "Rate limit check passed"
            );
        } else {
            tracing::warn!(
                identifier = %identifier,
                count = count,
                max = limit,
                "Rate limit exceeded"
            );
        }

        Ok(result)
    }
}
