//! Daily quota as seen by request handlers

use super::limiter::RateLimiter;
use super::store::QuotaStore;
use super::{RateLimitConfig, RateLimitError, RateLimitResult, check_rate_limit};

/// Charge one request against a client's daily quota
#[trait_variant::make(DailyQuota: Send)]
pub trait LocalDailyQuota {
    async fn consume(&self, identifier: &str) -> Result<RateLimitResult, RateLimitError>;

    /// Limit applied per window
    fn limit(&self) -> u32;
}

/// Redis-backed quota built from configuration on every call
///
/// Missing credentials are reported per request, so a server without a
/// store still starts and answers every charged request with an error.
#[derive(Debug, Clone)]
pub struct RedisDailyQuota {
    config: RateLimitConfig,
}

impl RedisDailyQuota {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

impl DailyQuota for RedisDailyQuota {
    async fn consume(&self, identifier: &str) -> Result<RateLimitResult, RateLimitError> {
        check_rate_limit(identifier, &self.config).await
    }

    fn limit(&self) -> u32 {
        self.config.effective_limit()
    }
}

/// Quota over an already-built store with a fixed limit
pub struct StoreQuota<S> {
    limiter: RateLimiter<S>,
    limit: u32,
}

impl<S> StoreQuota<S>
where
    S: QuotaStore,
{
    /// A `limit` of zero falls back to the default
    pub fn new(store: S, limit: u32) -> Self {
        let limit = RateLimitConfig {
            max_requests: Some(limit),
            ..RateLimitConfig::default()
        }
        .effective_limit();
        Self {
            limiter: RateLimiter::new(store),
            limit,
        }
    }
}

impl<S> DailyQuota for StoreQuota<S>
where
    S: QuotaStore + Sync,
{
    async fn consume(&self, identifier: &str) -> Result<RateLimitResult, RateLimitError> {
        self.limiter.check(identifier, self.limit).await
    }

    fn limit(&self) -> u32 {
        self.limit
    }
}
