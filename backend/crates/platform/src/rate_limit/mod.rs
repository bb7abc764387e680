//! Rate Limiting Infrastructure
//!
//! Daily sliding-window quota per client identifier. Every request is
//! recorded as a timestamped member of a Redis sorted set keyed by
//! `ratelimit:<identifier>`; the decision is made from the number of
//! members already inside the window.
//!
//! - [`RateLimiter`] - policy: window math, allow/deny, remaining, reset time
//! - [`QuotaStore`] - the atomic "prune + count + insert + expire" round trip
//! - [`RedisQuotaStore`] - the Redis implementation of that round trip
//! - [`DailyQuota`] - what HTTP handlers hold: one charge per request
//!
//! Quota exhaustion is an `Ok` value with `allowed == false`. Every other
//! outcome (missing configuration, unreachable store, malformed reply) is a
//! [`RateLimitError`]; the limiter never fails open.

mod limiter;
mod quota;
mod redis;
mod store;


use std::time::Duration;

pub use self::limiter::RateLimiter;
pub use self::quota::{DailyQuota, LocalDailyQuota, RedisDailyQuota, StoreQuota};
pub use self::redis::RedisQuotaStore;
pub use self::store::{
    LocalQuotaStore, PipelineReplies, QuotaStore, StoreError, WindowEvent,
};

/// Window length: the quota is per day, not configurable
pub const WINDOW_SECS: u64 = 86_400;

/// Limit applied when `max_requests` is unset or zero
pub const DEFAULT_MAX_REQUESTS: u32 = 3;

/// Prefix of every accounting key in the store
pub const KEY_PREFIX: &str = "ratelimit:";

pub const STORE_URL_VAR: &str = "REDIS_URL";
pub const STORE_TOKEN_VAR: &str = "REDIS_TOKEN";
pub const MAX_REQUESTS_VAR: &str = "RATE_LIMIT_MAX_REQUESTS";
pub const STORE_TIMEOUT_VAR: &str = "REDIS_TIMEOUT_MS";

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Rate limit configuration
///
/// Supplied on every check; the limiter keeps no configuration of its own.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Redis endpoint, e.g. `rediss://default@eu1-example.upstash.io:6379`
    pub store_url: Option<String>,
    /// Redis password / access token
    pub store_token: Option<String>,
    /// Maximum requests allowed per window
    pub max_requests: Option<u32>,
    /// Upper bound on one store round trip
    pub store_timeout: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            store_url: None,
            store_token: None,
            max_requests: None,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl RateLimitConfig {
    pub fn new(
        store_url: impl Into<String>,
        store_token: impl Into<String>,
        max_requests: Option<u32>,
    ) -> Self {
        Self {
            store_url: Some(store_url.into()),
            store_token: Some(store_token.into()),
            max_requests,
            ..Self::default()
        }
    }

    /// Load from `REDIS_URL`, `REDIS_TOKEN`, `RATE_LIMIT_MAX_REQUESTS`
    /// and `REDIS_TIMEOUT_MS`.
    ///
    /// Missing credentials are not an error here: they surface as
    /// [`RateLimitError::NotConfigured`] on each check.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let max_requests = non_empty(MAX_REQUESTS_VAR).and_then(|v| match v.trim().parse() {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(
                    var = MAX_REQUESTS_VAR,
                    value = %v,
                    error = %e,
                    "Ignoring invalid max requests override"
                );
                None
            }
        });

        let store_timeout = non_empty(STORE_TIMEOUT_VAR)
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STORE_TIMEOUT);

        Self {
            store_url: non_empty(STORE_URL_VAR),
            store_token: non_empty(STORE_TOKEN_VAR),
            max_requests,
            store_timeout,
        }
    }

    /// Effective limit: `max_requests` when set and non-zero, else 3
    pub fn effective_limit(&self) -> u32 {
        self.max_requests
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_REQUESTS)
    }

    pub fn is_store_configured(&self) -> bool {
        self.store_url.is_some() && self.store_token.is_some()
    }

    pub fn window_ms() -> i64 {
        (WINDOW_SECS * 1000) as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
    pub limit: u32,
}

/// Failure of a rate limit check
///
/// Callers answer these with a 5xx. Quota exhaustion is not an error.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Store credentials are absent
    #[error(
        "Redis not configured: REDIS_URL and REDIS_TOKEN environment variables are required for rate limiting"
    )]
    NotConfigured,

    /// The store client could not be built from the given credentials
    #[error("Redis initialization failed: {0}")]
    InitFailed(String),

    /// The accounting round trip failed or returned an unusable reply
    #[error("Redis not available or not working: {0}")]
    Unavailable(#[source] StoreError),
}

/// Check and record one request for `identifier`
///
/// Builds a short-lived Redis client from `config` (no network traffic
/// until the pipeline runs) and applies the daily window policy.
pub async fn check_rate_limit(
    identifier: &str,
    config: &RateLimitConfig,
) -> Result<RateLimitResult, RateLimitError> {
    let store = RedisQuotaStore::from_config(config)?;
    RateLimiter::new(store)
        .check(identifier, config.effective_limit())
        .await
}
