//! Quota store contract
//!
//! One atomic round trip per request: prune entries that left the window,
//! count what is left, insert the current event, refresh the key's TTL.

use std::time::Duration;

/// Position of `ZCARD` in the pipeline reply
const COUNT_SLOT: usize = 1;

/// Number of commands in the accounting pipeline
pub const PIPELINE_LEN: usize = 4;

/// One accounting call against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    /// Store key, `ratelimit:<identifier>`
    pub key: String,
    /// Entries scored at or below this are pruned
    pub window_start_ms: i64,
    /// Score of the new entry
    pub now_ms: i64,
    /// Unique member so events in the same millisecond do not collide
    pub member: String,
    /// TTL applied to the key after insertion
    pub ttl_secs: u64,
}

/// Integer replies of the accounting pipeline, in command order
///
/// `None` marks a slot whose reply was nil or not an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReplies(Vec<Option<i64>>);

impl PipelineReplies {
    pub fn new(slots: Vec<Option<i64>>) -> Self {
        Self(slots)
    }

    /// Entries counted before this event was inserted
    ///
    /// `None` when the reply is short or the count slot is nil.
    pub fn window_count(&self) -> Option<u64> {
        if self.0.len() < PIPELINE_LEN {
            return None;
        }
        self.0[COUNT_SLOT].and_then(|n| u64::try_from(n).ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Failure talking to the quota store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("store round trip timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to execute rate limit pipeline")]
    MalformedReply,
}

/// Atomic window accounting backend
///
/// Implementations must apply all four steps indivisibly: concurrent
/// callers for the same key observe a total order of counts.
#[trait_variant::make(QuotaStore: Send)]
pub trait LocalQuotaStore {
    /// Prune, count, insert and expire in one round trip
    async fn record_event(&self, event: &WindowEvent) -> Result<PipelineReplies, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_count_reads_zcard_slot() {
        let replies = PipelineReplies::new(vec![Some(2), Some(5), Some(1), Some(1)]);
        assert_eq!(replies.window_count(), Some(5));
    }

    #[test]
    fn test_window_count_rejects_short_reply() {
        let replies = PipelineReplies::new(vec![Some(0), Some(1), Some(1)]);
        assert_eq!(replies.window_count(), None);
        assert_eq!(PipelineReplies::default().window_count(), None);
    }

    #[test]
    fn test_window_count_rejects_nil_count() {
        let replies = PipelineReplies::new(vec![Some(0), None, Some(1), Some(1)]);
        assert_eq!(replies.window_count(), None);
    }

    #[test]
    fn test_window_count_rejects_negative_count() {
        let replies = PipelineReplies::new(vec![Some(0), Some(-1), Some(1), Some(1)]);
        assert_eq!(replies.window_count(), None);
    }

    #[test]
    fn test_malformed_reply_message() {
        assert_eq!(
            StoreError::MalformedReply.to_string(),
            "Failed to execute rate limit pipeline"
        );
    }
}
