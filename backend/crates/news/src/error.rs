//! News Error Types
//!
//! This module provides news-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::rate_limit::{RateLimitError, WINDOW_SECS};
use thiserror::Error;

use crate::presentation::dto::RateLimitExceededResponse;

/// News-specific result type alias
pub type NewsResult<T> = Result<T, NewsError>;

/// News-specific error variants
#[derive(Debug, Error)]
pub enum NewsError {
    /// The client used up its daily quota
    #[error("Daily rate limit exceeded ({limit} request/day)")]
    QuotaExceeded { limit: u32, reset_at_ms: i64 },

    /// The quota store could not be consulted
    #[error("Rate limit service unavailable: {0}")]
    RateLimitUnavailable(#[from] RateLimitError),

    /// Request body failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A provider's API key is missing
    #[error("{provider} not configured: {var} environment variable is required")]
    NotConfigured {
        provider: &'static str,
        var: &'static str,
    },

    /// A provider answered with an error or an unreadable body
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    /// A provider did not answer in time
    #[error("{0} request timed out")]
    UpstreamTimeout(&'static str),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NewsError {
    /// Wrap a transport error from `provider`
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NewsError::UpstreamTimeout(provider)
        } else {
            NewsError::Upstream {
                provider,
                message: err.to_string(),
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            NewsError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            NewsError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            NewsError::RateLimitUnavailable(_)
            | NewsError::NotConfigured { .. }
            | NewsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NewsError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            NewsError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewsError::QuotaExceeded { .. } => ErrorKind::TooManyRequests,
            NewsError::InvalidRequest(_) => ErrorKind::BadRequest,
            NewsError::RateLimitUnavailable(_)
            | NewsError::NotConfigured { .. }
            | NewsError::Internal(_) => ErrorKind::InternalServerError,
            NewsError::Upstream { .. } => ErrorKind::BadGateway,
            NewsError::UpstreamTimeout(_) => ErrorKind::GatewayTimeout,
        }
    }

    /// Convert to AppError
    ///
    /// The rate limit store failure keeps a fixed headline so the UI can
    /// tell it apart from quota exhaustion.
    pub fn to_app_error(&self) -> AppError {
        match self {
            NewsError::RateLimitUnavailable(e) => {
                AppError::new(self.kind(), "Rate limit service unavailable")
                    .with_detail(e.to_string())
            }
            NewsError::InvalidRequest(msg) => {
                AppError::new(self.kind(), "Invalid request").with_detail(msg.clone())
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            NewsError::RateLimitUnavailable(e) => {
                tracing::error!(error = %e, "Rate limit check failed");
            }
            NewsError::NotConfigured { provider, var } => {
                tracing::error!(provider = provider, var = var, "Provider not configured");
            }
            NewsError::Upstream { provider, message } => {
                tracing::error!(provider = provider, message = %message, "Upstream provider error");
            }
            NewsError::UpstreamTimeout(provider) => {
                tracing::warn!(provider = provider, "Upstream provider timed out");
            }
            NewsError::Internal(msg) => {
                tracing::error!(message = %msg, "News internal error");
            }
            NewsError::QuotaExceeded { limit, .. } => {
                tracing::info!(limit = limit, "Daily quota exhausted");
            }
            NewsError::InvalidRequest(_) => {
                tracing::debug!(error = %self, "News request rejected");
            }
        }
    }
}

impl From<NewsError> for AppError {
    fn from(err: NewsError) -> Self {
        err.to_app_error()
    }
}

impl From<AppError> for NewsError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => {
                NewsError::InvalidRequest(err.detail().unwrap_or(err.message()).to_string())
            }
            _ => NewsError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for NewsError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            NewsError::QuotaExceeded { limit, reset_at_ms } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, WINDOW_SECS.to_string())],
                Json(RateLimitExceededResponse::new(limit, reset_at_ms)),
            )
                .into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}
