//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" shared by every backend crate:
//! - The unified application error type and result alias
//! - Error classification mapped to HTTP status codes
//! - Conversions from common library errors
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
