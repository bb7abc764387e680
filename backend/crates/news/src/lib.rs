//! Japan News Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, credibility heuristics, provider traits
//! - `application/` - Configuration and the fetch use case
//! - `infra/` - Tavily search and OpenAI-compatible classifier clients
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Quota Model
//! - Every fetch is charged against a daily per-client quota before any
//!   provider is called
//! - The quota store is authoritative; when it cannot be consulted the
//!   request fails with 500 instead of being let through
//! - A rejected request body is answered before the quota is touched

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::NewsConfig;
pub use error::{NewsError, NewsResult};
pub use infra::openai::OpenAiClassifier;
pub use infra::tavily::TavilyClient;
pub use presentation::router::{news_router, news_router_generic};
