//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and the provider ports.

pub mod config;
pub mod fetch_news;
