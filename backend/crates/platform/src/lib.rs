//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Daily sliding-window rate limiting backed by Redis sorted sets
//! - Client identification from proxy headers

pub mod client;
pub mod rate_limit;
