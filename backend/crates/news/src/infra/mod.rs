//! Infrastructure Layer
//!
//! HTTP clients for the search and classification providers.

pub mod openai;
pub mod tavily;
