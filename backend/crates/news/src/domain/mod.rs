//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (SearchHit, Classification, Article)
//! - Domain value objects (Category, Language, SortOrder, CredibilityLevel)
//! - Domain services (credibility heuristics, article identity)
//! - Provider traits (interfaces to search and classification services)

pub mod entities;
pub mod provider;
pub mod services;
pub mod value_objects;
