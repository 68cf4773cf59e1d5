//! Shared layer - Cross-cutting types and helpers
//!
//! Contains the API response envelope, service-wide constants, and input
//! validation patterns used across features.

pub mod constants;
pub mod types;
pub mod validation;
