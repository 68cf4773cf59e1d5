//! China administrative divisions feature.
//!
//! Read-only endpoints over the 2020 division dataset: code resolution
//! with ancestry paths, pass-through-aware child listings, and fuzzy
//! search by name, pinyin, or code.
//!
//! ## Data Hierarchy
//!
//! - Level 1: Provinces / municipalities (2-digit codes)
//! - Level 2: Cities (4-digit codes)
//! - Level 3: Counties / districts (6-digit codes)
//! - Below:   Townships and villages (longer codes)
//!
//! Codes nest by prefix, so every ancestor of a division is a prefix of
//! its code.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/status` | Liveness probe |
//! | GET | `/china/division/{year}/fuzzy` | Fuzzy search by name, pinyin, or code |
//! | GET | `/china/division/{year}/{code}` | Resolve a division code |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::DivisionService;
