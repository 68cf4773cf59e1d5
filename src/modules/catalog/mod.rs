//! Division catalog module
//!
//! Owns the in-memory map of administrative divisions loaded from the
//! dataset document, plus the hierarchy queries built on top of it:
//! constant-time lookups, ancestry paths, and pass-through-aware child
//! listings.

mod division_catalog;

pub use division_catalog::{Division, DivisionCatalog, DivisionChild, GeoLocation};
