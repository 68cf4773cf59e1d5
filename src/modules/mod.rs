//! Modules layer - Infrastructure components behind the features
//!
//! Contains the dataset-backed division catalog and the fuzzy-search index.

pub mod catalog;
pub mod search;
