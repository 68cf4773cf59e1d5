//! Fuzzy search module
//!
//! Query classification and the in-memory index that ranks divisions by
//! name, pinyin, or code fragments.

mod fuzzy_index;

pub use fuzzy_index::{FuzzyMatcher, MemoryFuzzyIndex, SearchQuery};
