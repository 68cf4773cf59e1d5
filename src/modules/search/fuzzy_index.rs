use crate::modules::catalog::DivisionCatalog;

/// A search query after shape classification
///
/// Classification happens once per request; matchers branch on the variant
/// instead of re-inspecting the raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// All-digit input, matched against division codes
    Numeric(String),
    /// Name or pinyin fragment, lowercased, whitespace and quotes removed
    Text(String),
}

impl SearchQuery {
    /// Classify raw user input.
    ///
    /// Digit-only input (after trimming) goes down the code path. Anything
    /// else is treated as a name or pinyin fragment; inner whitespace is
    /// dropped so "bei jing" and "beijing" are the same query, and single
    /// quotes are stripped outright so they can never reach any downstream
    /// query syntax. Returns `None` when nothing searchable remains.
    pub fn classify(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Some(Self::Numeric(trimmed.to_string()));
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\'')
            .collect::<String>()
            .to_lowercase();
        if cleaned.is_empty() {
            None
        } else {
            Some(Self::Text(cleaned))
        }
    }
}

/// Relevance tier of one entry for one query. Declaration order is the
/// ranking order, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    /// Every query character occurs somewhere in the entry
    Fragment,
    /// Contiguous occurrence away from the start
    Substring,
    /// Contiguous occurrence at the start
    Prefix,
    Exact,
}

/// Pluggable matching strategy over the division entries
pub trait FuzzyMatcher: Send + Sync {
    /// Ranked candidate codes for a query, best first, at most `limit`.
    fn search(&self, query: &SearchQuery, limit: usize) -> Vec<String>;
}

#[derive(Debug, Clone)]
struct SearchEntry {
    code: String,
    name_key: String,
    phonetic_compact: String,
}

/// Linear-scan fuzzy index over all divisions
///
/// The dataset tops out in the low tens of thousands of records, so a
/// contiguous scan with tiered scoring is fast enough and keeps the whole
/// ranking policy in one place.
pub struct MemoryFuzzyIndex {
    entries: Vec<SearchEntry>,
}

impl MemoryFuzzyIndex {
    /// Derive one entry per catalog record. Entries are sorted by code so
    /// scans and tie-breaks are deterministic across processes.
    pub fn build(catalog: &DivisionCatalog) -> Self {
        let mut entries: Vec<SearchEntry> = catalog
            .iter()
            .map(|(code, division)| SearchEntry {
                code: code.clone(),
                name_key: division.name.to_lowercase(),
                phonetic_compact: division
                    .phonetic
                    .as_deref()
                    .unwrap_or("")
                    .split_whitespace()
                    .collect::<String>()
                    .to_lowercase(),
            })
            .collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));

        tracing::info!("Fuzzy index built: {} entries", entries.len());
        Self { entries }
    }

    fn match_numeric(entry: &SearchEntry, digits: &str) -> Option<MatchTier> {
        if entry.code == digits {
            Some(MatchTier::Exact)
        } else if entry.code.starts_with(digits) {
            Some(MatchTier::Prefix)
        } else if entry.code.contains(digits) {
            Some(MatchTier::Substring)
        } else {
            None
        }
    }

    fn match_text(entry: &SearchEntry, needle: &str) -> Option<MatchTier> {
        if entry.name_key == needle || entry.phonetic_compact == needle {
            Some(MatchTier::Exact)
        } else if entry.name_key.starts_with(needle) || entry.phonetic_compact.starts_with(needle)
        {
            Some(MatchTier::Prefix)
        } else if entry.name_key.contains(needle) || entry.phonetic_compact.contains(needle) {
            Some(MatchTier::Substring)
        } else if Self::contains_all_chars(entry, needle) {
            Some(MatchTier::Fragment)
        } else {
            None
        }
    }

    /// Unordered containment: every query character occurs in the name or
    /// the compacted pinyin. Catches shuffled or partially remembered input;
    /// always ranked below any contiguous match.
    fn contains_all_chars(entry: &SearchEntry, needle: &str) -> bool {
        needle
            .chars()
            .all(|c| entry.name_key.contains(c) || entry.phonetic_compact.contains(c))
    }
}

impl FuzzyMatcher for MemoryFuzzyIndex {
    fn search(&self, query: &SearchQuery, limit: usize) -> Vec<String> {
        let needle = match query {
            SearchQuery::Numeric(digits) => digits,
            SearchQuery::Text(text) => text,
        };
        // An empty needle would prefix-match everything
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(MatchTier, &SearchEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let tier = match query {
                    SearchQuery::Numeric(digits) => Self::match_numeric(entry, digits),
                    SearchQuery::Text(text) => Self::match_text(entry, text),
                };
                tier.map(|tier| (tier, entry))
            })
            .collect();

        // Best tier first, then higher administrative levels (shorter
        // codes), then code order
        ranked.sort_by(|(tier_a, entry_a), (tier_b, entry_b)| {
            tier_b
                .cmp(tier_a)
                .then_with(|| entry_a.code.len().cmp(&entry_b.code.len()))
                .then_with(|| entry_a.code.cmp(&entry_b.code))
        });

        ranked
            .into_iter()
            .take(limit)
            .map(|(_, entry)| entry.code.clone())
            .collect()
    }
}
