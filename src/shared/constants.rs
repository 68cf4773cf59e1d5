/// Default number of fuzzy-search hits when `size` is not given
pub const DEFAULT_FUZZY_LIMIT: usize = 5;

/// Maximum number of fuzzy-search hits per request
pub const MAX_FUZZY_LIMIT: usize = 100;

// =============================================================================
// COUNTRY PSEUDO-CODE
// =============================================================================

/// Pseudo-code addressing the country as a whole. It never appears in the
/// dataset document and resolves to [`COUNTRY_NAME`] in ancestry paths.
pub const COUNTRY_CODE: &str = "0";

/// Display name for the country pseudo-code
pub const COUNTRY_NAME: &str = "中国";
