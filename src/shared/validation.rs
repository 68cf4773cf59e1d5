use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating division codes
    /// Must be all digits, province length (2) or longer
    /// - Valid: "11", "1101", "110101", "110101001"
    /// - Invalid: "1", "", "11a", "11.01", "北京"
    ///
    /// The country pseudo-code "0" is shorter than province length and is
    /// handled separately where it is accepted.
    pub static ref DIVISION_CODE_REGEX: Regex = Regex::new(r"^[0-9]{2,}$").unwrap();
}
