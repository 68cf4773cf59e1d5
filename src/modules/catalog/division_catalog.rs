use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::core::error::AppError;
use crate::shared::constants::{COUNTRY_CODE, COUNTRY_NAME};
use crate::shared::validation::DIVISION_CODE_REGEX;

/// Centroid coordinates of a division as shipped in the dataset
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Geodetic datum of the coordinates (e.g. "GCJ02")
    #[serde(rename = "type")]
    pub datum: String,
}

/// One administrative division record from the dataset document
#[derive(Debug, Clone, Deserialize)]
pub struct Division {
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    /// Codes of immediate children, in display order
    #[serde(default)]
    pub children: Option<Vec<String>>,
    /// Administrative wrapper with no identity of its own. Listings show its
    /// children in its place.
    #[serde(default, rename = "is_direct")]
    pub pass_through: bool,
    /// Space-separated pinyin syllables, e.g. "bei jing shi"
    #[serde(default, rename = "pinyin")]
    pub phonetic: Option<String>,
}

/// A child entry as it should appear in a listing, after pass-through
/// expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionChild {
    pub code: String,
    pub name: String,
}

/// Immutable code-to-division map for one dataset vintage
///
/// Loaded once at startup and shared read-only for the lifetime of the
/// process. All hierarchy queries (lookups, ancestry paths, flattened child
/// listings) run against this map.
#[derive(Debug)]
pub struct DivisionCatalog {
    year: String,
    divisions: HashMap<String, Division>,
}

impl DivisionCatalog {
    /// Load the dataset document from disk and validate its references.
    pub fn load(path: &Path, year: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Dataset(format!("failed to read dataset {}: {}", path.display(), e))
        })?;
        let divisions: HashMap<String, Division> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Dataset(format!("failed to parse dataset {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_divisions(divisions, year)?;
        if catalog.is_empty() {
            return Err(AppError::Dataset(format!(
                "dataset {} contains no divisions",
                path.display()
            )));
        }
        tracing::info!(
            "Division catalog loaded: {} divisions (year {})",
            catalog.len(),
            catalog.year()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-parsed records.
    pub fn from_divisions(
        divisions: HashMap<String, Division>,
        year: &str,
    ) -> Result<Self, AppError> {
        let catalog = Self {
            year: year.to_string(),
            divisions,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Every child reference must resolve. A dangling reference means the
    /// document is broken and the process must not start serving from it.
    fn validate(&self) -> Result<(), AppError> {
        for (code, division) in &self.divisions {
            for child in division.children.iter().flatten() {
                if !self.divisions.contains_key(child) {
                    return Err(AppError::DataIntegrity(format!(
                        "division '{}' references unknown child '{}'",
                        code, child
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }

    /// O(1) lookup of one division record
    pub fn lookup(&self, code: &str) -> Option<&Division> {
        self.divisions.get(code)
    }

    /// Iterate all `(code, division)` pairs, in map order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Division)> {
        self.divisions.iter()
    }

    /// Human-readable ancestry path of a code, country level downwards,
    /// joined with single spaces.
    ///
    /// Codes nest by prefix: two digits per level down to county, then the
    /// full code for anything below. Adjacent levels that share a display
    /// name are collapsed to one segment, so a municipality that repeats its
    /// own name at the city level shows up once.
    pub fn full_path(&self, code: &str) -> Result<String, AppError> {
        if code == COUNTRY_CODE {
            return Ok(COUNTRY_NAME.to_string());
        }
        if !DIVISION_CODE_REGEX.is_match(code) {
            return Err(AppError::InvalidInput(format!(
                "division code '{}' must be a digit string of at least two characters",
                code
            )));
        }

        let mut segments: Vec<&str> = Vec::new();
        for prefix_len in [2usize, 4, 6] {
            if code.len() >= prefix_len {
                let name = self.segment_name(code, &code[..prefix_len])?;
                if segments.last() != Some(&name) {
                    segments.push(name);
                }
            }
        }
        if code.len() > 6 {
            let name = self.segment_name(code, code)?;
            if segments.last() != Some(&name) {
                segments.push(name);
            }
        }

        Ok(segments.join(" "))
    }

    /// Name of one ancestry segment. A missing ancestor of an existing code
    /// is a broken document, not a bad request.
    fn segment_name<'a>(&'a self, target: &str, prefix: &str) -> Result<&'a str, AppError> {
        match self.divisions.get(prefix) {
            Some(division) => Ok(division.name.as_str()),
            None if prefix == target => Err(AppError::NotFound(format!(
                "Division with code '{}' not found",
                target
            ))),
            None => Err(AppError::DataIntegrity(format!(
                "division '{}' references missing ancestor '{}'",
                target, prefix
            ))),
        }
    }

    /// Immediate children of a code as a listing should show them:
    /// pass-through wrappers are expanded in place, depth-first, preserving
    /// dataset order.
    pub fn visible_children(&self, code: &str) -> Result<Vec<DivisionChild>, AppError> {
        let Some(division) = self.lookup(code) else {
            return Err(AppError::NotFound(format!(
                "Division with code '{}' not found",
                code
            )));
        };
        let Some(children) = &division.children else {
            return Ok(Vec::new());
        };

        let mut visible = Vec::new();
        // Worklist instead of recursion; a revisited wrapper means the
        // dataset has a cyclic pass-through chain.
        let mut stack: Vec<&str> = children.iter().rev().map(String::as_str).collect();
        let mut expanded: HashSet<&str> = HashSet::new();

        while let Some(child_code) = stack.pop() {
            let child = self.divisions.get(child_code).ok_or_else(|| {
                AppError::DataIntegrity(format!(
                    "division '{}' references unknown child '{}'",
                    code, child_code
                ))
            })?;

            if child.pass_through {
                if !expanded.insert(child_code) {
                    return Err(AppError::DataIntegrity(format!(
                        "cyclic pass-through chain at division '{}'",
                        child_code
                    )));
                }
                for grandchild in child.children.iter().flatten().rev() {
                    stack.push(grandchild);
                }
            } else {
                visible.push(DivisionChild {
                    code: child_code.to_string(),
                    name: child.name.clone(),
                });
            }
        }

        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_divisions() -> HashMap<String, Division> {
        let raw = r#"{
            "11": {
                "name": "北京市",
                "pinyin": "bei jing shi",
                "location": {"lat": 39.904989, "lng": 116.405285, "type": "GCJ02"},
                "children": ["1101"]
            },
            "1101": {
                "name": "北京市",
                "pinyin": "bei jing shi",
                "is_direct": true,
                "children": ["110101", "110102", "110105"]
            },
            "110101": {
                "name": "东城区",
                "pinyin": "dong cheng qu",
                "children": ["110101001"]
            },
            "110101001": {"name": "东华门街道", "pinyin": "dong hua men jie dao"},
            "110102": {"name": "西城区", "pinyin": "xi cheng qu"},
            "110105": {"name": "朝阳区", "pinyin": "chao yang qu"},
            "13": {
                "name": "河北省",
                "pinyin": "he bei sheng",
                "children": ["1301"]
            },
            "1301": {
                "name": "石家庄市",
                "pinyin": "shi jia zhuang shi",
                "children": ["130102", "130104"]
            },
            "130102": {"name": "长安区", "pinyin": "chang an qu"},
            "130104": {"name": "桥西区", "pinyin": "qiao xi qu"}
        }"#;
        serde_json::from_str(raw).unwrap()
    }

    fn sample_catalog() -> DivisionCatalog {
        DivisionCatalog::from_divisions(sample_divisions(), "2020").unwrap()
    }

    #[test]
    fn test_deserializes_optional_fields() {
        let divisions = sample_divisions();
        let beijing = &divisions["11"];
        assert!(!beijing.pass_through);
        assert_eq!(beijing.phonetic.as_deref(), Some("bei jing shi"));
        let location = beijing.location.as_ref().unwrap();
        assert_eq!(location.datum, "GCJ02");
        assert!((location.latitude - 39.904989).abs() < 1e-9);

        let wrapper = &divisions["1101"];
        assert!(wrapper.pass_through);
        assert!(wrapper.location.is_none());

        let leaf = &divisions["110102"];
        assert!(leaf.children.is_none());
    }

    #[test]
    fn test_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.lookup("11").unwrap().name, "北京市");
        assert!(catalog.lookup("99").is_none());
        assert!(catalog.lookup("0").is_none());
    }

    #[test]
    fn test_rejects_dangling_child_reference() {
        let mut divisions = sample_divisions();
        divisions.get_mut("13").unwrap().children = Some(vec!["1399".to_string()]);

        let err = DivisionCatalog::from_divisions(divisions, "2020").unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
        assert!(err.to_string().contains("1399"));
    }

    #[test]
    fn test_full_path_country_pseudo_code() {
        let catalog = sample_catalog();
        assert_eq!(catalog.full_path("0").unwrap(), "中国");
    }

    #[test]
    fn test_full_path_distinct_levels() {
        let catalog = sample_catalog();
        assert_eq!(catalog.full_path("13").unwrap(), "河北省");
        assert_eq!(catalog.full_path("1301").unwrap(), "河北省 石家庄市");
        assert_eq!(
            catalog.full_path("130102").unwrap(),
            "河北省 石家庄市 长安区"
        );
    }

    #[test]
    fn test_full_path_collapses_repeated_names() {
        let catalog = sample_catalog();
        // "11" and "1101" both display as 北京市; the path keeps one segment
        assert_eq!(catalog.full_path("1101").unwrap(), "北京市");
        assert_eq!(catalog.full_path("110101").unwrap(), "北京市 东城区");
    }

    #[test]
    fn test_full_path_below_county_level() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.full_path("110101001").unwrap(),
            "北京市 东城区 东华门街道"
        );
    }

    #[test]
    fn test_full_path_segment_count_never_decreases_with_depth() {
        let catalog = sample_catalog();
        let chain = ["11", "1101", "110101", "110101001"];
        let mut previous = 0;
        for code in chain {
            let segments = catalog.full_path(code).unwrap().split(' ').count();
            assert!(segments >= previous, "path shrank at {}", code);
            previous = segments;
        }
    }

    #[test]
    fn test_full_path_rejects_malformed_codes() {
        let catalog = sample_catalog();
        for code in ["", "1", "1a", "十一", "11 "] {
            let err = catalog.full_path(code).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "code {:?}", code);
        }
    }

    #[test]
    fn test_full_path_unknown_code_is_not_found() {
        let catalog = sample_catalog();
        let err = catalog.full_path("99").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_full_path_missing_ancestor_is_integrity_error() {
        let mut divisions = sample_divisions();
        // Orphan record: county exists, its city prefix does not
        divisions.insert(
            "140105".to_string(),
            Division {
                name: "小店区".to_string(),
                location: None,
                children: None,
                pass_through: false,
                phonetic: None,
            },
        );
        divisions.insert(
            "14".to_string(),
            Division {
                name: "山西省".to_string(),
                location: None,
                children: None,
                pass_through: false,
                phonetic: None,
            },
        );
        let catalog = DivisionCatalog::from_divisions(divisions, "2020").unwrap();

        let err = catalog.full_path("140105").unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
        assert!(err.to_string().contains("1401"));
    }

    #[test]
    fn test_visible_children_expands_pass_through_in_place() {
        let catalog = sample_catalog();
        let children = catalog.visible_children("11").unwrap();
        let codes: Vec<&str> = children.iter().map(|c| c.code.as_str()).collect();
        // The 1101 wrapper itself never appears; its children do, in order
        assert_eq!(codes, vec!["110101", "110102", "110105"]);
        assert_eq!(children[0].name, "东城区");
    }

    #[test]
    fn test_visible_children_plain_levels_untouched() {
        let catalog = sample_catalog();
        let children = catalog.visible_children("13").unwrap();
        let codes: Vec<&str> = children.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["1301"]);
    }

    #[test]
    fn test_visible_children_of_leaf_is_empty() {
        let catalog = sample_catalog();
        assert!(catalog.visible_children("110102").unwrap().is_empty());
    }

    #[test]
    fn test_visible_children_unknown_code_is_not_found() {
        let catalog = sample_catalog();
        let err = catalog.visible_children("99").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_visible_children_is_deterministic() {
        let catalog = sample_catalog();
        let first = catalog.visible_children("11").unwrap();
        let second = catalog.visible_children("11").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_visible_children_nested_wrappers_preserve_order() {
        let raw = r#"{
            "30": {"name": "甲省", "children": ["3001", "3002"]},
            "3001": {"name": "直辖", "is_direct": true, "children": ["300101", "300102"]},
            "300101": {"name": "一区"},
            "300102": {"name": "二区"},
            "3002": {"name": "乙市"}
        }"#;
        let divisions: HashMap<String, Division> = serde_json::from_str(raw).unwrap();
        let catalog = DivisionCatalog::from_divisions(divisions, "2020").unwrap();

        let children = catalog.visible_children("30").unwrap();
        let codes: Vec<&str> = children.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["300101", "300102", "3002"]);
    }

    #[test]
    fn test_visible_children_cycle_is_integrity_error() {
        let raw = r#"{
            "20": {"name": "环省", "children": ["2001"]},
            "2001": {"name": "环一", "is_direct": true, "children": ["2002"]},
            "2002": {"name": "环二", "is_direct": true, "children": ["2001"]}
        }"#;
        let divisions: HashMap<String, Division> = serde_json::from_str(raw).unwrap();
        let catalog = DivisionCatalog::from_divisions(divisions, "2020").unwrap();

        let err = catalog.visible_children("20").unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
        assert!(err.to_string().contains("cyclic"));
    }

    #[test]
    fn test_load_missing_file_is_dataset_error() {
        let err = DivisionCatalog::load(Path::new("/nonexistent/data.json"), "2020").unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
    }
}
