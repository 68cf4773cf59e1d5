use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::divisions::dtos::{
    DivisionChildDto, DivisionResponseDto, FuzzyHitDto, LocationDto,
};
use crate::modules::catalog::DivisionCatalog;
use crate::modules::search::{FuzzyMatcher, SearchQuery};
use crate::shared::constants::{COUNTRY_CODE, MAX_FUZZY_LIMIT};
use crate::shared::validation::DIVISION_CODE_REGEX;

/// Read-side service over the division catalog and the fuzzy matcher
///
/// Owns no mutable state; both collaborators are immutable after startup,
/// so the service is freely shared across request handlers.
pub struct DivisionService {
    catalog: Arc<DivisionCatalog>,
    matcher: Arc<dyn FuzzyMatcher>,
}

impl DivisionService {
    pub fn new(catalog: Arc<DivisionCatalog>, matcher: Arc<dyn FuzzyMatcher>) -> Self {
        Self { catalog, matcher }
    }

    /// Dataset vintage served by this process
    pub fn dataset_year(&self) -> &str {
        self.catalog.year()
    }

    /// Resolve one division code to its metadata view.
    ///
    /// Children and location are opt-in; a resolve that fails partway
    /// (broken ancestry, cyclic wrapper chain) returns the error rather
    /// than a partial view.
    pub fn resolve(
        &self,
        code: &str,
        with_children: bool,
        with_location: bool,
    ) -> Result<DivisionResponseDto> {
        // The country pseudo-code is valid in paths but is not a record,
        // so resolving it falls through to not-found below
        if code != COUNTRY_CODE && !DIVISION_CODE_REGEX.is_match(code) {
            return Err(AppError::InvalidInput(format!(
                "division code '{}' must be a digit string of at least two characters",
                code
            )));
        }

        let division = self.catalog.lookup(code).ok_or_else(|| {
            AppError::NotFound(format!("Division with code '{}' not found", code))
        })?;

        let location = if with_location {
            division.location.as_ref().map(LocationDto::from)
        } else {
            None
        };

        let children = if with_children {
            let flattened = self.catalog.visible_children(code)?;
            Some(flattened.into_iter().map(DivisionChildDto::from).collect())
        } else {
            None
        };

        Ok(DivisionResponseDto {
            code: code.to_string(),
            name: division.name.clone(),
            fullpath: self.catalog.full_path(code)?,
            location,
            children,
        })
    }

    /// Ranked fuzzy search, hydrated with names and ancestry paths.
    ///
    /// An unmatched query is an empty hit list, not an error; only
    /// unusable input (nothing searchable, non-positive limit) is rejected.
    pub fn search(
        &self,
        raw_query: &str,
        limit: usize,
        with_pinyin: bool,
    ) -> Result<Vec<FuzzyHitDto>> {
        if limit == 0 {
            return Err(AppError::InvalidInput(
                "parameter 'size' must be a positive number".to_string(),
            ));
        }
        let limit = limit.min(MAX_FUZZY_LIMIT);

        let Some(query) = SearchQuery::classify(raw_query) else {
            return Err(AppError::InvalidInput(
                "parameter 'k' contains no searchable characters".to_string(),
            ));
        };

        self.matcher
            .search(&query, limit)
            .into_iter()
            .map(|code| self.hydrate(&code, with_pinyin))
            .collect()
    }

    /// An indexed code that no longer resolves means catalog and index
    /// disagree about the dataset.
    fn hydrate(&self, code: &str, with_pinyin: bool) -> Result<FuzzyHitDto> {
        let division = self.catalog.lookup(code).ok_or_else(|| {
            AppError::DataIntegrity(format!("indexed code '{}' is missing from the catalog", code))
        })?;

        let pinyin = if with_pinyin {
            division
                .phonetic
                .as_deref()
                .map(|p| p.split_whitespace().collect::<String>())
        } else {
            None
        };

        Ok(FuzzyHitDto {
            code: code.to_string(),
            name: division.name.clone(),
            fullpath: self.catalog.full_path(code)?,
            pinyin,
        })
    }
}
