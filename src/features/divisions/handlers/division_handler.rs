use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::divisions::dtos::{
    DivisionQuery, DivisionResponseDto, FuzzyHitDto, FuzzyQuery,
};
use crate::features::divisions::services::DivisionService;
use crate::shared::constants::DEFAULT_FUZZY_LIMIT;
use crate::shared::types::ApiResponse;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Service is up", body = String)
    ),
    tag = "status"
)]
pub async fn status() -> &'static str {
    "ok"
}

/// Fuzzy search for divisions
///
/// Matches by name, compacted pinyin, or code fragment and ranks exact
/// matches first, then prefixes, then looser matches.
#[utoipa::path(
    get,
    path = "/china/division/{year}/fuzzy",
    params(
        ("year" = String, Path, description = "Dataset year, e.g. 2020"),
        FuzzyQuery
    ),
    responses(
        (status = 200, description = "Ranked search hits", body = ApiResponse<Vec<FuzzyHitDto>>,
         headers(("x-time-used" = String, description = "Server-side processing time in seconds"))),
        (status = 400, description = "Missing or unusable query parameters"),
        (status = 404, description = "No dataset for the requested year")
    ),
    tag = "divisions"
)]
pub async fn fuzzy_search(
    State(service): State<Arc<DivisionService>>,
    Path(year): Path<String>,
    Query(query): Query<FuzzyQuery>,
) -> Result<(HeaderMap, Json<ApiResponse<Vec<FuzzyHitDto>>>)> {
    let started = Instant::now();

    ensure_year(&service, &year)?;

    let keyword = query
        .k
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::InvalidInput("query parameter 'k' is required".to_string()))?;
    let limit = parse_size(query.size.as_deref())?;

    let hits = service.search(keyword, limit, query.with_pinyin())?;

    let mut headers = HeaderMap::new();
    let elapsed = format!("{:.6}", started.elapsed().as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        headers.insert("x-time-used", value);
    }

    Ok((headers, Json(ApiResponse::success(Some(hits), None))))
}

/// Resolve a division code
///
/// Returns the division's name and ancestry path. The flattened child list
/// and the centroid location are included only when their toggles are the
/// literal string "true".
#[utoipa::path(
    get,
    path = "/china/division/{year}/{code}",
    params(
        ("year" = String, Path, description = "Dataset year, e.g. 2020"),
        ("code" = String, Path, description = "Division code (2, 4, 6, or more digits)"),
        DivisionQuery
    ),
    responses(
        (status = 200, description = "Division details", body = ApiResponse<DivisionResponseDto>),
        (status = 400, description = "Malformed division code"),
        (status = 404, description = "Unknown code or dataset year")
    ),
    tag = "divisions"
)]
pub async fn get_division(
    State(service): State<Arc<DivisionService>>,
    Path((year, code)): Path<(String, String)>,
    Query(query): Query<DivisionQuery>,
) -> Result<Json<ApiResponse<DivisionResponseDto>>> {
    ensure_year(&service, &year)?;

    let division = service.resolve(&code, query.with_children(), query.with_location())?;
    Ok(Json(ApiResponse::success(Some(division), None)))
}

/// Only the loaded dataset vintage is addressable.
fn ensure_year(service: &DivisionService, year: &str) -> Result<()> {
    if year != service.dataset_year() {
        return Err(AppError::NotFound(format!(
            "no division dataset for year '{}'",
            year
        )));
    }
    Ok(())
}

/// Absent or empty `size` falls back to the default; anything else must
/// parse as a positive number.
fn parse_size(raw: Option<&str>) -> Result<usize> {
    match raw {
        None | Some("") => Ok(DEFAULT_FUZZY_LIMIT),
        Some(value) => value
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AppError::InvalidInput(
                    "parameter 'size' must be a positive number or empty".to_string(),
                )
            }),
    }
}
