use utoipa::{Modify, OpenApi};

use crate::features::divisions::{dtos as divisions_dtos, handlers as divisions_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Status
        divisions_handlers::status,
        // Divisions
        divisions_handlers::fuzzy_search,
        divisions_handlers::get_division,
    ),
    components(
        schemas(
            divisions_dtos::DivisionResponseDto,
            divisions_dtos::DivisionChildDto,
            divisions_dtos::LocationDto,
            divisions_dtos::FuzzyHitDto,
            ApiResponse<divisions_dtos::DivisionResponseDto>,
            ApiResponse<Vec<divisions_dtos::FuzzyHitDto>>,
        )
    ),
    tags(
        (name = "divisions", description = "China administrative divisions (provinces, cities, counties)"),
        (name = "status", description = "Service liveness"),
    ),
    info(
        title = "China Division API",
        version = "0.1.0",
        description = "Lookup and fuzzy search over China's administrative division tree",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
