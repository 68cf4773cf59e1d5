use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::modules::catalog::{DivisionChild, GeoLocation};

/// Query parameters for resolving a division code
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DivisionQuery {
    /// Include the flattened immediate children when set to "true"
    #[param(example = "true")]
    pub children: Option<String>,
    /// Include the centroid location when set to "true"
    #[param(example = "true")]
    pub location: Option<String>,
}

impl DivisionQuery {
    pub fn with_children(&self) -> bool {
        self.children.as_deref() == Some("true")
    }

    pub fn with_location(&self) -> bool {
        self.location.as_deref() == Some("true")
    }
}

/// Query parameters for fuzzy search
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyQuery {
    /// Name, pinyin, or code fragment to search for
    #[param(example = "beijing")]
    pub k: Option<String>,
    /// Maximum number of hits to return (default 5, capped at 100)
    #[param(example = "5")]
    pub size: Option<String>,
    /// Include compacted pinyin in each hit when set to "true"
    #[param(example = "true")]
    pub pinyin: Option<String>,
}

impl FuzzyQuery {
    pub fn with_pinyin(&self) -> bool {
        self.pinyin.as_deref() == Some("true")
    }
}

/// Response DTO for a resolved division
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionResponseDto {
    pub code: String,
    pub name: String,
    /// Ancestry path from country level down, space separated
    pub fullpath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DivisionChildDto>>,
}

/// Centroid location of a division
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
    /// Geodetic datum of the coordinates
    #[serde(rename = "type")]
    pub datum: String,
}

impl From<&GeoLocation> for LocationDto {
    fn from(location: &GeoLocation) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            datum: location.datum.clone(),
        }
    }
}

/// One visible child of a resolved division
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionChildDto {
    pub code: String,
    pub name: String,
}

impl From<DivisionChild> for DivisionChildDto {
    fn from(child: DivisionChild) -> Self {
        Self {
            code: child.code,
            name: child.name,
        }
    }
}

/// Response DTO for one fuzzy-search hit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyHitDto {
    pub code: String,
    pub name: String,
    /// Ancestry path from country level down, space separated
    pub fullpath: String,
    /// Compacted pinyin, only when requested and known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
}
