use serde::{Deserialize, Serialize};

use crate::property::repo::{Property, PropertyFeature};

/// Offset pagination query: `?skip=&limit=`.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureRequest {
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub parking_spots: i32,
    pub area: f64,
    #[serde(default)]
    pub has_swimming_pool: bool,
    #[serde(default)]
    pub has_garden_yard: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub feature: Option<CreateFeatureRequest>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub owner_id: Option<i64>,
}

/// Single-property payload: the row plus its optional feature sheet.
#[derive(Debug, Serialize)]
pub struct PropertyDetails {
    #[serde(flatten)]
    pub property: Property,
    pub feature: Option<PropertyFeature>,
}
