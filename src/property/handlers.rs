use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::property::dto::{
    CreatePropertyRequest, Pagination, PropertyDetails, UpdatePropertyRequest,
};
use crate::property::repo::Property;
use crate::property::services;
use crate::response::{ApiResponse, PaginatedResponse};
use crate::state::AppState;

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/property", get(find_all).post(create))
        .route(
            "/property/:id",
            get(find_one).patch(update).delete(remove),
        )
}

#[instrument(skip(state))]
async fn find_all(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<Property>>, ApiError> {
    let page = services::find_all(state.properties.as_ref(), &pagination).await?;
    Ok(Json(PaginatedResponse {
        message: "Properties retrieved successfully".into(),
        data: page.items,
        total: page.total,
        has_next_page: page.has_next_page,
        has_previous_page: page.has_previous_page,
    }))
}

#[instrument(skip(state))]
async fn find_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PropertyDetails>>, ApiError> {
    let details = services::find_one(state.properties.as_ref(), id).await?;
    Ok(Json(ApiResponse::new(
        "Property retrieved successfully",
        details,
    )))
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PropertyDetails>>), ApiError> {
    let details = services::create(state.properties.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Property created successfully", details)),
    ))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePropertyRequest>,
) -> Result<Json<ApiResponse<PropertyDetails>>, ApiError> {
    let details = services::update(state.properties.as_ref(), id, payload).await?;
    Ok(Json(ApiResponse::new(
        "Property updated successfully",
        details,
    )))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    services::delete(state.properties.as_ref(), id).await?;
    Ok(Json(ApiResponse::new(
        format!("Property with ID {id} deleted successfully"),
        (),
    )))
}
