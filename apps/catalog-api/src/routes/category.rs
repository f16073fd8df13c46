//! Category endpoints, keyed by the category's unique name.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog_core::dto::{CategoryResponse, RegisterCategoryRequest, UpdateCategoryRequest};
use catalog_core::messages;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categoria", post(register).get(list))
        .route(
            "/categoria/{nome}",
            get(get_by_name).put(update).delete(delete),
        )
}

/// `201 Created` with `Location: /categoria/{nome}`.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterCategoryRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let name = state.categories.register(request).await?;

    let location = format!("/categoria/{}", urlencoding::encode(&name));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        messages::CATEGORY_REGISTERED,
    ))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryResponse>>> {
    Ok(Json(state.categories.list().await?))
}

async fn get_by_name(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<CategoryResponse>> {
    let Path(name) = name?;
    Ok(Json(state.categories.get_by_name(&name).await?))
}

async fn update(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> ApiResult<&'static str> {
    let Path(name) = name?;
    let Json(request) = payload?;
    state.categories.update(&name, request).await?;
    Ok(messages::CATEGORY_UPDATED)
}

async fn delete(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> ApiResult<&'static str> {
    let Path(name) = name?;
    state.categories.delete(&name).await?;
    Ok(messages::CATEGORY_DELETED)
}
