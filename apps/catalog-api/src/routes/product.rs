//! Product endpoints, keyed by the numeric product id.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use catalog_core::dto::{
    FinalPriceResponse, ProductPageResponse, ProductQuery, ProductResponse,
    RegisterProductRequest, UpdateProductRequest,
};
use catalog_core::{messages, ProductId};

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/produtos", get(search).post(register))
        .route(
            "/produtos/{id}",
            get(get_by_id).put(update).delete(delete),
        )
        .route("/produtos/{id}/preco-final", get(final_price))
}

/// Responds with the new product id.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterProductRequest>, JsonRejection>,
) -> ApiResult<Json<ProductId>> {
    let Json(request) = payload?;
    Ok(Json(state.products.register(request).await?))
}

async fn search(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<ProductPageResponse>> {
    let Query(query) = query?;
    Ok(Json(state.products.list_paged(&query).await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
) -> ApiResult<Json<ProductResponse>> {
    let Path(id) = id?;
    Ok(Json(state.products.get_by_id(id).await?))
}

async fn update(
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<&'static str> {
    let Path(id) = id?;
    let Json(request) = payload?;
    state.products.update(id, request).await?;
    Ok(messages::PRODUCT_UPDATED)
}

async fn delete(
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
) -> ApiResult<&'static str> {
    let Path(id) = id?;
    state.products.delete(id).await?;
    Ok(messages::PRODUCT_DELETED)
}

async fn final_price(
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
) -> ApiResult<Json<FinalPriceResponse>> {
    let Path(id) = id?;
    Ok(Json(state.products.compute_final_price(id).await?))
}
