//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST   /categoria                    register category   201          │
//! │  GET    /categoria                    list categories     200          │
//! │  GET    /categoria/{nome}             get category        200          │
//! │  PUT    /categoria/{nome}             update category     200          │
//! │  DELETE /categoria/{nome}             delete category     200          │
//! │                                                                         │
//! │  POST   /produtos                     register product    200 (id)     │
//! │  GET    /produtos                     paged search        200          │
//! │  GET    /produtos/{id}                get product         200          │
//! │  PUT    /produtos/{id}                update product      200          │
//! │  DELETE /produtos/{id}                delete product      200          │
//! │  GET    /produtos/{id}/preco-final    final price         200          │
//! │                                                                         │
//! │  GET    /health                       liveness + DB ping  200 / 503    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod product;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::state::AppState;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_healthy().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
    }
}
