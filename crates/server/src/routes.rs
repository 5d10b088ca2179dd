use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::stock::{StockService, StockStore};

use crate::openapi::ApiDoc;

pub mod stocks;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router over one stock store.
pub fn build_router<S: StockStore>(svc: Arc<StockService<S>>, cors: CorsLayer) -> Router {
    let stock_routes = Router::new()
        .route("/stocks", get(stocks::list_stocks::<S>).post(stocks::create_stock::<S>))
        .route("/stocks/trade-codes", get(stocks::list_trade_codes::<S>))
        .route(
            "/stocks/:id",
            get(stocks::get_stock::<S>)
                .put(stocks::update_stock::<S>)
                .delete(stocks::delete_stock::<S>),
        )
        .with_state(svc);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(stock_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
