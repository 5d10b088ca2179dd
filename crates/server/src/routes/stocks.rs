use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use common::types::OkResponse;
use service::pagination::ListQuery;
use service::stock::{StockInput, StockRecord, StockService, StockStore};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

type Svc<S> = State<Arc<StockService<S>>>;

#[utoipa::path(
    post, path = "/stocks", tag = "stocks",
    request_body = crate::openapi::StockInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::StockDoc),
        (status = 400, description = "Duplicate id"),
        (status = 422, description = "Validation Error"),
        (status = 500, description = "Storage Error")
    )
)]
pub async fn create_stock<S: StockStore>(
    State(svc): Svc<S>,
    ApiJson(input): ApiJson<StockInput<S::Id>>,
) -> Result<Json<StockRecord<S::Id>>, JsonApiError> {
    let rec = svc.create(input).await?;
    info!(event = "stock_create", id = %rec.id, trade_code = %rec.trade_code(), "created stock");
    Ok(Json(rec))
}

#[utoipa::path(
    get, path = "/stocks", tag = "stocks",
    params(
        ("trade_code" = Option<String>, Query, description = "Trade code filter; empty or `all` lists every code"),
        ("last_id" = Option<String>, Query, description = "Only ids greater than this (alias `cursor`)"),
        ("skip" = Option<u64>, Query, description = "Records to skip after the cursor"),
        ("limit" = Option<u64>, Query, description = "Page size, capped by the server")
    ),
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::StockDoc]),
        (status = 400, description = "Unparsable query"),
        (status = 422, description = "Invalid limit")
    )
)]
pub async fn list_stocks<S: StockStore>(
    State(svc): Svc<S>,
    ApiQuery(q): ApiQuery<ListQuery<S::Id>>,
) -> Result<Json<Vec<StockRecord<S::Id>>>, JsonApiError> {
    Ok(Json(svc.list(q).await?))
}

#[utoipa::path(
    get, path = "/stocks/trade-codes", tag = "stocks",
    responses((status = 200, description = "Distinct trade codes, ascending", body = [String]))
)]
pub async fn list_trade_codes<S: StockStore>(State(svc): Svc<S>) -> Result<Json<Vec<String>>, JsonApiError> {
    Ok(Json(svc.list_trade_codes().await?))
}

#[utoipa::path(
    get, path = "/stocks/{id}", tag = "stocks",
    params(("id" = String, Path, description = "Stock id: UUID for the json backend, integer otherwise")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::StockDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_stock<S: StockStore>(
    State(svc): Svc<S>,
    ApiPath(id): ApiPath<S::Id>,
) -> Result<Json<StockRecord<S::Id>>, JsonApiError> {
    Ok(Json(svc.get(id).await?))
}

#[utoipa::path(
    put, path = "/stocks/{id}", tag = "stocks",
    params(("id" = String, Path, description = "Stock id")),
    request_body = crate::openapi::StockInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::StockDoc),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update_stock<S: StockStore>(
    State(svc): Svc<S>,
    ApiPath(id): ApiPath<S::Id>,
    ApiJson(input): ApiJson<StockInput<S::Id>>,
) -> Result<Json<StockRecord<S::Id>>, JsonApiError> {
    let rec = svc.update(id, input).await?;
    info!(event = "stock_update", id = %rec.id, "updated stock");
    Ok(Json(rec))
}

#[utoipa::path(
    delete, path = "/stocks/{id}", tag = "stocks",
    params(("id" = String, Path, description = "Stock id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::OkResponseDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_stock<S: StockStore>(
    State(svc): Svc<S>,
    ApiPath(id): ApiPath<S::Id>,
) -> Result<Json<OkResponse>, JsonApiError> {
    svc.delete(id).await?;
    info!(event = "stock_delete", %id, "deleted stock");
    Ok(Json(OkResponse::default()))
}
