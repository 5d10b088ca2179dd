use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct OkResponseDoc { pub ok: bool }

/// Stored stock record. `id` is a UUID string for the json backend and an integer otherwise.
#[derive(ToSchema)]
pub struct StockDoc {
    pub id: String,
    #[schema(format = Date, example = "2020-08-10")]
    pub date: String,
    #[schema(example = "ACI")]
    pub trade_code: String,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub close: f64,
    pub volume: i64,
}

/// Create/update body. Numbers may also be strings with thousands separators ("1,234.50").
#[derive(ToSchema)]
pub struct StockInputDoc {
    /// Honored on create, ignored on update.
    pub id: Option<String>,
    #[schema(format = Date, example = "2020-08-10")]
    pub date: String,
    pub trade_code: String,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub close: f64,
    pub volume: i64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::stocks::create_stock,
        crate::routes::stocks::list_stocks,
        crate::routes::stocks::list_trade_codes,
        crate::routes::stocks::get_stock,
        crate::routes::stocks::update_stock,
        crate::routes::stocks::delete_stock,
    ),
    components(
        schemas(
            HealthResponse,
            OkResponseDoc,
            StockDoc,
            StockInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "stocks")
    )
)]
pub struct ApiDoc;
