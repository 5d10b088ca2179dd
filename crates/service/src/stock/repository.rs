use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::pagination::StockFilter;
use crate::stock::domain::{StockData, StockId, StockInput, StockRecord};

/// Storage abstraction behind the `/stocks` API.
///
/// Implementations own id assignment and must keep ids unique. Mutations
/// are durable by the time they return.
#[async_trait]
pub trait StockStore: Send + Sync + 'static {
    type Id: StockId;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// Insert a record, assigning an id when the input carries none.
    /// Fails with `Conflict` if the supplied id is taken.
    async fn create(&self, input: StockInput<Self::Id>) -> Result<StockRecord<Self::Id>, ServiceError>;

    async fn get(&self, id: Self::Id) -> Result<StockRecord<Self::Id>, ServiceError>;

    /// Records matching `filter`, ascending by id.
    async fn list(&self, filter: StockFilter<Self::Id>) -> Result<Vec<StockRecord<Self::Id>>, ServiceError>;

    /// Distinct trade codes, ascending.
    async fn list_trade_codes(&self) -> Result<Vec<String>, ServiceError>;

    /// Replace every field but the id.
    async fn update(&self, id: Self::Id, data: StockData) -> Result<StockRecord<Self::Id>, ServiceError>;

    async fn delete(&self, id: Self::Id) -> Result<(), ServiceError>;
}

/// SeaORM-backed store over the `stocks` table.
#[derive(Clone)]
pub struct SeaOrmStockStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStockStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl StockStore for SeaOrmStockStore {
    type Id = i64;

    fn backend(&self) -> &'static str { "database" }

    async fn create(&self, input: StockInput<i64>) -> Result<StockRecord<i64>, ServiceError> {
        crate::db::stock_service::create_stock(&self.db, input).await
    }

    async fn get(&self, id: i64) -> Result<StockRecord<i64>, ServiceError> {
        crate::db::stock_service::get_stock(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("stock"))
    }

    async fn list(&self, filter: StockFilter<i64>) -> Result<Vec<StockRecord<i64>>, ServiceError> {
        crate::db::stock_service::list_stocks(&self.db, &filter).await
    }

    async fn list_trade_codes(&self) -> Result<Vec<String>, ServiceError> {
        crate::db::stock_service::list_trade_codes(&self.db).await
    }

    async fn update(&self, id: i64, data: StockData) -> Result<StockRecord<i64>, ServiceError> {
        crate::db::stock_service::update_stock(&self.db, id, data).await
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if crate::db::stock_service::delete_stock(&self.db, id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("stock"))
        }
    }
}
