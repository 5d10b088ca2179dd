use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info};

use models::stock;
use crate::errors::ServiceError;
use crate::pagination::StockFilter;
use crate::stock::domain::{StockData, StockInput, StockRecord};

fn active_from(data: StockData) -> stock::ActiveModel {
    stock::ActiveModel {
        id: NotSet,
        date: Set(data.date),
        trade_code: Set(data.trade_code),
        high: Set(data.high),
        low: Set(data.low),
        open: Set(data.open),
        close: Set(data.close),
        volume: Set(data.volume),
    }
}

/// Insert a stock row. An explicit id must not exist yet.
pub async fn create_stock(db: &DatabaseConnection, input: StockInput<i64>) -> Result<StockRecord<i64>, ServiceError> {
    let mut am = active_from(input.data);
    if let Some(id) = input.id {
        if stock::Entity::find_by_id(id).one(db).await?.is_some() {
            return Err(ServiceError::conflict("stock", id));
        }
        am.id = Set(id);
    }
    let explicit = input.id.is_some();
    let m = am.insert(db).await?;
    if explicit {
        sync_id_sequence(db).await?;
    }
    info!(id = m.id, trade_code = %m.trade_code, "stock row inserted");
    Ok(m.into())
}

/// Postgres sequences do not see explicit ids; move it past the current max.
async fn sync_id_sequence(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if db.get_database_backend() == DatabaseBackend::Postgres {
        db.execute_unprepared(
            "SELECT setval(pg_get_serial_sequence('stocks', 'id'), GREATEST((SELECT MAX(id) FROM stocks), 1))",
        )
        .await?;
    }
    Ok(())
}

/// Get stock by id.
pub async fn get_stock(db: &DatabaseConnection, id: i64) -> Result<Option<StockRecord<i64>>, ServiceError> {
    Ok(stock::Entity::find_by_id(id).one(db).await?.map(Into::into))
}

/// Filtered, cursor-paginated listing ordered by id.
pub async fn list_stocks(db: &DatabaseConnection, filter: &StockFilter<i64>) -> Result<Vec<StockRecord<i64>>, ServiceError> {
    let mut query = stock::Entity::find();
    if let Some(code) = &filter.trade_code {
        query = query.filter(stock::Column::TradeCode.eq(code.as_str()));
    }
    if let Some(after) = filter.after {
        query = query.filter(stock::Column::Id.gt(after));
    }
    query = query.order_by_asc(stock::Column::Id);
    if filter.skip > 0 {
        query = query.offset(filter.skip);
    }
    let rows = query.limit(filter.limit).all(db).await?;
    debug!(count = rows.len(), ?filter, "stock rows listed");
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Distinct trade codes in ascending order.
pub async fn list_trade_codes(db: &DatabaseConnection) -> Result<Vec<String>, ServiceError> {
    let codes = stock::Entity::find()
        .select_only()
        .column(stock::Column::TradeCode)
        .distinct()
        .order_by_asc(stock::Column::TradeCode)
        .into_tuple::<String>()
        .all(db)
        .await?;
    Ok(codes)
}

/// Overwrite every column but the id.
pub async fn update_stock(db: &DatabaseConnection, id: i64, data: StockData) -> Result<StockRecord<i64>, ServiceError> {
    let found = stock::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("stock"))?;
    let mut am: stock::ActiveModel = found.into();
    am.date = Set(data.date);
    am.trade_code = Set(data.trade_code);
    am.high = Set(data.high);
    am.low = Set(data.low);
    am.open = Set(data.open);
    am.close = Set(data.close);
    am.volume = Set(data.volume);
    let m = am.update(db).await?;
    info!(id = m.id, "stock row updated");
    Ok(m.into())
}

/// Delete stock; returns whether a row existed.
pub async fn delete_stock(db: &DatabaseConnection, id: i64) -> Result<bool, ServiceError> {
    let res = stock::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(id, "stock row deleted");
    }
    Ok(res.rows_affected > 0)
}
