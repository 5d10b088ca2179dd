#![cfg(test)]
use chrono::NaiveDate;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;

use crate::stock::domain::StockData;

/// Fresh in-memory SQLite database with the `stocks` schema applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::sqlite_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn sample(code: &str, y: i32, m: u32, d: u32) -> StockData {
    StockData {
        date: NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
        trade_code: code.to_string(),
        high: 10.5,
        low: 9.25,
        open: 9.75,
        close: 10.0,
        volume: 12_000,
    }
}

/// Unique temp path for a JSON store file.
pub fn temp_json_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{}_{}.json", tag, uuid::Uuid::new_v4()))
}
