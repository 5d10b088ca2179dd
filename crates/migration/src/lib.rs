//! Migrator for the `stocks` table.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_stocks;
mod m20240901_000002_add_stock_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_stocks::Migration),
            // Indexes should always be applied last
            Box::new(m20240901_000002_add_stock_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, ConnectionTrait, Database};

    #[tokio::test]
    async fn up_and_down_on_sqlite() -> Result<(), DbErr> {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await?;

        Migrator::up(&db, None).await?;
        assert!(db.execute_unprepared("SELECT id, date, trade_code, high, low, open, close, volume FROM stocks").await.is_ok());

        Migrator::down(&db, None).await?;
        assert!(db.execute_unprepared("SELECT id FROM stocks").await.is_err());
        Ok(())
    }
}
