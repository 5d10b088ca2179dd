use sea_orm_migration::prelude::*;

use crate::m20240901_000001_create_stocks::Stocks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Filtered cursor scan: WHERE trade_code = ? AND id > ? ORDER BY id
        manager
            .create_index(
                Index::create()
                    .name("idx_stocks_trade_code_id")
                    .table(Stocks::Table)
                    .col(Stocks::TradeCode)
                    .col(Stocks::Id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_stocks_trade_code_id")
                    .table(Stocks::Table)
                    .to_owned(),
            )
            .await
    }
}
