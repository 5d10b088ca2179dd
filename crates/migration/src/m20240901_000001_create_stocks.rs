//! Create `stocks` table: one row per trading day and instrument.
//!
//! `(date, trade_code)` is intentionally not unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stocks::Table)
                    .if_not_exists()
                    .col(big_integer(Stocks::Id).primary_key().auto_increment())
                    .col(date(Stocks::Date).not_null())
                    .col(string_len(Stocks::TradeCode, 32).not_null())
                    .col(double(Stocks::High).not_null())
                    .col(double(Stocks::Low).not_null())
                    .col(double(Stocks::Open).not_null())
                    .col(double(Stocks::Close).not_null())
                    .col(big_integer(Stocks::Volume).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Stocks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Stocks { Table, Id, Date, TradeCode, High, Low, Open, Close, Volume }
