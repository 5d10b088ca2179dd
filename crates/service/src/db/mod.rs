//! SeaORM queries over the `stocks` table.

pub mod stock_service;
