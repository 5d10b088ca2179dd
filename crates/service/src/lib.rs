//! Service layer for stock price records.
//! - `stock`: domain types, the `StockStore` abstraction and `StockService`.
//! - `storage`: JSON-file and in-memory stores sharing one in-memory index.
//! - `db`: SeaORM queries backing the relational store.

pub mod errors;
pub mod pagination;
pub mod runtime;
pub mod stock;
pub mod storage;
pub mod db;
#[cfg(test)]
pub mod test_support;
