//! Stock price records: domain types, storage abstraction and service.

pub mod domain;
pub mod numeric;
pub mod repository;
pub mod service;

pub use domain::{StockData, StockId, StockInput, StockRecord};
pub use repository::{SeaOrmStockStore, StockStore};
pub use service::StockService;
