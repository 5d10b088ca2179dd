//! Storage implementations for the service layer
//!
//! File-backed and in-memory stock stores built on a shared `StockIndex`.

pub mod index;
pub mod json_store;
pub mod memory_store;

pub use json_store::JsonStockStore;
pub use memory_store::MemoryStockStore;
