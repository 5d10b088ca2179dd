use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::ServiceError;
use crate::pagination::StockFilter;
use crate::stock::domain::{StockData, StockInput, StockRecord};
use crate::stock::repository::StockStore;
use crate::storage::index::StockIndex;

/// Process-local store with auto-increment ids. Nothing is persisted.
#[derive(Default)]
pub struct MemoryStockStore {
    inner: RwLock<StockIndex<i64>>,
}

impl MemoryStockStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_records(records: Vec<StockRecord<i64>>) -> Result<Self, ServiceError> {
        Ok(Self { inner: RwLock::new(StockIndex::from_records(records)?) })
    }
}

#[async_trait]
impl StockStore for MemoryStockStore {
    type Id = i64;

    fn backend(&self) -> &'static str { "memory" }

    async fn create(&self, input: StockInput<i64>) -> Result<StockRecord<i64>, ServiceError> {
        let mut index = self.inner.write().await;
        let id = match input.id {
            Some(id) if index.contains(&id) => return Err(ServiceError::conflict("stock", id)),
            Some(id) => id,
            None => match index.last_id() {
                None => 1,
                Some(last) => last
                    .checked_add(1)
                    .ok_or_else(|| ServiceError::Conflict(format!("stock id space exhausted after {last}")))?,
            },
        };
        let rec = StockRecord::new(id, input.data);
        index.insert(rec.clone());
        info!(id, trade_code = %rec.trade_code(), "stock created");
        Ok(rec)
    }

    async fn get(&self, id: i64) -> Result<StockRecord<i64>, ServiceError> {
        let index = self.inner.read().await;
        index.get(&id).cloned().ok_or_else(|| ServiceError::not_found("stock"))
    }

    async fn list(&self, filter: StockFilter<i64>) -> Result<Vec<StockRecord<i64>>, ServiceError> {
        Ok(self.inner.read().await.query(&filter))
    }

    async fn list_trade_codes(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.inner.read().await.trade_codes())
    }

    async fn update(&self, id: i64, data: StockData) -> Result<StockRecord<i64>, ServiceError> {
        let mut index = self.inner.write().await;
        index.replace(id, data).ok_or_else(|| ServiceError::not_found("stock"))?;
        info!(id, "stock updated");
        index.get(&id).cloned().ok_or_else(|| ServiceError::not_found("stock"))
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut index = self.inner.write().await;
        index.remove(&id).ok_or_else(|| ServiceError::not_found("stock"))?;
        info!(id, "stock deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample;

    #[tokio::test]
    async fn ids_autoincrement_past_explicit_ones() -> Result<(), ServiceError> {
        let store = MemoryStockStore::new();
        assert_eq!(store.create(sample("A", 2020, 1, 1).into()).await?.id, 1);
        let explicit = StockInput { id: Some(10), data: sample("A", 2020, 1, 2) };
        assert_eq!(store.create(explicit).await?.id, 10);
        assert_eq!(store.create(sample("B", 2020, 1, 3).into()).await?.id, 11);
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_id_space_never_overwrites() -> Result<(), ServiceError> {
        let store = MemoryStockStore::new();
        let top = StockInput { id: Some(i64::MAX), data: sample("FIRST", 2020, 1, 1) };
        store.create(top).await?;
        assert!(matches!(
            store.create(sample("SECOND", 2020, 1, 2).into()).await,
            Err(ServiceError::Conflict(_))
        ));
        let all = store.list(StockFilter::all(10)).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, i64::MAX);
        assert_eq!(all[0].trade_code(), "FIRST");
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_from_listing() -> Result<(), ServiceError> {
        let store = MemoryStockStore::new();
        let a = store.create(sample("A", 2020, 1, 1).into()).await?;
        let b = store.create(sample("A", 2020, 1, 2).into()).await?;
        store.delete(a.id).await?;
        let ids: Vec<i64> = store.list(StockFilter::all(10)).await?.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id]);
        assert!(matches!(store.get(a.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn seeded_records_are_queryable() -> Result<(), ServiceError> {
        let store = MemoryStockStore::with_records(vec![
            StockRecord::new(3, sample("GP", 2020, 1, 1)),
            StockRecord::new(1, sample("ACI", 2020, 1, 1)),
        ])?;
        assert_eq!(store.list_trade_codes().await?, vec!["ACI", "GP"]);
        assert_eq!(store.create(sample("X", 2020, 1, 2).into()).await?.id, 4);
        Ok(())
    }
}
