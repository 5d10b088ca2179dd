use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::pagination::{ListQuery, PageLimits};
use crate::stock::domain::{StockData, StockInput, StockRecord};
use crate::stock::repository::StockStore;

/// Application service over a stock store.
/// Validates input shape and normalizes listing parameters before delegating.
pub struct StockService<S: StockStore> {
    store: Arc<S>,
    limits: PageLimits,
}

impl<S: StockStore> StockService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store, limits: PageLimits::default() } }

    pub fn with_limits(store: Arc<S>, limits: PageLimits) -> Self { Self { store, limits } }

    #[instrument(skip(self, input), fields(backend = self.store.backend()))]
    pub async fn create(&self, input: StockInput<S::Id>) -> Result<StockRecord<S::Id>, ServiceError> {
        input.data.validate()?;
        self.store.create(input).await
    }

    pub async fn get(&self, id: S::Id) -> Result<StockRecord<S::Id>, ServiceError> {
        self.store.get(id).await
    }

    pub async fn list(&self, query: ListQuery<S::Id>) -> Result<Vec<StockRecord<S::Id>>, ServiceError> {
        let filter = query.normalize(self.limits)?;
        let records = self.store.list(filter).await?;
        info!(backend = self.store.backend(), count = records.len(), "list stocks");
        Ok(records)
    }

    pub async fn list_trade_codes(&self) -> Result<Vec<String>, ServiceError> {
        self.store.list_trade_codes().await
    }

    /// Full overwrite. Any id in the body is ignored; the path id wins.
    #[instrument(skip(self, input), fields(backend = self.store.backend(), id = %id))]
    pub async fn update(&self, id: S::Id, input: StockInput<S::Id>) -> Result<StockRecord<S::Id>, ServiceError> {
        let data: StockData = input.data;
        data.validate()?;
        self.store.update(id, data).await
    }

    #[instrument(skip(self), fields(backend = self.store.backend(), id = %id))]
    pub async fn delete(&self, id: S::Id) -> Result<(), ServiceError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::repository::SeaOrmStockStore;
    use crate::storage::{JsonStockStore, MemoryStockStore};
    use crate::test_support::{get_db, sample, temp_json_path};

    /// Behavior every store must share, driven through the service.
    async fn exercise<S: StockStore>(svc: StockService<S>) -> Result<(), ServiceError> {
        let a = svc.create(sample("ACI", 2020, 8, 10).into()).await?;
        let b = svc.create(sample("GP", 2020, 8, 10).into()).await?;
        let c = svc.create(sample("ACI", 2020, 8, 11).into()).await?;

        // get(create(r).id) == r
        assert_eq!(svc.get(a.id).await?.data, sample("ACI", 2020, 8, 10));

        // filter + ascending order
        let aci = svc.list(ListQuery { trade_code: Some("ACI".into()), ..Default::default() }).await?;
        let mut expected = vec![a.id, c.id];
        expected.sort();
        assert_eq!(aci.iter().map(|r| r.id).collect::<Vec<_>>(), expected);

        // "all" sentinel
        let all = svc.list(ListQuery { trade_code: Some("all".into()), ..Default::default() }).await?;
        assert_eq!(all.len(), 3);

        // cursor
        let first = all[0].id;
        let rest = svc.list(ListQuery { last_id: Some(first), ..Default::default() }).await?;
        assert_eq!(rest.len(), 2);
        assert!(rest.iter().all(|r| r.id > first));

        // limit
        let one = svc.list(ListQuery { limit: Some(1), ..Default::default() }).await?;
        assert_eq!(one.len(), 1);
        assert!(matches!(
            svc.list(ListQuery { limit: Some(0), ..Default::default() }).await,
            Err(ServiceError::Validation(_))
        ));

        // update keeps the path id even if the body carries another
        let mut changed = sample("BATBC", 2020, 9, 1);
        changed.high = 1234.5;
        let body = StockInput { id: Some(c.id), data: changed.clone() };
        let updated = svc.update(b.id, body).await?;
        assert_eq!(updated.id, b.id);
        assert_eq!(svc.get(b.id).await?.data, changed);

        assert_eq!(svc.list_trade_codes().await?, vec!["ACI", "BATBC"]);

        // delete
        svc.delete(a.id).await?;
        assert!(matches!(svc.get(a.id).await, Err(ServiceError::NotFound(_))));
        let remaining = svc.list(ListQuery::default()).await?;
        assert!(remaining.iter().all(|r| r.id != a.id));

        // validation happens before the store
        let mut bad = sample("ACI", 2020, 1, 1);
        bad.volume = -1;
        assert!(matches!(svc.create(bad.into()).await, Err(ServiceError::Model(_))));
        Ok(())
    }

    #[tokio::test]
    async fn memory_store_contract() -> Result<(), ServiceError> {
        exercise(StockService::new(Arc::new(MemoryStockStore::new()))).await
    }

    #[tokio::test]
    async fn json_store_contract() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("stock_service_json");
        let store = JsonStockStore::open(&tmp).await?;
        exercise(StockService::new(store)).await?;
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn database_store_contract() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        exercise(StockService::new(Arc::new(SeaOrmStockStore::new(db)))).await?;
        Ok(())
    }

    #[tokio::test]
    async fn page_size_is_capped() -> Result<(), ServiceError> {
        let svc = StockService::with_limits(
            Arc::new(MemoryStockStore::new()),
            PageLimits { default_limit: 2, max_limit: 3 },
        );
        for d in 1..=5 {
            svc.create(sample("A", 2020, 1, d).into()).await?;
        }
        assert_eq!(svc.list(ListQuery::default()).await?.len(), 2);
        assert_eq!(svc.list(ListQuery { limit: Some(500), ..Default::default() }).await?.len(), 3);
        Ok(())
    }
}
