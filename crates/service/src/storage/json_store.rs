use std::{ffi::OsString, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::StockFilter;
use crate::stock::domain::{StockData, StockInput, StockRecord};
use crate::stock::repository::StockStore;
use crate::storage::index::StockIndex;

/// JSON file-backed stock store.
///
/// The whole collection lives in memory and is written back as one JSON
/// array after every mutation: first to `<file>.tmp`, then renamed over the
/// target so a crash never leaves a half-written file. The write lock is
/// held from mutation through rename, so concurrent writers are serialized.
pub struct JsonStockStore {
    inner: RwLock<StockIndex<Uuid>>,
    file_path: PathBuf,
    tmp_path: PathBuf,
}

impl JsonStockStore {
    /// Load the store from a path. Creates the file with an empty array if missing;
    /// an unreadable or corrupt file is an error and is left untouched.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp_path = tmp_path_for(&file_path);

        let index = match fs::read(&file_path).await {
            Ok(bytes) => {
                let records: Vec<StockRecord<Uuid>> = serde_json::from_slice(&bytes).map_err(|e| {
                    ServiceError::Storage(format!("corrupt data file {}: {e}", file_path.display()))
                })?;
                StockIndex::from_records(records)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let index = StockIndex::default();
                write_atomically(&file_path, &tmp_path, b"[]").await?;
                index
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %file_path.display(), records = index.len(), "json stock store loaded");
        Ok(Arc::new(Self { inner: RwLock::new(index), file_path, tmp_path }))
    }

    async fn save(&self, index: &StockIndex<Uuid>) -> Result<(), ServiceError> {
        let records: Vec<&StockRecord<Uuid>> = index.records().collect();
        let data = serde_json::to_vec_pretty(&records).map_err(|e| ServiceError::Storage(e.to_string()))?;
        write_atomically(&self.file_path, &self.tmp_path, &data).await?;
        debug!(path = %self.file_path.display(), records = records.len(), bytes = data.len(), "json stock store saved");
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

async fn write_atomically(path: &Path, tmp: &Path, data: &[u8]) -> Result<(), ServiceError> {
    fs::write(tmp, data).await?;
    fs::rename(tmp, path).await?;
    Ok(())
}

#[async_trait]
impl StockStore for JsonStockStore {
    type Id = Uuid;

    fn backend(&self) -> &'static str { "json" }

    async fn create(&self, input: StockInput<Uuid>) -> Result<StockRecord<Uuid>, ServiceError> {
        let mut index = self.inner.write().await;
        let id = match input.id {
            Some(id) if index.contains(&id) => return Err(ServiceError::conflict("stock", id)),
            Some(id) => id,
            None => loop {
                let id = Uuid::new_v4();
                if !index.contains(&id) {
                    break id;
                }
            },
        };
        let rec = StockRecord::new(id, input.data);
        index.insert(rec.clone());
        if let Err(e) = self.save(&index).await {
            index.remove(&id);
            error!(%id, error = %e, "json stock create not persisted; rolled back");
            return Err(e);
        }
        info!(%id, trade_code = %rec.trade_code(), "stock created");
        Ok(rec)
    }

    async fn get(&self, id: Uuid) -> Result<StockRecord<Uuid>, ServiceError> {
        let index = self.inner.read().await;
        index.get(&id).cloned().ok_or_else(|| ServiceError::not_found("stock"))
    }

    async fn list(&self, filter: StockFilter<Uuid>) -> Result<Vec<StockRecord<Uuid>>, ServiceError> {
        let index = self.inner.read().await;
        Ok(index.query(&filter))
    }

    async fn list_trade_codes(&self) -> Result<Vec<String>, ServiceError> {
        let index = self.inner.read().await;
        Ok(index.trade_codes())
    }

    async fn update(&self, id: Uuid, data: StockData) -> Result<StockRecord<Uuid>, ServiceError> {
        let mut index = self.inner.write().await;
        let previous = index.replace(id, data).ok_or_else(|| ServiceError::not_found("stock"))?;
        if let Err(e) = self.save(&index).await {
            index.insert(previous);
            error!(%id, error = %e, "json stock update not persisted; rolled back");
            return Err(e);
        }
        let updated = index.get(&id).cloned().ok_or_else(|| ServiceError::not_found("stock"))?;
        info!(%id, "stock updated");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let mut index = self.inner.write().await;
        let removed = index.remove(&id).ok_or_else(|| ServiceError::not_found("stock"))?;
        if let Err(e) = self.save(&index).await {
            index.insert(removed);
            error!(%id, error = %e, "json stock delete not persisted; rolled back");
            return Err(e);
        }
        info!(%id, "stock deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample, temp_json_path};

    #[tokio::test]
    async fn json_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("json_stock_store");
        let store = JsonStockStore::open(&tmp).await?;

        // missing file initialized to an empty array
        assert_eq!(fs::read_to_string(&tmp).await?, "[]");
        assert!(store.list(StockFilter::all(10)).await?.is_empty());

        let a = store.create(sample("ACI", 2020, 8, 10).into()).await?;
        let b = store.create(sample("GP", 2020, 8, 10).into()).await?;
        assert_eq!(store.get(a.id).await?.data, sample("ACI", 2020, 8, 10));

        let mut changed = sample("GP", 2020, 8, 11);
        changed.volume = 99;
        let updated = store.update(b.id, changed.clone()).await?;
        assert_eq!(updated, StockRecord::new(b.id, changed.clone()));

        store.delete(a.id).await?;
        assert!(matches!(store.get(a.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.delete(a.id).await, Err(ServiceError::NotFound(_))));

        // reload from disk
        let reloaded = JsonStockStore::open(&tmp).await?;
        let all = reloaded.list(StockFilter::all(10)).await?;
        assert_eq!(all, vec![StockRecord::new(b.id, changed)]);
        assert_eq!(reloaded.list_trade_codes().await?, vec!["GP"]);
        assert!(fs::metadata(tmp_path_for(&tmp)).await.is_err());

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_explicit_id_is_a_conflict() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("json_stock_conflict");
        let store = JsonStockStore::open(&tmp).await?;
        let id = Uuid::new_v4();
        let input = StockInput { id: Some(id), data: sample("ACI", 2020, 8, 10) };

        assert_eq!(store.create(input.clone()).await?.id, id);
        let second = StockInput { id: Some(id), data: sample("GP", 2020, 8, 11) };
        assert!(matches!(store.create(second).await, Err(ServiceError::Conflict(_))));
        assert_eq!(store.list(StockFilter::all(10)).await?.len(), 1);
        assert_eq!(store.get(id).await?.trade_code(), "ACI");

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_not_lost() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("json_stock_concurrent");
        let store = JsonStockStore::open(&tmp).await?;

        let mut handles = Vec::new();
        for i in 0..32u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(sample(&format!("C{}", i % 4), 2021, 1, i % 28 + 1).into()).await
            }));
        }
        for h in handles {
            h.await??;
        }

        assert_eq!(store.list(StockFilter::all(100)).await?.len(), 32);
        let reloaded = JsonStockStore::open(&tmp).await?;
        assert_eq!(reloaded.list(StockFilter::all(100)).await?.len(), 32);
        assert_eq!(reloaded.list_trade_codes().await?, vec!["C0", "C1", "C2", "C3"]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected_and_kept() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("json_stock_corrupt");
        fs::write(&tmp, b"{not json").await?;
        assert!(matches!(JsonStockStore::open(&tmp).await, Err(ServiceError::Storage(_))));
        assert_eq!(fs::read(&tmp).await?, b"{not json");
        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_record_on_disk_is_rejected_and_kept() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("json_stock_invalid");
        let raw = serde_json::json!([{
            "id": Uuid::new_v4(), "date": "2020-08-10", "trade_code": "ACI",
            "high": 1, "low": 1, "open": 1, "close": 1, "volume": -5
        }]);
        let bytes = serde_json::to_vec(&raw)?;
        fs::write(&tmp, &bytes).await?;
        assert!(matches!(JsonStockStore::open(&tmp).await, Err(ServiceError::Storage(_))));
        assert_eq!(fs::read(&tmp).await?, bytes);
        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn loads_separator_strings_from_disk() -> Result<(), anyhow::Error> {
        let tmp = temp_json_path("json_stock_legacy");
        let id = Uuid::new_v4();
        let raw = serde_json::json!([{
            "id": id, "date": "2020-08-10", "trade_code": "1JANATAMF",
            "high": "1,234.50", "low": "4.1", "open": 4.2, "close": "4.1", "volume": "2,285,416"
        }]);
        fs::write(&tmp, serde_json::to_vec(&raw)?).await?;

        let store = JsonStockStore::open(&tmp).await?;
        let rec = store.get(id).await?;
        assert_eq!(rec.data.high, 1234.50);
        assert_eq!(rec.data.volume, 2_285_416);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }
}
