use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use crate::errors::ServiceError;
use crate::pagination::StockFilter;
use crate::stock::domain::{StockData, StockId, StockRecord};

/// In-memory record collection with a primary index by id and a secondary
/// index by trade code. Both indexes are updated by every mutation.
#[derive(Debug, Clone)]
pub struct StockIndex<Id: StockId> {
    by_id: BTreeMap<Id, StockRecord<Id>>,
    by_code: BTreeMap<String, BTreeSet<Id>>,
}

impl<Id: StockId> Default for StockIndex<Id> {
    fn default() -> Self { Self { by_id: BTreeMap::new(), by_code: BTreeMap::new() } }
}

impl<Id: StockId> StockIndex<Id> {
    /// Build from loaded records; duplicate ids and records failing field validation are rejected.
    pub fn from_records(records: Vec<StockRecord<Id>>) -> Result<Self, ServiceError> {
        let mut index = Self::default();
        for rec in records {
            rec.data
                .validate()
                .map_err(|e| ServiceError::Storage(format!("invalid stock {} in data file: {e}", rec.id)))?;
            if index.contains(&rec.id) {
                return Err(ServiceError::Storage(format!("duplicate stock id {} in data file", rec.id)));
            }
            index.insert(rec);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize { self.by_id.len() }

    pub fn contains(&self, id: &Id) -> bool { self.by_id.contains_key(id) }

    pub fn get(&self, id: &Id) -> Option<&StockRecord<Id>> { self.by_id.get(id) }

    /// Largest id present.
    pub fn last_id(&self) -> Option<Id> { self.by_id.keys().next_back().copied() }

    /// Records in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = &StockRecord<Id>> { self.by_id.values() }

    /// Insert or overwrite by id, returning the previous record.
    pub fn insert(&mut self, rec: StockRecord<Id>) -> Option<StockRecord<Id>> {
        let previous = self.remove(&rec.id);
        self.by_code.entry(rec.data.trade_code.clone()).or_default().insert(rec.id);
        self.by_id.insert(rec.id, rec);
        previous
    }

    /// Replace the data of an existing record, returning the previous version.
    pub fn replace(&mut self, id: Id, data: StockData) -> Option<StockRecord<Id>> {
        if !self.contains(&id) {
            return None;
        }
        self.insert(StockRecord::new(id, data))
    }

    pub fn remove(&mut self, id: &Id) -> Option<StockRecord<Id>> {
        let rec = self.by_id.remove(id)?;
        if let Some(ids) = self.by_code.get_mut(&rec.data.trade_code) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_code.remove(&rec.data.trade_code);
            }
        }
        Some(rec)
    }

    pub fn query(&self, filter: &StockFilter<Id>) -> Vec<StockRecord<Id>> {
        let lower = match filter.after {
            Some(after) => Bound::Excluded(after),
            None => Bound::Unbounded,
        };
        let range = (lower, Bound::Unbounded);
        let skip = usize::try_from(filter.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit).unwrap_or(usize::MAX);

        match &filter.trade_code {
            Some(code) => match self.by_code.get(code) {
                Some(ids) => ids
                    .range(range)
                    .skip(skip)
                    .take(limit)
                    .filter_map(|id| self.by_id.get(id))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            },
            None => self
                .by_id
                .range(range)
                .skip(skip)
                .take(limit)
                .map(|(_, rec)| rec.clone())
                .collect(),
        }
    }

    /// Distinct trade codes, ascending.
    pub fn trade_codes(&self) -> Vec<String> { self.by_code.keys().cloned().collect() }
}
