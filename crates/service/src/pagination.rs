//! Pagination utilities for the stock listing
//!
//! `ListQuery` is the raw query string; `normalize` turns it into a
//! `StockFilter` the stores execute, applying defaults and the page-size cap.

use serde::Deserialize;

use crate::errors::ServiceError;

/// Page-size policy shared by every store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self { Self { default_limit: 100, max_limit: 1000 } }
}

/// Query parameters of `GET /stocks`.
#[derive(Clone, Debug, Deserialize)]
pub struct ListQuery<Id> {
    /// Last id seen by the client; only larger ids are returned.
    #[serde(alias = "cursor")]
    pub last_id: Option<Id>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub trade_code: Option<String>,
}

impl<Id> Default for ListQuery<Id> {
    fn default() -> Self { Self { last_id: None, skip: None, limit: None, trade_code: None } }
}

/// Normalized listing request executed by a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockFilter<Id> {
    pub trade_code: Option<String>,
    pub after: Option<Id>,
    pub skip: u64,
    pub limit: u64,
}

impl<Id> StockFilter<Id> {
    /// Every record, first page of `limit`.
    pub fn all(limit: u64) -> Self { Self { trade_code: None, after: None, skip: 0, limit } }
}

impl<Id> ListQuery<Id> {
    /// Apply defaults, map the exact `all` sentinel to "no filter", cap the limit.
    pub fn normalize(self, limits: PageLimits) -> Result<StockFilter<Id>, ServiceError> {
        let limit = match self.limit {
            Some(0) => return Err(ServiceError::Validation("limit must be >= 1".into())),
            Some(n) => n.min(limits.max_limit),
            None => limits.default_limit.min(limits.max_limit),
        };
        let trade_code = self
            .trade_code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != models::stock::ALL_TRADE_CODES);
        Ok(StockFilter {
            trade_code,
            after: self.last_id,
            skip: self.skip.unwrap_or(0),
            limit,
        })
    }
}
