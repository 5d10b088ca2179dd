use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

/// One trading day's price bar for one instrument.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub trade_code: String,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub close: f64,
    pub volume: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Sentinel accepted by list filters meaning "every trade code".
pub const ALL_TRADE_CODES: &str = "all";

/// Width of the `trade_code` column.
pub const TRADE_CODE_MAX_LEN: usize = 32;

pub fn validate_trade_code(code: &str) -> Result<(), errors::ModelError> {
    if code.trim().is_empty() {
        return Err(errors::ModelError::Validation("trade_code must not be empty".into()));
    }
    if code.chars().count() > TRADE_CODE_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("trade_code longer than {TRADE_CODE_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_volume(volume: i64) -> Result<(), errors::ModelError> {
    if volume < 0 {
        return Err(errors::ModelError::Validation(format!("volume must be >= 0, got {volume}")));
    }
    Ok(())
}

pub fn validate_price(field: &str, value: f64) -> Result<(), errors::ModelError> {
    if !value.is_finite() {
        return Err(errors::ModelError::Validation(format!("{field} must be a finite number")));
    }
    Ok(())
}
