use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::stock::numeric::{de_price, de_volume};

/// Identifier strategy of a store. Each store picks exactly one.
pub trait StockId:
    Copy + Ord + Hash + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Relational and in-memory stores: auto-increment integers.
impl StockId for i64 {}

/// JSON file store: random v4 tokens.
impl StockId for Uuid {}

/// Every field of a record except its id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockData {
    pub date: NaiveDate,
    pub trade_code: String,
    #[serde(deserialize_with = "de_price")]
    pub high: f64,
    #[serde(deserialize_with = "de_price")]
    pub low: f64,
    #[serde(deserialize_with = "de_price")]
    pub open: f64,
    #[serde(deserialize_with = "de_price")]
    pub close: f64,
    #[serde(deserialize_with = "de_volume")]
    pub volume: i64,
}

impl StockData {
    /// Shape checks only; no relation between high/low/open/close is enforced.
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::stock::validate_trade_code(&self.trade_code)?;
        models::stock::validate_price("high", self.high)?;
        models::stock::validate_price("low", self.low)?;
        models::stock::validate_price("open", self.open)?;
        models::stock::validate_price("close", self.close)?;
        models::stock::validate_volume(self.volume)?;
        Ok(())
    }
}

/// A stored record as persisted and returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockRecord<Id> {
    pub id: Id,
    #[serde(flatten)]
    pub data: StockData,
}

impl<Id: StockId> StockRecord<Id> {
    pub fn new(id: Id, data: StockData) -> Self { Self { id, data } }

    pub fn trade_code(&self) -> &str { &self.data.trade_code }
}

/// Create/update request body. `id` is honored on create and ignored on update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockInput<Id> {
    pub id: Option<Id>,
    #[serde(flatten)]
    pub data: StockData,
}

impl<Id> From<StockData> for StockInput<Id> {
    fn from(data: StockData) -> Self { Self { id: None, data } }
}

impl From<models::stock::Model> for StockRecord<i64> {
    fn from(m: models::stock::Model) -> Self {
        Self {
            id: m.id,
            data: StockData {
                date: m.date,
                trade_code: m.trade_code,
                high: m.high,
                low: m.low,
                open: m.open,
                close: m.close,
                volume: m.volume,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_is_flat_on_the_wire() {
        let rec = StockRecord::new(
            3_i64,
            StockData {
                date: NaiveDate::from_ymd_opt(2020, 8, 10).unwrap(),
                trade_code: "GP".into(),
                high: 10.0,
                low: 9.0,
                open: 9.5,
                close: 9.9,
                volume: 1200,
            },
        );
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            v,
            json!({"id": 3, "date": "2020-08-10", "trade_code": "GP", "high": 10.0, "low": 9.0, "open": 9.5, "close": 9.9, "volume": 1200})
        );
        let back: StockRecord<i64> = serde_json::from_value(v).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn input_accepts_separated_strings_and_optional_id() {
        let input: StockInput<Uuid> = serde_json::from_value(json!({
            "date": "2020-08-10", "trade_code": "ACI",
            "high": "1,234.50", "low": "1,200", "open": 1210, "close": 1220.25,
            "volume": "2,000"
        }))
        .unwrap();
        assert!(input.id.is_none());
        assert_eq!(input.data.high, 1234.50);
        assert_eq!(input.data.low, 1200.0);
        assert_eq!(input.data.volume, 2000);

        let id = Uuid::new_v4();
        let with_id: StockInput<Uuid> = serde_json::from_value(json!({
            "id": id, "date": "2020-08-11", "trade_code": "ACI",
            "high": 1, "low": 1, "open": 1, "close": 1, "volume": 1
        }))
        .unwrap();
        assert_eq!(with_id.id, Some(id));
    }

    /// Body parsing must not require anything of `Id` beyond `StockId`.
    fn parse_input<Id: StockId>(v: serde_json::Value) -> StockInput<Id> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn missing_id_is_none_for_generic_ids() {
        let body = json!({
            "date": "2020-08-10", "trade_code": "ACI",
            "high": 1, "low": 1, "open": 1, "close": 1, "volume": 1
        });
        assert!(parse_input::<Uuid>(body.clone()).id.is_none());
        assert!(parse_input::<i64>(body).id.is_none());
    }

    #[test]
    fn input_rejects_bad_date() {
        let res = serde_json::from_value::<StockInput<i64>>(json!({
            "date": "10/08/2020", "trade_code": "ACI",
            "high": 1, "low": 1, "open": 1, "close": 1, "volume": 1
        }));
        assert!(res.is_err());
    }

    #[test]
    fn validate_rejects_negative_volume_and_blank_code() {
        let mut data = StockData {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            trade_code: "ACI".into(),
            high: 1.0,
            low: 2.0,
            open: 1.0,
            close: 1.0,
            volume: 0,
        };
        // low > high is allowed
        assert!(data.validate().is_ok());
        data.volume = -5;
        assert!(matches!(data.validate(), Err(ServiceError::Model(_))));
        data.volume = 5;
        data.trade_code = " ".into();
        assert!(data.validate().is_err());
    }
}
