//! Shared building blocks for the stock API binaries and crates:
//! logging setup, runtime directory checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_status() {
        let h = types::Health { status: "ok" };
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["status"], "ok");
    }

    #[test]
    fn ok_response_is_true() {
        let v = serde_json::to_value(types::OkResponse::default()).unwrap();
        assert_eq!(v, serde_json::json!({"ok": true}));
    }
}
