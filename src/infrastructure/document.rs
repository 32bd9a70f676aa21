use crate::domain::account::Account;
use crate::domain::firmware::FirmwareVersion;
use crate::domain::state::{DEFAULT_CASH, DEFAULT_INK, DEFAULT_PAPER, MachineSnapshot};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

/// Reads a stored state document one field at a time.
///
/// A missing field takes its default silently. A field that is present but does not
/// parse takes its default with a warning, and an unreadable account is skipped, so one
/// bad value never discards the rest of the document. Either case marks the document as
/// repaired.
pub struct LenientDocument {
    fields: Map<String, Value>,
    repaired: bool,
}

impl LenientDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            repaired: false,
        }
    }

    pub fn field<T: DeserializeOwned>(&mut self, key: &str, default: impl FnOnce() -> T) -> T {
        match self.fields.remove(key) {
            None | Some(Value::Null) => default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(field = key, error = %e, "invalid stored value, using default");
                self.repaired = true;
                default()
            }),
        }
    }

    pub fn accounts(&mut self) -> Vec<Account> {
        let items = match self.fields.remove("accounts") {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => {
                warn!("stored accounts are not a list, ignoring them");
                self.repaired = true;
                return Vec::new();
            }
        };

        let mut accounts = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Account>(item) {
                Ok(account) => accounts.push(account),
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable account");
                    self.repaired = true;
                }
            }
        }
        accounts
    }

    pub fn is_repaired(&self) -> bool {
        self.repaired
    }

    /// Builds a snapshot from the document. The flag is true when anything was repaired.
    pub fn into_snapshot(mut self) -> (MachineSnapshot, bool) {
        let snapshot = MachineSnapshot {
            cash: self.field("cash", || DEFAULT_CASH),
            paper: self.field("paper", || DEFAULT_PAPER),
            ink: self.field("ink", || DEFAULT_INK),
            firmware: self.field("firmware", FirmwareVersion::default),
            accounts: self.accounts(),
        };
        (snapshot, self.is_repaired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn read(value: Value) -> (MachineSnapshot, bool) {
        let Value::Object(fields) = value else {
            panic!("test document must be an object");
        };
        LenientDocument::new(fields).into_snapshot()
    }

    #[test]
    fn test_valid_document_is_not_repaired() {
        let (snapshot, repaired) = read(json!({
            "cash": "1200",
            "paper": 7,
            "ink": 2,
            "firmware": "2.0.0",
            "accounts": [{"owner": "Alice", "pin": "1234", "balance": "10"}],
        }));
        assert!(!repaired);
        assert_eq!(snapshot.cash, Balance::new(dec!(1200)));
        assert_eq!((snapshot.paper, snapshot.ink), (7, 2));
        assert_eq!(snapshot.firmware.as_str(), "2.0.0");
        assert_eq!(snapshot.accounts.len(), 1);
    }

    #[test]
    fn test_missing_fields_take_defaults_silently() {
        let (snapshot, repaired) = read(json!({}));
        assert!(!repaired);
        assert_eq!(snapshot, MachineSnapshot::default());
    }

    #[test]
    fn test_invalid_fields_default_one_by_one() {
        let (snapshot, repaired) = read(json!({
            "cash": "750",
            "paper": -1,
            "ink": 5,
            "firmware": "2.0",
            "accounts": [
                {"owner": "Alice", "pin": "1234", "balance": "900"},
                {"owner": "Bob", "pin": "123", "balance": "5"},
            ],
        }));
        assert!(repaired);
        assert_eq!(snapshot.cash, Balance::new(dec!(750)));
        assert_eq!(snapshot.paper, DEFAULT_PAPER);
        assert_eq!(snapshot.ink, 5);
        assert_eq!(snapshot.firmware.as_str(), "1.0.0");

        let owners: Vec<&str> = snapshot.accounts.iter().map(|a| a.owner.as_str()).collect();
        assert_eq!(owners, vec!["Alice"]);
        assert_eq!(snapshot.accounts[0].balance, Balance::new(dec!(900)));
    }
}
