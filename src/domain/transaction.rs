use super::account::Balance;
use crate::error::{AtmError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("Deposit"),
            TransactionKind::Withdraw => f.write_str("Withdraw"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = AtmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Deposit" => Ok(TransactionKind::Deposit),
            "Withdraw" => Ok(TransactionKind::Withdraw),
            other => Err(AtmError::ValidationError(format!(
                "Unknown transaction kind {other:?}"
            ))),
        }
    }
}

/// One line of an account's transaction log.
///
/// Rendered as `2024-03-01 12:00:00 | Deposit: €20.00 | Balance: €50.00`, where the
/// balance is the one left after the operation. Accounts keep the rendered string;
/// `FromStr` recovers the fields for exports.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionRecord {
    pub timestamp: NaiveDateTime,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub balance: Balance,
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {}: {} | Balance: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.kind,
            Balance::new(self.amount),
            self.balance
        )
    }
}

fn parse_euros(field: &str, raw: &str) -> Result<Decimal> {
    let digits = raw.trim().strip_prefix('€').ok_or_else(|| {
        AtmError::ValidationError(format!("Missing currency sign in {field}: {raw:?}"))
    })?;
    Decimal::from_str(digits)
        .map_err(|e| AtmError::ValidationError(format!("Invalid {field} {raw:?}: {e}")))
}

impl FromStr for TransactionRecord {
    type Err = AtmError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || AtmError::ValidationError(format!("Malformed log entry {s:?}"));

        let mut parts = s.split(" | ");
        let (Some(time), Some(movement), Some(balance), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let timestamp = NaiveDateTime::parse_from_str(time.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| AtmError::ValidationError(format!("Invalid timestamp {time:?}: {e}")))?;
        let (kind, amount) = movement.split_once(':').ok_or_else(malformed)?;
        let balance = balance
            .trim()
            .strip_prefix("Balance:")
            .ok_or_else(malformed)?;

        Ok(Self {
            timestamp,
            kind: kind.trim().parse()?,
            amount: parse_euros("amount", amount)?,
            balance: Balance::new(parse_euros("balance", balance)?),
        })
    }
}
