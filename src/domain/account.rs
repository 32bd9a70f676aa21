use super::transaction::{TransactionKind, TransactionRecord};
use crate::error::{AtmError, Result};
use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Sub, SubAssign};
use std::str::FromStr;
use std::sync::LazyLock;

static PIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("PIN pattern is valid"));

/// A monetary value held by an account or by the cash vault.
///
/// Wraps `rust_decimal::Decimal` so that euro amounts never go through floating point.
/// Displays as `€x.xx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// A strictly positive amount of money moved by a deposit, withdrawal, refill or collection.
///
/// At most two decimal places, so every amount is a whole number of cents.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(AtmError::ValidationError(
                "Amount must be positive".to_string(),
            ));
        }
        if value.normalize().scale() > 2 {
            return Err(AtmError::ValidationError(format!(
                "Amount {value} has more than 2 decimal places"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AtmError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = AtmError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| AtmError::ValidationError(format!("Invalid amount {s:?}: {e}")))?;
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Balance::from(*self), f)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Adds `rhs`, failing instead of overflowing the decimal range.
    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| AtmError::ValidationError(format!("Amount too large: {self} + {rhs}")))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "€{:.2}", self.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A 4-digit personal identification number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin(pub(crate) String);

impl Pin {
    pub fn parse(raw: &str) -> Result<Self> {
        if PIN_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AtmError::InvalidPin)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pin {
    type Error = AtmError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> Self {
        pin.0
    }
}

/// Case-folded form of an owner name, used wherever owners are compared or keyed.
fn owner_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A customer account.
///
/// The owner name is the lookup key and is compared case-insensitively.
/// `transactions` is an ordered, human-readable log (see [`TransactionRecord`]).
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub owner: String,
    pub pin: Pin,
    pub balance: Balance,
    #[serde(default)]
    pub transactions: Vec<String>,
}

impl Account {
    pub fn new(owner: impl Into<String>, pin: Pin, balance: Balance) -> Self {
        Self {
            owner: owner.into(),
            pin,
            balance,
            transactions: Vec::new(),
        }
    }

    pub fn owner_matches(&self, name: &str) -> bool {
        owner_key(&self.owner) == owner_key(name)
    }

    pub fn verify_pin(&self, pin: &Pin) -> bool {
        self.pin == *pin
    }

    /// Adds funds to the balance. Left unchanged if the sum would overflow.
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        self.balance = self.balance.checked_add(amount.into())?;
        Ok(())
    }

    /// Removes funds if the balance covers them
    pub fn withdraw(&mut self, amount: Amount) -> Result<()> {
        let requested = Balance::from(amount);
        if self.balance >= requested {
            self.balance -= requested;
            Ok(())
        } else {
            Err(AtmError::InsufficientFunds {
                balance: self.balance,
                requested,
            })
        }
    }

    /// Appends a log entry stamped with the current balance, so call it after the mutation.
    pub fn record(&mut self, kind: TransactionKind, amount: Amount, at: NaiveDateTime) {
        let entry = TransactionRecord {
            timestamp: at,
            kind,
            amount: amount.into(),
            balance: self.balance,
        };
        self.transactions.push(entry.to_string());
    }

    pub fn transactions(&self) -> &[String] {
        &self.transactions
    }
}
