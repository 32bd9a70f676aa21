use crate::domain::account::Balance;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtmError {
    #[error("ATM out of service. Please try later.")]
    OutOfService,
    #[error("PIN must be exactly 4 digits.")]
    InvalidPin,
    #[error("Account owner name must not be empty.")]
    InvalidOwner,
    #[error("Incorrect PIN.")]
    IncorrectPin,
    #[error("No account found for {0}.")]
    AccountNotFound(String),
    #[error("Insufficient funds: balance {balance}, requested {requested}.")]
    InsufficientFunds { balance: Balance, requested: Balance },
    #[error("Insufficient ATM cash: available {available}, requested {requested}.")]
    InsufficientCash {
        available: Balance,
        requested: Balance,
    },
    #[error("Printer depleted. ATM out of service.")]
    PrinterDepleted,
    #[error("Invalid firmware format {0:?}. Use X.Y.Z (e.g., 1.1.1)")]
    InvalidFirmwareVersion(String),
    #[error("Firmware is fixed on this machine generation.")]
    FirmwareLocked,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for AtmError {
    fn from(err: rocksdb::Error) -> Self {
        AtmError::InternalError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, AtmError>;
