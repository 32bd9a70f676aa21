use crate::domain::account::Account;
use crate::domain::transaction::{TIMESTAMP_FORMAT, TransactionRecord};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use tracing::warn;

#[derive(Serialize)]
struct StatementRow {
    timestamp: String,
    #[serde(rename = "type")]
    kind: String,
    amount: String,
    balance: String,
}

impl From<&TransactionRecord> for StatementRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            kind: record.kind.to_string(),
            amount: format!("{:.2}", record.amount),
            balance: format!("{:.2}", record.balance.0),
        }
    }
}

/// Writes an account's transaction log as CSV (`timestamp,type,amount,balance`).
pub struct StatementWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> StatementWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Returns the number of rows written. Entries that are not in the log format are
    /// skipped.
    pub fn write_statement(&mut self, account: &Account) -> Result<usize> {
        // Header is written even for an empty log
        self.writer
            .write_record(["timestamp", "type", "amount", "balance"])?;

        let mut written = 0;
        for entry in account.transactions() {
            match entry.parse::<TransactionRecord>() {
                Ok(record) => {
                    self.writer.serialize(StatementRow::from(&record))?;
                    written += 1;
                }
                Err(e) => warn!(owner = %account.owner, error = %e, "skipping log entry"),
            }
        }
        self.writer.flush()?;
        Ok(written)
    }
}

#[derive(Serialize)]
struct AccountRow<'a> {
    owner: &'a str,
    balance: String,
    transactions: usize,
}

/// Writes one CSV row per account (`owner,balance,transactions`). PINs are never exported.
pub struct AccountReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: &[Account]) -> Result<()> {
        if accounts.is_empty() {
            self.writer
                .write_record(["owner", "balance", "transactions"])?;
        }
        for account in accounts {
            self.writer.serialize(AccountRow {
                owner: &account.owner,
                balance: format!("{:.2}", account.balance.0),
                transactions: account.transactions().len(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
