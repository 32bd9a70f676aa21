use super::document::LenientDocument;
use crate::domain::account::Balance;
use crate::domain::firmware::FirmwareVersion;
use crate::domain::ports::StateStore;
use crate::domain::state::{MachineSnapshot, ProtectedAccount};
use crate::error::{AtmError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Column Family for storing accounts, keyed by their zero-padded position.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing the machine's own state.
pub const CF_MACHINE: &str = "machine";

const MACHINE_KEY: &[u8] = b"state";
/// Sorts after every position key.
const ACCOUNTS_END: &[u8] = b"~";

fn account_key(position: usize) -> String {
    format!("{position:010}")
}

/// The non-account part of a snapshot, stored under a single key.
#[derive(Serialize)]
struct MachineRecord<'a> {
    cash: Balance,
    paper: u32,
    ink: u32,
    firmware: &'a FirmwareVersion,
}

/// A persistent state store using RocksDB.
///
/// Accounts and machine state live in separate Column Families. Account keys are the
/// account's position in the snapshot, so iteration returns them in registration order.
/// A save writes every account and the machine record in one batch and drops keys past
/// the last account.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStateStore {
    db: Arc<DB>,
    protected: ProtectedAccount,
}

fn missing_cf(name: &str) -> AtmError {
    AtmError::InternalError(Box::new(std::io::Error::other(format!(
        "{name} column family not found"
    ))))
}

impl RocksDbStateStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("accounts" and "machine") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let cf_machine = ColumnFamilyDescriptor::new(CF_MACHINE, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts, cf_machine])?;

        Ok(Self {
            db: Arc::new(db),
            protected: ProtectedAccount::default(),
        })
    }

    pub fn with_protected_account(self, protected: ProtectedAccount) -> Self {
        Self { protected, ..self }
    }

    fn read_accounts(&self) -> Result<Vec<Value>> {
        let handle = self.db.cf_handle(CF_ACCOUNTS).ok_or_else(|| missing_cf("Accounts"))?;

        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(handle, rocksdb::IteratorMode::Start) {
            let (key, value) = item?;
            match serde_json::from_slice::<Value>(&value) {
                Ok(account) => accounts.push(account),
                Err(e) => warn!(
                    key = %String::from_utf8_lossy(&key),
                    error = %e,
                    "skipping unreadable account record"
                ),
            }
        }
        Ok(accounts)
    }

    fn read_machine(&self) -> Result<Map<String, Value>> {
        let handle = self.db.cf_handle(CF_MACHINE).ok_or_else(|| missing_cf("Machine"))?;
        let Some(bytes) = self.db.get_cf(handle, MACHINE_KEY)? else {
            info!("empty database, starting from defaults");
            return Ok(Map::new());
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => {
                warn!("machine record is not an object, using defaults");
                Ok(Map::new())
            }
            Err(e) => {
                warn!(error = %e, "machine record unreadable, using defaults");
                Ok(Map::new())
            }
        }
    }
}

#[async_trait]
impl StateStore for RocksDbStateStore {
    async fn load(&self) -> Result<MachineSnapshot> {
        let mut fields = self.read_machine()?;
        fields.insert("accounts".to_string(), Value::Array(self.read_accounts()?));

        let (mut snapshot, repaired) = LenientDocument::new(fields).into_snapshot();
        let restored = self.protected.apply(&mut snapshot);
        if restored {
            debug!(owner = %self.protected.owner, "protected account restored");
        }
        if repaired || restored {
            self.save(&snapshot).await?;
        }
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &MachineSnapshot) -> Result<()> {
        let accounts = self.db.cf_handle(CF_ACCOUNTS).ok_or_else(|| missing_cf("Accounts"))?;
        let machine = self.db.cf_handle(CF_MACHINE).ok_or_else(|| missing_cf("Machine"))?;

        let mut batch = WriteBatch::default();
        for (position, account) in snapshot.accounts.iter().enumerate() {
            batch.put_cf(accounts, account_key(position), serde_json::to_vec(account)?);
        }
        batch.delete_range_cf(
            accounts,
            account_key(snapshot.accounts.len()).as_bytes(),
            ACCOUNTS_END,
        );
        let record = MachineRecord {
            cash: snapshot.cash,
            paper: snapshot.paper,
            ink: snapshot.ink,
            firmware: &snapshot.firmware,
        };
        batch.put_cf(machine, MACHINE_KEY, serde_json::to_vec(&record)?);

        self.db.write(batch)?;
        Ok(())
    }
}
