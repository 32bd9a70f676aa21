use super::document::LenientDocument;
use crate::domain::ports::StateStore;
use crate::domain::state::{MachineSnapshot, ProtectedAccount};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Keeps the whole machine state in one pretty-printed JSON document.
///
/// Loading never fails on content. A missing file is seeded with the default snapshot and
/// a file that is not a JSON object is replaced by it. Inside a readable document, invalid
/// fields fall back to their defaults and unreadable accounts are dropped. Whenever the file
/// is rewritten for one of these reasons, its previous contents are kept at
/// [`backup_path`](Self::backup_path). The protected account is re-applied on every load
/// and written back when that changed anything.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
    protected: ProtectedAccount,
}

impl JsonFileStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_protected_account(path, ProtectedAccount::default())
    }

    pub fn with_protected_account<P: AsRef<Path>>(path: P, protected: ProtectedAccount) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            protected,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the previous contents go before a repaired or replaced file is rewritten.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    async fn back_up(&self, data: &str) -> Result<()> {
        let backup = self.backup_path();
        tokio::fs::write(&backup, data).await?;
        warn!(backup = %backup.display(), "previous state file kept as backup");
        Ok(())
    }

    async fn seed(&self) -> Result<MachineSnapshot> {
        let mut snapshot = MachineSnapshot::default();
        self.protected.apply(&mut snapshot);
        self.save(&snapshot).await?;
        Ok(snapshot)
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn load(&self) -> Result<MachineSnapshot> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no state file, starting from defaults");
                return self.seed().await;
            }
            Err(e) => return Err(e.into()),
        };

        let fields = match serde_json::from_str::<Value>(&data) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                warn!(path = %self.path.display(), "state file is not a JSON object, falling back to defaults");
                self.back_up(&data).await?;
                return self.seed().await;
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file unreadable, falling back to defaults"
                );
                self.back_up(&data).await?;
                return self.seed().await;
            }
        };

        let (mut snapshot, repaired) = LenientDocument::new(fields).into_snapshot();
        if repaired {
            self.back_up(&data).await?;
        }
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
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
