use crate::domain::ports::StateStore;
use crate::domain::state::MachineSnapshot;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory state store.
///
/// Uses `Arc<RwLock<Option<MachineSnapshot>>>` so clones share the same state, which lets
/// tests keep a handle and inspect what the machine saved. An empty store loads as the
/// default snapshot. No protected account is injected.
#[derive(Default, Clone)]
pub struct InMemoryStateStore {
    snapshot: Arc<RwLock<Option<MachineSnapshot>>>,
}

impl InMemoryStateStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with `snapshot`.
    pub fn with_snapshot(snapshot: MachineSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    /// The last saved (or preloaded) snapshot, if any.
    pub async fn current(&self) -> Option<MachineSnapshot> {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> Result<MachineSnapshot> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot.clone().unwrap_or_default())
    }

    async fn save(&self, snapshot: &MachineSnapshot) -> Result<()> {
        let mut current = self.snapshot.write().await;
        *current = Some(snapshot.clone());
        Ok(())
    }
}
