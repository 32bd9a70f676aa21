use super::account::{Account, Balance};
use super::firmware::FirmwareVersion;
use super::state::MachineSnapshot;
use crate::error::Result;
use async_trait::async_trait;

/// Where the machine keeps its state between runs.
///
/// `save` always receives the complete snapshot; implementations overwrite
/// whatever they held before.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<MachineSnapshot>;
    async fn save(&self, snapshot: &MachineSnapshot) -> Result<()>;

    async fn load_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.load().await?.accounts)
    }

    async fn load_cash_level(&self) -> Result<Balance> {
        Ok(self.load().await?.cash)
    }

    async fn load_paper_level(&self) -> Result<u32> {
        Ok(self.load().await?.paper)
    }

    async fn load_ink_level(&self) -> Result<u32> {
        Ok(self.load().await?.ink)
    }

    async fn load_firmware_version(&self) -> Result<FirmwareVersion> {
        Ok(self.load().await?.firmware)
    }
}

pub type StateStoreBox = Box<dyn StateStore>;
