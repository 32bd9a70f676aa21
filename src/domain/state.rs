use super::account::{Account, Balance, Pin};
use super::firmware::FirmwareVersion;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CASH: Balance = Balance(dec!(5000));
pub const DEFAULT_PAPER: u32 = 4;
pub const DEFAULT_INK: u32 = 4;

fn default_cash() -> Balance {
    DEFAULT_CASH
}

fn default_paper() -> u32 {
    DEFAULT_PAPER
}

fn default_ink() -> u32 {
    DEFAULT_INK
}

/// Everything the machine persists, saved as one document after every mutation.
///
/// Fields missing from a stored document fall back to the defaults above.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct MachineSnapshot {
    #[serde(default = "default_cash")]
    pub cash: Balance,
    #[serde(default = "default_paper")]
    pub paper: u32,
    #[serde(default = "default_ink")]
    pub ink: u32,
    #[serde(default)]
    pub firmware: FirmwareVersion,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl Default for MachineSnapshot {
    fn default() -> Self {
        Self {
            cash: DEFAULT_CASH,
            paper: DEFAULT_PAPER,
            ink: DEFAULT_INK,
            firmware: FirmwareVersion::default(),
            accounts: Vec::new(),
        }
    }
}

/// Seed account that durable stores re-inject on every load.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectedAccount {
    pub owner: String,
    pub pin: Pin,
    pub minimum_balance: Balance,
}

impl Default for ProtectedAccount {
    fn default() -> Self {
        Self {
            owner: "ngaa".to_string(),
            pin: Pin("2006".to_string()),
            minimum_balance: Balance(dec!(100)),
        }
    }
}

impl ProtectedAccount {
    /// Adds the account when it is missing, or tops its balance up to the minimum.
    /// Returns true if the snapshot changed.
    pub fn apply(&self, snapshot: &mut MachineSnapshot) -> bool {
        let existing = snapshot
            .accounts
            .iter_mut()
            .find(|a| a.owner_matches(&self.owner) && a.verify_pin(&self.pin));

        match existing {
            Some(account) if account.balance < self.minimum_balance => {
                account.balance = self.minimum_balance;
                true
            }
            Some(_) => false,
            None => {
                snapshot.accounts.push(Account::new(
                    self.owner.clone(),
                    self.pin.clone(),
                    self.minimum_balance,
                ));
                true
            }
        }
    }
}
