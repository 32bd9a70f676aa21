use crate::domain::state::ProtectedAccount;
use clap::ValueEnum;

pub const DEFAULT_STATE_FILE: &str = "data/atm_state.json";

/// Which machine behaviour to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Generation {
    /// First-generation machine: goes out of service only when the printer is empty,
    /// keeps its factory firmware and never ends a session because of the printer.
    Classic,
    /// Current machine: also out of service without cash, firmware is updatable and a
    /// depleted printer logs the customer out.
    #[default]
    V2,
}

impl Generation {
    pub fn counts_cash_for_service(&self) -> bool {
        matches!(self, Generation::V2)
    }

    pub fn firmware_updatable(&self) -> bool {
        matches!(self, Generation::V2)
    }

    pub fn logs_out_on_depleted_printer(&self) -> bool {
        matches!(self, Generation::V2)
    }

    pub fn restores_empty_printer(&self) -> bool {
        matches!(self, Generation::Classic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicianCredentials {
    pub id: String,
    pub password: String,
}

impl Default for TechnicianCredentials {
    fn default() -> Self {
        Self {
            id: "TECH1".to_string(),
            password: "123".to_string(),
        }
    }
}

/// Runtime settings for an [`AtmMachine`](crate::application::machine::AtmMachine).
#[derive(Debug, Clone, PartialEq)]
pub struct MachineConfig {
    pub generation: Generation,
    pub technician: TechnicianCredentials,
    /// Paper or ink at or below this level triggers warnings and a confirmation prompt.
    pub low_resource_threshold: u32,
    /// Level restored on a classic machine that loads an empty printer.
    pub classic_printer_fallback: u32,
    pub protected_account: ProtectedAccount,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            technician: TechnicianCredentials::default(),
            low_resource_threshold: 3,
            classic_printer_fallback: 3,
            protected_account: ProtectedAccount::default(),
        }
    }
}

impl MachineConfig {
    pub fn with_generation(generation: Generation) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }
}
