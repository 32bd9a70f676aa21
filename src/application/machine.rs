use crate::config::{Generation, MachineConfig};
use crate::domain::account::{Account, Amount, Balance, Pin};
use crate::domain::firmware::FirmwareVersion;
use crate::domain::ports::StateStoreBox;
use crate::domain::printer::{Printer, PrinterWarning};
use crate::domain::state::MachineSnapshot;
use crate::domain::transaction::TransactionKind;
use crate::error::{AtmError, Result};
use chrono::Local;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Result of a successful customer authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct Authentication {
    pub account: Account,
    /// True when the owner was unknown and a zero-balance account was opened.
    pub registered: bool,
}

/// What happened at the printer while issuing a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Receipt {
    pub warnings: Vec<PrinterWarning>,
    /// Paper or ink ran out with this receipt.
    pub printer_depleted: bool,
    /// The machine ended the customer session because the printer ran out.
    pub logged_out: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub amount: Amount,
    pub balance: Balance,
    pub receipt: Receipt,
}

/// Technician view of the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineStatus {
    pub out_of_service: bool,
    pub in_use: bool,
    pub cash: Balance,
    pub paper: u32,
    pub ink: u32,
    pub firmware: FirmwareVersion,
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- ATM STATUS ---")?;
        writeln!(
            f,
            "System: {}",
            if self.out_of_service { "OUT OF SERVICE" } else { "ONLINE" }
        )?;
        writeln!(f, "Usage: {}", if self.in_use { "IN USE" } else { "IDLE" })?;
        writeln!(f, "Cash: {}", self.cash)?;
        writeln!(f, "Paper: {} sheets", self.paper)?;
        writeln!(f, "Ink: {} units", self.ink)?;
        write!(f, "Firmware: {}", self.firmware)
    }
}

/// The ATM: accounts, cash vault, receipt printer and firmware, plus the active session.
///
/// Every mutating operation ends with a full-state save through the [`StateStore`] port.
/// Saves are best-effort: a failure is logged and the in-memory change stands.
///
/// [`StateStore`]: crate::domain::ports::StateStore
pub struct AtmMachine {
    accounts: Vec<Account>,
    cash: Balance,
    printer: Printer,
    firmware: FirmwareVersion,
    session: Option<String>,
    store: StateStoreBox,
    config: MachineConfig,
}

impl AtmMachine {
    /// Restores the machine from `store`.
    ///
    /// A classic machine that loads an empty printer comes back with the configured
    /// fallback level instead.
    pub async fn open(store: StateStoreBox, config: MachineConfig) -> Result<Self> {
        let snapshot = store.load().await?;
        let mut printer = Printer::new(snapshot.paper, snapshot.ink);

        if config.generation.restores_empty_printer() {
            if !printer.has_paper() {
                printer.set_paper_level(config.classic_printer_fallback);
            }
            if !printer.has_ink() {
                printer.set_ink_level(config.classic_printer_fallback);
            }
        }

        debug!(
            accounts = snapshot.accounts.len(),
            cash = %snapshot.cash,
            paper = printer.paper_level(),
            ink = printer.ink_level(),
            firmware = %snapshot.firmware,
            generation = ?config.generation,
            "machine state loaded"
        );

        Ok(Self {
            accounts: snapshot.accounts,
            cash: snapshot.cash,
            printer,
            firmware: snapshot.firmware,
            session: None,
            store,
            config,
        })
    }

    // ------------------------------------------------------------------
    // Customer
    // ------------------------------------------------------------------

    /// Logs a customer in, opening a zero-balance account for unknown owners.
    pub async fn authenticate_user(&mut self, name: &str, pin: &str) -> Result<Authentication> {
        if self.is_out_of_service() {
            warn!("authentication refused, machine out of service");
            return Err(AtmError::OutOfService);
        }
        let pin = Pin::parse(pin)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AtmError::InvalidOwner);
        }

        let existing = self.accounts.iter().find(|a| a.owner_matches(name)).cloned();
        if let Some(account) = existing {
            if !account.verify_pin(&pin) {
                warn!(owner = %account.owner, "incorrect PIN");
                return Err(AtmError::IncorrectPin);
            }
            info!(owner = %account.owner, "customer authenticated");
            self.session = Some(account.owner.clone());
            return Ok(Authentication {
                account,
                registered: false,
            });
        }

        let account = Account::new(name, pin, Balance::ZERO);
        self.accounts.push(account.clone());
        self.session = Some(account.owner.clone());
        info!(owner = %account.owner, "registered new account");
        self.persist().await;

        Ok(Authentication {
            account,
            registered: true,
        })
    }

    pub fn is_out_of_service(&self) -> bool {
        let no_cash = self.config.generation.counts_cash_for_service() && !self.cash.is_positive();
        no_cash || !self.printer.is_ready()
    }

    /// True when paper or ink is low enough that the customer should confirm before
    /// starting a transaction.
    pub fn needs_low_resource_confirmation(&self) -> bool {
        self.printer.is_low(self.config.low_resource_threshold)
    }

    pub fn check_balance(&self, name: &str) -> Result<Balance> {
        Ok(self.account(name)?.balance)
    }

    pub fn transaction_history(&self, name: &str) -> Result<&[String]> {
        Ok(self.account(name)?.transactions())
    }

    /// Credits the account and the cash vault. Returns the new balance.
    ///
    /// Nothing changes if either total would overflow.
    pub async fn deposit(&mut self, name: &str, amount: Amount) -> Result<Balance> {
        let now = Local::now().naive_local();
        let index = self.position(name)?;
        let cash = self.cash.checked_add(amount.into())?;

        let account = &mut self.accounts[index];
        account.deposit(amount)?;
        account.record(TransactionKind::Deposit, amount, now);
        let balance = account.balance;
        let owner = account.owner.clone();

        self.cash = cash;
        info!(owner = %owner, amount = %amount, balance = %balance, "deposit accepted");
        self.persist().await;

        Ok(balance)
    }

    /// Pays out cash and prints a receipt.
    ///
    /// Refused without touching balances when the printer cannot print (the session is
    /// ended on V2 machines), when the balance is short, or when the vault is short.
    pub async fn withdraw(&mut self, name: &str, amount: Amount) -> Result<Withdrawal> {
        let index = self.position(name)?;

        if !self.printer.is_ready() {
            warn!(owner = %self.accounts[index].owner, "withdrawal refused, printer depleted");
            self.end_session_for_printer();
            self.persist().await;
            return Err(AtmError::PrinterDepleted);
        }

        let requested = Balance::from(amount);
        let balance = self.accounts[index].balance;
        if balance < requested {
            warn!(owner = %self.accounts[index].owner, requested = %requested, "insufficient funds");
            return Err(AtmError::InsufficientFunds { balance, requested });
        }
        if self.cash < requested {
            warn!(available = %self.cash, requested = %requested, "insufficient ATM cash");
            return Err(AtmError::InsufficientCash {
                available: self.cash,
                requested,
            });
        }

        let now = Local::now().naive_local();
        let account = &mut self.accounts[index];
        account.withdraw(amount)?;
        account.record(TransactionKind::Withdraw, amount, now);
        let balance = account.balance;
        info!(owner = %account.owner, amount = %amount, balance = %balance, "withdrawal paid out");

        self.cash -= requested;
        let receipt = self.issue_receipt()?;
        self.persist().await;

        Ok(Withdrawal {
            amount,
            balance,
            receipt,
        })
    }

    pub async fn print_receipt(&mut self) -> Result<Receipt> {
        let receipt = self.issue_receipt();
        self.persist().await;
        receipt
    }

    pub fn logout(&mut self) {
        if let Some(owner) = self.session.take() {
            info!(owner = %owner, "session ended");
        }
    }

    pub fn session_owner(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    // ------------------------------------------------------------------
    // Technician
    // ------------------------------------------------------------------

    pub fn authenticate_technician(&self, id: &str, password: &str) -> bool {
        let credentials = &self.config.technician;
        let accepted = id == credentials.id && password == credentials.password;
        if !accepted {
            warn!(id, "technician authentication failed");
        }
        accepted
    }

    pub fn status(&self) -> MachineStatus {
        MachineStatus {
            out_of_service: self.is_out_of_service(),
            in_use: self.is_session_active(),
            cash: self.cash,
            paper: self.printer.paper_level(),
            ink: self.printer.ink_level(),
            firmware: self.firmware.clone(),
        }
    }

    /// Returns the cash on hand after the refill.
    pub async fn refill_cash(&mut self, amount: Amount) -> Result<Balance> {
        self.cash = self.cash.checked_add(amount.into()).inspect_err(|_| {
            warn!(amount = %amount, cash = %self.cash, "cash refill rejected");
        })?;
        info!(amount = %amount, cash = %self.cash, "cash refilled");
        self.persist().await;
        Ok(self.cash)
    }

    /// Removes up to `amount` from the vault and returns what was actually collected.
    pub async fn collect_cash(&mut self, amount: Amount) -> Balance {
        let collected = Balance::from(amount).min(self.cash.max(Balance::ZERO));
        self.cash -= collected;
        info!(collected = %collected, cash = %self.cash, "cash collected");
        self.persist().await;
        collected
    }

    /// Returns the paper level after the refill.
    pub async fn refill_paper(&mut self, sheets: u32) -> u32 {
        self.printer.refill_paper(sheets);
        info!(sheets, paper = self.printer.paper_level(), "paper refilled");
        self.persist().await;
        self.printer.paper_level()
    }

    /// Returns the ink level after the refill.
    pub async fn refill_ink(&mut self, units: u32) -> u32 {
        self.printer.refill_ink(units);
        info!(units, ink = self.printer.ink_level(), "ink refilled");
        self.persist().await;
        self.printer.ink_level()
    }

    pub async fn update_firmware(&mut self, version: &str) -> Result<FirmwareVersion> {
        if !self.config.generation.firmware_updatable() {
            return Err(AtmError::FirmwareLocked);
        }
        let version = FirmwareVersion::parse(version).inspect_err(|_| {
            warn!(version, "firmware update rejected");
        })?;
        info!(from = %self.firmware, to = %version, "firmware updated");
        self.firmware = version.clone();
        self.persist().await;
        Ok(version)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn cash_available(&self) -> Balance {
        self.cash
    }

    pub fn paper_available(&self) -> u32 {
        self.printer.paper_level()
    }

    pub fn ink_available(&self) -> u32 {
        self.printer.ink_level()
    }

    pub fn firmware_version(&self) -> &FirmwareVersion {
        &self.firmware
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn generation(&self) -> Generation {
        self.config.generation
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            cash: self.cash,
            paper: self.printer.paper_level(),
            ink: self.printer.ink_level(),
            firmware: self.firmware.clone(),
            accounts: self.accounts.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn position(&self, name: &str) -> Result<usize> {
        self.accounts
            .iter()
            .position(|a| a.owner_matches(name))
            .ok_or_else(|| AtmError::AccountNotFound(name.trim().to_string()))
    }

    fn account(&self, name: &str) -> Result<&Account> {
        let index = self.position(name)?;
        Ok(&self.accounts[index])
    }

    fn issue_receipt(&mut self) -> Result<Receipt> {
        if !self.printer.is_ready() {
            warn!("receipt not printed, printer depleted");
            self.end_session_for_printer();
            return Err(AtmError::PrinterDepleted);
        }

        self.printer.use_paper();
        self.printer.use_ink();
        let warnings = self.printer.warnings(self.config.low_resource_threshold);

        let printer_depleted = !self.printer.is_ready();
        let logged_out = printer_depleted && self.end_session_for_printer();
        if printer_depleted {
            warn!("printer depleted after printing");
        }

        Ok(Receipt {
            warnings,
            printer_depleted,
            logged_out,
        })
    }

    /// Ends the session when this generation does that on an empty printer.
    fn end_session_for_printer(&mut self) -> bool {
        if self.config.generation.logs_out_on_depleted_printer() {
            self.logout();
            true
        } else {
            false
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.snapshot()).await {
            error!(error = %e, "failed to persist machine state");
        }
    }
}
