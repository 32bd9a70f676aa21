use super::Prompt;
use crate::application::machine::{AtmMachine, Withdrawal};
use crate::domain::account::Amount;
use crate::error::Result;
use std::io::Write;
use tokio::io::AsyncBufRead;

const MENU: &str = "\n--- CUSTOMER MENU ---\n1. Check balance\n2. Deposit\n3. Withdraw\n4. Transaction history\n0. Logout\nSelect: ";

/// Logs a customer in and serves the customer menu until logout.
pub async fn run<R, W>(atm: &mut AtmMachine, prompt: &mut Prompt<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(name) = prompt.ask("Enter name: ").await? else {
        return Ok(());
    };
    let Some(pin) = prompt.ask("Enter PIN: ").await? else {
        return Ok(());
    };

    let auth = match atm.authenticate_user(&name, &pin).await {
        Ok(auth) => auth,
        Err(e) => return prompt.say(format!("[!] {e}")),
    };
    let owner = auth.account.owner;
    if auth.registered {
        prompt.say(format!("[+] Registered new account: {owner}"))?;
    } else {
        prompt.say(format!("Welcome, {owner}!"))?;
    }
    prompt.say(format!("Current balance: {}", auth.account.balance))?;

    while atm.is_session_active() {
        let Some(choice) = prompt.ask(MENU).await? else {
            atm.logout();
            break;
        };
        match choice.as_str() {
            "1" => match atm.check_balance(&owner) {
                Ok(balance) => prompt.say(format!("Balance: {balance}"))?,
                Err(e) => prompt.say(format!("[!] {e}"))?,
            },
            "2" => deposit(atm, prompt, &owner).await?,
            "3" => withdraw(atm, prompt, &owner).await?,
            "4" => history(atm, prompt, &owner)?,
            "0" => {
                atm.logout();
                prompt.say("Logged out.")?;
            }
            _ => prompt.say("Invalid option.")?,
        }
    }
    Ok(())
}

async fn ask_amount<R, W>(prompt: &mut Prompt<R, W>) -> Result<Option<Amount>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(raw) = prompt.ask("Enter amount: ").await? else {
        return Ok(None);
    };
    match raw.parse::<Amount>() {
        Ok(amount) => Ok(Some(amount)),
        Err(e) => {
            prompt.say(format!("[!] {e}"))?;
            Ok(None)
        }
    }
}

async fn deposit<R, W>(atm: &mut AtmMachine, prompt: &mut Prompt<R, W>, owner: &str) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(amount) = ask_amount(prompt).await? else {
        return Ok(());
    };
    match atm.deposit(owner, amount).await {
        Ok(_) => prompt.say(format!("Successfully deposited {amount}")),
        Err(e) => prompt.say(format!("[!] {e}")),
    }
}

async fn withdraw<R, W>(atm: &mut AtmMachine, prompt: &mut Prompt<R, W>, owner: &str) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if atm.needs_low_resource_confirmation() {
        let answer = prompt
            .ask("[!] Low paper/ink. Continue transaction? (y/n): ")
            .await?;
        if !matches!(answer.as_deref(), Some("y" | "Y")) {
            return prompt.say("Transaction cancelled.");
        }
    }

    let Some(amount) = ask_amount(prompt).await? else {
        return Ok(());
    };
    match atm.withdraw(owner, amount).await {
        Ok(withdrawal) => report_withdrawal(prompt, &withdrawal),
        Err(e) => {
            prompt.say(format!("[!] {e}"))?;
            if !atm.is_session_active() {
                prompt.say("[!] You have been logged out.")?;
            }
            Ok(())
        }
    }
}

fn report_withdrawal<R, W>(prompt: &mut Prompt<R, W>, withdrawal: &Withdrawal) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    prompt.say(format!(
        "Desired amount reached. Please collect your cash: {}",
        withdrawal.amount
    ))?;
    prompt.say("[*] Receipt printed.")?;
    for warning in &withdrawal.receipt.warnings {
        prompt.say(format!("[!] Warning: {warning}"))?;
    }
    if withdrawal.receipt.printer_depleted {
        prompt.say("[!] Printer out of paper or ink. ATM out of service.")?;
    }
    if withdrawal.receipt.logged_out {
        prompt.say("[!] You have been logged out.")?;
    }
    Ok(())
}

fn history<R, W>(atm: &AtmMachine, prompt: &mut Prompt<R, W>, owner: &str) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let entries = match atm.transaction_history(owner) {
        Ok(entries) => entries,
        Err(e) => return prompt.say(format!("[!] {e}")),
    };
    if entries.is_empty() {
        return prompt.say("No transactions yet.");
    }
    prompt.say("--- TRANSACTION HISTORY ---")?;
    for entry in entries {
        prompt.say(entry)?;
    }
    Ok(())
}
