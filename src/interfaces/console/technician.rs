use super::Prompt;
use crate::application::machine::AtmMachine;
use crate::domain::account::Amount;
use crate::error::Result;
use std::io::Write;
use std::str::FromStr;
use tokio::io::AsyncBufRead;

const PANEL: &str = "\n--- TECHNICIAN PANEL ---\n1. View status\n2. Refill cash\n3. Collect cash\n4. Refill paper\n5. Refill ink\n6. Update firmware\n0. Logout\nSelect: ";

/// Checks technician credentials and serves the maintenance panel.
pub async fn run<R, W>(atm: &mut AtmMachine, prompt: &mut Prompt<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(id) = prompt.ask("Technician ID: ").await? else {
        return Ok(());
    };
    let Some(password) = prompt.ask("Password: ").await? else {
        return Ok(());
    };
    if !atm.authenticate_technician(&id, &password) {
        return prompt.say("[!] Invalid technician credentials.");
    }

    while let Some(choice) = prompt.ask(PANEL).await? {
        match choice.as_str() {
            "1" => prompt.say(atm.status())?,
            "2" => {
                if let Some(amount) = ask_value::<Amount, _, _>(prompt, "Amount to add: ").await? {
                    match atm.refill_cash(amount).await {
                        Ok(_) => prompt.say(format!("[+] Cash refilled: {amount}"))?,
                        Err(e) => prompt.say(format!("[!] {e}"))?,
                    }
                }
            }
            "3" => {
                if let Some(amount) = ask_value::<Amount, _, _>(prompt, "Amount to collect: ").await? {
                    let collected = atm.collect_cash(amount).await;
                    prompt.say(format!("[+] Cash collected: {collected}"))?;
                }
            }
            "4" => {
                if let Some(sheets) = ask_value::<u32, _, _>(prompt, "Sheets to add: ").await? {
                    atm.refill_paper(sheets).await;
                    prompt.say(format!("[+] Paper refilled: {sheets} sheets"))?;
                }
            }
            "5" => {
                if let Some(units) = ask_value::<u32, _, _>(prompt, "Units to add: ").await? {
                    atm.refill_ink(units).await;
                    prompt.say(format!("[+] Ink refilled: {units} units"))?;
                }
            }
            "6" => {
                let Some(version) = prompt.ask("New firmware version (X.Y.Z): ").await? else {
                    break;
                };
                match atm.update_firmware(&version).await {
                    Ok(version) => prompt.say(format!("[+] Firmware updated to {version}"))?,
                    Err(e) => prompt.say(format!("[!] {e}"))?,
                }
            }
            "0" => {
                prompt.say("Logging out...")?;
                break;
            }
            _ => prompt.say("Invalid option.")?,
        }
    }
    Ok(())
}

/// Reads and parses one value, printing `Invalid input.` when it does not parse.
async fn ask_value<T, R, W>(prompt: &mut Prompt<R, W>, label: &str) -> Result<Option<T>>
where
    T: FromStr,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(raw) = prompt.ask(label).await? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            prompt.say("Invalid input.")?;
            Ok(None)
        }
    }
}
