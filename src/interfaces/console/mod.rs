//! Line-oriented terminal front end for [`AtmMachine`].
//!
//! Every loop ends cleanly when input runs out, so scripted sessions can be piped in.

pub mod customer;
pub mod technician;

use crate::application::machine::AtmMachine;
use crate::error::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads answers from `input` and writes prompts to `output`.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: AsyncBufRead + Unpin, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `label` and reads one trimmed line. `None` means end of input.
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

const MAIN_MENU: &str = "\n--- ATM ---\n1. Customer\n2. Technician\n0. Exit\nSelect: ";

/// Runs the top-level menu until the user exits or input ends.
pub async fn run_main_menu<R, W>(atm: &mut AtmMachine, prompt: &mut Prompt<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    while let Some(choice) = prompt.ask(MAIN_MENU).await? {
        match choice.as_str() {
            "1" => customer::run(atm, prompt).await?,
            "2" => technician::run(atm, prompt).await?,
            "0" => break,
            _ => prompt.say("Invalid option.")?,
        }
    }
    prompt.say("Goodbye.")
}
