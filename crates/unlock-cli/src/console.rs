//! Interactive prompter backed by the terminal.

use crate::output::device_rows;
use fastboot_ops::DeviceFacts;
use std::io::{self, BufRead, Write};
use tracing::debug;
use unlock_exchange::ClearPolicy;
use unlock_orchestrator::Prompter;

/// Prompts go to stderr so stdout stays clean for `--format json`.
pub struct ConsolePrompter;

impl ConsolePrompter {
    fn read_line(&self, prompt: &str) -> io::Result<String> {
        eprint!("{}", prompt);
        io::stderr().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Prompter for ConsolePrompter {
    fn account(&self) -> io::Result<String> {
        self.read_line("Account (ID, email or phone): ")
    }

    fn credential(&self) -> io::Result<String> {
        rpassword::prompt_password("Password: ")
    }

    fn web_device_id(&self, login_url: &str) -> io::Result<String> {
        eprintln!();
        eprintln!("Log in to your account in the browser to confirm this computer.");
        match open::that(login_url) {
            Ok(()) => eprintln!("Opened {}", login_url),
            Err(err) => {
                debug!(error = %err, "Could not launch a browser");
                eprintln!("Open this URL manually: {}", login_url);
            }
        }
        eprintln!("After logging in, copy the address you were redirected to.");
        self.read_line("Redirect URL (or just the d= value): ")
    }

    fn confirm_unlock(&self, facts: &DeviceFacts, policy: ClearPolicy) -> io::Result<String> {
        eprintln!();
        eprintln!("Device");
        for (label, value) in device_rows(facts) {
            eprintln!("  {:<16} {}", format!("{}:", label), value);
        }
        eprintln!();
        match policy {
            ClearPolicy::WipesData => {
                eprintln!("WARNING: unlocking this device erases all user data.")
            }
            ClearPolicy::PreservesData => eprintln!("Unlocking this device keeps user data."),
            ClearPolicy::Unknown => {
                eprintln!("Could not determine whether unlocking erases user data.")
            }
        }
        self.read_line("Unlock the bootloader now? [y/N] ")
    }
}
