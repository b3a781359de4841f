//! Interactive user prompting

use std::io::{self, Write};

use crate::error::Result;
use crate::hierarchy::ConfirmGate;

/// Prompt user for yes/no confirmation
///
/// Returns `true` only if the user answers `y` or `Y`.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Check if stdin is a TTY (interactive)
pub fn is_stdin_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Confirmation gate that asks on the terminal. Read errors count as "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl ConfirmGate for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        confirm(prompt).unwrap_or_else(|e| {
            tracing::warn!("failed to read confirmation: {e}");
            false
        })
    }
}
