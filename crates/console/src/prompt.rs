//! Confirmation prompts guarding destructive actions.

use std::io::{BufRead, Write};

/// Asks the user to confirm an action.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Confirms everything (`ASSUME_YES`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> bool {
        tracing::debug!(question, "Auto-confirmed");
        true
    }
}

/// Asks on `output` and reads a `y`/`yes` answer from `input`.
/// Anything else, including end of input, declines.
pub struct LineConfirm<'a, I: BufRead, O: Write> {
    input: &'a mut I,
    output: &'a mut O,
}

impl<'a, I: BufRead, O: Write> LineConfirm<'a, I, O> {
    pub fn new(input: &'a mut I, output: &'a mut O) -> Self {
        Self { input, output }
    }
}

impl<I: BufRead, O: Write> Confirm for LineConfirm<'_, I, O> {
    fn confirm(&mut self, question: &str) -> bool {
        if write!(self.output, "{question} [y/N] ")
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}
