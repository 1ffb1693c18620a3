use anyhow::Result;
use dialoguer::Input;
#[cfg(test)]
use mockall::automock;

use crate::gate::Confirmation;

// -----------------------------------------------------------------------------
// Prompter trait

/// Blocking questions put to the operator.
#[cfg_attr(test, automock)]
pub trait Prompter {
    /// Ask a yes/no question. Anything other than an affirmative answer declines.
    fn ask_yes_no(&self, prompt: &str) -> Result<bool>;

    /// Ask the operator to type `expected` exactly.
    fn ask_exact_text(&self, prompt: &str, expected: &str) -> Result<bool>;

    /// Ask for free text, such as a branch name or a menu selection.
    fn ask_text(&self, prompt: &str) -> Result<String>;
}

// -----------------------------------------------------------------------------
// TerminalPrompter

/// Prompter that reads answers from the terminal.
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

impl Prompter for TerminalPrompter {
    fn ask_yes_no(&self, prompt: &str) -> Result<bool> {
        let answer = Self::read_line(&format!("{prompt} (y/n)"))?;
        Ok(Confirmation::YesNo.accepts(&answer))
    }

    fn ask_exact_text(&self, prompt: &str, expected: &str) -> Result<bool> {
        eprintln!("{prompt}");
        let answer = Self::read_line("Type the exact text to confirm")?;
        Ok(Confirmation::ExactText(expected.to_string()).accepts(&answer))
    }

    fn ask_text(&self, prompt: &str) -> Result<String> {
        Ok(Self::read_line(prompt)?.trim().to_string())
    }
}
