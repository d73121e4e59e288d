//! User input and interaction handling.
//! The [`Prompter`] trait hides the terminal so project creation can run
//! non-interactively and in tests.

use crate::error::Result;
use dialoguer::{Confirm, FuzzySelect, Input};

pub trait Prompter {
    /// Asks for free text, offering `default`.
    fn text(&self, prompt: &str, default: &str) -> Result<String>;

    /// Asks to pick one of `choices`, starting at `default`.
    fn select(&self, prompt: &str, choices: &[&str], default: usize) -> Result<usize>;

    /// Asks a yes/no question. Returns `true` right away when `skip` is set.
    fn confirm(&self, skip: bool, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, prompt: &str, default: &str) -> Result<String> {
        let value = Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn select(&self, prompt: &str, choices: &[&str], default: usize) -> Result<usize> {
        let index = FuzzySelect::new()
            .with_prompt(prompt)
            .items(choices)
            .default(default)
            .interact()?;
        Ok(index)
    }

    fn confirm(&self, skip: bool, prompt: &str, default: bool) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
    }
}

/// Answers every question with its default. Used for `--yes`.
#[derive(Debug, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn text(&self, _prompt: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn select(&self, _prompt: &str, _choices: &[&str], default: usize) -> Result<usize> {
        Ok(default)
    }

    fn confirm(&self, _skip: bool, _prompt: &str, _default: bool) -> Result<bool> {
        Ok(true)
    }
}
