use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::{CliMode, CommandError};
use crate::cli::output;
use crate::config::Config;

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Disables colour for scripted runs or when the user turned it off.
pub fn apply_config(config: &Config, mode: CliMode) {
    if mode == CliMode::Script || !config.color_enabled {
        colored::control::set_override(false);
    }
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
