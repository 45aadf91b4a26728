//! Shared runtime state for CLI interactions and command execution.

use dialoguer::theme::ColorfulTheme;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::ledger_manager::LedgerManager,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: LedgerManager,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Group that member, expense and settlement commands act on.
    pub active_group: Option<Uuid>,
    pub last_command: Option<String>,
    pub running: bool,
}
