//! Core CLI loop plumbing: errors, dispatch and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::{ledger_manager::LedgerManager, services::ServiceError},
    domain::{common::NamedEntity, expense::Expense, group::Group},
    errors::{LedgerError, ValidationError},
    storage::JsonStorage,
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No group selected. Use `use <group>` or `group-new` first.")]
    NoActiveGroup,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Service(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    /// Builds a shell rooted at `base`, or the default app home when `None`.
    pub fn new(mode: CliMode, base: Option<PathBuf>) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = match base.clone() {
            Some(base) => ConfigManager::with_base_dir(base)?,
            None => ConfigManager::new()?,
        };
        let config = config_manager.load()?;
        cli_io::apply_config(&config, mode);

        let storage = JsonStorage::new(base, Some(config.backup_retention))?;
        let mut context = ShellContext {
            mode,
            registry,
            manager: LedgerManager::new(Box::new(storage)),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            active_group: None,
            last_command: None,
            running: true,
        };
        context.restore_last_group();
        context.report_integrity();
        Ok(context)
    }

    fn restore_last_group(&mut self) {
        let Some(last) = self.config.last_group.clone() else {
            return;
        };
        if let Ok(Some(group)) = self.manager.find_group(&last) {
            self.active_group = Some(group.id);
            if self.mode == CliMode::Interactive {
                cli_io::print_info(format!("Using group `{}`.", group.name));
            }
        }
    }

    fn report_integrity(&self) {
        match self.manager.warnings() {
            Ok(warnings) => {
                for warning in warnings {
                    tracing::warn!(%warning, "ledger integrity");
                    cli_io::print_warning(warning);
                }
            }
            Err(err) => cli_io::print_error(format!("Could not read ledger: {}", err)),
        }
    }

    pub fn prompt(&self) -> String {
        match self.active_group.and_then(|id| self.manager.group(id).ok()) {
            Some(group) => format!("split[{}]> ", group.name),
            None => "split> ".to_string(),
        }
    }

    /// Every spelling the shell accepts, aliases included.
    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.spellings().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.lookup(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler_for(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest(input, self.registry.names()) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(self.confirm("Exit shell?", true)?)
    }

    /// Asks before destructive commands. Scripts never block on prompts.
    pub(crate) fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, default)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NoActiveGroup => {
                cli_io::print_error(CommandError::NoActiveGroup);
                cli_io::print_hint("Try `group-new Trip Alice Bob` to get started.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    /// The selected group, freshly loaded from storage.
    pub(crate) fn current_group(&mut self) -> Result<Group, CommandError> {
        let id = self.active_group.ok_or(CommandError::NoActiveGroup)?;
        match self.manager.group(id) {
            Ok(group) => Ok(group),
            Err(err) if err.is_not_found() => {
                self.active_group = None;
                Err(CommandError::NoActiveGroup)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Resolves a group by name or id prefix, suggesting a near match on failure.
    pub(crate) fn resolve_group(&self, query: &str) -> Result<Group, CommandError> {
        if let Some(group) = self.manager.find_group(query)? {
            return Ok(group);
        }
        let groups = self.manager.list_groups()?;
        let mut message = format!("Group `{}` not found.", query);
        if let Some(best) = closest(query, groups.iter().map(NamedEntity::name)) {
            message.push_str(&format!(" Did you mean `{}`?", best));
        }
        Err(CommandError::InvalidArguments(message))
    }

    /// Checks `name` against the group's members, suggesting a near match.
    pub(crate) fn require_member(&self, group: &Group, name: &str) -> CommandResult {
        if group.has_member(name) {
            return Ok(());
        }
        let mut message = format!("`{}` is not a member of `{}`.", name, group.name);
        if let Some(best) = closest(name, group.members.iter().map(String::as_str)) {
            message.push_str(&format!(" Did you mean `{}`?", best));
        }
        Err(CommandError::InvalidArguments(message))
    }

    pub(crate) fn resolve_expense<'g>(
        &self,
        group: &'g Group,
        query: &str,
    ) -> Result<&'g Expense, CommandError> {
        group.find_expense(query).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "No single expense in `{}` matches `{}`.",
                group.name, query
            ))
        })
    }

    /// Makes `group` the active one and remembers it for the next session.
    pub(crate) fn select_group(&mut self, group: &Group) -> CommandResult {
        self.active_group = Some(group.id);
        self.config.last_group = Some(group.id.to_string());
        self.persist_config()
    }

    pub(crate) fn forget_group(&mut self, id: Uuid) -> CommandResult {
        if self.active_group == Some(id) {
            self.active_group = None;
        }
        if self.config.last_group.as_deref() == Some(id.to_string().as_str()) {
            self.config.last_group = None;
            return self.persist_config();
        }
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        super::shell::handle_line(self, line)
    }
}

/// Closest candidate within an edit distance of 3.
pub(crate) fn closest<'a>(
    input: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<&'a str> {
    let needle = input.to_lowercase();
    candidates
        .map(|candidate| (levenshtein(&candidate.to_lowercase(), &needle), candidate))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

#[cfg(test)]
pub(crate) fn process_script(
    base: PathBuf,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::new(CliMode::Script, Some(base))?;
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(context)
}
