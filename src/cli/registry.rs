use std::collections::BTreeMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Section a command is listed under in `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandCategory {
    General,
    Groups,
    Expenses,
    Settlement,
    Backups,
}

impl CommandCategory {
    pub fn title(self) -> &'static str {
        match self {
            CommandCategory::General => "General",
            CommandCategory::Groups => "Groups & members",
            CommandCategory::Expenses => "Expenses",
            CommandCategory::Settlement => "Settlement",
            CommandCategory::Backups => "Backups",
        }
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub category: CommandCategory,
    pub summary: &'static str,
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        category: CommandCategory,
        name: &'static str,
        summary: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            category,
            summary,
            usage,
            aliases: &[],
            handler,
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Shell commands in registration order, addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`. A later registration under the same name replaces the
    /// earlier one in place.
    pub fn register(&mut self, entry: CommandEntry) {
        let slot = match self.index.get(entry.name) {
            Some(&existing) => {
                self.entries[existing] = entry;
                existing
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        let entry = &self.entries[slot];
        self.index.insert(entry.name, slot);
        for &alias in entry.aliases {
            self.index.insert(alias, slot);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn handler_for(&self, name: &str) -> Option<CommandHandler> {
        self.lookup(name).map(|entry| entry.handler)
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Primary command names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Names and aliases, for completion.
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.index.keys().copied()
    }

    /// Entries bucketed by category, each bucket in registration order.
    pub fn by_category(&self) -> BTreeMap<CommandCategory, Vec<&CommandEntry>> {
        let mut buckets: BTreeMap<CommandCategory, Vec<&CommandEntry>> = BTreeMap::new();
        for entry in &self.entries {
            buckets.entry(entry.category).or_default().push(entry);
        }
        buckets
    }
}
