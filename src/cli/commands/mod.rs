pub mod backup;
pub mod expense;
pub mod group;
pub mod settlement;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(group::definitions())
        .chain(expense::definitions())
        .chain(settlement::definitions())
        .chain(backup::definitions())
    {
        registry.register(entry);
    }
}

/// Fails with the command's usage line when fewer than `count` args were given.
pub(crate) fn require_args(args: &[&str], count: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("Usage: {}", usage)))
    } else {
        Ok(())
    }
}
