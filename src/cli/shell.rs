use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

/// Set to any value to read commands from stdin instead of a terminal.
const SCRIPT_ENV: &str = "SPLIT_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = match std::env::var_os(SCRIPT_ENV) {
        Some(_) => CliMode::Script,
        None => CliMode::Interactive,
    };
    let mut context = ShellContext::new(mode, None)?;
    tracing::debug!(?mode, "shell started");

    match mode {
        CliMode::Interactive => interactive_loop(&mut context),
        CliMode::Script => script_loop(&mut context, io::stdin().lock()),
    }
}

fn interactive_loop(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ShellHelper::new(context.command_names())));

    cli_io::print_info("Split Ledger shell. Type `help` to list commands, Tab to complete.");
    loop {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.trim()).ok();
        }
        if !execute(context, &line)? {
            break;
        }
    }
    cli_io::print_info("Bye.");
    Ok(())
}

/// Runs one command per line. Blank lines and `#` comments are skipped.
fn script_loop(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        if !execute(context, &line?)? {
            break;
        }
    }
    Ok(())
}

/// Runs `line` and reports any command failure. Returns `false` once the
/// shell should stop.
fn execute(context: &mut ShellContext, line: &str) -> Result<bool, CliError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(context.running);
    }
    match handle_line(context, line) {
        Ok(LoopControl::Continue) => {}
        Ok(LoopControl::Exit) => return Ok(false),
        Err(err) => context.report_error(err)?,
    }
    Ok(context.running)
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let words = match parse_command_line(line) {
        Ok(words) => words,
        Err(err) => {
            cli_io::print_warning(format!("Could not parse `{}`: {}", line, err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((first, rest)) = words.split_first() else {
        return Ok(LoopControl::Continue);
    };

    context.last_command = Some(line.to_string());
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    let control = context.dispatch(&first.to_lowercase(), first, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Splits a line into words, honouring quotes and escapes.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// Tab completion for the command word.
struct ShellHelper {
    commands: Vec<String>,
}

impl ShellHelper {
    fn new(spellings: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = spellings.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Start offset of the word under the cursor and the commands it could
    /// become. Arguments after the command word get no suggestions.
    fn complete_command(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let before = &line[..pos];
        if before.trim_start().contains(char::is_whitespace) {
            return (pos, Vec::new());
        }
        let start = before.len() - before.trim_start().len();
        let typed = before[start..].to_lowercase();
        let found = self
            .commands
            .iter()
            .filter(|command| command.starts_with(&typed))
            .cloned()
            .collect();
        (start, found)
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, commands) = self.complete_command(line, pos);
        let candidates = commands
            .into_iter()
            .map(|command| Pair {
                display: command.clone(),
                replacement: format!("{} ", command),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for ShellHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_covers_only_the_command_word() {
        let helper = ShellHelper::new(vec!["expenses", "expense-add", "exit", "settle"]);
        let (start, found) = helper.complete_command("  exp", 5);
        assert_eq!(start, 2);
        assert_eq!(found, vec!["expense-add".to_string(), "expenses".to_string()]);

        let (_, found) = helper.complete_command("expense-add Din", 15);
        assert!(found.is_empty());
    }

    #[test]
    fn quoted_words_stay_together() {
        let words = parse_command_line("expense-add \"Late dinner\" 90 Alice").unwrap();
        assert_eq!(words, vec!["expense-add", "Late dinner", "90", "Alice"]);
        assert!(parse_command_line("group-new \"Trip").is_err());
    }

    #[test]
    fn script_loop_skips_comments_and_stops_at_exit() {
        let temp = tempfile::tempdir().unwrap();
        let mut context =
            ShellContext::new(CliMode::Script, Some(temp.path().to_path_buf())).unwrap();
        let script = "# setup\n\ngroup-new Trip Alice Bob\nexit\ngroup-new Never Ann\n";
        script_loop(&mut context, script.as_bytes()).unwrap();

        let groups = context.manager.list_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert!(!context.running);
        assert_eq!(context.last_command.as_deref(), Some("exit"));
    }
}
