//! Shell context, dispatch, and the CLI error types.

use std::{env, io};

use chrono::{DateTime, Utc};
use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use strsim::levenshtein;

use crate::{
    clock::{Clock, ManualClock, SystemClock},
    config::{BankConfig, ConfigManager},
    currency::ParseAmountError,
    errors::{BankError, TransactionError},
    ledger::Account,
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::CommandRegistry;

/// Environment variable that pins the session clock to an RFC 3339 instant.
pub const FIXED_NOW_ENV: &str = "BANK_CORE_FIXED_NOW";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub account: Account,
    pub clock: Box<dyn Clock>,
    pub config: BankConfig,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let clock = clock_from_env()?;
        Self::with_parts(mode, config_manager, clock)
    }

    pub fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let account = Account::new(1, config.policy.clone()).with_agency(config.agency.clone());

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            account,
            clock,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn prompt(&self) -> String {
        format!("[{}] => ", self.account.display_number())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// Parses the amount from `args`, or asks for it when running interactively.
    pub(crate) fn amount_argument(
        &self,
        args: &[&str],
        prompt: &str,
    ) -> Result<Decimal, CommandError> {
        match args {
            [] if self.can_prompt() => {
                cli_io::prompt_amount(&self.theme, prompt, &self.config.currency)
            }
            [] => Err(CommandError::InvalidArguments(format!(
                "{} is required in script mode",
                prompt.to_lowercase()
            ))),
            parts => Ok(self.config.currency.parse_amount(&parts.join(" "))?),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
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

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(&err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Transaction(err) => {
                output::error(&err);
                if err.is_daily_limit() {
                    if let Some(countdown) = self.account.time_until_reset(self.now()) {
                        output::hint(format!("Try again in {}.", countdown));
                    }
                }
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::Io(err)),
            other => {
                output::error(&other);
                Ok(())
            }
        }
    }
}

fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(FIXED_NOW_ENV) {
        Ok(raw) => {
            let instant = DateTime::parse_from_rfc3339(raw.trim())
                .map_err(|_| CliError::Clock(raw.clone()))?;
            Ok(Box::new(ManualClock::new(instant.with_timezone(&Utc))))
        }
        Err(_) => Ok(Box::new(SystemClock)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error(transparent)]
    Amount(#[from] ParseAmountError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("invalid BANK_CORE_FIXED_NOW value `{0}` (expected RFC 3339)")]
    Clock(String),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Io(err) => CliError::Io(err),
            CommandError::Bank(err) => CliError::Bank(err),
            other => CliError::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) fn script_context(start: DateTime<Utc>) -> (ShellContext, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("config manager");
    let clock = Box::new(ManualClock::new(start));
    let context =
        ShellContext::with_parts(CliMode::Script, manager, clock).expect("shell context");
    (context, dir)
}
