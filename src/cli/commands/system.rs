use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::SETTABLE_KEYS;

const BUILD_HASH: &str = env!("BANK_CORE_BUILD_HASH");
const BUILD_STATUS: &str = env!("BANK_CORE_BUILD_STATUS");
const BUILD_TIMESTAMP: &str = env!("BANK_CORE_BUILD_TIMESTAMP");
const BUILD_TARGET: &str = env!("BANK_CORE_BUILD_TARGET");
const BUILD_PROFILE: &str = env!("BANK_CORE_BUILD_PROFILE");

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show or change settings (applied on the next start)",
            "config [show|path|set <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help)
            .with_aliases(&["h"]),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new("exit", "Leave the session", "exit", cmd_exit)
            .with_aliases(&["q", "quit"]),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(&name.to_lowercase())
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown command `{}`", name)))?;
        output::info(format!("{} - {}", entry.name, entry.description));
        output::info(format!("usage: {}", entry.usage));
        if !entry.aliases.is_empty() {
            output::info(format!("aliases: {}", entry.aliases.join(", ")));
        }
        return Ok(());
    }

    output::section("Commands");
    for entry in context.registry.list() {
        output::info(format!("  {:<28} {}", entry.usage, entry.description));
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(format!(
        "bank_core {} ({} {}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_HASH,
        BUILD_STATUS,
        BUILD_PROFILE
    ));
    output::info(format!("built {} for {}", BUILD_TIMESTAMP, BUILD_TARGET));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            let json = serde_json::to_string_pretty(&context.config)
                .map_err(crate::errors::BankError::from)?;
            output::section("Configuration");
            output::info(json);
            Ok(())
        }
        ["path"] => {
            output::info(context.config_manager.path().display());
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let mut updated = context.config.clone();
            updated.set_value(key, &value.join(" "))?;
            context.config_manager.save(&updated)?;
            context.config = updated;
            output::success(format!(
                "Saved `{}`. Account limits change on the next start.",
                key
            ));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config [show|path|set <key> <value>] (keys: {})",
            SETTABLE_KEYS.join(", ")
        ))),
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Session closed. Thank you for banking with us!");
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{script_context, CommandError};
    use crate::config::ConfigManager;
    use chrono::{TimeZone, Utc};

    #[test]
    fn config_set_persists_to_disk() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let (mut context, dir) = script_context(start);
        context
            .process_line("config set max_withdrawals_per_day 5")
            .unwrap();
        assert_eq!(context.config.policy.max_withdrawals_per_day, 5);
        // The running account keeps the limits it was opened with.
        assert_eq!(context.account.policy().max_withdrawals_per_day, 3);

        let reloaded = ConfigManager::with_base_dir(dir.path().to_path_buf())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(reloaded.policy.max_withdrawals_per_day, 5);
    }

    #[test]
    fn config_set_with_bad_value_is_reported() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let (mut context, _dir) = script_context(start);
        let err = context.process_line("config set timezone Nowhere").unwrap_err();
        assert!(matches!(err, CommandError::Bank(_)));
        assert!(matches!(
            context.process_line("config set"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn help_knows_aliases() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let (mut context, _dir) = script_context(start);
        assert!(context.process_line("help d").is_ok());
        assert!(context.process_line("help").is_ok());
        assert!(context.process_line("version").is_ok());
    }
}
