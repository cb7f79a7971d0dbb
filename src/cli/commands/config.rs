use bizbalance_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table::{Table, TableColumn};

const RESTART_KEYS: [&str; 4] = [
    "insight_model",
    "insight_timeout_secs",
    "insight_endpoint",
    "data_root",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage shell preferences",
        "config [show|set <key> <value>|backup|backups|restore <name>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 2 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            set_config_value(context, key, value.trim())
        }
        "backup" => {
            let name = context.config_manager.backup(&context.config)?;
            output::success(format!("Configuration backed up as `{}`.", name));
            Ok(())
        }
        "backups" => list_config_backups(context),
        "restore" => {
            let name = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: config restore <name>".into())
            })?;
            context.config = context.config_manager.restore(name)?;
            context.apply_config();
            output::success(format!("Configuration restored from `{}`.", name));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`; usage: config [show|set <key> <value>|backup|backups|restore <name>]",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    let mut table = Table::new(vec![TableColumn::left("Key"), TableColumn::left("Value").max(60)]);
    for key in Config::KEYS {
        let value = context.config.get(key)?;
        let shown = if value.is_empty() { "(default)".to_string() } else { value };
        table.push(vec![key.to_string(), shown]);
    }
    output::info(table.render());
    output::info(format!(
        "Stored at {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut next = context.config.clone();
    next.set(key, value)?;
    context.config_manager.save(&next)?;
    context.config = next;
    context.apply_config();

    output::success(format!("{} updated.", key));
    if RESTART_KEYS.contains(&key) {
        output::hint("This setting takes effect the next time the shell starts.");
    }
    if key == "default_formula" {
        output::hint("Use `formula` to switch the formula for this session.");
    }
    Ok(())
}

fn list_config_backups(context: &ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        output::warning("No configuration backups found.");
        return Ok(());
    }
    output::section("Configuration backups");
    for name in backups {
        output::info(format!("  {}", name));
    }
    Ok(())
}
