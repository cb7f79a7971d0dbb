use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backup",
            "List or restore automatic state backups",
            "backup [list|restore <n>]",
            cmd_backup,
        )
        .with_aliases(&["backups"]),
        CommandEntry::new(
            "reset",
            "Replace all records with the default state",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None | Some("list") => list_backups(context),
        Some("restore") => {
            let position = args
                .get(1)
                .and_then(|raw| raw.parse::<usize>().ok())
                .ok_or_else(|| {
                    CommandError::InvalidArguments("usage: backup restore <n>".into())
                })?;
            if !context.confirm(&format!("Replace current records with backup #{}?", position))? {
                output::info("Operation cancelled.");
                return Ok(());
            }
            let restored = context.dashboard.restore_backup(position)?;
            output::success(format!("Restored backup `{}`.", restored.id));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown backup action `{}`; usage: backup [list|restore <n>]",
            other
        ))),
    }
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.dashboard.backups()?;
    if backups.is_empty() {
        output::warning("No backups found.");
        return Ok(());
    }

    output::section("Backups");
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Created"),
        TableColumn::left("File"),
    ]);
    for (index, backup) in backups.iter().enumerate() {
        table.push(vec![
            (index + 1).to_string(),
            backup.created_at.clone(),
            backup.id.clone(),
        ]);
    }
    output::info(table.render());
    output::hint("Use `backup restore <n>` to bring one back.");
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Discard all records and restore the default accounts?")? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    context.dashboard.reset()?;
    output::success("Dashboard reset to the default state.");
    Ok(())
}
