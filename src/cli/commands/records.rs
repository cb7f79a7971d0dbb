use bizbalance_core::{
    parse_account_type, parse_amount, parse_collection, BankPatch, DashboardEditor, RecordPatch,
};
use bizbalance_domain::{AccountType, BusinessData, CollectionKind, RecordId};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table::{Table, TableColumn};

const UNNAMED: &str = "(unnamed)";

/// Commands whose first argument names a collection.
pub(crate) const COLLECTION_COMMANDS: [&str; 4] = ["list", "add", "set", "remove"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "List records in one or all collections",
            "list [ar|ap|cc|bank]",
            cmd_list,
        )
        .with_aliases(&["ls"]),
        CommandEntry::new(
            "add",
            "Add a record, optionally with a name and amount",
            "add <ar|ap|cc|bank> [name] [amount] [bank-name] [checking|savings]",
            cmd_add,
        )
        .with_aliases(&["new"]),
        CommandEntry::new(
            "set",
            "Update one field of a record",
            "set <collection> <index|id> <name|amount|bank|type> <value>",
            cmd_set,
        )
        .with_aliases(&["edit", "update"]),
        CommandEntry::new(
            "remove",
            "Delete a record",
            "remove <collection> <index|id>",
            cmd_remove,
        )
        .with_aliases(&["rm", "delete"]),
    ]
}

fn collection_arg(args: &[&str], usage: &str) -> Result<CollectionKind, CommandError> {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    parse_collection(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown collection `{}`; expected ar, ap, cc, or bank",
            raw
        ))
    })
}

/// Resolves the selector or warns that nothing matched.
fn select(context: &ShellContext, kind: CollectionKind, selector: &str) -> Option<RecordId> {
    let found = DashboardEditor::resolve(context.dashboard.data(), kind, selector);
    if found.is_none() {
        output::warning(format!("No entry in {} matches `{}`.", kind, selector));
    }
    found
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        UNNAMED
    } else {
        name
    }
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kinds: Vec<CollectionKind> = if args.is_empty() {
        CollectionKind::ALL.to_vec()
    } else {
        vec![collection_arg(args, "list [ar|ap|cc|bank]")?]
    };

    for kind in kinds {
        output::section(format!("{} [{}]", kind, kind.alias()));
        let table = collection_table(context, context.dashboard.data(), kind);
        if table.rows.is_empty() {
            output::info("  (empty)");
        } else {
            output::info(table.render());
        }
    }
    Ok(())
}

fn collection_table(context: &ShellContext, data: &BusinessData, kind: CollectionKind) -> Table {
    match kind {
        CollectionKind::Records(records) => {
            let mut table = Table::new(vec![
                TableColumn::right("#"),
                TableColumn::left("Id"),
                TableColumn::left("Name").max(32),
                TableColumn::right("Amount"),
            ]);
            for (index, record) in data.records(records).iter().enumerate() {
                table.push(vec![
                    (index + 1).to_string(),
                    record.id.short().to_string(),
                    display_name(&record.name).to_string(),
                    context.money(record.amount),
                ]);
            }
            table
        }
        CollectionKind::Bank => {
            let mut table = Table::new(vec![
                TableColumn::right("#"),
                TableColumn::left("Id"),
                TableColumn::left("Name").max(24),
                TableColumn::left("Bank").max(24),
                TableColumn::left("Type"),
                TableColumn::right("Balance"),
            ]);
            for (index, account) in data.bank_accounts.iter().enumerate() {
                table.push(vec![
                    (index + 1).to_string(),
                    account.id.short().to_string(),
                    display_name(&account.name).to_string(),
                    display_name(&account.bank_name).to_string(),
                    account.account_type.to_string(),
                    context.money(account.amount),
                ]);
            }
            table
        }
    }
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = collection_arg(args, "add <ar|ap|cc|bank> [name] [amount]")?;
    let name = args.get(1).map(|name| (*name).to_string());
    let amount = args.get(2).map(|raw| parse_amount(raw));
    let (mut next, id) = DashboardEditor::add(context.dashboard.data(), kind);

    match kind {
        CollectionKind::Records(records) => {
            if args.len() > 3 {
                return Err(CommandError::InvalidArguments(
                    "bank name and type only apply to `bank`".into(),
                ));
            }
            let patches = name
                .map(RecordPatch::Name)
                .into_iter()
                .chain(amount.map(RecordPatch::Amount));
            for patch in patches {
                next = DashboardEditor::update_record(&next, records, &id, &patch);
            }
        }
        CollectionKind::Bank => {
            let account_type = args.get(4).map(|raw| account_type_arg(raw)).transpose()?;
            let patches = name
                .map(BankPatch::Name)
                .into_iter()
                .chain(amount.map(BankPatch::Amount))
                .chain(args.get(3).map(|bank| BankPatch::BankName((*bank).to_string())))
                .chain(account_type.map(BankPatch::AccountType));
            for patch in patches {
                next = DashboardEditor::update_bank(&next, &id, &patch);
            }
        }
    }

    context.dashboard.commit(next)?;
    let position = position_of(context.dashboard.data(), kind, &id);
    output::success(format!("Added entry #{} to {} (id {}).", position, kind, id.short()));
    Ok(())
}

fn position_of(data: &BusinessData, kind: CollectionKind, id: &RecordId) -> usize {
    let ids: Vec<&RecordId> = match kind {
        CollectionKind::Records(records) => data.records(records).iter().map(|r| &r.id).collect(),
        CollectionKind::Bank => data.bank_accounts.iter().map(|a| &a.id).collect(),
    };
    ids.iter().position(|candidate| *candidate == id).map_or(0, |index| index + 1)
}

fn account_type_arg(raw: &str) -> Result<AccountType, CommandError> {
    parse_account_type(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown account type `{}`; expected checking or savings",
            raw
        ))
    })
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "usage: set <collection> <index|id> <name|amount|bank|type> <value>";
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(USAGE.into()));
    }
    let kind = collection_arg(args, USAGE)?;
    let field = args[2].to_ascii_lowercase();
    let value = args[3..].join(" ");

    let Some(id) = select(context, kind, args[1]) else {
        return Ok(());
    };

    let next = match kind {
        CollectionKind::Records(records) => {
            let patch = match field.as_str() {
                "name" => RecordPatch::Name(value),
                "amount" => RecordPatch::Amount(parse_amount(&value)),
                other => return Err(unknown_field(other, kind)),
            };
            DashboardEditor::update_record(context.dashboard.data(), records, &id, &patch)
        }
        CollectionKind::Bank => {
            let patch = match field.as_str() {
                "name" => BankPatch::Name(value),
                "amount" | "balance" => BankPatch::Amount(parse_amount(&value)),
                "bank" | "bank_name" => BankPatch::BankName(value),
                "type" => BankPatch::AccountType(account_type_arg(&value)?),
                other => return Err(unknown_field(other, kind)),
            };
            DashboardEditor::update_bank(context.dashboard.data(), &id, &patch)
        }
    };

    context.dashboard.commit(next)?;
    output::success(format!("Updated {} of {} entry {}.", field, kind, id.short()));
    Ok(())
}

fn unknown_field(field: &str, kind: CollectionKind) -> CommandError {
    let expected = match kind {
        CollectionKind::Bank => "name, amount, bank, or type",
        CollectionKind::Records(_) => "name or amount",
    };
    CommandError::InvalidArguments(format!(
        "unknown field `{}` for {}; expected {}",
        field, kind, expected
    ))
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "usage: remove <collection> <index|id>";
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(USAGE.into()));
    }
    let kind = collection_arg(args, USAGE)?;
    let Some(id) = select(context, kind, args[1]) else {
        return Ok(());
    };

    if !context.confirm(&format!("Remove entry {} from {}?", id.short(), kind))? {
        output::info("Operation cancelled.");
        return Ok(());
    }

    let next = DashboardEditor::remove(context.dashboard.data(), kind, &id);
    context.dashboard.commit(next)?;
    output::success(format!("Removed entry {} from {}.", id.short(), kind));
    Ok(())
}
