pub mod backup;
pub mod config;
pub mod insight;
pub mod records;
pub mod summary;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "summary", "list", "add", "set", "remove", "formula", "chart", "insight", "backup", "reset",
    "config", "version", "help", "exit",
];

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(summary::definitions());
    commands.extend(records::definitions());
    commands.extend(insight::definitions());
    commands.extend(backup::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// Registers every command, listed in the order `help` presents them.
pub fn register_all(registry: &mut CommandRegistry) {
    let mut definitions = all_definitions();
    definitions.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| *name == entry.name)
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in definitions {
        registry.register(entry);
    }
}
