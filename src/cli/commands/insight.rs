use bizbalance_core::InsightError;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub const LOADING_TEXT: &str = "Analyzing financial data...";
pub const PLACEHOLDER_TEXT: &str =
    "Run `insight` to generate a liquidity and solvency analysis based on your current inputs.";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "insight",
        "Request an AI analysis of the current figures",
        "insight [wait|show]",
        cmd_insight,
    )
    .with_aliases(&["ai"])]
}

fn cmd_insight(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => request(context),
        Some("wait") => {
            if context.dashboard.insight().is_pending() {
                output::info(LOADING_TEXT);
                context.dashboard.wait_insight();
            }
            show(context);
            Ok(())
        }
        Some("show") => {
            show(context);
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown insight action `{}`; usage: insight [wait|show]",
            other
        ))),
    }
}

fn request(context: &mut ShellContext) -> CommandResult {
    match context.dashboard.request_insight() {
        Ok(()) => {}
        Err(InsightError::Busy) => {
            output::info(LOADING_TEXT);
            return Ok(());
        }
        Err(InsightError::MissingApiKey) => {
            return context.acknowledge(InsightError::MissingApiKey);
        }
        Err(err) => return Err(err.into()),
    }

    output::info(LOADING_TEXT);
    match context.mode {
        CliMode::Script => {
            context.dashboard.wait_insight();
            show(context);
        }
        CliMode::Interactive => {
            output::hint("The analysis is announced when ready; `insight wait` blocks for it.");
        }
    }
    Ok(())
}

fn show(context: &ShellContext) {
    output::section("AI Financial Analyst");
    let session = context.dashboard.insight();
    if session.is_pending() {
        output::info(LOADING_TEXT);
    }
    match session.text() {
        Some(text) => {
            output::info(text);
            if let Some(updated) = context.dashboard.insight_updated() {
                output::info(format!("(updated {})", updated.format("%Y-%m-%d %H:%M")));
            }
        }
        None if !session.is_pending() => output::info(PLACEHOLDER_TEXT),
        None => {}
    }
}
