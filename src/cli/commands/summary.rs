use bizbalance_core::{chart_dataset, parse_formula_mode};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{
    chart::render_bars,
    table::{Table, TableColumn},
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show totals, nets, and the BNE figure",
            "summary",
            cmd_summary,
        )
        .with_aliases(&["s", "dashboard"]),
        CommandEntry::new(
            "chart",
            "Plot assets, liabilities, and net position",
            "chart",
            cmd_chart,
        ),
        CommandEntry::new(
            "formula",
            "Toggle or set the BNE formula",
            "formula [standard|strict]",
            cmd_formula,
        )
        .with_aliases(&["mode"]),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let result = context.dashboard.summary();

    output::section("Summary");
    let mut cards = Table::new(vec![TableColumn::left("Metric"), TableColumn::right("Amount")]);
    for (label, amount) in [
        ("Accounts Receivable (AR)", result.total_ar),
        ("Accounts Payable (AP)", result.total_ap),
        ("Credit Cards (C)", result.total_credit),
        ("Bank Balance (B)", result.total_bank),
        ("Net Receivables (AR - AP)", result.net_receivables),
        ("Net Bank (B - C)", result.net_bank),
    ] {
        cards.push(vec![label.to_string(), context.money(amount)]);
    }
    output::info(cards.render());

    output::section(format!("BNE ({})", result.mode));
    output::info(format!("  {} = {}", result.bne_formula, context.money(result.bne)));

    if !result.bank_breakdown.is_empty() {
        output::section("Bank Breakdown");
        let mut banks = Table::new(vec![
            TableColumn::left("Bank").max(32),
            TableColumn::right("Balance"),
        ]);
        for (bank, amount) in &result.bank_breakdown {
            banks.push(vec![bank.clone(), context.money(*amount)]);
        }
        output::info(banks.render());
    }
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let result = context.dashboard.summary();
    output::section("Financial Overview");
    for line in render_bars(&chart_dataset(&result), |value| context.money(value)) {
        output::info(line);
    }
    Ok(())
}

fn cmd_formula(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let next = match args.first() {
        None => context.dashboard.mode().toggled(),
        Some(raw) => parse_formula_mode(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown formula `{}`; expected `standard` or `strict`",
                raw
            ))
        })?,
    };
    context.dashboard.set_mode(next);

    let result = context.dashboard.summary();
    output::success(format!("Formula set to {}.", next));
    output::info(format!("  {} = {}", result.bne_formula, context.money(result.bne)));
    Ok(())
}
