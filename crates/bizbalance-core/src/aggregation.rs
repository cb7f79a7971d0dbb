use std::collections::BTreeMap;

use bizbalance_domain::{bounded_amount, Amounted, BankAccount, BusinessData, FormulaMode};
use tracing::debug;

/// Derived totals for one snapshot of [`BusinessData`]. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub total_ar: f64,
    pub total_ap: f64,
    pub total_credit: f64,
    pub total_bank: f64,
    /// Bank totals keyed by bank name, ordered by name.
    pub bank_breakdown: BTreeMap<String, f64>,
    /// `AR - AP`
    pub net_receivables: f64,
    /// `B - C`
    pub net_bank: f64,
    pub bne: f64,
    pub bne_formula: String,
    pub mode: FormulaMode,
}

/// Stateless aggregation over the dashboard collections.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Recomputes every figure from scratch. Never fails and never touches `data`.
    pub fn calculate(data: &BusinessData, mode: FormulaMode) -> CalculationResult {
        let total_ar = sum(&data.accounts_receivable);
        let total_ap = sum(&data.accounts_payable);
        let total_credit = sum(&data.credit_cards);
        let total_bank = sum(&data.bank_accounts);
        let bank_breakdown = group_by_bank_name(&data.bank_accounts);

        let net_receivables = total_ar - total_ap;
        let net_bank = total_bank - total_credit;
        let bne = match mode {
            FormulaMode::Standard => net_receivables + net_bank,
            FormulaMode::Strict => net_receivables - net_bank,
        };

        debug!(
            records = data.record_count(),
            mode = %mode,
            bne,
            "recalculated dashboard totals"
        );

        CalculationResult {
            total_ar,
            total_ap,
            total_credit,
            total_bank,
            bank_breakdown,
            net_receivables,
            net_bank,
            bne,
            bne_formula: formula_string(mode),
            mode,
        }
    }
}

/// Total of `amount` across `items`; non-finite or out-of-bound amounts count as zero.
pub fn sum<T: Amounted>(items: &[T]) -> f64 {
    items
        .iter()
        .map(|item| bounded_amount(item.amount()))
        .sum()
}

/// Accumulates account balances under their bank name, `"Other"` when blank.
///
/// Keys are matched exactly: case and surrounding whitespace are kept.
pub fn group_by_bank_name(accounts: &[BankAccount]) -> BTreeMap<String, f64> {
    let mut breakdown = BTreeMap::new();
    for account in accounts {
        *breakdown
            .entry(account.group_key().to_string())
            .or_insert(0.0) += bounded_amount(account.amount);
    }
    breakdown
}

pub fn formula_string(mode: FormulaMode) -> String {
    format!("(AR - AP) {} (B - C)", mode.operator())
}

/// Renders the breakdown as `Name: $1234.50` pairs joined by `", "`.
pub fn bank_details(result: &CalculationResult) -> String {
    result
        .bank_breakdown
        .iter()
        .map(|(name, amount)| format!("{}: ${:.2}", name, amount))
        .collect::<Vec<_>>()
        .join(", ")
}
