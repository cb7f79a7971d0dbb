//! Parsing of raw user text into domain values.

use bizbalance_domain::{bounded_amount, AccountType, CollectionKind, FormulaMode, RecordKind};

/// Reads a currency amount; anything unparsable or beyond `MAX_AMOUNT` becomes `0.0`.
///
/// Accepts an optional sign, a leading `$`, and `,` group separators:
/// `"$1,250.50"`, `"-$20"`, and `" 42 "` all parse.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest
        .strip_prefix('$')
        .unwrap_or(rest)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if digits.is_empty() || digits.starts_with(|c: char| c == '-' || c == '+') {
        return 0.0;
    }
    let value = digits.parse::<f64>().map(bounded_amount).unwrap_or(0.0);
    if negative {
        -value
    } else {
        value
    }
}

pub fn parse_account_type(raw: &str) -> Option<AccountType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "checking" | "c" => Some(AccountType::Checking),
        "savings" | "s" => Some(AccountType::Savings),
        _ => None,
    }
}

pub fn parse_formula_mode(raw: &str) -> Option<FormulaMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "standard" | "add" | "+" => Some(FormulaMode::Standard),
        "strict" | "subtract" | "-" => Some(FormulaMode::Strict),
        _ => None,
    }
}

pub fn parse_collection(raw: &str) -> Option<CollectionKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ar" | "receivable" | "receivables" => Some(CollectionKind::Records(RecordKind::Receivable)),
        "ap" | "payable" | "payables" => Some(CollectionKind::Records(RecordKind::Payable)),
        "cc" | "credit" | "card" | "cards" => Some(CollectionKind::Records(RecordKind::CreditCard)),
        "bank" | "banks" => Some(CollectionKind::Bank),
        _ => None,
    }
}
