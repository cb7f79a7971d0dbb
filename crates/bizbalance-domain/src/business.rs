//! The full dashboard state plus the small enums that steer it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AccountType, BankAccount, FinancialRecord, DEFAULT_BANK_NAME};

/// Complete persisted state of the dashboard.
///
/// Every edit produces a new value; nothing inside is mutated in place by
/// the editing helpers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BusinessData {
    #[serde(default)]
    pub accounts_receivable: Vec<FinancialRecord>,
    #[serde(default)]
    pub accounts_payable: Vec<FinancialRecord>,
    #[serde(default)]
    pub credit_cards: Vec<FinancialRecord>,
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
}

impl BusinessData {
    /// State used on first launch or when the stored blob cannot be read:
    /// two empty accounts at the placeholder bank.
    pub fn default_state() -> Self {
        Self {
            accounts_receivable: Vec::new(),
            accounts_payable: Vec::new(),
            credit_cards: Vec::new(),
            bank_accounts: vec![
                BankAccount::with_values("1", "Main", DEFAULT_BANK_NAME, AccountType::Savings, 0.0),
                BankAccount::with_values("2", "Main", DEFAULT_BANK_NAME, AccountType::Checking, 0.0),
            ],
        }
    }

    /// Returns the record list selected by `kind`.
    pub fn records(&self, kind: RecordKind) -> &[FinancialRecord] {
        match kind {
            RecordKind::Receivable => &self.accounts_receivable,
            RecordKind::Payable => &self.accounts_payable,
            RecordKind::CreditCard => &self.credit_cards,
        }
    }

    /// Returns a copy of `self` with the record list for `kind` replaced.
    pub fn with_records(&self, kind: RecordKind, records: Vec<FinancialRecord>) -> Self {
        let mut next = self.clone();
        match kind {
            RecordKind::Receivable => next.accounts_receivable = records,
            RecordKind::Payable => next.accounts_payable = records,
            RecordKind::CreditCard => next.credit_cards = records,
        }
        next
    }

    /// Returns a copy of `self` with the bank account list replaced.
    pub fn with_bank_accounts(&self, accounts: Vec<BankAccount>) -> Self {
        Self {
            bank_accounts: accounts,
            ..self.clone()
        }
    }

    pub fn record_count(&self) -> usize {
        self.accounts_receivable.len()
            + self.accounts_payable.len()
            + self.credit_cards.len()
            + self.bank_accounts.len()
    }
}

/// Selects one of the three plain record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Receivable,
    Payable,
    CreditCard,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Receivable,
        RecordKind::Payable,
        RecordKind::CreditCard,
    ];

    pub fn title(self) -> &'static str {
        match self {
            RecordKind::Receivable => "Accounts Receivable",
            RecordKind::Payable => "Accounts Payable",
            RecordKind::CreditCard => "Credit Cards",
        }
    }
}

/// Selects any of the four collections held by [`BusinessData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Records(RecordKind),
    Bank,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::Records(RecordKind::Receivable),
        CollectionKind::Records(RecordKind::Payable),
        CollectionKind::Records(RecordKind::CreditCard),
        CollectionKind::Bank,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CollectionKind::Records(kind) => kind.title(),
            CollectionKind::Bank => "Bank Accounts",
        }
    }

    /// Short alias accepted by the shell.
    pub fn alias(self) -> &'static str {
        match self {
            CollectionKind::Records(RecordKind::Receivable) => "ar",
            CollectionKind::Records(RecordKind::Payable) => "ap",
            CollectionKind::Records(RecordKind::CreditCard) => "cc",
            CollectionKind::Bank => "bank",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How the two net figures combine into the BNE metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormulaMode {
    /// `(AR - AP) + (B - C)`
    #[default]
    Standard,
    /// `(AR - AP) - (B - C)`
    Strict,
}

impl FormulaMode {
    pub fn operator(self) -> char {
        match self {
            FormulaMode::Standard => '+',
            FormulaMode::Strict => '-',
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FormulaMode::Standard => FormulaMode::Strict,
            FormulaMode::Strict => FormulaMode::Standard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormulaMode::Standard => "standard",
            FormulaMode::Strict => "strict",
        }
    }
}

impl fmt::Display for FormulaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
