//! Cash accounts held at named banks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Placeholder used for the name and bank of newly added accounts.
pub const DEFAULT_BANK_NAME: &str = "Bank 1";

/// Key used when an account has no bank name.
pub const FALLBACK_BANK_NAME: &str = "Other";

/// Enumerates the supported cash-account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
        };
        f.write_str(label)
    }
}

/// One cash account at a named bank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default)]
    pub bank_name: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
}

impl BankAccount {
    /// Creates a checking account at the placeholder bank with a zero balance.
    pub fn new() -> Self {
        Self {
            id: RecordId::generate(),
            name: DEFAULT_BANK_NAME.into(),
            amount: 0.0,
            bank_name: DEFAULT_BANK_NAME.into(),
            account_type: AccountType::Checking,
        }
    }

    pub fn with_values(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        bank_name: impl Into<String>,
        account_type: AccountType,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            bank_name: bank_name.into(),
            account_type,
        }
    }

    /// Name under which this account is grouped for reporting.
    pub fn group_key(&self) -> &str {
        if self.bank_name.is_empty() {
            FALLBACK_BANK_NAME
        } else {
            &self.bank_name
        }
    }
}

impl Default for BankAccount {
    fn default() -> Self {
        Self::new()
    }
}

impl Identifiable for BankAccount {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Amounted for BankAccount {
    fn amount(&self) -> f64 {
        self.amount
    }
}
