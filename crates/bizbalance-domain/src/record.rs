//! Line items for receivables, payables, and credit cards.

use serde::{Deserialize, Serialize};

use crate::common::*;

/// One receivable, payable, or credit-card line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
}

impl FinancialRecord {
    /// Creates a blank record with a fresh identifier and a zero amount.
    pub fn new() -> Self {
        Self {
            id: RecordId::generate(),
            name: String::new(),
            amount: 0.0,
        }
    }

    pub fn with_values(id: impl Into<RecordId>, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
        }
    }
}

impl Default for FinancialRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl Identifiable for FinancialRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Amounted for FinancialRecord {
    fn amount(&self) -> f64 {
        self.amount
    }
}
