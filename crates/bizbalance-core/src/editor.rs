//! Copy-on-write mutations for the dashboard collections.

use bizbalance_domain::{
    AccountType, BankAccount, BusinessData, CollectionKind, FinancialRecord, Identifiable,
    RecordId, RecordKind,
};

/// Single-field change to a [`FinancialRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPatch {
    Name(String),
    Amount(f64),
}

/// Single-field change to a [`BankAccount`].
#[derive(Debug, Clone, PartialEq)]
pub enum BankPatch {
    Name(String),
    Amount(f64),
    BankName(String),
    AccountType(AccountType),
}

impl From<RecordPatch> for BankPatch {
    fn from(patch: RecordPatch) -> Self {
        match patch {
            RecordPatch::Name(name) => BankPatch::Name(name),
            RecordPatch::Amount(amount) => BankPatch::Amount(amount),
        }
    }
}

/// Entities whose fields can be replaced through a closed patch type.
pub trait Patchable: Identifiable + Clone {
    type Patch;

    /// Creates a blank entity with a fresh identifier.
    fn blank() -> Self;

    fn apply(&self, patch: &Self::Patch) -> Self;
}

impl Patchable for FinancialRecord {
    type Patch = RecordPatch;

    fn blank() -> Self {
        FinancialRecord::new()
    }

    fn apply(&self, patch: &RecordPatch) -> Self {
        let mut next = self.clone();
        match patch {
            RecordPatch::Name(name) => next.name = name.clone(),
            RecordPatch::Amount(amount) => next.amount = *amount,
        }
        next
    }
}

impl Patchable for BankAccount {
    type Patch = BankPatch;

    fn blank() -> Self {
        BankAccount::new()
    }

    fn apply(&self, patch: &BankPatch) -> Self {
        let mut next = self.clone();
        match patch {
            BankPatch::Name(name) => next.name = name.clone(),
            BankPatch::Amount(amount) => next.amount = *amount,
            BankPatch::BankName(bank) => next.bank_name = bank.clone(),
            BankPatch::AccountType(kind) => next.account_type = *kind,
        }
        next
    }
}

/// Collection-level add, update, and remove. Inputs are never modified.
pub struct CollectionEditor;

impl CollectionEditor {
    /// Appends a blank entity and returns the new collection with its id.
    pub fn add<T: Patchable>(items: &[T]) -> (Vec<T>, RecordId) {
        let created = T::blank();
        let id = created.id().clone();
        let mut next = items.to_vec();
        next.push(created);
        (next, id)
    }

    /// Replaces the entity with `id` by a patched copy. Unknown ids change nothing.
    pub fn update<T: Patchable>(items: &[T], id: &RecordId, patch: &T::Patch) -> Vec<T> {
        items
            .iter()
            .map(|item| {
                if item.id() == id {
                    item.apply(patch)
                } else {
                    item.clone()
                }
            })
            .collect()
    }

    /// Drops the entity with `id`. Unknown ids change nothing.
    pub fn remove<T: Identifiable + Clone>(items: &[T], id: &RecordId) -> Vec<T> {
        items.iter().filter(|item| item.id() != id).cloned().collect()
    }
}

/// Applies editor operations to a whole [`BusinessData`] value.
pub struct DashboardEditor;

impl DashboardEditor {
    pub fn add(data: &BusinessData, kind: CollectionKind) -> (BusinessData, RecordId) {
        match kind {
            CollectionKind::Records(records) => {
                let (next, id) = CollectionEditor::add(data.records(records));
                (data.with_records(records, next), id)
            }
            CollectionKind::Bank => {
                let (next, id) = CollectionEditor::add(&data.bank_accounts);
                (data.with_bank_accounts(next), id)
            }
        }
    }

    pub fn update_record(
        data: &BusinessData,
        kind: RecordKind,
        id: &RecordId,
        patch: &RecordPatch,
    ) -> BusinessData {
        let next = CollectionEditor::update(data.records(kind), id, patch);
        data.with_records(kind, next)
    }

    pub fn update_bank(data: &BusinessData, id: &RecordId, patch: &BankPatch) -> BusinessData {
        let next = CollectionEditor::update(&data.bank_accounts, id, patch);
        data.with_bank_accounts(next)
    }

    pub fn remove(data: &BusinessData, kind: CollectionKind, id: &RecordId) -> BusinessData {
        match kind {
            CollectionKind::Records(records) => {
                let next = CollectionEditor::remove(data.records(records), id);
                data.with_records(records, next)
            }
            CollectionKind::Bank => {
                data.with_bank_accounts(CollectionEditor::remove(&data.bank_accounts, id))
            }
        }
    }

    /// Resolves a shell selector to an id: a 1-based position, an exact id,
    /// or an unambiguous id prefix.
    pub fn resolve(data: &BusinessData, kind: CollectionKind, selector: &str) -> Option<RecordId> {
        let ids: Vec<&RecordId> = match kind {
            CollectionKind::Records(records) => {
                data.records(records).iter().map(|r| r.id()).collect()
            }
            CollectionKind::Bank => data.bank_accounts.iter().map(|a| a.id()).collect(),
        };
        resolve_selector(&ids, selector.trim())
    }
}

fn resolve_selector(ids: &[&RecordId], selector: &str) -> Option<RecordId> {
    if selector.is_empty() {
        return None;
    }
    if let Some(exact) = ids.iter().find(|id| id.as_str() == selector) {
        return Some((*exact).clone());
    }
    if let Ok(position) = selector.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| ids.get(index))
            .map(|id| (*id).clone());
    }
    let mut matches = ids.iter().filter(|id| id.as_str().starts_with(selector));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some((*only).clone()),
        _ => None,
    }
}
