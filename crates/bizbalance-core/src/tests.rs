use std::sync::Mutex;

use bizbalance_domain::{
    AccountType, BankAccount, BusinessData, CollectionKind, FinancialRecord, FormulaMode,
    RecordKind,
};

use crate::{
    bank_details, chart_dataset, group_by_bank_name, parse_amount,
    storage::{load_or_default, StateBackupInfo, StateStorage, STATE_KEY},
    sum, AggregationEngine, ChartTone, CollectionEditor, CoreError, DashboardEditor, RecordPatch,
};

fn record(id: &str, amount: f64) -> FinancialRecord {
    FinancialRecord::with_values(id, format!("item {id}"), amount)
}

fn bank(id: &str, bank_name: &str, amount: f64) -> BankAccount {
    BankAccount::with_values(id, "Main", bank_name, AccountType::Checking, amount)
}

fn scenario_a() -> BusinessData {
    BusinessData {
        accounts_receivable: vec![record("r1", 50.0), record("r2", 50.0)],
        accounts_payable: vec![record("p1", 30.0)],
        credit_cards: Vec::new(),
        bank_accounts: vec![bank("1", "A", 100.0), bank("2", "A", 50.0), bank("3", "B", 200.0)],
    }
}

#[test]
fn scenario_a_totals_and_both_formulas() {
    let data = scenario_a();
    let standard = AggregationEngine::calculate(&data, FormulaMode::Standard);

    assert_eq!(standard.total_ar, 100.0);
    assert_eq!(standard.total_ap, 30.0);
    assert_eq!(standard.total_bank, 350.0);
    assert_eq!(standard.total_credit, 0.0);
    assert_eq!(standard.net_receivables, 70.0);
    assert_eq!(standard.net_bank, 350.0);
    assert_eq!(standard.bank_breakdown.get("A"), Some(&150.0));
    assert_eq!(standard.bank_breakdown.get("B"), Some(&200.0));
    assert_eq!(standard.bne, 420.0);
    assert_eq!(standard.bne_formula, "(AR - AP) + (B - C)");

    let strict = AggregationEngine::calculate(&data, FormulaMode::Strict);
    assert_eq!(strict.bne, -280.0);
    assert_eq!(strict.bne_formula, "(AR - AP) - (B - C)");
}

#[test]
fn scenario_b_empty_data_is_all_zero() {
    let data = BusinessData::default();
    for mode in [FormulaMode::Standard, FormulaMode::Strict] {
        let result = AggregationEngine::calculate(&data, mode);
        assert_eq!(result.total_ar, 0.0);
        assert_eq!(result.total_ap, 0.0);
        assert_eq!(result.total_credit, 0.0);
        assert_eq!(result.total_bank, 0.0);
        assert_eq!(result.bne, 0.0);
        assert!(result.bank_breakdown.is_empty());
    }
}

#[test]
fn scenario_c_unknown_id_update_is_noop() {
    let items = scenario_a().accounts_receivable;
    let next = CollectionEditor::update(&items, &"missing".into(), &RecordPatch::Amount(1.0));
    assert_eq!(next, items);
}

#[test]
fn scenario_d_add_then_remove_restores_collection() {
    let items = scenario_a().accounts_payable;
    let (added, id) = CollectionEditor::add(&items);
    assert_eq!(added.len(), items.len() + 1);
    let last = added.last().expect("new record");
    assert_eq!(last.id, id);
    assert!(last.name.is_empty());
    assert_eq!(last.amount, 0.0);

    let restored = CollectionEditor::remove(&added, &id);
    assert_eq!(restored, items);
}

#[test]
fn nets_match_their_definitions() {
    let data = BusinessData {
        credit_cards: vec![record("c1", 80.25)],
        ..scenario_a()
    };
    let result = AggregationEngine::calculate(&data, FormulaMode::Standard);
    assert_eq!(result.net_receivables, result.total_ar - result.total_ap);
    assert_eq!(result.net_bank, result.total_bank - result.total_credit);
    let breakdown_total: f64 = result.bank_breakdown.values().sum();
    assert_eq!(breakdown_total, result.total_bank);
}

#[test]
fn sum_ignores_non_finite_amounts() {
    assert_eq!(sum::<FinancialRecord>(&[]), 0.0);
    let items = vec![record("a", 10.0), record("b", f64::NAN), record("c", -4.0)];
    assert_eq!(sum(&items), 6.0);
}

#[test]
fn largest_accepted_amounts_keep_every_figure_finite() {
    let top = parse_amount("1e15");
    let oversized = parse_amount("1e308");
    let data = BusinessData {
        accounts_receivable: vec![record("r1", top), record("r2", top), record("r3", oversized)],
        accounts_payable: vec![record("p1", -top)],
        credit_cards: vec![record("c1", -top)],
        bank_accounts: vec![bank("1", "A", top), bank("2", "A", top), bank("3", "A", 1e308)],
    };

    for mode in [FormulaMode::Standard, FormulaMode::Strict] {
        let result = AggregationEngine::calculate(&data, mode);
        assert_eq!(result.total_ar, 2e15);
        assert_eq!(result.total_bank, 2e15);
        assert_eq!(result.bank_breakdown.get("A"), Some(&2e15));
        assert!(result.net_receivables.is_finite());
        assert!(result.net_bank.is_finite());
        assert!(result.bne.is_finite(), "{mode} bne was {}", result.bne);
    }
}

#[test]
fn blank_bank_name_groups_under_other_but_whitespace_does_not() {
    let accounts = vec![bank("1", "", 10.0), bank("2", " ", 5.0), bank("3", "a", 1.0), bank("4", "A", 2.0)];
    let breakdown = group_by_bank_name(&accounts);
    assert_eq!(breakdown.get("Other"), Some(&10.0));
    assert_eq!(breakdown.get(" "), Some(&5.0));
    assert_eq!(breakdown.get("a"), Some(&1.0));
    assert_eq!(breakdown.get("A"), Some(&2.0));
}

#[test]
fn negative_amounts_flow_through() {
    let data = BusinessData {
        accounts_receivable: vec![record("r", -25.0)],
        ..BusinessData::default()
    };
    let result = AggregationEngine::calculate(&data, FormulaMode::Standard);
    assert_eq!(result.total_ar, -25.0);
    assert_eq!(result.bne, -25.0);
}

#[test]
fn chart_dataset_has_assets_liabilities_and_net() {
    let data = BusinessData {
        credit_cards: vec![record("c1", 20.0)],
        ..scenario_a()
    };
    let result = AggregationEngine::calculate(&data, FormulaMode::Standard);
    let chart = chart_dataset(&result);
    assert_eq!(chart[0].label, "Assets");
    assert_eq!(chart[0].value, 450.0);
    assert_eq!(chart[0].tone, ChartTone::Positive);
    assert_eq!(chart[1].label, "Liabilities");
    assert_eq!(chart[1].value, 50.0);
    assert_eq!(chart[2].label, "Net (BNE)");
    assert_eq!(chart[2].value, result.bne);
}

#[test]
fn bank_details_lists_each_bank_with_two_decimals() {
    let result = AggregationEngine::calculate(&scenario_a(), FormulaMode::Standard);
    assert_eq!(bank_details(&result), "A: $150.00, B: $200.00");
    let empty = AggregationEngine::calculate(&BusinessData::default(), FormulaMode::Standard);
    assert_eq!(bank_details(&empty), "");
}

#[test]
fn dashboard_editor_routes_to_the_selected_collection() {
    let data = BusinessData::default_state();
    let (next, id) = DashboardEditor::add(&data, CollectionKind::Records(RecordKind::CreditCard));
    assert_eq!(next.credit_cards.len(), 1);
    assert_eq!(next.bank_accounts, data.bank_accounts);

    let next = DashboardEditor::update_record(
        &next,
        RecordKind::CreditCard,
        &id,
        &RecordPatch::Name("Visa".into()),
    );
    assert_eq!(next.credit_cards[0].name, "Visa");

    let (next, bank_id) = DashboardEditor::add(&next, CollectionKind::Bank);
    let added = next.bank_accounts.last().expect("bank account");
    assert_eq!(added.id, bank_id);
    assert_eq!(added.bank_name, "Bank 1");
    assert_eq!(added.name, "Bank 1");
    assert_eq!(added.account_type, AccountType::Checking);

    let next = DashboardEditor::remove(&next, CollectionKind::Bank, &bank_id);
    assert_eq!(next.bank_accounts, data.bank_accounts);
}

#[test]
fn editing_recomputes_on_next_calculation() {
    let data = scenario_a();
    let before = AggregationEngine::calculate(&data, FormulaMode::Standard);
    let next = DashboardEditor::update_record(
        &data,
        RecordKind::Payable,
        &"p1".into(),
        &RecordPatch::Amount(130.0),
    );
    let after = AggregationEngine::calculate(&next, FormulaMode::Standard);
    assert_eq!(before.bne - after.bne, 100.0);
    assert_eq!(data, scenario_a());
}

struct MemoryStorage {
    stored: Mutex<Option<Result<BusinessData, String>>>,
}

impl StateStorage for MemoryStorage {
    fn load_state(&self, _key: &str) -> Result<Option<BusinessData>, CoreError> {
        match self.stored.lock().expect("lock").clone() {
            None => Ok(None),
            Some(Ok(data)) => Ok(Some(data)),
            Some(Err(reason)) => Err(CoreError::Serde(reason)),
        }
    }

    fn save_state(&self, _key: &str, data: &BusinessData) -> Result<(), CoreError> {
        *self.stored.lock().expect("lock") = Some(Ok(data.clone()));
        Ok(())
    }

    fn list_backups(&self, _key: &str) -> Result<Vec<StateBackupInfo>, CoreError> {
        Ok(Vec::new())
    }

    fn restore_backup(
        &self,
        _key: &str,
        backup: &StateBackupInfo,
    ) -> Result<BusinessData, CoreError> {
        Err(CoreError::Storage(format!("backup `{}` not found", backup.id)))
    }
}

#[test]
fn load_or_default_falls_back_for_missing_and_corrupt_state() {
    let missing = MemoryStorage {
        stored: Mutex::new(None),
    };
    assert_eq!(load_or_default(&missing, STATE_KEY), BusinessData::default_state());

    let corrupt = MemoryStorage {
        stored: Mutex::new(Some(Err("expected value at line 1".into()))),
    };
    assert_eq!(load_or_default(&corrupt, STATE_KEY), BusinessData::default_state());

    let present = MemoryStorage {
        stored: Mutex::new(None),
    };
    present.save_state(STATE_KEY, &scenario_a()).expect("save");
    assert_eq!(load_or_default(&present, STATE_KEY), scenario_a());
}
