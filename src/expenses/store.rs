use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::RashodyError;

use super::storage::Storage;
use super::{Expense, ExpenseDraft};

/// The authoritative expense collection, mirrored to a [`Storage`] slot.
///
/// Storage order is newest first. Every successful mutation rewrites the
/// whole slot before returning; if that write fails the mutation is undone
/// so memory and storage never disagree.
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for ExpenseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseStore")
            .field("expenses", &self.expenses)
            .finish_non_exhaustive()
    }
}

pub fn encode(expenses: &[Expense]) -> Result<String, RashodyError> {
    Ok(serde_json::to_string(expenses)?)
}

pub fn decode(contents: &str) -> Result<Vec<Expense>, RashodyError> {
    Ok(serde_json::from_str(contents)?)
}

impl ExpenseStore {
    /// Loads the collection, starting empty when the slot is missing or unreadable.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let expenses = match storage.load().and_then(|c| c.map(|c| decode(&c)).transpose()) {
            Ok(Some(expenses)) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    expenses.len()
                );
                expenses
            }
            Ok(None) => {
                info!("event=store_load module=store status=empty");
                Vec::new()
            }
            Err(e) => {
                warn!("event=store_load module=store status=fallback error=\"{e}\"");
                Vec::new()
            }
        };
        Self { expenses, storage }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Validates `draft` and prepends the resulting record under a fresh id.
    ///
    /// A rejected draft leaves the collection untouched.
    pub fn add(&mut self, draft: &ExpenseDraft) -> Result<Expense, RashodyError> {
        let expense = draft.to_expense(Uuid::new_v4()).map_err(|reason| {
            debug!("event=expense_add module=store status=rejected reason=\"{reason}\"");
            reason
        })?;
        self.expenses.insert(0, expense.clone());
        if let Err(e) = self.persist() {
            self.expenses.remove(0);
            return Err(e);
        }
        info!(
            "event=expense_add module=store status=ok id={} count={}",
            expense.id,
            self.expenses.len()
        );
        Ok(expense)
    }

    /// Replaces the stored record that has `record.id` with `record`.
    ///
    /// Returns `Ok(false)` when no such record exists. The record must pass
    /// the same validation as new input.
    pub fn update(&mut self, record: Expense) -> Result<bool, RashodyError> {
        let record = record.normalized();
        let Some(index) = self.expenses.iter().position(|e| e.id == record.id) else {
            debug!("event=expense_update module=store status=missing id={}", record.id);
            return Ok(false);
        };
        record.validate().map_err(|reason| {
            debug!(
                "event=expense_update module=store status=rejected id={} reason=\"{reason}\"",
                record.id
            );
            reason
        })?;

        let previous = std::mem::replace(&mut self.expenses[index], record);
        if let Err(e) = self.persist() {
            self.expenses[index] = previous;
            return Err(e);
        }
        info!("event=expense_update module=store status=ok id={}", previous.id);
        Ok(true)
    }

    /// Removes the record with `id`; returns `Ok(false)` if there was none.
    pub fn delete(&mut self, id: Uuid) -> Result<bool, RashodyError> {
        let Some(index) = self.expenses.iter().position(|e| e.id == id) else {
            debug!("event=expense_delete module=store status=missing id={id}");
            return Ok(false);
        };
        let removed = self.expenses.remove(index);
        if let Err(e) = self.persist() {
            self.expenses.insert(index, removed);
            return Err(e);
        }
        info!(
            "event=expense_delete module=store status=ok id={id} count={}",
            self.expenses.len()
        );
        Ok(true)
    }

    /// Finds the single record whose id starts with `prefix`.
    pub fn resolve_id(&self, prefix: &str) -> Result<Uuid, RashodyError> {
        let prefix = prefix.trim().to_lowercase();
        let mut matches = self
            .expenses
            .iter()
            .filter(|e| !prefix.is_empty() && e.id.to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(expense.id),
            _ => Err(RashodyError::UnknownId(prefix)),
        }
    }

    fn persist(&mut self) -> Result<(), RashodyError> {
        let result = encode(&self.expenses).and_then(|contents| self.storage.save(&contents));
        if let Err(e) = &result {
            error!("event=store_write module=store status=error error=\"{e}\"");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::errors::ValidationError;

    use super::super::storage::{JsonFileStorage, MemoryStorage};
    use super::super::ExpenseCategory;
    use super::*;

    fn draft(description: &str, amount: &str) -> ExpenseDraft {
        ExpenseDraft::new(description, ExpenseCategory::Food, "2024-01-05", amount)
    }

    fn memory_store() -> (ExpenseStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (ExpenseStore::open(Box::new(storage.clone())), storage)
    }

    #[test]
    fn add_prepends_and_persists() {
        let (mut store, storage) = memory_store();
        let first = store.add(&draft("Кофе", "199,5")).unwrap();
        let second = store.add(&draft("Чай", "50")).unwrap();

        assert_eq!(first.amount, Decimal::from_str("199.5").unwrap());
        assert_eq!(store.len(), 2);
        assert_eq!(store.expenses()[0].id, second.id);
        assert_eq!(store.expenses()[1].id, first.id);
        assert_ne!(first.id, second.id);
        assert_eq!(decode(&storage.contents().unwrap()).unwrap(), store.expenses());
    }

    #[test]
    fn add_rejects_invalid_input() {
        let (mut store, storage) = memory_store();
        for amount in ["abc", "0", "-5", ""] {
            assert!(matches!(
                store.add(&draft("Кофе", amount)),
                Err(RashodyError::Validation(_))
            ));
        }
        assert!(store.add(&draft("   ", "10")).is_err());
        assert!(store
            .add(&ExpenseDraft::new("Кофе", ExpenseCategory::Food, "", "10"))
            .is_err());
        assert!(store.is_empty());
        assert_eq!(storage.contents(), None);
    }

    #[test]
    fn delete_removes_only_the_target() {
        let (mut store, _) = memory_store();
        let a = store.add(&draft("a", "1")).unwrap();
        let b = store.add(&draft("b", "2")).unwrap();
        let c = store.add(&draft("c", "3")).unwrap();

        assert!(!store.delete(Uuid::new_v4()).unwrap());
        assert_eq!(store.len(), 3);

        assert!(store.delete(b.id).unwrap());
        let ids: Vec<Uuid> = store.expenses().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c.id, a.id]);

        assert!(!store.delete(b.id).unwrap());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_replaces_whole_record() {
        let (mut store, _) = memory_store();
        let original = store.add(&draft("Обед", "300")).unwrap();
        let replacement = Expense {
            id: original.id,
            description: "Ужин".to_string(),
            category: ExpenseCategory::Entertainment,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            amount: Decimal::from_str("450.25").unwrap(),
        };
        assert!(store.update(replacement.clone()).unwrap());
        assert_eq!(store.get(original.id), Some(&replacement));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let (mut store, storage) = memory_store();
        let original = store.add(&draft("Обед", "300")).unwrap();
        let before = storage.contents();
        let stranger = Expense {
            id: Uuid::new_v4(),
            ..original.clone()
        };
        assert!(!store.update(stranger).unwrap());
        assert_eq!(store.expenses(), &[original]);
        assert_eq!(storage.contents(), before);
    }

    #[test]
    fn update_applies_creation_rules() {
        let (mut store, _) = memory_store();
        let original = store.add(&draft("Обед", "300")).unwrap();

        let emptied = Expense {
            description: "  ".to_string(),
            ..original.clone()
        };
        assert!(matches!(
            store.update(emptied),
            Err(RashodyError::Validation(_))
        ));
        let zeroed = Expense {
            amount: Decimal::ZERO,
            ..original.clone()
        };
        assert!(store.update(zeroed).is_err());
        assert_eq!(store.get(original.id), Some(&original));
    }

    #[test]
    fn failed_write_rolls_back() {
        let (mut store, storage) = memory_store();
        let kept = store.add(&draft("Обед", "300")).unwrap();
        storage.fail_writes(true);

        assert!(matches!(
            store.add(&draft("Кино", "500")),
            Err(RashodyError::Io(_))
        ));
        assert!(store.delete(kept.id).is_err());
        let renamed = Expense {
            description: "Завтрак".to_string(),
            ..kept.clone()
        };
        assert!(store.update(renamed).is_err());

        assert_eq!(store.expenses(), &[kept]);
        assert_eq!(decode(&storage.contents().unwrap()).unwrap(), store.expenses());
    }

    #[test]
    fn reload_round_trips() {
        let (mut store, storage) = memory_store();
        store.add(&draft("Кофе", "199,5")).unwrap();
        store.add(&draft("Метро", "62")).unwrap();
        store.add(&draft("Курс по Rust", "12 990,99")).unwrap();

        let reloaded = ExpenseStore::open(Box::new(storage.clone()));
        assert_eq!(reloaded.expenses(), store.expenses());
    }

    #[test]
    fn largest_accepted_amount_round_trips() {
        let (mut store, storage) = memory_store();
        store.add(&draft("Кофе", "199,5")).unwrap();
        let rent = store.add(&draft("Аренда", "9 999 999 999 999,99")).unwrap();
        assert_eq!(rent.amount, Decimal::from_str("9999999999999.99").unwrap());

        let reloaded = ExpenseStore::open(Box::new(storage.clone()));
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.expenses(), store.expenses());
    }

    #[test]
    fn oversized_amounts_never_reach_storage() {
        let (mut store, storage) = memory_store();
        let coffee = store.add(&draft("Кофе", "199,5")).unwrap();
        for amount in [
            "10000000000000",
            "12345678901234567.89",
            "79228162514264337593543950335",
        ] {
            assert!(store.add(&draft("Аренда", amount)).is_err(), "{amount}");
        }
        let inflated = Expense {
            amount: Decimal::MAX,
            ..coffee.clone()
        };
        assert!(matches!(
            store.update(inflated),
            Err(RashodyError::Validation(ValidationError::AmountTooLarge))
        ));

        let reloaded = ExpenseStore::open(Box::new(storage.clone()));
        assert_eq!(reloaded.expenses(), &[coffee]);
    }

    #[test]
    fn empty_collection_round_trips() {
        let storage = MemoryStorage::with_contents(&encode(&[]).unwrap());
        let store = ExpenseStore::open(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_slot_falls_back_to_empty() {
        let storage = MemoryStorage::with_contents("{not json");
        let mut store = ExpenseStore::open(Box::new(storage.clone()));
        assert!(store.is_empty());

        store.add(&draft("Кофе", "100")).unwrap();
        assert_eq!(decode(&storage.contents().unwrap()).unwrap().len(), 1);
    }

    #[test]
    fn file_slot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.json");
        let mut store = ExpenseStore::open(Box::new(JsonFileStorage::new(&path)));
        let added = store.add(&draft("Кофе", "199,5")).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"amount\":199.5"), "{raw}");
        assert!(raw.contains("\"category\":\"Еда\""), "{raw}");
        assert!(raw.contains("\"date\":\"2024-01-05\""), "{raw}");

        let reloaded = ExpenseStore::open(Box::new(JsonFileStorage::new(&path)));
        assert_eq!(reloaded.expenses(), &[added]);
    }

    #[test]
    fn resolve_id_by_prefix() {
        let (mut store, _) = memory_store();
        let added = store.add(&draft("Кофе", "100")).unwrap();
        let full = added.id.to_string();
        assert_eq!(store.resolve_id(&full[..8]).unwrap(), added.id);
        assert!(store.resolve_id("").is_err());
        assert!(store.resolve_id("zzzz").is_err());
    }
}
