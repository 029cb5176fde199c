use log::debug;
use uuid::Uuid;

use crate::errors::RashodyError;
use crate::expenses::store::ExpenseStore;
use crate::expenses::Expense;

use super::actions::EditingAction;
use super::fields::{EditField, FieldEditor};

/// Result of re-checking the working copy against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    Reseeded,
    Gone,
}

/// The edit session of one table row.
///
/// Existing means the row is in the Editing state; committing consumes the
/// editor, which puts the row back into Viewing.
#[derive(Debug, Clone)]
pub struct RowEditor {
    seed: Expense,
    fields: FieldEditor,
}

impl RowEditor {
    pub fn begin(record: &Expense) -> Self {
        Self {
            seed: record.clone(),
            fields: FieldEditor::new(record.to_draft()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.seed.id
    }

    pub fn fields(&self) -> &FieldEditor {
        &self.fields
    }

    pub fn apply(&mut self, action: EditingAction) {
        self.fields.apply(action);
    }

    pub fn focus(&mut self, field: EditField) {
        self.fields.focus(field);
    }

    /// Re-seeds the working copy when the stored record was replaced elsewhere.
    pub fn sync(&mut self, current: Option<&Expense>) -> SyncOutcome {
        match current {
            None => SyncOutcome::Gone,
            Some(current) if *current == self.seed => SyncOutcome::Unchanged,
            Some(current) => {
                debug!("event=row_editor_reseed module=tui id={}", current.id);
                *self = Self::begin(current);
                SyncOutcome::Reseeded
            }
        }
    }

    /// Writes the working copy back through [`ExpenseStore::update`].
    ///
    /// Returns the stored record, or `None` if the record no longer exists.
    pub fn commit(self, store: &mut ExpenseStore) -> Result<Option<Expense>, RashodyError> {
        let record = self.fields.draft().to_expense(self.seed.id)?;
        if store.update(record)? {
            Ok(store.get(self.seed.id).cloned())
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use crate::expenses::storage::MemoryStorage;
    use crate::expenses::{ExpenseCategory, ExpenseDraft};

    use super::*;

    fn store_with_one() -> (ExpenseStore, Expense) {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let expense = store
            .add(&ExpenseDraft::new("Обед", ExpenseCategory::Food, "2024-03-01", "450"))
            .unwrap();
        (store, expense)
    }

    fn type_text(editor: &mut RowEditor, text: &str) {
        for c in text.chars() {
            editor.apply(EditingAction::InsertChar(c));
        }
    }

    #[test]
    fn working_copy_is_independent_until_commit() {
        let (mut store, expense) = store_with_one();
        let mut editor = RowEditor::begin(&expense);
        type_text(&mut editor, " в кафе");
        assert_eq!(store.get(expense.id).unwrap().description, "Обед");

        let committed = editor.commit(&mut store).unwrap().unwrap();
        assert_eq!(committed.description, "Обед в кафе");
        assert_eq!(store.get(expense.id), Some(&committed));
    }

    #[test]
    fn unchanged_commit_keeps_record() {
        let (mut store, expense) = store_with_one();
        let editor = RowEditor::begin(&expense);
        assert_eq!(editor.commit(&mut store).unwrap(), Some(expense.clone()));
        assert_eq!(store.expenses(), &[expense]);
    }

    #[test]
    fn invalid_amount_is_rejected_not_zeroed() {
        let (mut store, expense) = store_with_one();
        let mut editor = RowEditor::begin(&expense);
        editor.apply(EditingAction::PrevField);
        type_text(&mut editor, "abc");

        assert!(matches!(
            editor.commit(&mut store),
            Err(RashodyError::Validation(_))
        ));
        assert_eq!(
            store.get(expense.id).unwrap().amount,
            Decimal::from_str("450").unwrap()
        );
    }

    #[test]
    fn commit_after_delete_is_noop() {
        let (mut store, expense) = store_with_one();
        let editor = RowEditor::begin(&expense);
        store.delete(expense.id).unwrap();
        assert_eq!(editor.commit(&mut store).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn sync_reseeds_on_external_change() {
        let (mut store, expense) = store_with_one();
        let mut editor = RowEditor::begin(&expense);
        type_text(&mut editor, "!!!");
        assert_eq!(editor.sync(store.get(expense.id)), SyncOutcome::Unchanged);
        assert_eq!(editor.fields().draft().description, "Обед!!!");

        let renamed = Expense {
            description: "Ужин".to_string(),
            ..expense.clone()
        };
        store.update(renamed).unwrap();
        assert_eq!(editor.sync(store.get(expense.id)), SyncOutcome::Reseeded);
        assert_eq!(editor.fields().draft().description, "Ужин");

        store.delete(expense.id).unwrap();
        assert_eq!(editor.sync(store.get(expense.id)), SyncOutcome::Gone);
    }
}
