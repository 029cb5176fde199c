use log::debug;

use crate::errors::RashodyError;
use crate::expenses::store::ExpenseStore;
use crate::expenses::{Expense, ExpenseDraft};

use super::actions::EditingAction;
use super::fields::{EditField, FieldEditor};

/// The side form for new expenses.
#[derive(Debug, Clone)]
pub struct ExpenseForm {
    fields: FieldEditor,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self {
            fields: FieldEditor::new(ExpenseDraft::default()),
        }
    }
}

impl ExpenseForm {
    pub fn fields(&self) -> &FieldEditor {
        &self.fields
    }

    pub fn apply(&mut self, action: EditingAction) {
        self.fields.apply(action);
    }

    pub fn focus(&mut self, field: EditField) {
        self.fields.focus(field);
    }

    /// Hands the input to [`ExpenseStore::add`].
    ///
    /// Accepted input resets the form; rejected input stays for correction
    /// and yields `Ok(None)`. Storage failures are returned.
    pub fn submit(&mut self, store: &mut ExpenseStore) -> Result<Option<Expense>, RashodyError> {
        match store.add(&self.fields.draft()) {
            Ok(expense) => {
                *self = Self::default();
                Ok(Some(expense))
            }
            Err(RashodyError::Validation(reason)) => {
                debug!("event=form_submit module=tui status=rejected reason=\"{reason}\"");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
